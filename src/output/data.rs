//! Streaming data-file sink.
//!
//! # File formats
//!
//! **`component_<i>_<name>.data`** — one line per logged step, three
//! whitespace-separated columns:
//!
//! ```text
//! τ = t·v_in/L     t/60 [min]     P[Ng,j] / ((p_total + dptdx·L)·Yi0_j)
//! ```
//!
//! **`column.data`** — one frame per logged step, frames separated by two
//! blank lines (the gnuplot `index` convention). Within a frame, one line
//! per grid node carrying `3 + 6·Nc` columns: `z`, `V`, `Pt`, then per
//! component `Q`, `Qeq`, `P`, `P/(Pt·Yi0)`, `dP/dt`, `dQ/dt`. The header
//! comments document the layout so the file is self-describing.
//!
//! The per-component pressure rate is composed from the stored shadows as
//! `dP/dt = y·dPt/dt + Pt·dy/dt`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::state::ColumnState;

/// Streaming sink for breakthrough and column-profile records
/// (component C7).
pub struct DataSink {
    component_streams: Vec<BufWriter<File>>,
    column_stream: BufWriter<File>,
    component_names: Vec<String>,
    /// Per-component normalization `(p_total + dptdx·L)·Yi0_j`.
    normalization: Vec<f64>,
    /// Inlet mole fractions, for the `P/(Pt·Yi0)` profile column.
    y0: Vec<f64>,
    v_in: f64,
    column_length: f64,
    dx: f64,
    /// Recorded `(τ, normalized outlet concentration)` per component,
    /// kept for plotting after the run.
    history: Vec<Vec<(f64, f64)>>,
}

impl DataSink {
    /// Creates the output files inside `dir` and writes the column-file
    /// header.
    pub fn create(dir: impl AsRef<Path>, config: &SimulationConfig) -> Result<Self, SimulationError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut component_streams = Vec::with_capacity(config.n_components());
        for (i, c) in config.components.iter().enumerate() {
            let path: PathBuf = dir.join(format!("component_{}_{}.data", i, c.name));
            component_streams.push(BufWriter::new(File::create(path)?));
        }

        let mut column_stream = BufWriter::new(File::create(dir.join("column.data"))?);
        let mut column_nr = 1;
        writeln!(column_stream, "# column {column_nr}: z  (column position)")?;
        column_nr += 1;
        writeln!(column_stream, "# column {column_nr}: V  (velocity)")?;
        column_nr += 1;
        writeln!(column_stream, "# column {column_nr}: Pt (total pressure)")?;
        column_nr += 1;
        for j in 0..config.n_components() {
            writeln!(column_stream, "# column {column_nr}: component {j} Q     (loading)")?;
            column_nr += 1;
            writeln!(column_stream, "# column {column_nr}: component {j} Qeq   (equilibrium loading)")?;
            column_nr += 1;
            writeln!(column_stream, "# column {column_nr}: component {j} P     (partial pressure)")?;
            column_nr += 1;
            writeln!(column_stream, "# column {column_nr}: component {j} Pnorm (normalized partial pressure)")?;
            column_nr += 1;
            writeln!(column_stream, "# column {column_nr}: component {j} Dpdt  (derivative P with t)")?;
            column_nr += 1;
            writeln!(column_stream, "# column {column_nr}: component {j} Dqdt  (derivative Q with t)")?;
            column_nr += 1;
        }

        let reference = config.total_pressure + config.pressure_gradient * config.column_length;
        let normalization = config.components.iter().map(|c| reference * c.y0).collect();

        Ok(Self {
            component_streams,
            column_stream,
            component_names: config.components.iter().map(|c| c.name.clone()).collect(),
            normalization,
            y0: config.components.iter().map(|c| c.y0).collect(),
            v_in: config.entrance_velocity,
            column_length: config.column_length,
            dx: config.dx(),
            history: vec![Vec::new(); config.n_components()],
        })
    }

    /// Component names, in file order.
    pub fn component_names(&self) -> &[String] {
        &self.component_names
    }

    /// Recorded breakthrough series, `(τ, normalized concentration)` per
    /// component.
    pub fn history(&self) -> &[Vec<(f64, f64)>] {
        &self.history
    }

    /// Writes one breakthrough line per component and one column frame.
    pub fn write_record(&mut self, t: f64, state: &ColumnState) -> Result<(), SimulationError> {
        let nc = state.n_comp;
        let tau = t * self.v_in / self.column_length;

        for j in 0..nc {
            let normalized = state.outlet_partial_pressure(j) / self.normalization[j];
            writeln!(self.component_streams[j], "{} {} {}", tau, t / 60.0, normalized)?;
            self.history[j].push((tau, normalized));
        }

        for i in 0..state.n_nodes() {
            write!(
                self.column_stream,
                "{} {} {}",
                i as f64 * self.dx,
                state.v[i],
                state.pt[i]
            )?;
            for j in 0..nc {
                let k = i * nc + j;
                let p_rate = state.y[k] * state.dptdt[i] + state.pt[i] * state.dydt[k];
                write!(
                    self.column_stream,
                    " {} {} {} {} {} {}",
                    state.q[k],
                    state.qeq[k],
                    state.p[k],
                    state.p[k] / (state.pt[i] * self.y0[j]),
                    p_rate,
                    state.dqdt[k]
                )?;
            }
            writeln!(self.column_stream)?;
        }
        write!(self.column_stream, "\n\n")?;

        Ok(())
    }

    /// Flushes all streams, surfacing any deferred write error.
    pub fn finish(&mut self) -> Result<(), SimulationError> {
        for s in &mut self.component_streams {
            s.flush()?;
        }
        self.column_stream.flush()?;
        Ok(())
    }
}
