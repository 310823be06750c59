//! Simulation driver: initialization, run loop, auto-termination.
//!
//! [`Breakthrough`] wires the column state to its collaborators (mixture
//! predictor, Ergun solver, RHS evaluator, SSP-RK3 integrator) and owns the
//! run loop. One instance corresponds to one experiment; the configuration
//! is validated once at construction and immutable afterwards.
//!
//! # Initialization
//!
//! The column starts filled with pure carrier gas at the pressure profile
//! obtained by integrating the Ergun equation backwards from the outlet held
//! at `p_total`. The velocity field is seeded as `v_in · p_total / Pt(z)`,
//! the inlet partial pressures are the feed composition times `p_total`, and
//! the initial equilibrium loadings come from one mixture-prediction sweep
//! over the nodes.
//!
//! # Auto-termination
//!
//! With `auto_steps`, every step first evaluates the outlet tolerance
//! `max_j |P[Ng,j] / ((p_total + dptdx·L)·Yi0_j) − 1|`. Once it drops below
//! 1% the horizon is pinned to `⌈1.1·step⌉`, giving a 10% post-breakthrough
//! tail, and automatic extension stops.

use std::fmt;

use nalgebra::DVector;

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::mixture::{MixturePredictor, PredictorStats};
use crate::output::DataSink;
use crate::solver::{ErgunSolver, RhsEvaluator, SspRk3};
use crate::state::ColumnState;

/// Outlet tolerance below which breakthrough counts as complete.
const BREAKTHROUGH_TOLERANCE: f64 = 0.01;

/// What a completed run reports back.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Time steps actually taken.
    pub steps: usize,
    /// Mixture-predictor work over the whole run.
    pub predictor_stats: PredictorStats,
}

/// A configured breakthrough experiment (component C8).
pub struct Breakthrough {
    config: SimulationConfig,
    state: ColumnState,
    predictor: MixturePredictor,
    integrator: SspRk3,
    stats: PredictorStats,
    n_steps: usize,
    auto_steps: bool,
}

impl Breakthrough {
    /// Validates the configuration, allocates the state and runs the
    /// initialization pass.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Configuration`] for inconsistent inputs,
    /// [`SimulationError::Geometry`] when the configured pressure gradient
    /// implies a non-positive outlet pressure, or
    /// [`SimulationError::PredictorDiverged`] if the initial equilibrium
    /// sweep fails.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let predictor = MixturePredictor::new(&config.components, config.prediction_method);
        let state = ColumnState::new(
            config.grid_points,
            config.n_components(),
            predictor.max_isotherm_terms(),
        );
        let ergun = ErgunSolver::new(
            &config.carrier_gas,
            config.void_fraction,
            config.entrance_velocity,
            config.dx(),
        );
        let rhs = RhsEvaluator::new(
            &config.components,
            config.temperature,
            config.void_fraction,
            config.particle_density,
            config.dx(),
            config.grid_points,
        );
        let integrator = SspRk3::new(
            rhs,
            ergun,
            config.time_step,
            config.temperature,
            config.total_pressure,
            config.pressure_gradient,
            config.column_length,
            config.carrier_gas_component,
            config.pulse,
            config.pulse_time,
        );

        let n_steps = config.time_steps;
        let auto_steps = config.auto_steps;
        let mut simulation = Self {
            config,
            state,
            predictor,
            integrator,
            stats: PredictorStats::default(),
            n_steps,
            auto_steps,
        };
        simulation.initialize()?;
        Ok(simulation)
    }

    /// The immutable configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read access to the column state (for output and inspection).
    pub fn state(&self) -> &ColumnState {
        &self.state
    }

    /// Predictor work so far.
    pub fn predictor_stats(&self) -> PredictorStats {
        self.stats
    }

    /// Current step horizon (grows only through configuration or shrinks
    /// when auto-termination pins the tail).
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Worst-component deviation of the outlet from complete breakthrough.
    pub fn outlet_tolerance(&self) -> f64 {
        let reference =
            self.config.total_pressure + self.config.pressure_gradient * self.config.column_length;
        let mut tolerance = 0.0_f64;
        for (j, c) in self.config.components.iter().enumerate() {
            let normalized = self.state.outlet_partial_pressure(j) / (reference * c.y0);
            tolerance = tolerance.max((normalized - 1.0).abs());
        }
        tolerance
    }

    /// Seeds pressures, velocities, compositions and equilibrium loadings.
    fn initialize(&mut self) -> Result<(), SimulationError> {
        let n_nodes = self.config.n_nodes();
        let nc = self.config.n_components();
        let carrier = self.config.carrier_gas_component;
        let p_total = self.config.total_pressure;

        // the configured gradient must leave the outlet at positive pressure
        let implied_outlet =
            p_total + self.config.pressure_gradient * self.config.column_length;
        if implied_outlet < 0.0 {
            return Err(SimulationError::Geometry { outlet_pressure: implied_outlet });
        }

        self.state.p.fill(0.0);
        self.state.q.fill(0.0);

        // initial total pressure along the column from the Ergun equation
        let mut pt_init = DVector::zeros(n_nodes);
        self.integrator.ergun().initial_pressure(
            p_total,
            self.config.temperature,
            &mut pt_init,
        );
        log::info!(
            "Ergun initial profile: inlet {:.1} Pa, outlet {:.1} Pa, drop {:.1} Pa",
            pt_init[0],
            pt_init[n_nodes - 1],
            pt_init[0] - pt_init[n_nodes - 1]
        );

        // velocity seeded from the pressure ratio, inlet pinned
        for i in 0..n_nodes {
            self.state.v[i] =
                self.config.entrance_velocity * p_total / pt_init[i];
        }
        self.state.v[0] = self.config.entrance_velocity;

        // pure carrier everywhere but the entrance; feed composition at i = 0
        for i in 1..n_nodes {
            self.state.p[i * nc + carrier] = pt_init[i];
        }
        for (j, c) in self.config.components.iter().enumerate() {
            self.state.p[j] = p_total * c.y0;
        }

        // mole fractions from the partial pressures, then one prediction
        // sweep for the initial equilibrium loadings
        {
            let mt = self.state.max_terms;
            let ColumnState {
                ref p,
                ref mut y,
                ref mut qeq,
                ref mut cache_p0,
                ref mut cache_psi,
                ref mut x_scratch,
                ..
            } = self.state;
            let y = y.as_mut_slice();
            let qeq = qeq.as_mut_slice();
            for i in 0..n_nodes {
                let row = i * nc;
                let mut sum = 0.0;
                for j in 0..nc {
                    y[row + j] = (p[row + j] / pt_init[i]).max(0.0);
                    sum += y[row + j];
                }
                for j in 0..nc {
                    y[row + j] /= sum;
                }

                let iterations = self
                    .predictor
                    .predict(
                        &y[row..row + nc],
                        pt_init[i],
                        x_scratch,
                        &mut qeq[row..row + nc],
                        &mut cache_p0[row * mt..(row + nc) * mt],
                        &mut cache_psi[i * mt..(i + 1) * mt],
                    )
                    .map_err(|failure| SimulationError::PredictorDiverged {
                        step: 0,
                        node: i,
                        iterations: failure.iterations,
                    })?;
                self.stats.record(iterations);
            }
        }

        // total pressure is seeded from the Ergun profile itself; summing
        // the node-0 feed partial pressures instead would put a pressure
        // rise between the first two nodes and leave the first velocity
        // solve without a real root
        self.state.pt.copy_from(&pt_init);

        Ok(())
    }

    /// Advances the simulation by one step, applying the auto-termination
    /// rule first.
    pub fn compute_step(&mut self, step: usize) -> Result<(), SimulationError> {
        if self.auto_steps && self.outlet_tolerance() < BREAKTHROUGH_TOLERANCE {
            self.n_steps = (1.1 * step as f64).ceil() as usize;
            self.auto_steps = false;
            log::info!(
                "convergence criteria reached at step {step}, running 10% longer \
                 (until step {})",
                self.n_steps
            );
        }
        self.integrator
            .step(&mut self.state, &self.predictor, &mut self.stats, step)
    }

    /// Runs to completion, streaming records to `sink` when given.
    pub fn run(&mut self, mut sink: Option<&mut DataSink>) -> Result<RunSummary, SimulationError> {
        let mut step = 0;
        while step < self.n_steps || self.auto_steps {
            self.compute_step(step)?;
            let t = step as f64 * self.config.time_step;

            if step % self.config.write_every == 0 {
                if let Some(s) = sink.as_deref_mut() {
                    s.write_record(t, &self.state)?;
                }
            }
            if step % self.config.print_every == 0 {
                println!("Timestep {step}, time: {t:.6} [s]");
                println!(
                    "    Average number of mixture-prediction steps: {:.6}",
                    self.stats.average_iterations()
                );
            }
            step += 1;
        }

        if let Some(s) = sink.as_deref_mut() {
            s.finish()?;
        }
        println!(
            "Final timestep {}, time: {:.6} [s]",
            step,
            self.config.time_step * step as f64
        );

        Ok(RunSummary { steps: step, predictor_stats: self.stats })
    }
}

impl fmt::Display for Breakthrough {
    /// Run banner, mirroring the configuration back to the operator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "Column properties")?;
        writeln!(f, "=======================================================")?;
        writeln!(f, "Display-name:                          {}", c.display_name)?;
        writeln!(f, "Temperature:                           {} [K]", c.temperature)?;
        writeln!(f, "Column length:                         {} [m]", c.column_length)?;
        writeln!(f, "Column void-fraction:                  {} [-]", c.void_fraction)?;
        writeln!(f, "Particle density:                      {} [kg/m^3]", c.particle_density)?;
        writeln!(f, "Total pressure:                        {} [Pa]", c.total_pressure)?;
        writeln!(f, "Pressure gradient:                     {} [Pa/m]", c.pressure_gradient)?;
        writeln!(f, "Column entrance interstitial velocity: {} [m/s]", c.entrance_velocity)?;
        writeln!(f)?;
        writeln!(f, "Breakthrough settings")?;
        writeln!(f, "=======================================================")?;
        writeln!(f, "Number of time steps:          {}", self.n_steps)?;
        writeln!(f, "Automatic number of steps:     {}", c.auto_steps)?;
        writeln!(f, "Print every step:              {}", c.print_every)?;
        writeln!(f, "Write data every step:         {}", c.write_every)?;
        writeln!(f)?;
        writeln!(f, "Integration details")?;
        writeln!(f, "=======================================================")?;
        writeln!(f, "Time step:                     {} [s]", c.time_step)?;
        writeln!(f, "Number of column grid points:  {}", c.grid_points)?;
        writeln!(f, "Column spacing:                {} [m]", c.dx())?;
        writeln!(f)?;
        writeln!(f, "Component data")?;
        writeln!(f, "=======================================================")?;
        writeln!(f, "maximum isotherm terms:        {}", self.predictor.max_isotherm_terms())?;
        for component in &c.components {
            writeln!(f, "{}", component.repr())?;
        }
        Ok(())
    }
}
