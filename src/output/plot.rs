//! Breakthrough-curve rendering.
//!
//! Plots the recorded outlet series of every component against
//! dimensionless time — the main experimental observable of a breakthrough
//! run — to a PNG file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use breakthrough_rs::output::plot_breakthrough_curves;
//!
//! // after the run
//! sink.finish()?;
//! plot_breakthrough_curves(sink.history(), sink.component_names(),
//!     "CO2/He on zeolite", "breakthrough.png")?;
//! ```

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

/// Renders one line per component of `(τ, c/c₀)` samples.
///
/// `history` and `names` are parallel, component-indexed; empty series are
/// skipped. The y-range is padded a little past the largest sample so a
/// completed breakthrough (plateau at 1) does not hug the frame.
pub fn plot_breakthrough_curves(
    history: &[Vec<(f64, f64)>],
    names: &[String],
    title: &str,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let tau_max = history
        .iter()
        .flat_map(|series| series.iter().map(|&(tau, _)| tau))
        .fold(0.0_f64, f64::max);
    let c_max = history
        .iter()
        .flat_map(|series| series.iter().map(|&(_, c)| c))
        .fold(0.0_f64, f64::max);
    if tau_max <= 0.0 {
        return Err("nothing to plot: no recorded breakthrough samples".into());
    }

    let root = BitMapBackend::new(path.as_ref(), (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..tau_max, 0.0..(1.05 * c_max.max(1.0)))?;

    chart
        .configure_mesh()
        .x_desc("dimensionless time  τ = t·v/L")
        .y_desc("outlet concentration  c/c₀")
        .label_style(("sans-serif", 16))
        .draw()?;

    for (j, series) in history.iter().enumerate() {
        if series.is_empty() {
            continue;
        }
        let color = Palette99::pick(j).to_rgba();
        let label = names.get(j).map(String::as_str).unwrap_or("?");
        chart
            .draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(2)))?
            .label(label.to_string())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", 16))
        .draw()?;

    root.present()?;
    Ok(())
}
