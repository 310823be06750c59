//! Demo driver: CO₂ breakthrough on a helium carrier.
//!
//! Runs a representative two-component experiment, writes the breakthrough
//! and column-profile data files plus a PNG of the curves into `./out`, and
//! reports timing. Output directory can be overridden as the first
//! command-line argument.

use std::process::ExitCode;
use std::time::Instant;

use breakthrough_rs::prelude::*;
use breakthrough_rs::output::plot_breakthrough_curves;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "out".to_string());

    let config = SimulationConfig {
        components: vec![
            Component::carrier("He", 0.9, 1.0e-6),
            Component::new(
                "CO2",
                0.1,
                0.5,
                1.0e-6,
                Isotherm::Langmuir { qsat: 1.0e-3, b: 2.0e-5 },
            ),
        ],
        carrier_gas_component: 0,
        grid_points: 50,
        print_every: 500,
        write_every: 10,
        temperature: 300.0,
        total_pressure: 1.0e5,
        entrance_velocity: 0.2,
        column_length: 1.0,
        time_step: 2.5e-3,
        time_steps: 20_000,
        auto_steps: true,
        ..SimulationConfig::default_column("CO2/He breakthrough")
    };

    let mut simulation = Breakthrough::new(config)?;
    print!("{simulation}");

    let mut sink = DataSink::create(&out_dir, simulation.config())?;

    let before = Instant::now();
    let summary = simulation.run(Some(&mut sink))?;
    let elapsed = before.elapsed();

    println!(
        "took {:.3} s for {} steps ({:.1} predictor iterations/call on average)",
        elapsed.as_secs_f64(),
        summary.steps,
        summary.predictor_stats.average_iterations()
    );

    let plot_path = std::path::Path::new(&out_dir).join("breakthrough.png");
    plot_breakthrough_curves(
        sink.history(),
        sink.component_names(),
        "CO2/He breakthrough",
        &plot_path,
    )?;
    println!("breakthrough curves written to {}", plot_path.display());

    Ok(())
}
