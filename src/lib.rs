//! breakthrough-rs: fixed-bed adsorption breakthrough simulation
//!
//! Simulates a multi-component gas stream flowing through a packed
//! cylindrical column of adsorbent particles. Each species partitions
//! between the gas phase and the solid at the local equilibrium predicted by
//! a mixture isotherm model; the simulator integrates the coupled axial
//! advection–diffusion, linear-driving-force (LDF) mass-transfer and
//! momentum-balance equations in time and reports, at every grid node and
//! time step, velocity, total and partial pressures, mole fractions, and
//! current and equilibrium loadings. The headline output is the
//! breakthrough curve: outlet concentration versus time.
//!
//! # Architecture
//!
//! The solver pipeline per time step, in load-bearing order:
//!
//! ```text
//! ColumnState ──▶ RhsEvaluator ──▶ provisional state
//!                  │                  │
//!                  │                  ▼
//!                  │            MixturePredictor (per node, cached)
//!                  │                  │
//!                  │                  ▼
//!                  └──────────── ErgunSolver (velocity from pressure)
//!                                      │
//!                 (× 3 SSP-RK stages)  ▼
//!                               committed state ──▶ DataSink
//! ```
//!
//! - [`physics`]: immutable parameters — components, isotherms, carrier gas
//! - [`mixture`]: mixture-equilibrium prediction (IAST / explicit Langmuir)
//! - [`state`]: the contiguous field arrays and predictor caches
//! - [`solver`]: RHS kernels, Ergun closure, SSP-RK3 integrator
//! - [`simulation`]: driver — initialization, run loop, auto-termination
//! - [`output`]: breakthrough / column-profile data files and plotting
//! - [`config`], [`error`]: the configuration surface and error taxonomy
//!
//! # Quick start
//!
//! ```no_run
//! use breakthrough_rs::config::SimulationConfig;
//! use breakthrough_rs::output::DataSink;
//! use breakthrough_rs::physics::{Component, Isotherm};
//! use breakthrough_rs::simulation::Breakthrough;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulationConfig {
//!     components: vec![
//!         Component::carrier("He", 0.9, 1.0e-6),
//!         Component::new("CO2", 0.1, 0.5, 1.0e-6,
//!             Isotherm::Langmuir { qsat: 1.0e-3, b: 2.0e-5 }),
//!     ],
//!     auto_steps: true,
//!     ..SimulationConfig::default_column("CO2/He breakthrough")
//! };
//!
//! let mut simulation = Breakthrough::new(config)?;
//! print!("{simulation}");
//!
//! let mut sink = DataSink::create("out", simulation.config())?;
//! let summary = simulation.run(Some(&mut sink))?;
//! println!("finished after {} steps", summary.steps);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mixture;
pub mod output;
pub mod physics;
pub mod simulation;
pub mod solver;
pub mod state;

pub mod prelude {
    //! Convenient imports for common usage.
    pub use crate::config::SimulationConfig;
    pub use crate::error::SimulationError;
    pub use crate::mixture::{MixturePredictor, PredictionMethod};
    pub use crate::output::DataSink;
    pub use crate::physics::{CarrierGas, Component, Isotherm};
    pub use crate::simulation::{Breakthrough, RunSummary};
}
