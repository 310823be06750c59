//! Shared configurations for the integration tests.
//!
//! The columns here are deliberately small and weakly adsorbing so every
//! test runs fast while still exercising the full pipeline (Ergun
//! initialization, per-stage equilibrium refresh, velocity closure,
//! output).
//!
//! Two constraints shape the numbers:
//!
//! - the explicit scheme resolves the Ergun-coupled pressure relaxation,
//!   which acts like a diffusion with `D_p ≈ T/(2·laminar_prefactor·v)`;
//!   every `(dx, dt)` pair below keeps `D_p·dt/dx²` well under the explicit
//!   stability bound,
//! - the outlet continuity balance carries only the adsorption source, so
//!   the saturation capacities are kept small enough that the integrated
//!   sink stays a sub-percent perturbation on the outlet pressure.

#![allow(dead_code)]

use breakthrough_rs::config::SimulationConfig;
use breakthrough_rs::physics::{Component, Isotherm};

/// Pure carrier gas, 1 m column: the simplest stable configuration.
pub fn carrier_only(grid_points: usize, time_step: f64, time_steps: usize) -> SimulationConfig {
    SimulationConfig {
        components: vec![Component::carrier("He", 1.0, 1.0e-6)],
        grid_points,
        print_every: usize::MAX,
        write_every: 1,
        entrance_velocity: 0.1,
        column_length: 1.0,
        time_step,
        time_steps,
        ..SimulationConfig::default_column("carrier only")
    }
}

/// Carrier plus a non-adsorbing tracer: pure advection of a composition
/// front, useful for closure and traveling-step tests.
pub fn inert_tracer(grid_points: usize, time_step: f64, time_steps: usize) -> SimulationConfig {
    SimulationConfig {
        components: vec![
            Component::carrier("He", 0.9, 1.0e-6),
            Component::new("N2", 0.1, 0.0, 1.0e-6, Isotherm::Inert),
        ],
        grid_points,
        print_every: usize::MAX,
        write_every: 1,
        entrance_velocity: 0.1,
        column_length: 1.0,
        time_step,
        time_steps,
        ..SimulationConfig::default_column("inert tracer")
    }
}

/// Carrier plus a weakly adsorbing sorbate with a Langmuir isotherm.
pub fn weak_sorbate(
    grid_points: usize,
    time_step: f64,
    time_steps: usize,
    qsat: f64,
    kl: f64,
) -> SimulationConfig {
    SimulationConfig {
        components: vec![
            Component::carrier("He", 0.9, 1.0e-6),
            Component::new("CO2", 0.1, kl, 1.0e-6, Isotherm::Langmuir { qsat, b: 1.0e-5 }),
        ],
        grid_points,
        print_every: usize::MAX,
        write_every: 1,
        entrance_velocity: 0.1,
        column_length: 1.0,
        time_step,
        time_steps,
        ..SimulationConfig::default_column("weak sorbate")
    }
}

/// Largest mole-fraction closure violation over all nodes.
pub fn worst_mole_fraction_closure(state: &breakthrough_rs::state::ColumnState) -> f64 {
    let nc = state.n_comp;
    let mut worst = 0.0_f64;
    for i in 0..state.n_nodes() {
        let sum: f64 = (0..nc).map(|j| state.y[i * nc + j]).sum();
        worst = worst.max((sum - 1.0).abs());
    }
    worst
}
