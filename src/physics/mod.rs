//! Physical parameter types for the packed column.
//!
//! This module holds everything that is fixed before a run starts:
//!
//! - [`Component`]: per-species physical parameters (inlet mole fraction,
//!   linear-driving-force coefficient, axial dispersion, isotherm),
//! - [`Isotherm`]: the adsorption-equilibrium kernels, selected once per
//!   component at configuration time,
//! - [`CarrierGas`]: the carrier-gas constants entering the Ergun momentum
//!   closure (Sutherland viscosity law, particle diameter, molar mass).
//!
//! The dynamic column fields live in [`crate::state::ColumnState`]; the
//! equations acting on them live under [`crate::solver`].

pub mod carrier;
pub mod component;
pub mod isotherm;

pub use carrier::CarrierGas;
pub use component::Component;
pub use isotherm::Isotherm;

/// Molar gas constant [J/(mol·K)].
pub const GAS_CONSTANT: f64 = 8.314_462_618_153_24;
