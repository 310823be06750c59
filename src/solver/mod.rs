//! Numerical core: spatial derivatives, momentum closure, time integration.
//!
//! # Architecture
//!
//! The solver is split along the roles the equations play:
//!
//! - [`RhsEvaluator`] — the spatial right-hand sides `F(U)` of the coupled
//!   advection–diffusion / LDF / continuity system (pure arithmetic),
//! - [`ErgunSolver`] — the algebraic momentum closure recovering the
//!   velocity field from the pressure field, plus the backward
//!   initial-pressure integration,
//! - [`SspRk3`] — the three-stage Shu–Osher integrator orchestrating
//!   RHS evaluation, mixture-equilibrium refresh and velocity solve per
//!   stage.
//!
//! Everything here is single-threaded and synchronous; with the optional
//! `parallel` feature the per-node mixture-prediction sweep inside a stage
//! fans out over rayon (each node owns a disjoint cache slice, so the sweep
//! is embarrassingly parallel).

pub mod rhs;
pub mod ssprk3;
pub mod velocity;

pub use rhs::RhsEvaluator;
pub use ssprk3::SspRk3;
pub use velocity::ErgunSolver;
