//! Ergun momentum closure.
//!
//! # Mathematical background
//!
//! The Ergun correlation relates the axial pressure gradient in a packed bed
//! to the interstitial velocity through a laminar (Kozeny–Carman) and a
//! turbulent (Burke–Plummer) contribution. Written per node as a quadratic
//! in the velocity,
//!
//! ```text
//! a·V² + b·V + c = 0
//!
//! a = laminar_prefactor · Pt[i] / T
//! b = turbulent_prefactor · (T/T_μ0)^{3/2} · (T_μ0+S)/(T+S)
//! c = (Pt[i] − Pt[i−1]) / dx
//! ```
//!
//! the physical branch is the positive root
//! `V = (−b + √(b² − 4ac)) / (2a)`. The prefactors depend only on the
//! packing, the carrier gas and the entrance velocity, and are computed once
//! at construction:
//!
//! ```text
//! laminar_prefactor   = μ0 · v_in · 150(1−ε)² / (ε² · d_p²)
//! turbulent_prefactor = v_in · |v_in| · 1.75(1−ε) · M / (ε · d_p · R)
//! ```
//!
//! The same prefactors drive the backward initial-pressure integration
//! ([`ErgunSolver::initial_pressure`]); the discriminant is evaluated exactly
//! as written above, because the scheme's stability depends on consistent
//! round-off between the initial solve and the running solve.

use nalgebra::DVector;

use crate::error::SimulationError;
use crate::physics::{CarrierGas, GAS_CONSTANT};

/// Per-node Ergun velocity solve with a Dirichlet inlet (component C4).
#[derive(Debug, Clone)]
pub struct ErgunSolver {
    laminar_prefactor: f64,
    turbulent_prefactor: f64,
    carrier: CarrierGas,
    v_in: f64,
    dx: f64,
}

impl ErgunSolver {
    /// Precomputes the packing prefactors.
    pub fn new(carrier: &CarrierGas, void_fraction: f64, v_in: f64, dx: f64) -> Self {
        let eps = void_fraction;
        let d_p = carrier.particle_diameter;
        let laminar_prefactor = carrier.viscosity_ref * v_in * (150.0 * (1.0 - eps) * (1.0 - eps))
            / ((eps * eps) * (d_p * d_p));
        let turbulent_prefactor = v_in * v_in.abs() * (1.75 * (1.0 - eps) * carrier.molar_mass)
            / (eps * d_p * GAS_CONSTANT);
        Self {
            laminar_prefactor,
            turbulent_prefactor,
            carrier: carrier.clone(),
            v_in,
            dx,
        }
    }

    /// Recovers the interstitial velocity field from the total pressure.
    ///
    /// `v[0]` is pinned to the entrance velocity; every other node takes the
    /// positive root of the Ergun quadratic against its upstream neighbor.
    ///
    /// # Errors
    ///
    /// [`SimulationError::VelocityComplex`] when the discriminant goes
    /// negative at some node (an unphysical pressure-gradient sign for the
    /// chosen branch).
    pub fn solve(
        &self,
        pt: &DVector<f64>,
        temperature: f64,
        v: &mut DVector<f64>,
    ) -> Result<(), SimulationError> {
        debug_assert_eq!(pt.len(), v.len());

        // node-independent turbulent coefficient
        let term_b = self.turbulent_prefactor * self.carrier.sutherland_ratio(temperature);

        v[0] = self.v_in;
        for i in 1..pt.len() {
            let term_a = self.laminar_prefactor * pt[i] / temperature;
            let term_c = (pt[i] - pt[i - 1]) / self.dx;
            let discriminant = term_b * term_b - 4.0 * term_a * term_c;
            if discriminant < 0.0 {
                return Err(SimulationError::VelocityComplex { node: i, discriminant });
            }
            v[i] = (-term_b + discriminant.sqrt()) / (2.0 * term_a);
        }
        Ok(())
    }

    /// Integrates the Ergun equation backwards from the outlet held at
    /// `p_total`, seeding the initial column pressure profile.
    ///
    /// Forward-Euler in `−z`:
    ///
    /// ```text
    /// f(p) = −laminar_prefactor · (T/T_μ0)^{3/2} (T_μ0+S)/(T+S)
    ///        − turbulent_prefactor · p / T
    /// p[i−1] = p[i] − f(p[i]) · dx
    /// ```
    pub fn initial_pressure(&self, p_total: f64, temperature: f64, pt: &mut DVector<f64>) {
        let n = pt.len();
        let sutherland = self.carrier.sutherland_ratio(temperature);

        pt[n - 1] = p_total;
        for i in (1..n).rev() {
            let f_p = -self.laminar_prefactor * sutherland
                - self.turbulent_prefactor * (pt[i] / temperature);
            pt[i - 1] = pt[i] - f_p * self.dx;
        }
    }
}
