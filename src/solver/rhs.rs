//! Spatial right-hand sides of the column equations.
//!
//! Computes, per node `i` and component `j`, the three rates entering the
//! Runge-Kutta update:
//!
//! **Adsorption (linear driving force), everywhere:**
//!
//! ```text
//! ∂q/∂t[i,j] = Kl_j · (Qeq[i,j] − Q[i,j])
//! ```
//!
//! **Total pressure (continuity), `i ∈ [0, Ng−1]`:**
//!
//! ```text
//! ∂Pt/∂t[i] = −V[i]·(Pt[i+1] − Pt[i])/dx
//!             −Pt[i]·(V[i+1] − V[i])/dx
//!             −Σ_j prefactor_j · (Qeq[i,j] − Q[i,j])
//! ```
//!
//! At the outlet the advective difference has no downstream node and the
//! zero-gradient ghost velocity `V[Ng+1] := V[Ng]` cancels the divergence
//! term, leaving only the adsorption source.
//!
//! **Mole-fraction transport, interior `i ∈ [1, Ng−1]`:**
//!
//! ```text
//! ∂y/∂t[i,j] = D_j·[y[i+1,j] − 2y[i,j] + y[i−1,j]
//!                   + (Pt[i] − Pt[i−1])·(y[i,j] − y[i−1,j])/Pt[i]] / dx²
//!              − V[i]·(y[i,j] − y[i−1,j])/dx
//!              + Σ_k prefactor_k·(Qeq[i,k] − Q[i,k])·y[i,k] / Pt[i]
//!              − (Qeq[i,j] − Q[i,j]) / Pt[i]
//! ```
//!
//! with `∂y/∂t[0,j] = 0` (inlet Dirichlet) and the outlet using the
//! zero-gradient ghost `y[Ng+1,j] := y[Ng,j]`, which collapses the diffusion
//! stencil to its one-sided form.
//!
//! Advection is first-order upwind (flow is always inlet → outlet),
//! diffusion second-order centered, no flux limiters, uniform grid.
//!
//! The mass-transfer prefactor couples the solid to the gas phase:
//! `prefactor_j = R·T·(1−ε)/ε · ρ_p · Kl_j`.

use nalgebra::DVector;

use crate::physics::{Component, GAS_CONSTANT};

/// Right-hand-side evaluator (component C5). Pure arithmetic on flat
/// buffers; owns only the precomputed per-component coefficients.
#[derive(Debug, Clone)]
pub struct RhsEvaluator {
    kl: Vec<f64>,
    d: Vec<f64>,
    prefactor: Vec<f64>,
    n_grid: usize,
    n_comp: usize,
    inv_dx: f64,
    inv_dx2: f64,
}

impl RhsEvaluator {
    /// Precomputes per-component coefficients for the given operating point.
    pub fn new(
        components: &[Component],
        temperature: f64,
        void_fraction: f64,
        particle_density: f64,
        dx: f64,
        n_grid: usize,
    ) -> Self {
        let kl: Vec<f64> = components.iter().map(|c| c.kl).collect();
        let d: Vec<f64> = components.iter().map(|c| c.d).collect();
        let prefactor: Vec<f64> = components
            .iter()
            .map(|c| {
                GAS_CONSTANT * temperature * ((1.0 - void_fraction) / void_fraction)
                    * particle_density
                    * c.kl
            })
            .collect();
        Self {
            kl,
            d,
            prefactor,
            n_grid,
            n_comp: components.len(),
            inv_dx: 1.0 / dx,
            inv_dx2: 1.0 / (dx * dx),
        }
    }

    /// Mass-transfer prefactors `R·T·(1−ε)/ε·ρ_p·Kl_j`, component-indexed.
    pub fn prefactors(&self) -> &[f64] {
        &self.prefactor
    }

    /// Evaluates all three rate fields at the given state.
    ///
    /// All slices use the flat `i·Nc + j` layout; `pt` and `v` are
    /// node-indexed. Outputs are fully overwritten.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        q_eq: &DVector<f64>,
        q: &DVector<f64>,
        v: &DVector<f64>,
        pt: &DVector<f64>,
        y: &DVector<f64>,
        dqdt: &mut DVector<f64>,
        dptdt: &mut DVector<f64>,
        dydt: &mut DVector<f64>,
    ) {
        let nc = self.n_comp;
        let ng = self.n_grid;
        let idx = self.inv_dx;
        let idx2 = self.inv_dx2;

        // inlet node: Dirichlet composition, full continuity balance
        let mut source = 0.0;
        for j in 0..nc {
            let k = j;
            dqdt[k] = self.kl[j] * (q_eq[k] - q[k]);
            dydt[k] = 0.0;
            source += self.prefactor[j] * (q_eq[k] - q[k]);
        }
        dptdt[0] = -v[0] * (pt[1] - pt[0]) * idx - pt[0] * (v[1] - v[0]) * idx - source;

        // interior nodes
        for i in 1..ng {
            let row = i * nc;

            // component sum of the mass balance, shared by all j at this node
            let mut source = 0.0;
            let mut weighted = 0.0;
            for j in 0..nc {
                let k = row + j;
                let driving = q_eq[k] - q[k];
                source += self.prefactor[j] * driving;
                weighted += self.prefactor[j] * driving * y[k];
            }
            weighted /= pt[i];

            dptdt[i] =
                -v[i] * (pt[i + 1] - pt[i]) * idx - pt[i] * (v[i + 1] - v[i]) * idx - source;

            for j in 0..nc {
                let k = row + j;
                let driving = q_eq[k] - q[k];
                dqdt[k] = self.kl[j] * driving;
                dydt[k] = self.d[j]
                    * (y[k + nc] - 2.0 * y[k] + y[k - nc]
                        + (pt[i] - pt[i - 1]) * (y[k] - y[k - nc]) / pt[i])
                    * idx2
                    - v[i] * (y[k] - y[k - nc]) * idx
                    + weighted
                    - driving / pt[i];
            }
        }

        // outlet node: ghost y[Ng+1] = y[Ng] and ghost V[Ng+1] = V[Ng]
        let row = ng * nc;
        let mut source = 0.0;
        for j in 0..nc {
            let k = row + j;
            source += self.prefactor[j] * (q_eq[k] - q[k]);
        }
        let outlet_sum = source / pt[ng];
        dptdt[ng] = -source;

        for j in 0..nc {
            let k = row + j;
            let driving = q_eq[k] - q[k];
            dqdt[k] = self.kl[j] * driving;
            dydt[k] = self.d[j]
                * (-y[k] + y[k - nc] + (pt[ng] - pt[ng - 1]) * (y[k] - y[k - nc]) / pt[ng])
                * idx2
                - v[ng] * (y[k] - y[k - nc]) * idx
                + outlet_sum
                - driving / pt[ng];
        }
    }
}
