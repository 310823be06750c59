//! Mixture-adsorption equilibrium prediction.
//!
//! Given a local gas composition `y` and total pressure `P_t`, the predictor
//! returns the equilibrium loadings `N_j` [mol/kg] of every component and the
//! adsorbed-phase mole fractions `X_j`. Two methods are available, selected
//! once at configuration time:
//!
//! - **Explicit competitive Langmuir** — closed form
//!   $N_j = q_{sat,j} b_j p_j / (1 + \sum_k b_k p_k)$ with $p_j = y_j P_t$.
//!   Requires every adsorbing component to carry a single-site Langmuir
//!   isotherm.
//! - **IAST** — Ideal Adsorbed Solution Theory. Solves for the reduced grand
//!   potential $\psi$ at which the hypothetical pure-component pressures
//!   $P^0_j(\psi)$ satisfy the Raoult-like closure
//!   $\sum_j y_j P_t / P^0_j(\psi) = 1$, then
//!   $x_j = y_j P_t / P^0_j$, $1/q_T = \sum_j x_j / q_j(P^0_j)$,
//!   $N_j = x_j q_T$.
//!
//! For components sharing a single saturation capacity the two methods agree
//! exactly; IAST generalizes to heterogeneous capacities and multi-site
//! kernels.
//!
//! # Warm-started caches
//!
//! The IAST solve at a grid node is repeated every Runge-Kutta stage with a
//! nearly unchanged composition, so the converged $\psi$ and $P^0_j$ values
//! are cached per node and reused as starting guesses. The cache slices are
//! owned by the column state and handed in by the caller; each node holds a
//! disjoint slice, so predictions at different nodes never alias (which is
//! what makes the per-node sweep trivially parallel).

use crate::physics::{Component, Isotherm};

/// Mixture-prediction method, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionMethod {
    /// Ideal Adsorbed Solution Theory (default; any isotherm mix).
    #[default]
    Iast,
    /// Closed-form competitive Langmuir (single-site Langmuir only).
    ExplicitLangmuir,
}

/// Failure of a single mixture-prediction call.
///
/// The integrator wraps this into
/// [`SimulationError::PredictorDiverged`](crate::error::SimulationError::PredictorDiverged)
/// together with the step and node indices.
#[derive(Debug)]
pub struct PredictionFailure {
    /// Iterations spent before giving up.
    pub iterations: usize,
}

/// Running tally of predictor work, for the progress report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictorStats {
    /// Total inner iterations across all calls.
    pub iterations: usize,
    /// Number of prediction calls.
    pub calls: usize,
}

impl PredictorStats {
    /// Records one converged call.
    pub fn record(&mut self, iterations: usize) {
        self.iterations += iterations;
        self.calls += 1;
    }

    /// Mean iterations per call (0 when nothing has run yet).
    pub fn average_iterations(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.iterations as f64 / self.calls as f64
        }
    }
}

/// Iteration cap for the IAST Newton solve.
const IAST_MAX_ITERATIONS: usize = 100;

/// Convergence tolerance on the closure residual `Σ x_j − 1`.
const IAST_TOLERANCE: f64 = 1.0e-10;

/// Mole fractions below this are treated as absent from the adsorbed phase.
const TRACE_MOLE_FRACTION: f64 = 1.0e-300;

/// Mixture-adsorption predictor (component C2 of the solver pipeline).
///
/// Owns a copy of the per-component isotherm kernels; all per-call state
/// (warm-start caches, output slices) is supplied by the caller, so a single
/// predictor serves every grid node.
#[derive(Debug, Clone)]
pub struct MixturePredictor {
    isotherms: Vec<Isotherm>,
    method: PredictionMethod,
    max_terms: usize,
}

impl MixturePredictor {
    /// Builds a predictor from the configured components.
    pub fn new(components: &[Component], method: PredictionMethod) -> Self {
        let isotherms: Vec<Isotherm> = components.iter().map(|c| c.isotherm.clone()).collect();
        // at least one slot per component so the cache layout never degenerates
        let max_terms = isotherms.iter().map(Isotherm::terms).max().unwrap_or(0).max(1);
        Self { isotherms, method, max_terms }
    }

    /// Number of components.
    pub fn n_components(&self) -> usize {
        self.isotherms.len()
    }

    /// Widest isotherm term count; sizes the per-node cache slices.
    ///
    /// A node's cache is `n_components · max_isotherm_terms` hypothetical
    /// pressures plus `max_isotherm_terms` grand-potential slots.
    pub fn max_isotherm_terms(&self) -> usize {
        self.max_terms
    }

    /// Selected prediction method.
    pub fn method(&self) -> PredictionMethod {
        self.method
    }

    /// Predicts equilibrium loadings at one grid node.
    ///
    /// # Arguments
    ///
    /// * `y`         — gas-phase mole fractions at the node, length `Nc`
    /// * `p_total`   — local total pressure [Pa], must be > 0
    /// * `x`         — out: adsorbed-phase mole fractions, length `Nc`
    /// * `n`         — out: equilibrium loadings [mol/kg], length `Nc`
    /// * `cache_p0`  — this node's hypothetical-pressure cache,
    ///                 length `Nc · max_isotherm_terms`
    /// * `cache_psi` — this node's grand-potential cache,
    ///                 length `max_isotherm_terms`
    ///
    /// Returns the number of inner iterations spent.
    pub fn predict(
        &self,
        y: &[f64],
        p_total: f64,
        x: &mut [f64],
        n: &mut [f64],
        cache_p0: &mut [f64],
        cache_psi: &mut [f64],
    ) -> Result<usize, PredictionFailure> {
        let nc = self.isotherms.len();
        debug_assert_eq!(y.len(), nc);
        debug_assert_eq!(x.len(), nc);
        debug_assert_eq!(n.len(), nc);
        debug_assert_eq!(cache_p0.len(), nc * self.max_terms);
        debug_assert_eq!(cache_psi.len(), self.max_terms);

        x.fill(0.0);
        n.fill(0.0);

        // components that actually partition into the adsorbed phase here
        let mut active = 0usize;
        let mut last_active = 0usize;
        for (j, iso) in self.isotherms.iter().enumerate() {
            if iso.is_adsorbing() && y[j] > TRACE_MOLE_FRACTION {
                active += 1;
                last_active = j;
            }
        }
        if active == 0 {
            return Ok(0);
        }

        // single adsorbing species: IAST reduces to the pure-component
        // isotherm at its partial pressure
        if active == 1 {
            let j = last_active;
            n[j] = self.isotherms[j].loading(y[j] * p_total);
            x[j] = 1.0;
            return Ok(1);
        }

        match self.method {
            PredictionMethod::ExplicitLangmuir => self.predict_explicit_langmuir(y, p_total, x, n),
            PredictionMethod::Iast => self.predict_iast(y, p_total, x, n, cache_p0, cache_psi),
        }
    }

    /// Closed-form competitive Langmuir with the shared site balance
    /// `1 + Σ_k b_k p_k` in the denominator.
    fn predict_explicit_langmuir(
        &self,
        y: &[f64],
        p_total: f64,
        x: &mut [f64],
        n: &mut [f64],
    ) -> Result<usize, PredictionFailure> {
        let mut denom = 1.0;
        for (j, iso) in self.isotherms.iter().enumerate() {
            if let Isotherm::Langmuir { b, .. } = *iso {
                denom += b * y[j] * p_total;
            }
        }

        let mut q_total = 0.0;
        for (j, iso) in self.isotherms.iter().enumerate() {
            if let Isotherm::Langmuir { qsat, b } = *iso {
                n[j] = qsat * b * y[j] * p_total / denom;
                q_total += n[j];
            }
        }
        if q_total > 0.0 {
            for j in 0..n.len() {
                x[j] = n[j] / q_total;
            }
        }
        Ok(1)
    }

    /// IAST Newton solve on the reduced grand potential.
    ///
    /// The closure residual `g(ψ) = Σ_j y_j P_t / P⁰_j(ψ) − 1` is strictly
    /// decreasing in ψ (each `P⁰_j` grows with ψ), with derivative
    /// `g'(ψ) = −Σ_j y_j P_t / (P⁰_j · q_j(P⁰_j))` from
    /// `dP⁰/dψ = P⁰ / q(P⁰)`. Newton steps that would drive ψ non-positive
    /// are replaced by a halving step.
    fn predict_iast(
        &self,
        y: &[f64],
        p_total: f64,
        x: &mut [f64],
        n: &mut [f64],
        cache_p0: &mut [f64],
        cache_psi: &mut [f64],
    ) -> Result<usize, PredictionFailure> {
        // warm start from this node's last converged grand potential;
        // first call falls back to the y-weighted pure-component mix
        let mut psi = cache_psi[0];
        if !(psi > 0.0) {
            psi = 0.0;
            for (j, iso) in self.isotherms.iter().enumerate() {
                if iso.is_adsorbing() {
                    psi += y[j] * iso.grand_potential(p_total);
                }
            }
        }

        let mut converged = false;
        let mut iterations = 0;
        for iter in 1..=IAST_MAX_ITERATIONS {
            iterations = iter;

            let mut g = -1.0;
            let mut dg = 0.0;
            for (j, iso) in self.isotherms.iter().enumerate() {
                if !iso.is_adsorbing() || y[j] <= TRACE_MOLE_FRACTION {
                    continue;
                }
                let p0 = iso.pressure_at_grand_potential(psi, cache_p0[j * self.max_terms]);
                cache_p0[j * self.max_terms] = p0;
                let term = y[j] * p_total / p0;
                g += term;
                dg -= term / iso.loading(p0);
            }

            if g.abs() < IAST_TOLERANCE {
                converged = true;
                break;
            }

            let next = psi - g / dg;
            psi = if next > 0.0 { next } else { 0.5 * psi };
        }

        if !converged {
            return Err(PredictionFailure { iterations });
        }
        cache_psi[0] = psi;

        // adsorbed-phase composition and total loading from the converged P0
        let mut inverse_q_total = 0.0;
        for (j, iso) in self.isotherms.iter().enumerate() {
            if !iso.is_adsorbing() || y[j] <= TRACE_MOLE_FRACTION {
                continue;
            }
            let p0 = cache_p0[j * self.max_terms];
            x[j] = y[j] * p_total / p0;
            inverse_q_total += x[j] / iso.loading(p0);
        }
        let q_total = 1.0 / inverse_q_total;
        for j in 0..n.len() {
            n[j] = x[j] * q_total;
        }

        Ok(iterations)
    }
}
