//! Pure-component adsorption isotherm kernels.
//!
//! # Model equations
//!
//! Each kernel maps a (partial) pressure $p$ [Pa] to an equilibrium loading
//! $q(p)$ [mol/kg]:
//!
//! | Kernel               | Loading $q(p)$                                         |
//! |----------------------|--------------------------------------------------------|
//! | `Inert`              | $0$                                                    |
//! | `Henry`              | $k_H \, p$                                             |
//! | `Langmuir`           | $q_{sat} \, b p / (1 + b p)$                           |
//! | `DualSiteLangmuir`   | $q_{sat,1} b_1 p / (1 + b_1 p) + q_{sat,2} b_2 p / (1 + b_2 p)$ |
//!
//! # Reduced grand potential
//!
//! The mixture predictor works with the reduced grand potential (spreading
//! pressure over $RT$ per unit mass of adsorbent),
//!
//! $$\psi(p) = \int_0^p \frac{q(p')}{p'} \, dp',$$
//!
//! which is analytic for all kernels here: $k_H p$ for Henry and
//! $\sum_t q_{sat,t} \ln(1 + b_t p)$ for the Langmuir family. The inverse
//! $P^0(\psi)$ — the hypothetical pure-component pressure at which the
//! component reaches a prescribed grand potential — is analytic for the
//! single-term kernels and solved by a warm-started, bracketed Newton
//! iteration for the dual-site form.
//!
//! # Selection
//!
//! The kernel is chosen once per component at configuration time as a tagged
//! variant; the per-call work is plain arithmetic with no dispatch.

/// Pure-component isotherm, selected per component at configuration time.
#[derive(Debug, Clone, PartialEq)]
pub enum Isotherm {
    /// Non-adsorbing species (typical carrier gas).
    Inert,

    /// Linear isotherm `q = kh·p` with `kh` in [mol/(kg·Pa)].
    Henry {
        /// Henry coefficient [mol/(kg·Pa)].
        kh: f64,
    },

    /// Single-site Langmuir isotherm.
    Langmuir {
        /// Saturation loading [mol/kg].
        qsat: f64,
        /// Affinity coefficient [1/Pa].
        b: f64,
    },

    /// Two independent Langmuir sites.
    DualSiteLangmuir {
        /// Saturation loading of the first site [mol/kg].
        qsat1: f64,
        /// Affinity coefficient of the first site [1/Pa].
        b1: f64,
        /// Saturation loading of the second site [mol/kg].
        qsat2: f64,
        /// Affinity coefficient of the second site [1/Pa].
        b2: f64,
    },
}

/// Convergence tolerance (relative) for the dual-site `P⁰(ψ)` inversion.
const INVERSION_TOLERANCE: f64 = 1.0e-12;

/// Iteration cap for the dual-site `P⁰(ψ)` inversion.
const INVERSION_MAX_ITERATIONS: usize = 80;

impl Isotherm {
    /// Equilibrium loading $q(p)$ [mol/kg] at pressure `p` [Pa].
    pub fn loading(&self, p: f64) -> f64 {
        match *self {
            Isotherm::Inert => 0.0,
            Isotherm::Henry { kh } => kh * p,
            Isotherm::Langmuir { qsat, b } => qsat * b * p / (1.0 + b * p),
            Isotherm::DualSiteLangmuir { qsat1, b1, qsat2, b2 } => {
                qsat1 * b1 * p / (1.0 + b1 * p) + qsat2 * b2 * p / (1.0 + b2 * p)
            }
        }
    }

    /// Reduced grand potential $\psi(p) = \int_0^p q/p' \, dp'$ [mol/kg].
    pub fn grand_potential(&self, p: f64) -> f64 {
        match *self {
            Isotherm::Inert => 0.0,
            Isotherm::Henry { kh } => kh * p,
            Isotherm::Langmuir { qsat, b } => qsat * (b * p).ln_1p(),
            Isotherm::DualSiteLangmuir { qsat1, b1, qsat2, b2 } => {
                qsat1 * (b1 * p).ln_1p() + qsat2 * (b2 * p).ln_1p()
            }
        }
    }

    /// Hypothetical pure-component pressure $P^0(\psi)$ [Pa].
    ///
    /// `warm_start` is the previously converged value at the same grid node
    /// (0.0 when none exists yet); only the dual-site inversion uses it.
    ///
    /// # Panics
    ///
    /// Debug-panics when called on a non-adsorbing kernel — the mixture
    /// predictor excludes those before inverting.
    pub fn pressure_at_grand_potential(&self, psi: f64, warm_start: f64) -> f64 {
        debug_assert!(self.is_adsorbing(), "P0(psi) requested for a non-adsorbing isotherm");
        match *self {
            Isotherm::Inert => f64::INFINITY,
            Isotherm::Henry { kh } => psi / kh,
            // exp_m1 keeps precision for small psi/qsat
            Isotherm::Langmuir { qsat, b } => (psi / qsat).exp_m1() / b,
            Isotherm::DualSiteLangmuir { .. } => self.invert_dual_site(psi, warm_start),
        }
    }

    /// Bracketed Newton inversion of the dual-site grand potential.
    ///
    /// $\psi(p)$ is strictly increasing with $\psi'(p) = q(p)/p > 0$, so a
    /// bracket `[lo, hi]` with `psi(hi) >= psi` always exists; Newton steps
    /// that leave the bracket fall back to bisection.
    fn invert_dual_site(&self, psi: f64, warm_start: f64) -> f64 {
        if psi <= 0.0 {
            return 0.0;
        }

        let mut hi = if warm_start > 0.0 { warm_start } else { 1.0 };
        while self.grand_potential(hi) < psi {
            hi *= 10.0;
        }
        let mut lo = 0.0;
        let mut p = if warm_start > 0.0 && warm_start <= hi {
            warm_start
        } else {
            0.5 * hi
        };

        for _ in 0..INVERSION_MAX_ITERATIONS {
            let residual = self.grand_potential(p) - psi;
            if residual.abs() <= INVERSION_TOLERANCE * psi {
                return p;
            }
            if residual > 0.0 {
                hi = p;
            } else {
                lo = p;
            }
            // psi'(p) = q(p)/p
            let slope = self.loading(p) / p;
            let next = p - residual / slope;
            p = if next > lo && next < hi { next } else { 0.5 * (lo + hi) };
        }
        p
    }

    /// Number of isotherm terms, used to size the per-node predictor caches.
    pub fn terms(&self) -> usize {
        match self {
            Isotherm::Inert => 0,
            Isotherm::Henry { .. } | Isotherm::Langmuir { .. } => 1,
            Isotherm::DualSiteLangmuir { .. } => 2,
        }
    }

    /// Whether the kernel produces a non-zero loading at positive pressure.
    ///
    /// A Langmuir site with `qsat = 0` or `b = 0` counts as inert, which is
    /// how a carrier gas is usually expressed.
    pub fn is_adsorbing(&self) -> bool {
        match *self {
            Isotherm::Inert => false,
            Isotherm::Henry { kh } => kh > 0.0,
            Isotherm::Langmuir { qsat, b } => qsat > 0.0 && b > 0.0,
            Isotherm::DualSiteLangmuir { qsat1, b1, qsat2, b2 } => {
                (qsat1 > 0.0 && b1 > 0.0) || (qsat2 > 0.0 && b2 > 0.0)
            }
        }
    }

    /// Validates that all parameters are finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let params: Vec<f64> = match *self {
            Isotherm::Inert => vec![],
            Isotherm::Henry { kh } => vec![kh],
            Isotherm::Langmuir { qsat, b } => vec![qsat, b],
            Isotherm::DualSiteLangmuir { qsat1, b1, qsat2, b2 } => vec![qsat1, b1, qsat2, b2],
        };
        for v in params {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("isotherm parameter must be finite and >= 0, got {v}"));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Isotherm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Isotherm::Inert => write!(f, "inert"),
            Isotherm::Henry { kh } => write!(f, "Henry (kh = {kh} mol/(kg·Pa))"),
            Isotherm::Langmuir { qsat, b } => {
                write!(f, "Langmuir (qsat = {qsat} mol/kg, b = {b} 1/Pa)")
            }
            Isotherm::DualSiteLangmuir { qsat1, b1, qsat2, b2 } => write!(
                f,
                "dual-site Langmuir (qsat = {qsat1}/{qsat2} mol/kg, b = {b1}/{b2} 1/Pa)"
            ),
        }
    }
}
