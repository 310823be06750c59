//! Fatal error taxonomy for the simulator.
//!
//! Every failure is fatal: there is no local recovery and the integrator
//! performs no rollback, so a returned error may leave the column state in an
//! intermediate stage. Output files written before the failure remain valid
//! up to the last flushed frame.

use std::fmt;

/// Fatal simulation errors.
///
/// The variants partition the failure modes of a run:
///
/// | Variant             | Raised by                          | Typical cause                               |
/// |---------------------|------------------------------------|---------------------------------------------|
/// | `Configuration`     | [`SimulationConfig::validate`]     | `Σ Yi0 ≠ 1`, negative physical constants    |
/// | `Geometry`          | equilibrium-loading pre-check      | implied outlet pressure `Pt[0] + dptdx·L < 0` |
/// | `VelocityComplex`   | Ergun velocity solve               | negative quadratic discriminant at a node   |
/// | `PredictorDiverged` | mixture predictor                  | IAST Newton iteration failed to converge    |
/// | `Io`                | output sink                        | file creation or write failure              |
///
/// [`SimulationConfig::validate`]: crate::config::SimulationConfig::validate
#[derive(Debug)]
pub enum SimulationError {
    /// Inconsistent configuration, detected before any stepping.
    Configuration(String),

    /// The implied outlet pressure `Pt[0] + dptdx·L` is non-positive.
    Geometry {
        /// The offending implied outlet pressure [Pa].
        outlet_pressure: f64,
    },

    /// The Ergun quadratic has no real positive root at some node.
    VelocityComplex {
        /// Grid node at which the discriminant went negative.
        node: usize,
        /// Value of `b² - 4ac` at that node.
        discriminant: f64,
    },

    /// The mixture predictor failed to converge at a grid node.
    PredictorDiverged {
        /// Time step at which the failure occurred.
        step: usize,
        /// Grid node at which the failure occurred.
        node: usize,
        /// Iterations spent before giving up.
        iterations: usize,
    },

    /// Output file creation or write failure.
    Io(std::io::Error),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Configuration(msg) => {
                write!(f, "configuration error: {msg}")
            }
            SimulationError::Geometry { outlet_pressure } => write!(
                f,
                "pressure gradient is too large: implied outlet pressure {outlet_pressure} Pa is non-positive"
            ),
            SimulationError::VelocityComplex { node, discriminant } => write!(
                f,
                "Ergun discriminant negative at node {node} (b^2 - 4ac = {discriminant}); \
                 no real velocity root"
            ),
            SimulationError::PredictorDiverged { step, node, iterations } => write!(
                f,
                "mixture prediction did not converge at step {step}, node {node} \
                 after {iterations} iterations"
            ),
            SimulationError::Io(e) => write!(f, "output I/O error: {e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Io(e) => Some(e),
            _ => None,
        }
    }
}

// Allows `?` on file operations inside the output sink.
impl From<std::io::Error> for SimulationError {
    fn from(e: std::io::Error) -> Self {
        SimulationError::Io(e)
    }
}
