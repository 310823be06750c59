//! Per-species physical parameters.

use crate::physics::Isotherm;

/// Immutable description of one chemical species in the feed.
///
/// A component couples the gas-phase transport parameters (inlet mole
/// fraction, axial dispersion) to the solid-phase kinetics (linear
/// driving force coefficient) and the equilibrium model ([`Isotherm`]).
///
/// | Field  | Symbol  | Unit      | Role                                    |
/// |--------|---------|-----------|-----------------------------------------|
/// | `y0`   | $Y_{i0}$| —         | Inlet gas-phase mole fraction           |
/// | `kl`   | $K_l$   | 1/s       | LDF mass-transfer coefficient           |
/// | `d`    | $D$     | m²/s      | Axial dispersion coefficient            |
///
/// The mole fractions of all components in a configuration must sum to one;
/// that cross-component constraint is checked by
/// [`SimulationConfig::validate`](crate::config::SimulationConfig::validate).
///
/// # Example
///
/// ```
/// use breakthrough_rs::physics::{Component, Isotherm};
///
/// let co2 = Component::new("CO2", 0.1, 0.5, 1.0e-6,
///     Isotherm::Langmuir { qsat: 3.0, b: 2.0e-5 });
/// assert!(co2.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Component {
    /// Species name, used for output file names and plot legends.
    pub name: String,

    /// Inlet gas-phase mole fraction [-], must be in (0, 1].
    pub y0: f64,

    /// Linear-driving-force coefficient [1/s], must be >= 0.
    pub kl: f64,

    /// Axial dispersion coefficient [m²/s], must be >= 0.
    pub d: f64,

    /// Adsorption isotherm kernel.
    pub isotherm: Isotherm,
}

impl Component {
    /// Creates a component descriptor.
    ///
    /// Does not validate; call [`validate`](Self::validate) (done for the
    /// whole set by the configuration) before running.
    pub fn new(name: impl Into<String>, y0: f64, kl: f64, d: f64, isotherm: Isotherm) -> Self {
        Self { name: name.into(), y0, kl, d, isotherm }
    }

    /// An inert carrier-gas component: no adsorption, no dispersion of note.
    pub fn carrier(name: impl Into<String>, y0: f64, d: f64) -> Self {
        Self::new(name, y0, 0.0, d, Isotherm::Inert)
    }

    /// Checks the per-species constraints.
    ///
    /// The breakthrough output normalizes by `y0`, so `y0 = 0` is rejected
    /// here rather than producing infinities downstream.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("component name must not be empty".to_string());
        }
        if !self.y0.is_finite() || self.y0 <= 0.0 || self.y0 > 1.0 {
            return Err(format!(
                "component '{}': inlet mole fraction must be in (0, 1], got {}",
                self.name, self.y0
            ));
        }
        if !self.kl.is_finite() || self.kl < 0.0 {
            return Err(format!(
                "component '{}': LDF coefficient must be >= 0, got {}",
                self.name, self.kl
            ));
        }
        if !self.d.is_finite() || self.d < 0.0 {
            return Err(format!(
                "component '{}': axial dispersion must be >= 0, got {}",
                self.name, self.d
            ));
        }
        self.isotherm
            .validate()
            .map_err(|e| format!("component '{}': {}", self.name, e))
    }

    /// Multi-line description used by the simulation banner.
    pub fn repr(&self) -> String {
        format!(
            "Component '{}'\n\
             \x20   inlet mole fraction:  {} [-]\n\
             \x20   LDF coefficient:      {} [1/s]\n\
             \x20   axial dispersion:     {} [m^2/s]\n\
             \x20   isotherm:             {}\n",
            self.name, self.y0, self.kl, self.d, self.isotherm
        )
    }
}
