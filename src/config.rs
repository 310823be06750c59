//! Simulation configuration record.
//!
//! The configuration is a plain structured record supplied by the driver;
//! reading it from a file is a concern of the embedding application. Every
//! run starts by calling [`SimulationConfig::validate`], which is the only
//! place [`SimulationError::Configuration`] originates.

use crate::error::SimulationError;
use crate::mixture::PredictionMethod;
use crate::physics::{CarrierGas, Component};

/// Tolerance on `Σ Yi0 = 1`.
const MOLE_FRACTION_TOLERANCE: f64 = 1.0e-10;

/// Complete description of a breakthrough experiment.
///
/// # Example
///
/// ```
/// use breakthrough_rs::config::SimulationConfig;
/// use breakthrough_rs::physics::{CarrierGas, Component, Isotherm};
///
/// let config = SimulationConfig {
///     components: vec![
///         Component::carrier("He", 0.9, 1.0e-6),
///         Component::new("CO2", 0.1, 0.5, 1.0e-6,
///             Isotherm::Langmuir { qsat: 3.0, b: 2.0e-5 }),
///     ],
///     ..SimulationConfig::default_column("demo")
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Name shown in the run banner and plot titles.
    pub display_name: String,

    /// Feed components; mole fractions must sum to one.
    pub components: Vec<Component>,

    /// Index of the carrier-gas component within `components`.
    pub carrier_gas_component: usize,

    /// Number of interior grid cells `Ng`; the column has `Ng + 1` nodes.
    pub grid_points: usize,

    /// Print progress every this many steps.
    pub print_every: usize,

    /// Write output records every this many steps.
    pub write_every: usize,

    /// Operating temperature [K].
    pub temperature: f64,

    /// Reference inlet total pressure [Pa].
    pub total_pressure: f64,

    /// Externally imposed pressure gradient [Pa/m], used for the
    /// breakthrough normalization and the outlet-pressure sanity check.
    pub pressure_gradient: f64,

    /// Column void fraction ε [-], in (0, 1).
    pub void_fraction: f64,

    /// Adsorbent particle density [kg/m³].
    pub particle_density: f64,

    /// Interstitial velocity at the column entrance [m/s].
    pub entrance_velocity: f64,

    /// Column length [m].
    pub column_length: f64,

    /// Integration time step [s].
    pub time_step: f64,

    /// Number of time steps (lower bound when `auto_steps` is set).
    pub time_steps: usize,

    /// Extend the run automatically until breakthrough is complete,
    /// then add a 10% tail.
    pub auto_steps: bool,

    /// Pulsed inlet: after `pulse_time` the feed reverts to pure carrier.
    pub pulse: bool,

    /// Pulse duration [s]; only meaningful when `pulse` is set.
    pub pulse_time: f64,

    /// Carrier-gas constants for the Ergun closure.
    pub carrier_gas: CarrierGas,

    /// Mixture-equilibrium method.
    pub prediction_method: PredictionMethod,
}

impl SimulationConfig {
    /// A column with typical lab-scale defaults and an empty component list.
    ///
    /// Intended as a `..` base for struct-update syntax; not valid to run
    /// until components are supplied. The default `(dx, dt)` pair respects
    /// the explicit scheme's stability limit on the Ergun-coupled pressure
    /// relaxation at the default entrance velocity.
    pub fn default_column(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            components: Vec::new(),
            carrier_gas_component: 0,
            grid_points: 50,
            print_every: 1000,
            write_every: 10,
            temperature: 300.0,
            total_pressure: 1.0e5,
            pressure_gradient: 0.0,
            void_fraction: 0.4,
            particle_density: 1000.0,
            entrance_velocity: 0.2,
            column_length: 1.0,
            time_step: 2.5e-3,
            time_steps: 20_000,
            auto_steps: false,
            pulse: false,
            pulse_time: 0.0,
            carrier_gas: CarrierGas::helium(),
            prediction_method: PredictionMethod::Iast,
        }
    }

    /// Grid spacing `dx = L / Ng` [m].
    pub fn dx(&self) -> f64 {
        self.column_length / self.grid_points as f64
    }

    /// Number of grid nodes `Ng + 1`.
    pub fn n_nodes(&self) -> usize {
        self.grid_points + 1
    }

    /// Number of components.
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    /// Checks the whole record; any violation is fatal.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fail = |msg: String| Err(SimulationError::Configuration(msg));

        if self.components.is_empty() {
            return fail("at least one component is required".into());
        }
        for c in &self.components {
            c.validate().map_err(SimulationError::Configuration)?;
        }

        let mut names = std::collections::HashSet::new();
        for c in &self.components {
            if !names.insert(c.name.as_str()) {
                return fail(format!("duplicate component name '{}'", c.name));
            }
        }

        let y_sum: f64 = self.components.iter().map(|c| c.y0).sum();
        if (y_sum - 1.0).abs() > MOLE_FRACTION_TOLERANCE {
            return fail(format!("inlet mole fractions must sum to 1, got {y_sum}"));
        }

        if self.carrier_gas_component >= self.components.len() {
            return fail(format!(
                "carrier gas index {} out of range for {} components",
                self.carrier_gas_component,
                self.components.len()
            ));
        }

        if self.grid_points < 1 {
            return fail("at least one grid cell is required".into());
        }
        if self.print_every == 0 || self.write_every == 0 {
            return fail("print_every and write_every must be >= 1".into());
        }

        let positive = [
            ("temperature", self.temperature),
            ("total pressure", self.total_pressure),
            ("particle density", self.particle_density),
            ("entrance velocity", self.entrance_velocity),
            ("column length", self.column_length),
            ("time step", self.time_step),
        ];
        for (what, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return fail(format!("{what} must be finite and > 0, got {v}"));
            }
        }
        if !self.pressure_gradient.is_finite() {
            return fail("pressure gradient must be finite".into());
        }
        if self.void_fraction <= 0.0 || self.void_fraction >= 1.0 {
            return fail(format!("void fraction must be in (0, 1), got {}", self.void_fraction));
        }
        if self.time_steps == 0 && !self.auto_steps {
            return fail("time_steps must be >= 1 unless auto_steps is enabled".into());
        }
        if self.pulse && !(self.pulse_time > 0.0) {
            return fail(format!("pulse time must be > 0, got {}", self.pulse_time));
        }

        self.carrier_gas.validate().map_err(SimulationError::Configuration)?;

        if self.prediction_method == PredictionMethod::ExplicitLangmuir {
            for c in &self.components {
                let ok = matches!(c.isotherm, crate::physics::Isotherm::Langmuir { .. })
                    || !c.isotherm.is_adsorbing();
                if !ok {
                    return fail(format!(
                        "explicit Langmuir prediction requires single-site Langmuir \
                         isotherms; component '{}' has {}",
                        c.name, c.isotherm
                    ));
                }
            }
        }

        Ok(())
    }
}
