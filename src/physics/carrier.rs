//! Carrier-gas constants for the Ergun momentum closure.

/// Physical constants of the carrier gas and the packing, as used by the
/// Ergun pressure-drop correlation.
///
/// The gas viscosity follows the Sutherland law
///
/// $$\mu(T) = \mu_0 \left(\frac{T}{T_{\mu_0}}\right)^{3/2}
///   \frac{T_{\mu_0} + S}{T + S},$$
///
/// anchored at the reference point `(viscosity_ref, ref_temperature)`.
#[derive(Debug, Clone)]
pub struct CarrierGas {
    /// Reference dynamic viscosity `μ0` at `ref_temperature`.
    pub viscosity_ref: f64,

    /// Temperature at which `viscosity_ref` holds [K].
    pub ref_temperature: f64,

    /// Sutherland constant `S` [K].
    pub sutherland_constant: f64,

    /// Adsorbent particle diameter [m].
    pub particle_diameter: f64,

    /// Molar mass of the carrier gas [g/mol].
    pub molar_mass: f64,
}

impl CarrierGas {
    /// Helium with tabulated Sutherland coefficients and a 5 mm particle.
    pub fn helium() -> Self {
        Self {
            viscosity_ref: 0.0210,
            ref_temperature: 323.15,
            sutherland_constant: 72.9,
            particle_diameter: 0.005,
            molar_mass: 4.0026,
        }
    }

    /// Sutherland temperature ratio `(T/T_μ0)^{3/2} · (T_μ0+S)/(T+S)`.
    ///
    /// Both the viscosity correction of the laminar Ergun term and the
    /// temperature dependence of the turbulent term use this factor.
    pub fn sutherland_ratio(&self, t: f64) -> f64 {
        (t / self.ref_temperature).powf(1.5) * (self.ref_temperature + self.sutherland_constant)
            / (t + self.sutherland_constant)
    }

    /// Dynamic viscosity at temperature `t` [K].
    pub fn viscosity(&self, t: f64) -> f64 {
        self.viscosity_ref * self.sutherland_ratio(t)
    }

    /// Checks that all constants are finite and strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("reference viscosity", self.viscosity_ref),
            ("reference temperature", self.ref_temperature),
            ("Sutherland constant", self.sutherland_constant),
            ("particle diameter", self.particle_diameter),
            ("molar mass", self.molar_mass),
        ];
        for (what, v) in checks {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("carrier gas {what} must be finite and > 0, got {v}"));
            }
        }
        Ok(())
    }
}
