//! Darcy–Weisbach pressure drop with the Swamee–Jain friction factor.

use crate::error::{HydraulicError, HydraulicResult};

/// Reynolds number below which flow is treated as laminar.
pub const LAMINAR_LIMIT: f64 = 2300.0;

pub fn reynolds(density: f64, velocity: f64, diameter: f64, viscosity: f64) -> f64 {
    density * velocity * diameter / viscosity
}

/// Darcy friction factor.
///
/// Laminar: 64/Re. Turbulent: Swamee–Jain explicit fit of Colebrook-White.
pub fn friction_factor(reynolds: f64, roughness: f64, diameter: f64) -> HydraulicResult<f64> {
    if !(reynolds.is_finite() && reynolds > 0.0) {
        return Err(HydraulicError::NonPhysical {
            what: "Reynolds number",
        });
    }

    let f = if reynolds < LAMINAR_LIMIT {
        64.0 / reynolds
    } else {
        let a = roughness / (3.7 * diameter);
        let b = 5.74 / reynolds.powf(0.9);
        0.25 / (a + b).log10().powi(2)
    };

    if f.is_finite() && f > 0.0 {
        Ok(f)
    } else {
        Err(HydraulicError::NonPhysical {
            what: "friction factor",
        })
    }
}

/// ΔP = f (L/D) ρ v² / 2, all SI.
pub fn pressure_drop(
    friction_factor: f64,
    length: f64,
    diameter: f64,
    density: f64,
    velocity: f64,
) -> f64 {
    friction_factor * (length / diameter) * 0.5 * density * velocity * velocity
}
