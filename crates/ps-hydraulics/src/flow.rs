//! Thermal load to water flow conversion.

use ps_core::constants::WATER_CP_J_PER_KG_K;
use ps_core::imperial::{to_gpm, to_lb_per_hr, to_megawatts};
use ps_core::numeric::{ensure_in_range, ensure_non_negative, ensure_positive};
use ps_core::units::{MassRate, Power, TempInterval, VolumeRate, kgps, m3ps, watts};
use ps_fluids::FluidProperties;

use crate::error::HydraulicResult;

/// Upper bound on the fan-heat fraction added to IT load.
pub const MAX_FAN_HEAT_FRACTION: f64 = 0.20;

/// Flow derived from one thermal load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSpec {
    pub volumetric: VolumeRate,
    pub mass: MassRate,
    /// IT load before fan heat.
    pub it_load: Power,
    /// IT load plus fan heat; the load the water actually carries.
    pub cooling_load: Power,
    pub delta_t: TempInterval,
    pub fan_heat_fraction: f64,
}

impl FlowSpec {
    pub fn gpm(&self) -> f64 {
        to_gpm(self.volumetric)
    }

    pub fn lb_per_hr(&self) -> f64 {
        to_lb_per_hr(self.mass)
    }

    pub fn it_load_mw(&self) -> f64 {
        to_megawatts(self.it_load)
    }

    pub fn cooling_load_mw(&self) -> f64 {
        to_megawatts(self.cooling_load)
    }

    pub fn is_zero(&self) -> bool {
        self.volumetric.value == 0.0
    }
}

/// Converts loads to flows for a fixed fluid.
///
/// Mass flow uses the water heat capacity (1.0 Btu/lb·°F) for every fluid;
/// only the density changes the volumetric result.
#[derive(Debug, Clone, Copy)]
pub struct FlowConverter {
    fluid: FluidProperties,
}

impl FlowConverter {
    pub fn new(fluid: FluidProperties) -> Self {
        Self { fluid }
    }

    pub fn fluid(&self) -> FluidProperties {
        self.fluid
    }

    pub fn convert(
        &self,
        it_load: Power,
        fan_heat_fraction: f64,
        delta_t: TempInterval,
    ) -> HydraulicResult<FlowSpec> {
        let load_w = ensure_non_negative(it_load.value, "thermal load")?;
        let fan = ensure_in_range(fan_heat_fraction, 0.0, MAX_FAN_HEAT_FRACTION, "fan heat")?;
        let dt_k = ensure_positive(delta_t.value, "delta T")?;

        let cooling_w = load_w * (1.0 + fan);
        let mdot = cooling_w / (WATER_CP_J_PER_KG_K * dt_k);
        let q = mdot / self.fluid.density.value;

        Ok(FlowSpec {
            volumetric: m3ps(q),
            mass: kgps(mdot),
            it_load: watts(load_w),
            cooling_load: watts(cooling_w),
            delta_t,
            fan_heat_fraction: fan,
        })
    }

    /// Flow for a load that already includes fan heat.
    pub fn convert_cooling(
        &self,
        cooling_load: Power,
        delta_t: TempInterval,
    ) -> HydraulicResult<FlowSpec> {
        self.convert(cooling_load, 0.0, delta_t)
    }
}

/// Classic water rule of thumb: GPM = MW × 3 412 000 / (500 × ΔT°F).
pub fn mw_to_gpm(mw: f64, delta_t_f: f64) -> HydraulicResult<f64> {
    ensure_non_negative(mw, "thermal load")?;
    ensure_positive(delta_t_f, "delta T")?;
    Ok(mw * 3_412_000.0 / (500.0 * delta_t_f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HydraulicError;
    use ps_core::imperial::{delta_f, megawatts};
    use ps_core::{Tolerances, nearly_equal};
    use ps_fluids::{FluidKind, lookup};

    fn water() -> FlowConverter {
        FlowConverter::new(lookup(FluidKind::Water, 0).unwrap())
    }

    #[test]
    fn fan_heat_scales_cooling_load() {
        let flow = water()
            .convert(megawatts(3.0), 0.05, delta_f(15.0))
            .unwrap();
        assert!((flow.cooling_load_mw() - 3.15).abs() < 1e-9);
        assert!((flow.it_load_mw() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn building_load_flow() {
        // 37.8 MW at 15 °F
        let flow = water().convert_cooling(megawatts(37.8), delta_f(15.0)).unwrap();
        assert!((flow.mass.value - 1083.4).abs() < 0.5);
        assert!((flow.volumetric.value - 1.0839).abs() < 1e-3);
        assert!((flow.gpm() - 17_180.0).abs() < 20.0);
    }

    #[test]
    fn agrees_with_rule_of_thumb() {
        let flow = water().convert_cooling(megawatts(10.0), delta_f(12.0)).unwrap();
        let rule = mw_to_gpm(10.0, 12.0).unwrap();
        // both sides use rounded constants
        assert!(nearly_equal(flow.gpm(), rule, Tolerances { abs: 0.0, rel: 5e-3 }));
    }

    #[test]
    fn zero_load_gives_zero_flow() {
        let flow = water().convert(megawatts(0.0), 0.05, delta_f(15.0)).unwrap();
        assert!(flow.is_zero());
        assert_eq!(flow.mass.value, 0.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let conv = water();
        let err = conv.convert(megawatts(5.0), 0.0, delta_f(0.0)).unwrap_err();
        assert!(matches!(err, HydraulicError::InvalidInput { what: "delta T", .. }));
        assert!(conv.convert(megawatts(-1.0), 0.0, delta_f(15.0)).is_err());
        assert!(conv.convert(megawatts(1.0), 0.25, delta_f(15.0)).is_err());
        assert!(conv.convert(megawatts(1.0), -0.01, delta_f(15.0)).is_err());
        assert!(conv.convert(megawatts(f64::NAN), 0.0, delta_f(15.0)).is_err());
        assert!(mw_to_gpm(1.0, 0.0).is_err());
    }

    #[test]
    fn glycol_needs_less_volume_for_same_mass() {
        let eg = FlowConverter::new(lookup(FluidKind::EthyleneGlycol, 50).unwrap());
        let a = water().convert_cooling(megawatts(5.0), delta_f(15.0)).unwrap();
        let b = eg.convert_cooling(megawatts(5.0), delta_f(15.0)).unwrap();
        assert!(nearly_equal(a.mass.value, b.mass.value, Tolerances::default()));
        assert!(b.volumetric.value < a.volumetric.value);
    }
}
