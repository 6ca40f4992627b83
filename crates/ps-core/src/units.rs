// ps-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, DynamicViscosity as UomDynamicViscosity, Length as UomLength,
    MassDensity as UomMassDensity, MassRate as UomMassRate, Power as UomPower,
    Pressure as UomPressure, Ratio as UomRatio, TemperatureInterval as UomTemperatureInterval,
    Velocity as UomVelocity, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type TempInterval = UomTemperatureInterval;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pas(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn dk(v: f64) -> TempInterval {
    use uom::si::temperature_interval::kelvin;
    TempInterval::new::<kelvin>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// US customary units used at the edges (study files, reports, CLI).
///
/// Everything crossing a crate boundary is SI; these helpers convert on the
/// way in and out.
pub mod imperial {
    use super::*;

    pub const M_PER_FT: f64 = 0.3048;
    pub const M_PER_IN: f64 = 0.0254;
    pub const PA_PER_PSI: f64 = 6_894.757_293_168;
    pub const M3PS_PER_GPM: f64 = 3.785_411_784e-3 / 60.0;
    pub const KG_PER_LB: f64 = 0.453_592_37;
    pub const KGPM3_PER_LBPFT3: f64 = 16.018_463_373_960_14;
    pub const K_PER_F: f64 = 5.0 / 9.0;
    pub const W_PER_MW: f64 = 1.0e6;
    /// One ton of refrigeration (12 000 Btu/h) in watts.
    pub const W_PER_TON: f64 = 3_516.852_842;

    #[inline]
    pub fn feet(v: f64) -> Length {
        m(v * M_PER_FT)
    }

    #[inline]
    pub fn inches(v: f64) -> Length {
        m(v * M_PER_IN)
    }

    #[inline]
    pub fn ft_per_s(v: f64) -> Velocity {
        mps(v * M_PER_FT)
    }

    #[inline]
    pub fn psi(v: f64) -> Pressure {
        pa(v * PA_PER_PSI)
    }

    #[inline]
    pub fn gpm(v: f64) -> VolumeRate {
        m3ps(v * M3PS_PER_GPM)
    }

    #[inline]
    pub fn lb_per_ft3(v: f64) -> Density {
        kgpm3(v * KGPM3_PER_LBPFT3)
    }

    #[inline]
    pub fn delta_f(v: f64) -> TempInterval {
        dk(v * K_PER_F)
    }

    #[inline]
    pub fn megawatts(v: f64) -> Power {
        watts(v * W_PER_MW)
    }

    #[inline]
    pub fn tons(v: f64) -> Power {
        watts(v * W_PER_TON)
    }

    pub fn to_feet(l: Length) -> f64 {
        l.value / M_PER_FT
    }

    pub fn to_inches(l: Length) -> f64 {
        l.value / M_PER_IN
    }

    pub fn to_ft_per_s(v: Velocity) -> f64 {
        v.value / M_PER_FT
    }

    pub fn to_psi(p: Pressure) -> f64 {
        p.value / PA_PER_PSI
    }

    pub fn to_gpm(q: VolumeRate) -> f64 {
        q.value / M3PS_PER_GPM
    }

    pub fn to_lb_per_hr(mdot: MassRate) -> f64 {
        mdot.value / KG_PER_LB * 3600.0
    }

    pub fn to_lb_per_ft3(rho: Density) -> f64 {
        rho.value / KGPM3_PER_LBPFT3
    }

    pub fn to_delta_f(dt: TempInterval) -> f64 {
        dt.value / K_PER_F
    }

    pub fn to_megawatts(q: Power) -> f64 {
        q.value / W_PER_MW
    }

    pub fn to_tons(q: Power) -> f64 {
        q.value / W_PER_TON
    }
}

pub mod constants {
    /// Water heat capacity used for load-to-flow conversion: 1.0 Btu/(lb·°F).
    pub const WATER_CP_J_PER_KG_K: f64 = 4_186.8;

    /// Commercial steel absolute roughness.
    pub const STEEL_ROUGHNESS_M: f64 = 4.5e-5;

    /// Reference length for normalized pressure drop: 100 ft.
    pub const DP_REFERENCE_LENGTH_M: f64 = 30.48;
}
