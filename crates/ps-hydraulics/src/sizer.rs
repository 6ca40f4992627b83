//! Catalog search for the smallest pipe meeting velocity and ΔP limits.

use std::fmt;

use ps_core::constants::{DP_REFERENCE_LENGTH_M, STEEL_ROUGHNESS_M};
use ps_core::imperial::{ft_per_s, psi, to_ft_per_s, to_psi};
use ps_core::numeric::{ensure_non_negative, ensure_positive};
use ps_core::units::{Length, Pressure, Velocity, VolumeRate, m, m3ps, mps, pa};
use ps_fluids::FluidProperties;
use tracing::{debug, warn};

use crate::catalog::{PipeCatalog, PipeCatalogEntry};
use crate::error::{HydraulicError, HydraulicResult};
use crate::friction;

/// Velocity above which an upsizing advisory is attached, ft/s.
pub const HIGH_VELOCITY_ADVISORY_FPS: f64 = 10.0;
/// Velocity below which a heat-transfer advisory is attached, ft/s.
pub const LOW_VELOCITY_ADVISORY_FPS: f64 = 3.0;

/// Bounds every selected pipe must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingLimits {
    pub max_velocity: Velocity,
    /// Allowed pressure drop per 100 ft of pipe.
    pub max_dp_per_100ft: Pressure,
    /// Absolute wall roughness.
    pub roughness: Length,
}

impl SizingLimits {
    pub fn new(
        max_velocity: Velocity,
        max_dp_per_100ft: Pressure,
        roughness: Length,
    ) -> HydraulicResult<Self> {
        ensure_positive(max_velocity.value, "max velocity")?;
        ensure_positive(max_dp_per_100ft.value, "max pressure drop")?;
        ensure_non_negative(roughness.value, "pipe roughness")?;
        Ok(Self {
            max_velocity,
            max_dp_per_100ft,
            roughness,
        })
    }

    /// Limits in ft/s and psi/100 ft with commercial steel roughness.
    pub fn imperial(max_velocity_fps: f64, max_dp_psi_per_100ft: f64) -> HydraulicResult<Self> {
        Self::new(
            ft_per_s(max_velocity_fps),
            psi(max_dp_psi_per_100ft),
            m(STEEL_ROUGHNESS_M),
        )
    }

    pub fn with_roughness(self, roughness: Length) -> HydraulicResult<Self> {
        Self::new(self.max_velocity, self.max_dp_per_100ft, roughness)
    }
}

impl Default for SizingLimits {
    /// 12 ft/s, 20 psi/100 ft, commercial steel.
    fn default() -> Self {
        Self {
            max_velocity: ft_per_s(12.0),
            max_dp_per_100ft: psi(20.0),
            roughness: m(STEEL_ROUGHNESS_M),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// Smallest entry meeting both limits.
    Satisfied,
    /// No entry met both limits; the largest entry was returned.
    Exceeded,
    /// Zero flow; minimum size reported.
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SizingWarning {
    ConstraintsExceeded {
        velocity_fps: f64,
        dp_psi_per_100ft: f64,
    },
    HighVelocity { velocity_fps: f64 },
    LowVelocity { velocity_fps: f64 },
    IdleSegment,
}

impl fmt::Display for SizingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingWarning::ConstraintsExceeded {
                velocity_fps,
                dp_psi_per_100ft,
            } => write!(
                f,
                "Constraints exceeded: largest pipe still runs {velocity_fps:.2} ft/s \
                 at {dp_psi_per_100ft:.2} psi/100 ft"
            ),
            SizingWarning::HighVelocity { velocity_fps } => write!(
                f,
                "High velocity ({velocity_fps:.2} ft/s > {HIGH_VELOCITY_ADVISORY_FPS} ft/s): \
                 consider upsizing"
            ),
            SizingWarning::LowVelocity { velocity_fps } => write!(
                f,
                "Low velocity ({velocity_fps:.2} ft/s < {LOW_VELOCITY_ADVISORY_FPS} ft/s): \
                 poor heat transfer"
            ),
            SizingWarning::IdleSegment => f.write_str("Idle segment: no load, minimum size shown"),
        }
    }
}

/// Hydraulics of one flow in one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEvaluation {
    pub entry: PipeCatalogEntry,
    pub velocity: Velocity,
    pub dp_per_100ft: Pressure,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub velocity_ok: bool,
    pub pressure_ok: bool,
}

impl CandidateEvaluation {
    pub fn passes(&self) -> bool {
        self.velocity_ok && self.pressure_ok
    }

    pub fn velocity_fps(&self) -> f64 {
        to_ft_per_s(self.velocity)
    }

    pub fn dp_psi_per_100ft(&self) -> f64 {
        to_psi(self.dp_per_100ft)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizingResult {
    pub entry: PipeCatalogEntry,
    pub velocity: Velocity,
    pub dp_per_100ft: Pressure,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub flow: VolumeRate,
    pub status: ConstraintStatus,
    pub warnings: Vec<SizingWarning>,
}

impl SizingResult {
    fn from_evaluation(
        eval: CandidateEvaluation,
        flow: VolumeRate,
        status: ConstraintStatus,
    ) -> Self {
        Self {
            entry: eval.entry,
            velocity: eval.velocity,
            dp_per_100ft: eval.dp_per_100ft,
            reynolds: eval.reynolds,
            friction_factor: eval.friction_factor,
            flow,
            status,
            warnings: Vec::new(),
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.status == ConstraintStatus::Exceeded
    }

    pub fn velocity_fps(&self) -> f64 {
        to_ft_per_s(self.velocity)
    }

    pub fn dp_psi_per_100ft(&self) -> f64 {
        to_psi(self.dp_per_100ft)
    }

    /// Pressure drop over an actual run length.
    pub fn pressure_drop_over(&self, length: Length) -> Pressure {
        pa(self.dp_per_100ft.value * length.value / DP_REFERENCE_LENGTH_M)
    }
}

/// Sizes flows against a borrowed catalog for one fluid and one set of limits.
#[derive(Debug, Clone, Copy)]
pub struct HydraulicSizer<'a> {
    catalog: &'a PipeCatalog,
    fluid: FluidProperties,
    limits: SizingLimits,
}

impl<'a> HydraulicSizer<'a> {
    pub fn new(catalog: &'a PipeCatalog, fluid: FluidProperties, limits: SizingLimits) -> Self {
        Self {
            catalog,
            fluid,
            limits,
        }
    }

    pub fn catalog(&self) -> &'a PipeCatalog {
        self.catalog
    }

    pub fn limits(&self) -> SizingLimits {
        self.limits
    }

    /// Hydraulics of `flow` through one entry.
    pub fn evaluate(
        &self,
        entry: &PipeCatalogEntry,
        flow: VolumeRate,
    ) -> HydraulicResult<CandidateEvaluation> {
        let q = ensure_positive(flow.value, "flow rate")?;
        let d = entry.inside_diameter.value;
        let rho = self.fluid.density.value;

        let v = q / entry.flow_area().value;
        let re = friction::reynolds(rho, v, d, self.fluid.viscosity.value);
        let f = friction::friction_factor(re, self.limits.roughness.value, d)?;
        let dp = friction::pressure_drop(f, DP_REFERENCE_LENGTH_M, d, rho, v);

        Ok(CandidateEvaluation {
            entry: entry.clone(),
            velocity: mps(v),
            dp_per_100ft: pa(dp),
            reynolds: re,
            friction_factor: f,
            velocity_ok: v <= self.limits.max_velocity.value,
            pressure_ok: dp <= self.limits.max_dp_per_100ft.value,
        })
    }

    /// Evaluation of `flow` against every entry, smallest first.
    pub fn evaluate_all(&self, flow: VolumeRate) -> HydraulicResult<Vec<CandidateEvaluation>> {
        self.catalog
            .iter()
            .map(|entry| self.evaluate(entry, flow))
            .collect()
    }

    /// Smallest entry meeting both limits, or the largest entry flagged
    /// `Exceeded` when none does.
    ///
    /// Zero or negative flow is rejected; use [`size_segment`](Self::size_segment)
    /// where an idle segment is legitimate.
    pub fn size(&self, flow: VolumeRate) -> HydraulicResult<SizingResult> {
        ensure_positive(flow.value, "flow rate")?;

        let mut last = None;
        for entry in self.catalog {
            let eval = self.evaluate(entry, flow)?;
            debug!(
                pipe = %entry.label,
                velocity_fps = eval.velocity_fps(),
                dp_psi = eval.dp_psi_per_100ft(),
                passes = eval.passes(),
                "evaluated pipe"
            );
            if eval.passes() {
                let mut result =
                    SizingResult::from_evaluation(eval, flow, ConstraintStatus::Satisfied);
                attach_velocity_advisories(&mut result);
                return Ok(result);
            }
            last = Some(eval);
        }

        let Some(eval) = last else {
            return Err(HydraulicError::EmptyCatalog);
        };

        warn!(
            pipe = %eval.entry.label,
            velocity_fps = eval.velocity_fps(),
            dp_psi = eval.dp_psi_per_100ft(),
            "no pipe satisfies limits; using largest"
        );
        let mut result = SizingResult::from_evaluation(eval, flow, ConstraintStatus::Exceeded);
        result.warnings.push(SizingWarning::ConstraintsExceeded {
            velocity_fps: result.velocity_fps(),
            dp_psi_per_100ft: result.dp_psi_per_100ft(),
        });
        attach_velocity_advisories(&mut result);
        Ok(result)
    }

    /// Like [`size`](Self::size) but a zero flow yields an idle,
    /// minimum-size result instead of an error.
    pub fn size_segment(&self, flow: VolumeRate) -> HydraulicResult<SizingResult> {
        let q = ensure_non_negative(flow.value, "flow rate")?;
        if q == 0.0 {
            return Ok(self.idle_result());
        }
        self.size(flow)
    }

    fn idle_result(&self) -> SizingResult {
        SizingResult {
            entry: self.catalog.smallest().clone(),
            velocity: mps(0.0),
            dp_per_100ft: pa(0.0),
            reynolds: 0.0,
            friction_factor: 0.0,
            flow: m3ps(0.0),
            status: ConstraintStatus::Idle,
            warnings: vec![SizingWarning::IdleSegment],
        }
    }
}

fn attach_velocity_advisories(result: &mut SizingResult) {
    let velocity_fps = result.velocity_fps();
    if velocity_fps > HIGH_VELOCITY_ADVISORY_FPS {
        result.warnings.push(SizingWarning::HighVelocity { velocity_fps });
    } else if velocity_fps < LOW_VELOCITY_ADVISORY_FPS {
        result.warnings.push(SizingWarning::LowVelocity { velocity_fps });
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use ps_core::imperial::gpm;
    use ps_fluids::{FluidKind, lookup};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn loose_limits_pick_smallest(q_gpm in 0.01_f64..50.0) {
            let catalog = PipeCatalog::schedule_40();
            let water = lookup(FluidKind::Water, 0).unwrap();
            let limits = SizingLimits::imperial(1.0e6, 1.0e9).unwrap();
            let sizer = HydraulicSizer::new(&catalog, water, limits);

            let result = sizer.size(gpm(q_gpm)).unwrap();
            prop_assert_eq!(result.entry.rank, 0);
            prop_assert_eq!(result.status, ConstraintStatus::Satisfied);
        }

        #[test]
        fn huge_flow_returns_largest_without_error(q_gpm in 2.0e5_f64..1.0e7) {
            let catalog = PipeCatalog::schedule_40();
            let water = lookup(FluidKind::Water, 0).unwrap();
            let sizer = HydraulicSizer::new(&catalog, water, SizingLimits::default());

            let result = sizer.size(gpm(q_gpm)).unwrap();
            prop_assert_eq!(result.entry.rank, catalog.len() - 1);
            prop_assert!(result.is_exceeded());
        }

        #[test]
        fn selection_never_shrinks_as_flow_grows(
            q_gpm in 1.0_f64..50_000.0,
            factor in 1.0_f64..4.0,
        ) {
            let catalog = PipeCatalog::schedule_40();
            let water = lookup(FluidKind::Water, 0).unwrap();
            let sizer = HydraulicSizer::new(&catalog, water, SizingLimits::default());

            let a = sizer.size(gpm(q_gpm)).unwrap();
            let b = sizer.size(gpm(q_gpm * factor)).unwrap();
            prop_assert!(b.entry.rank >= a.entry.rank);
        }
    }
}
