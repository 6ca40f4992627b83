//! Study execution: turns a study definition into sized pipes and chiller
//! recommendations.
//!
//! The engine crates work in SI; everything a study holds is imperial, so the
//! conversions happen here and nowhere else.

use ps_chiller::{
    ChillerCandidate, ChillerError, ChillerSelector, Economics, LoadingBand, Redundancy,
    SelectionCriteria, Strategy,
};
use ps_core::imperial::{delta_f, feet, megawatts, to_psi};
use ps_core::units::{Power, m};
use ps_fluids::{FluidProperties, lookup};
use ps_hydraulics::{
    FlowConverter, FlowSpec, HydraulicSizer, PipeCatalog, PipeRecord, SizingLimits, SizingResult,
};
use ps_layout::{HallLoads, LayoutAggregator, LayoutSizing, LayoutSpec, RiserMode, parse_layout};
use ps_project::{
    ChillerDef, DesignDef, FluidDef, FluidKindDef, HallLoadsDef, LayoutDef, PipeSizeDef,
    RedundancyDef, RiserModeDef, Study, StrategyDef,
};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::project_service::{fluid_kind, fluid_label};

/// A single sized pipe run with the flow that sized it.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    pub flow: FlowSpec,
    pub sizing: SizingResult,
}

/// Main flow split over identical risers.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualRisers {
    pub count: u32,
    pub riser: SegmentOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChillerOutcome {
    Selected(Vec<ChillerCandidate>),
    /// Nothing fits under the unit cap; pipe results are still valid.
    Infeasible(ChillerError),
    /// Zero cooling load, so there is no plant to select.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyOutcome {
    pub name: String,
    pub fluid: String,
    pub fluid_properties: FluidProperties,
    pub delta_t_f: f64,
    pub limits: SizingLimits,
    pub catalog_len: usize,
    /// Main pipe run length, ft.
    pub run_length_ft: Option<f64>,
    pub main: SegmentOutcome,
    pub risers: Option<EqualRisers>,
    pub layout: Option<LayoutSizing>,
    pub criteria: SelectionCriteria,
    pub chillers: ChillerOutcome,
}

impl StudyOutcome {
    /// Pressure drop over the main pipe run, psi.
    pub fn main_run_dp_psi(&self) -> Option<f64> {
        self.run_length_ft.map(|ft| to_psi(self.main.sizing.pressure_drop_over(feet(ft))))
    }

    /// Every sizing warning in the study, prefixed with the segment it came from.
    pub fn warnings(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .main
            .sizing
            .warnings
            .iter()
            .map(|w| format!("main: {w}"))
            .collect();
        if let Some(risers) = &self.risers {
            out.extend(
                risers
                    .riser
                    .sizing
                    .warnings
                    .iter()
                    .map(|w| format!("riser (x{}): {w}", risers.count)),
            );
        }
        if let Some(layout) = &self.layout {
            for riser in &layout.risers {
                out.extend(
                    riser
                        .sizing
                        .warnings
                        .iter()
                        .map(|w| format!("riser {}: {w}", riser.column.column)),
                );
            }
            for branch in &layout.branches {
                out.extend(
                    branch
                        .sizing
                        .warnings
                        .iter()
                        .map(|w| format!("hall {}: {w}", branch.name)),
                );
            }
        }
        match &self.chillers {
            ChillerOutcome::Infeasible(e) => out.push(format!("chillers: {e}")),
            ChillerOutcome::Skipped => {
                out.push("chillers: no cooling load, selection skipped".to_string());
            }
            ChillerOutcome::Selected(_) => {}
        }
        out
    }
}

/// Inputs of a study built from command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickSizeRequest {
    pub it_load_mw: f64,
    pub delta_t_f: f64,
    pub max_velocity_fps: f64,
    pub max_dp_psi_per_100ft: f64,
    pub fluid: FluidDef,
    pub fan_heat_pct: f64,
    pub risers: Option<u32>,
    pub run_length_ft: Option<f64>,
    pub chillers: ChillerDef,
}

impl Default for QuickSizeRequest {
    fn default() -> Self {
        let design = DesignDef::default();
        Self {
            it_load_mw: 0.0,
            delta_t_f: design.delta_t_f,
            max_velocity_fps: design.max_velocity_fps,
            max_dp_psi_per_100ft: design.max_dp_psi_per_100ft,
            fluid: FluidDef::default(),
            fan_heat_pct: 0.0,
            risers: None,
            run_length_ft: None,
            chillers: ChillerDef::default(),
        }
    }
}

/// A layout-free study equivalent to `request`.
pub fn quick_study(request: &QuickSizeRequest) -> Study {
    Study {
        version: ps_project::LATEST_VERSION,
        name: format!("Quick sizing, {:.2} MW", request.it_load_mw),
        fluid: request.fluid.clone(),
        design: DesignDef {
            delta_t_f: request.delta_t_f,
            max_velocity_fps: request.max_velocity_fps,
            max_dp_psi_per_100ft: request.max_dp_psi_per_100ft,
            roughness_mm: None,
            fan_heat_pct: request.fan_heat_pct,
            total_it_load_mw: Some(request.it_load_mw),
            risers: request.risers,
            run_length_ft: request.run_length_ft,
        },
        layout: None,
        chillers: request.chillers.clone(),
        pipe_catalog: Vec::new(),
    }
}

pub fn build_fluid(def: &FluidDef) -> AppResult<FluidProperties> {
    Ok(lookup(fluid_kind(def.kind), def.concentration_pct)?)
}

/// Custom catalog when the study lists one, Schedule 40 otherwise.
pub fn build_catalog(pipes: &[PipeSizeDef]) -> AppResult<PipeCatalog> {
    if pipes.is_empty() {
        return Ok(PipeCatalog::schedule_40());
    }
    let records = pipes
        .iter()
        .map(|p| PipeRecord::new(p.label.clone(), p.nominal_in, p.inside_diameter_in));
    Ok(PipeCatalog::from_records(records)?)
}

pub fn build_limits(design: &DesignDef) -> AppResult<SizingLimits> {
    let limits = SizingLimits::imperial(design.max_velocity_fps, design.max_dp_psi_per_100ft)?;
    match design.roughness_mm {
        Some(mm) => Ok(limits.with_roughness(m(mm * 1.0e-3))?),
        None => Ok(limits),
    }
}

pub fn build_hall_loads(
    def: &LayoutDef,
    spec: LayoutSpec,
    fan_heat_pct: f64,
) -> AppResult<HallLoads> {
    let fan = fan_heat_pct / 100.0;
    let loads = match &def.loads {
        HallLoadsDef::Uniform { it_load_mw } => {
            HallLoads::uniform(spec, def.include_floors, *it_load_mw, fan)?
        }
        HallLoadsDef::PerHall { default_mw, halls } => {
            HallLoads::per_hall(spec, def.include_floors, *default_mw, halls, fan)?
        }
    };
    Ok(loads)
}

pub fn redundancy(def: &RedundancyDef) -> Redundancy {
    match *def {
        RedundancyDef::NPlusOne => Redundancy::NPlusOne,
        RedundancyDef::NPlusTwo => Redundancy::NPlusTwo,
        RedundancyDef::NPlusPercent { percent } => Redundancy::NPlusPercent(percent),
    }
}

pub fn strategy(def: StrategyDef) -> Strategy {
    match def {
        StrategyDef::Balanced => Strategy::Balanced,
        StrategyDef::Modular => Strategy::Modular,
        StrategyDef::Central => Strategy::Central,
        StrategyDef::LifecycleCost => Strategy::LifecycleCost,
    }
}

pub fn selection_criteria(load: Power, def: &ChillerDef) -> AppResult<SelectionCriteria> {
    let mut criteria = SelectionCriteria::new(
        load,
        redundancy(&def.redundancy),
        strategy(def.strategy),
        def.max_units,
    )
    .with_economics(Economics {
        electricity_rate_per_kwh: def.electricity_rate_per_kwh,
        annual_hours: def.annual_hours,
    });
    if let Some(band) = &def.loading_band {
        criteria = criteria.with_loading_band(LoadingBand::new(band.min_pct, band.max_pct)?);
    }
    Ok(criteria)
}

/// Top chiller configurations for a cooling load in MW.
pub fn select_chillers(load_mw: f64, def: &ChillerDef) -> AppResult<Vec<ChillerCandidate>> {
    let criteria = selection_criteria(megawatts(load_mw), def)?;
    Ok(ChillerSelector::default().select(&criteria)?)
}

/// Run one study end to end.
///
/// A study without a layout sizes the main pipe from `design.total_it_load_mw`
/// and, with `design.risers`, an equal-split riser. A study with a layout sizes
/// the main pipe from the sum of hall loads plus one segment per column (shared
/// risers) or per hall (independent). A zero total load sizes every segment as
/// idle. Chillers are selected for the total cooling load; an infeasible plant
/// is reported, not raised, and a zero load skips selection.
pub fn run_study(study: &Study) -> AppResult<StudyOutcome> {
    ps_project::validate_study(study)?;

    let fluid = build_fluid(&study.fluid)?;
    let catalog = build_catalog(&study.pipe_catalog)?;
    let limits = build_limits(&study.design)?;
    let converter = FlowConverter::new(fluid);
    let sizer = HydraulicSizer::new(&catalog, fluid, limits);
    let delta_t = delta_f(study.design.delta_t_f);
    let fan = study.design.fan_heat_pct / 100.0;

    let hall_loads = match &study.layout {
        Some(def) => {
            let spec = parse_layout(&def.spec)?;
            Some((def, build_hall_loads(def, spec, study.design.fan_heat_pct)?))
        }
        None => None,
    };

    let it_load = match (&hall_loads, study.design.total_it_load_mw) {
        (Some((_, loads)), _) => loads.total_it_load(),
        (None, Some(mw)) => megawatts(mw),
        (None, None) => {
            return Err(AppError::InvalidInput(
                "design.total_it_load_mw is required without a layout".to_string(),
            ));
        }
    };

    let flow = converter.convert(it_load, fan, delta_t)?;
    let sizing = sizer.size_segment(flow.volumetric)?;
    info!(
        study = %study.name,
        cooling_mw = flow.cooling_load_mw(),
        gpm = flow.gpm(),
        pipe = %sizing.entry.label,
        "main pipe sized"
    );
    let main = SegmentOutcome { flow, sizing };

    let risers = match (study.design.risers, &hall_loads) {
        (Some(count), None) => {
            let per_riser = megawatts(main.flow.it_load_mw() / f64::from(count));
            let flow = converter.convert(per_riser, fan, delta_t)?;
            let sizing = sizer.size_segment(flow.volumetric)?;
            debug!(count, pipe = %sizing.entry.label, "equal risers sized");
            Some(EqualRisers {
                count,
                riser: SegmentOutcome { flow, sizing },
            })
        }
        (Some(_), Some(_)) => {
            debug!("design.risers ignored for a study with a layout");
            None
        }
        (None, _) => None,
    };

    let layout = match &hall_loads {
        Some((def, loads)) => {
            let mode = match def.riser_mode {
                RiserModeDef::Shared => RiserMode::Shared,
                RiserModeDef::Independent => RiserMode::Independent,
            };
            let aggregator = LayoutAggregator::new(converter, sizer, delta_t);
            Some(aggregator.size(loads, mode)?)
        }
        None => None,
    };

    let criteria = selection_criteria(main.flow.cooling_load, &study.chillers)?;
    let chillers = if main.flow.cooling_load.value == 0.0 {
        info!(study = %study.name, "no cooling load, chiller selection skipped");
        ChillerOutcome::Skipped
    } else {
        match ChillerSelector::default().select(&criteria) {
            Ok(top) => ChillerOutcome::Selected(top),
            Err(e @ ChillerError::NoFeasibleConfiguration { .. }) => {
                warn!(study = %study.name, "{e}");
                ChillerOutcome::Infeasible(e)
            }
            Err(e) => return Err(e.into()),
        }
    };

    Ok(StudyOutcome {
        name: study.name.clone(),
        fluid: fluid_label(&study.fluid),
        fluid_properties: fluid,
        delta_t_f: study.design.delta_t_f,
        limits,
        catalog_len: catalog.len(),
        run_length_ft: study.design.run_length_ft,
        main,
        risers,
        layout,
        criteria,
        chillers,
    })
}

/// Water at 0 % is the only fluid without a concentration.
pub fn default_concentration(kind: FluidKindDef) -> u32 {
    match kind {
        FluidKindDef::Water => 0,
        FluidKindDef::EthyleneGlycol | FluidKindDef::PropyleneGlycol => 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_hydraulics::ConstraintStatus;
    use std::collections::BTreeMap;

    fn request(mw: f64) -> QuickSizeRequest {
        QuickSizeRequest {
            it_load_mw: mw,
            fan_heat_pct: 5.0,
            ..QuickSizeRequest::default()
        }
    }

    #[test]
    fn quick_study_sizes_the_main_pipe() {
        let outcome = run_study(&quick_study(&request(36.0))).unwrap();
        assert_eq!(outcome.main.sizing.entry.label, "30 in Sch 40");
        assert_eq!(outcome.main.sizing.status, ConstraintStatus::Satisfied);
        assert!((outcome.main.flow.cooling_load_mw() - 37.8).abs() < 1e-9);
        assert!(outcome.layout.is_none());
        assert!(outcome.risers.is_none());
        assert!(matches!(outcome.chillers, ChillerOutcome::Selected(ref top) if top.len() == 3));
    }

    #[test]
    fn equal_risers_carry_a_share_of_the_flow() {
        let mut req = request(36.0);
        req.risers = Some(4);
        let outcome = run_study(&quick_study(&req)).unwrap();
        let risers = outcome.risers.unwrap();
        assert_eq!(risers.count, 4);
        let ratio = risers.riser.flow.volumetric.value / outcome.main.flow.volumetric.value;
        assert!((ratio - 0.25).abs() < 1e-12);
        let main_id = outcome.main.sizing.entry.inside_diameter;
        assert!(risers.riser.sizing.entry.inside_diameter < main_id);
    }

    #[test]
    fn run_length_scales_main_pressure_drop() {
        let mut req = request(36.0);
        assert!(run_study(&quick_study(&req)).unwrap().main_run_dp_psi().is_none());

        req.run_length_ft = Some(150.0);
        let outcome = run_study(&quick_study(&req)).unwrap();
        let total = outcome.main_run_dp_psi().unwrap();
        let per_100 = outcome.main.sizing.dp_psi_per_100ft();
        assert!((total - 1.5 * per_100).abs() < 1e-9);
    }

    #[test]
    fn infeasible_plant_keeps_pipe_results() {
        let mut req = request(36.0);
        req.chillers.max_units = 2;
        let outcome = run_study(&quick_study(&req)).unwrap();
        assert!(matches!(
            outcome.chillers,
            ChillerOutcome::Infeasible(ChillerError::NoFeasibleConfiguration { max_units: 2, .. })
        ));
        assert!(outcome.warnings().iter().any(|w| w.starts_with("chillers:")));
    }

    #[test]
    fn zero_load_sizes_idle_and_skips_chillers() {
        let outcome = run_study(&quick_study(&request(0.0))).unwrap();
        assert_eq!(outcome.main.sizing.status, ConstraintStatus::Idle);
        assert_eq!(outcome.main.sizing.entry.label, "1 in Sch 40");
        assert_eq!(outcome.chillers, ChillerOutcome::Skipped);
        assert!(outcome.warnings().iter().any(|w| w.contains("selection skipped")));
    }

    #[test]
    fn zero_delta_t_is_rejected_before_sizing() {
        let mut req = request(10.0);
        req.delta_t_f = 0.0;
        assert!(matches!(run_study(&quick_study(&req)), Err(AppError::Project(_))));
    }

    #[test]
    fn unknown_glycol_mix_is_a_fluid_error() {
        let mut req = request(10.0);
        req.fluid = FluidDef {
            kind: FluidKindDef::EthyleneGlycol,
            concentration_pct: 40,
        };
        assert!(matches!(run_study(&quick_study(&req)), Err(AppError::Fluid(_))));
    }

    #[test]
    fn layout_study_sums_hall_loads() {
        let mut study = quick_study(&request(0.0));
        study.design.total_it_load_mw = None;
        study.layout = Some(LayoutDef {
            spec: "2x2x2".to_string(),
            include_floors: true,
            riser_mode: RiserModeDef::Shared,
            loads: HallLoadsDef::PerHall {
                default_mw: 0.0,
                halls: BTreeMap::from([
                    ("A1-F1".to_string(), 5.0),
                    ("A2-F1".to_string(), 3.0),
                    ("B1-F1".to_string(), 4.0),
                    ("B2-F1".to_string(), 2.0),
                    ("A1-F2".to_string(), 5.0),
                    ("B1-F2".to_string(), 4.0),
                ]),
            },
        });
        let outcome = run_study(&study).unwrap();
        assert!((outcome.main.flow.it_load_mw() - 23.0).abs() < 1e-9);
        let layout = outcome.layout.unwrap();
        assert_eq!(layout.risers.len(), 2);
        assert!((layout.risers[0].column.it_load_mw() - 13.0).abs() < 1e-9);
        assert!((layout.risers[1].column.it_load_mw() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn custom_catalog_replaces_schedule_40() {
        let mut study = quick_study(&request(1.0));
        study.pipe_catalog = vec![
            PipeSizeDef {
                label: "small".to_string(),
                nominal_in: 2.0,
                inside_diameter_in: 2.067,
            },
            PipeSizeDef {
                label: "large".to_string(),
                nominal_in: 8.0,
                inside_diameter_in: 7.981,
            },
        ];
        let outcome = run_study(&study).unwrap();
        assert_eq!(outcome.catalog_len, 2);
        assert_eq!(outcome.main.sizing.entry.label, "large");
    }
}
