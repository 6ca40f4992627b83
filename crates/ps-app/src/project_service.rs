//! Study loading, saving, validation, and introspection.

use std::path::Path;

use ps_core::imperial::to_megawatts;
use ps_fluids::{FluidKind, find_entry};
use ps_layout::{LayoutStats, parse_layout};
use ps_project::{FluidDef, FluidKindDef, RiserModeDef, Study, is_json};

use crate::error::{AppError, AppResult};
use crate::study_service::build_hall_loads;

/// What a study will size, for listing and validation output.
#[derive(Debug, Clone)]
pub struct StudySummary {
    pub name: String,
    pub version: u32,
    pub fluid: String,
    pub delta_t_f: f64,
    /// `None` for quick main-pipe studies.
    pub layout: Option<LayoutSummary>,
    pub total_it_load_mw: f64,
}

#[derive(Debug, Clone)]
pub struct LayoutSummary {
    pub spec: String,
    pub stats: LayoutStats,
    pub riser_mode: &'static str,
}

/// Load a study from YAML, or JSON for `.json` paths. Migrates and validates.
pub fn load_study(path: &Path) -> AppResult<Study> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ProjectFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let study = if is_json(path) {
        ps_project::from_json_str(&content)?
    } else {
        ps_project::from_yaml_str(&content)?
    };
    tracing::debug!(path = %path.display(), name = %study.name, "study loaded");
    Ok(study)
}

/// Save a study, choosing the format by extension.
pub fn save_study(path: &Path, study: &Study) -> AppResult<()> {
    let content = if is_json(path) {
        ps_project::to_json_string(study)?
    } else {
        ps_project::to_yaml_string(study)?
    };

    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

pub fn fluid_kind(def: FluidKindDef) -> FluidKind {
    match def {
        FluidKindDef::Water => FluidKind::Water,
        FluidKindDef::EthyleneGlycol => FluidKind::EthyleneGlycol,
        FluidKindDef::PropyleneGlycol => FluidKind::PropyleneGlycol,
    }
}

pub fn fluid_label(fluid: &FluidDef) -> String {
    let kind = fluid_kind(fluid.kind);
    match find_entry(kind, fluid.concentration_pct) {
        Some(entry) => entry.display_name.to_string(),
        None => format!("{} {}%", kind, fluid.concentration_pct),
    }
}

/// Validate a study beyond its schema: fluid table entry, layout text and
/// hall names.
pub fn validate_study(study: &Study) -> AppResult<StudySummary> {
    ps_project::validate_study(study)?;
    ps_fluids::lookup(fluid_kind(study.fluid.kind), study.fluid.concentration_pct)?;

    let (layout, total_it_load_mw) = match &study.layout {
        Some(def) => {
            let spec = parse_layout(&def.spec)?;
            let loads = build_hall_loads(def, spec, study.design.fan_heat_pct)?;
            let summary = LayoutSummary {
                spec: spec.to_string(),
                stats: spec.stats(),
                riser_mode: match def.riser_mode {
                    RiserModeDef::Shared => "shared",
                    RiserModeDef::Independent => "independent",
                },
            };
            (Some(summary), to_megawatts(loads.total_it_load()))
        }
        None => {
            let mw = study.design.total_it_load_mw.ok_or_else(|| {
                AppError::InvalidInput(
                    "design.total_it_load_mw is required without a layout".to_string(),
                )
            })?;
            (None, mw)
        }
    };

    Ok(StudySummary {
        name: study.name.clone(),
        version: study.version,
        fluid: fluid_label(&study.fluid),
        delta_t_f: study.design.delta_t_f,
        layout,
        total_it_load_mw,
    })
}
