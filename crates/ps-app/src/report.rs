//! Serializable study report in engineering units.

use std::path::Path;

use chrono::Utc;
use ps_chiller::{ChillerCandidate, mw_to_tons};
use ps_core::imperial::{to_ft_per_s, to_inches, to_lb_per_ft3, to_megawatts, to_psi};
use ps_hydraulics::{ConstraintStatus, FlowSpec, SizingResult};
use ps_layout::{ColumnAggregate, LayoutSizing};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::study_service::{ChillerOutcome, SegmentOutcome, StudyOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    pub name: String,
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub design: DesignReport,
    pub main: SegmentReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_risers: Option<EqualRisersReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutReport>,
    pub chillers: ChillerReport,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub fluid: String,
    pub density_lb_ft3: f64,
    pub viscosity_cp: f64,
    pub delta_t_f: f64,
    pub max_velocity_fps: f64,
    pub max_dp_psi_per_100ft: f64,
    pub roughness_in: f64,
    pub catalog_sizes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub segment: String,
    pub it_load_mw: f64,
    pub cooling_load_mw: f64,
    pub flow_gpm: f64,
    pub mass_flow_lb_hr: f64,
    pub pipe: String,
    pub nominal_in: f64,
    pub inside_diameter_in: f64,
    pub velocity_fps: f64,
    pub dp_psi_per_100ft: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    /// Over the study's run length; main pipe only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_length_ft: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_dp_psi: Option<f64>,
    /// `ok`, `exceeded` or `idle`.
    pub status: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualRisersReport {
    pub count: u32,
    pub riser: SegmentReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    pub hall_count: usize,
    pub halls: Vec<String>,
    pub it_load_mw: f64,
    pub cooling_load_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub riser_mode: String,
    pub total_it_load_mw: f64,
    pub total_cooling_load_mw: f64,
    pub columns: Vec<ColumnReport>,
    /// One per column (shared) or per hall (independent).
    pub segments: Vec<SegmentReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerOptionReport {
    pub rank: usize,
    pub model: String,
    pub unit_tons: f64,
    pub operating: u32,
    pub spare: u32,
    pub total: u32,
    pub installed_tons: f64,
    pub loading_pct: f64,
    pub operating_loading_pct: f64,
    pub redundancy_pct: f64,
    pub score: f64,
    pub installation_cost: f64,
    pub annual_energy_cost: f64,
    pub annual_maintenance_cost: f64,
    pub ten_year_tco: f64,
    pub tco_per_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerReport {
    pub load_mw: f64,
    pub load_tons: f64,
    pub redundancy: String,
    pub strategy: String,
    pub max_units: u32,
    pub options: Vec<ChillerOptionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infeasible: Option<String>,
    /// True when the study carries no cooling load.
    #[serde(default)]
    pub skipped: bool,
}

fn status_key(status: ConstraintStatus) -> &'static str {
    match status {
        ConstraintStatus::Satisfied => "ok",
        ConstraintStatus::Exceeded => "exceeded",
        ConstraintStatus::Idle => "idle",
    }
}

fn segment_report(
    segment: impl Into<String>,
    flow: &FlowSpec,
    sizing: &SizingResult,
) -> SegmentReport {
    SegmentReport {
        segment: segment.into(),
        it_load_mw: flow.it_load_mw(),
        cooling_load_mw: flow.cooling_load_mw(),
        flow_gpm: flow.gpm(),
        mass_flow_lb_hr: flow.lb_per_hr(),
        pipe: sizing.entry.label.clone(),
        nominal_in: sizing.entry.nominal_in,
        inside_diameter_in: sizing.entry.inside_diameter_in(),
        velocity_fps: sizing.velocity_fps(),
        dp_psi_per_100ft: sizing.dp_psi_per_100ft(),
        reynolds: sizing.reynolds,
        friction_factor: sizing.friction_factor,
        run_length_ft: None,
        run_dp_psi: None,
        status: status_key(sizing.status).to_string(),
        warnings: sizing.warnings.iter().map(ToString::to_string).collect(),
    }
}

fn outcome_report(segment: impl Into<String>, outcome: &SegmentOutcome) -> SegmentReport {
    segment_report(segment, &outcome.flow, &outcome.sizing)
}

fn column_report(column: &ColumnAggregate) -> ColumnReport {
    ColumnReport {
        column: column.column.clone(),
        hall_count: column.hall_count,
        halls: column.halls.clone(),
        it_load_mw: column.it_load_mw(),
        cooling_load_mw: column.cooling_load_mw(),
    }
}

fn layout_report(layout: &LayoutSizing) -> LayoutReport {
    let risers = layout
        .risers
        .iter()
        .map(|r| segment_report(format!("riser {}", r.column.column), &r.flow, &r.sizing));
    let branches = layout
        .branches
        .iter()
        .map(|b| segment_report(format!("hall {}", b.name), &b.flow, &b.sizing));

    LayoutReport {
        riser_mode: layout.mode.to_string(),
        total_it_load_mw: to_megawatts(layout.total_it_load),
        total_cooling_load_mw: to_megawatts(layout.total_cooling_load),
        columns: layout.columns.iter().map(column_report).collect(),
        segments: risers.chain(branches).collect(),
    }
}

fn option_report(rank: usize, c: &ChillerCandidate) -> ChillerOptionReport {
    ChillerOptionReport {
        rank,
        model: c.model.name.clone(),
        unit_tons: c.model.tons,
        operating: c.operating_count,
        spare: c.spare_count,
        total: c.total_count,
        installed_tons: c.installed_tons(),
        loading_pct: c.loading_pct,
        operating_loading_pct: c.operating_loading_pct,
        redundancy_pct: c.redundancy_pct,
        score: c.score,
        installation_cost: c.costs.installation_cost,
        annual_energy_cost: c.costs.annual_energy_cost,
        annual_maintenance_cost: c.costs.annual_maintenance_cost,
        ten_year_tco: c.costs.ten_year_tco,
        tco_per_mw: c.costs.tco_per_mw,
    }
}

impl StudyReport {
    pub fn from_outcome(outcome: &StudyOutcome) -> Self {
        let (options, infeasible) = match &outcome.chillers {
            ChillerOutcome::Selected(top) => (
                top.iter()
                    .enumerate()
                    .map(|(i, c)| option_report(i + 1, c))
                    .collect(),
                None,
            ),
            ChillerOutcome::Infeasible(e) => (Vec::new(), Some(e.to_string())),
            ChillerOutcome::Skipped => (Vec::new(), None),
        };
        let load_mw = outcome.criteria.load_mw();
        let mut main = outcome_report("main", &outcome.main);
        main.run_length_ft = outcome.run_length_ft;
        main.run_dp_psi = outcome.main_run_dp_psi();

        Self {
            name: outcome.name.clone(),
            generated_at: Utc::now().to_rfc3339(),
            design: DesignReport {
                fluid: outcome.fluid.clone(),
                density_lb_ft3: to_lb_per_ft3(outcome.fluid_properties.density),
                viscosity_cp: outcome.fluid_properties.viscosity.value * 1.0e3,
                delta_t_f: outcome.delta_t_f,
                max_velocity_fps: to_ft_per_s(outcome.limits.max_velocity),
                max_dp_psi_per_100ft: to_psi(outcome.limits.max_dp_per_100ft),
                roughness_in: to_inches(outcome.limits.roughness),
                catalog_sizes: outcome.catalog_len,
            },
            main,
            equal_risers: outcome.risers.as_ref().map(|r| EqualRisersReport {
                count: r.count,
                riser: outcome_report(format!("riser (1 of {})", r.count), &r.riser),
            }),
            layout: outcome.layout.as_ref().map(layout_report),
            chillers: ChillerReport {
                load_mw,
                load_tons: mw_to_tons(load_mw),
                redundancy: outcome.criteria.redundancy.to_string(),
                strategy: outcome.criteria.strategy.to_string(),
                max_units: outcome.criteria.max_units,
                options,
                infeasible,
                skipped: matches!(outcome.chillers, ChillerOutcome::Skipped),
            },
            warnings: outcome.warnings(),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> AppResult<()> {
        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
