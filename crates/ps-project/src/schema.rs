//! Study file schema definitions.
//!
//! Values are in the units engineers type: °F, ft/s, psi/100 ft, MW, inches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Study {
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    pub design: DesignDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutDef>,
    #[serde(default)]
    pub chillers: ChillerDef,
    /// Custom pipe catalog; Schedule 40 when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pipe_catalog: Vec<PipeSizeDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FluidKindDef {
    Water,
    EthyleneGlycol,
    PropyleneGlycol,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub kind: FluidKindDef,
    #[serde(default)]
    pub concentration_pct: u32,
}

impl Default for FluidDef {
    fn default() -> Self {
        Self {
            kind: FluidKindDef::Water,
            concentration_pct: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignDef {
    pub delta_t_f: f64,
    pub max_velocity_fps: f64,
    pub max_dp_psi_per_100ft: f64,
    /// Absolute roughness; commercial steel when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_mm: Option<f64>,
    /// Fan heat added to IT load, percent.
    #[serde(default)]
    pub fan_heat_pct: f64,
    /// Building IT load for studies without a layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_it_load_mw: Option<f64>,
    /// Split the main flow over this many equal risers (no-layout studies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risers: Option<u32>,
    /// Main pipe run length for a total pressure drop, ft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_length_ft: Option<f64>,
}

impl Default for DesignDef {
    fn default() -> Self {
        Self {
            delta_t_f: 15.0,
            max_velocity_fps: 12.0,
            max_dp_psi_per_100ft: 20.0,
            roughness_mm: None,
            fan_heat_pct: 0.0,
            total_it_load_mw: None,
            risers: None,
            run_length_ft: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutDef {
    /// `CxRxF`, e.g. `4x3x2`.
    pub spec: String,
    #[serde(default = "default_include_floors")]
    pub include_floors: bool,
    #[serde(default)]
    pub riser_mode: RiserModeDef,
    pub loads: HallLoadsDef,
}

fn default_include_floors() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiserModeDef {
    #[default]
    Shared,
    Independent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum HallLoadsDef {
    Uniform {
        it_load_mw: f64,
    },
    PerHall {
        /// Load of halls not listed in `halls`.
        #[serde(default)]
        default_mw: f64,
        halls: BTreeMap<String, f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChillerDef {
    #[serde(default)]
    pub redundancy: RedundancyDef,
    #[serde(default)]
    pub strategy: StrategyDef,
    #[serde(default = "default_max_units")]
    pub max_units: u32,
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate_per_kwh: f64,
    #[serde(default = "default_annual_hours")]
    pub annual_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_band: Option<LoadingBandDef>,
}

fn default_max_units() -> u32 {
    20
}

fn default_electricity_rate() -> f64 {
    0.12
}

fn default_annual_hours() -> f64 {
    8760.0
}

impl Default for ChillerDef {
    fn default() -> Self {
        Self {
            redundancy: RedundancyDef::default(),
            strategy: StrategyDef::default(),
            max_units: default_max_units(),
            electricity_rate_per_kwh: default_electricity_rate(),
            annual_hours: default_annual_hours(),
            loading_band: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum RedundancyDef {
    #[default]
    NPlusOne,
    NPlusTwo,
    NPlusPercent {
        percent: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyDef {
    #[default]
    Balanced,
    Modular,
    Central,
    LifecycleCost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadingBandDef {
    pub min_pct: f64,
    pub max_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeSizeDef {
    pub label: String,
    pub nominal_in: f64,
    pub inside_diameter_in: f64,
}
