//! Static fluid property table.

use ps_core::imperial::lb_per_ft3;
use ps_core::units::{Density, DynVisc, pas};

use crate::{FluidError, FluidKind, FluidResult};

/// Density and viscosity used for one sizing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    pub density: Density,
    pub viscosity: DynVisc,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidTableEntry {
    pub kind: FluidKind,
    pub concentration_pct: u32,
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    /// Density at loop conditions, lb/ft³.
    pub density_lb_ft3: f64,
    /// Dynamic viscosity at loop conditions, centipoise.
    pub viscosity_cp: f64,
}

impl FluidTableEntry {
    pub fn properties(&self) -> FluidProperties {
        FluidProperties {
            density: lb_per_ft3(self.density_lb_ft3),
            viscosity: pas(self.viscosity_cp * 1.0e-3),
        }
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self.kind.key().contains(&query)
    }
}

// Values at roughly 60 °F.
const FLUID_TABLE: [FluidTableEntry; 5] = [
    FluidTableEntry {
        kind: FluidKind::Water,
        concentration_pct: 0,
        canonical_id: "water",
        display_name: "Water",
        density_lb_ft3: 62.4,
        viscosity_cp: 1.12,
    },
    FluidTableEntry {
        kind: FluidKind::EthyleneGlycol,
        concentration_pct: 30,
        canonical_id: "eg30",
        display_name: "Ethylene Glycol 30%",
        density_lb_ft3: 63.8,
        viscosity_cp: 2.2,
    },
    FluidTableEntry {
        kind: FluidKind::EthyleneGlycol,
        concentration_pct: 50,
        canonical_id: "eg50",
        display_name: "Ethylene Glycol 50%",
        density_lb_ft3: 65.4,
        viscosity_cp: 4.7,
    },
    FluidTableEntry {
        kind: FluidKind::PropyleneGlycol,
        concentration_pct: 30,
        canonical_id: "pg30",
        display_name: "Propylene Glycol 30%",
        density_lb_ft3: 64.3,
        viscosity_cp: 3.0,
    },
    FluidTableEntry {
        kind: FluidKind::PropyleneGlycol,
        concentration_pct: 50,
        canonical_id: "pg50",
        display_name: "Propylene Glycol 50%",
        density_lb_ft3: 65.0,
        viscosity_cp: 7.0,
    },
];

pub fn fluid_table() -> &'static [FluidTableEntry] {
    &FLUID_TABLE
}

pub fn find_entry(kind: FluidKind, concentration_pct: u32) -> Option<&'static FluidTableEntry> {
    FLUID_TABLE
        .iter()
        .find(|e| e.kind == kind && e.concentration_pct == concentration_pct)
}

/// Properties for `kind` at `concentration_pct`.
///
/// Water is only tabulated at 0 %; glycols at 30 % and 50 %. Anything else is
/// `UnknownFluid`, never an interpolated value.
pub fn lookup(kind: FluidKind, concentration_pct: u32) -> FluidResult<FluidProperties> {
    find_entry(kind, concentration_pct)
        .map(FluidTableEntry::properties)
        .ok_or_else(|| FluidError::UnknownFluid {
            kind: kind.key().to_string(),
            concentration_pct,
        })
}
