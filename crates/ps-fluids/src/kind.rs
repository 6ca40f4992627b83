//! Fluid kind definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::FluidError;

/// Heat-transfer fluids supported by the property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidKind {
    /// Plain water
    Water,
    /// Ethylene glycol / water solution
    EthyleneGlycol,
    /// Propylene glycol / water solution
    PropyleneGlycol,
}

impl FluidKind {
    pub const ALL: [FluidKind; 3] = [
        FluidKind::Water,
        FluidKind::EthyleneGlycol,
        FluidKind::PropyleneGlycol,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FluidKind::Water => "water",
            FluidKind::EthyleneGlycol => "ethylene_glycol",
            FluidKind::PropyleneGlycol => "propylene_glycol",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            FluidKind::Water => &["h2o", "chw", "cw"],
            FluidKind::EthyleneGlycol => &["eg", "glycol", "ethylene-glycol"],
            FluidKind::PropyleneGlycol => &["pg", "propylene-glycol"],
        }
    }
}

impl fmt::Display for FluidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FluidKind {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let query = s.trim().to_ascii_lowercase();
        FluidKind::ALL
            .into_iter()
            .find(|kind| kind.key() == query || kind.aliases().contains(&query.as_str()))
            .ok_or(FluidError::UnknownName {
                name: s.to_string(),
            })
    }
}
