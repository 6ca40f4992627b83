//! Per-hall IT loads.

use std::collections::BTreeMap;

use ps_core::imperial::{megawatts, to_megawatts};
use ps_core::numeric::{ensure_in_range, ensure_non_negative};
use ps_core::units::{Power, watts};
use ps_hydraulics::MAX_FAN_HEAT_FRACTION;

use crate::error::{LayoutError, LayoutResult};
use crate::grid::{HallId, LayoutSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct HallLoad {
    pub hall: HallId,
    pub name: String,
    pub it_load: Power,
    pub fan_heat_fraction: f64,
}

impl HallLoad {
    /// IT load plus fan heat.
    pub fn cooling_load(&self) -> Power {
        watts(self.it_load.value * (1.0 + self.fan_heat_fraction))
    }

    pub fn it_load_mw(&self) -> f64 {
        to_megawatts(self.it_load)
    }

    pub fn cooling_load_mw(&self) -> f64 {
        to_megawatts(self.cooling_load())
    }
}

/// Loads for every hall of a layout, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct HallLoads {
    layout: LayoutSpec,
    include_floors: bool,
    halls: Vec<HallLoad>,
}

impl HallLoads {
    /// Same IT load in every hall.
    pub fn uniform(
        layout: LayoutSpec,
        include_floors: bool,
        it_load_mw: f64,
        fan_heat_fraction: f64,
    ) -> LayoutResult<Self> {
        Self::per_hall(
            layout,
            include_floors,
            it_load_mw,
            &BTreeMap::new(),
            fan_heat_fraction,
        )
    }

    /// `default_mw` everywhere except the halls named in `overrides`.
    ///
    /// Every override key must be a generated hall name.
    pub fn per_hall(
        layout: LayoutSpec,
        include_floors: bool,
        default_mw: f64,
        overrides: &BTreeMap<String, f64>,
        fan_heat_fraction: f64,
    ) -> LayoutResult<Self> {
        layout.check_naming(include_floors)?;
        ensure_non_negative(default_mw, "hall IT load")?;
        ensure_in_range(fan_heat_fraction, 0.0, MAX_FAN_HEAT_FRACTION, "fan heat")?;

        let halls: Vec<HallLoad> = layout
            .halls()
            .map(|hall| {
                let name = hall.name(include_floors);
                HallLoad {
                    hall,
                    name,
                    it_load: megawatts(default_mw),
                    fan_heat_fraction,
                }
            })
            .collect();

        let mut loads = Self {
            layout,
            include_floors,
            halls,
        };
        for (name, &mw) in overrides {
            loads.set_load(name, mw)?;
        }
        Ok(loads)
    }

    /// Replaces the IT load of one hall by name.
    pub fn set_load(&mut self, name: &str, it_load_mw: f64) -> LayoutResult<()> {
        if !it_load_mw.is_finite() || it_load_mw < 0.0 {
            return Err(LayoutError::InvalidInput {
                what: format!("IT load for hall {name}"),
                reason: format!("{it_load_mw} must be a finite, non-negative MW value"),
            });
        }
        let hall = self
            .halls
            .iter_mut()
            .find(|h| h.name == name)
            .ok_or_else(|| LayoutError::InvalidInput {
                what: format!("hall {name}"),
                reason: format!("not part of layout {}", self.layout),
            })?;
        hall.it_load = megawatts(it_load_mw);
        Ok(())
    }

    pub fn layout(&self) -> LayoutSpec {
        self.layout
    }

    pub fn include_floors(&self) -> bool {
        self.include_floors
    }

    pub fn halls(&self) -> &[HallLoad] {
        &self.halls
    }

    pub fn get(&self, name: &str) -> Option<&HallLoad> {
        self.halls.iter().find(|h| h.name == name)
    }

    pub fn total_it_load(&self) -> Power {
        watts(self.halls.iter().map(|h| h.it_load.value).sum())
    }

    pub fn total_cooling_load(&self) -> Power {
        watts(self.halls.iter().map(|h| h.cooling_load().value).sum())
    }
}
