//! Annual energy and ten-year ownership cost of a plant configuration.

use crate::catalog::{ChillerModel, mw_to_tons};

/// Years covered by the total cost of ownership.
pub const TCO_YEARS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Economics {
    pub electricity_rate_per_kwh: f64,
    pub annual_hours: f64,
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            electricity_rate_per_kwh: 0.12,
            annual_hours: 8760.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostAnalysis {
    /// Refrigeration tons actually delivered by the operating units.
    pub operating_tons: f64,
    pub annual_kwh: f64,
    pub annual_energy_cost: f64,
    pub installation_cost: f64,
    pub annual_maintenance_cost: f64,
    pub ten_year_tco: f64,
    pub tco_per_mw: f64,
}

impl CostAnalysis {
    pub fn compute(
        model: &ChillerModel,
        total_count: u32,
        load_mw: f64,
        economics: &Economics,
    ) -> Self {
        let operating_tons = mw_to_tons(load_mw);
        let annual_kwh = operating_tons * model.kw_per_ton * economics.annual_hours;
        let annual_energy_cost = annual_kwh * economics.electricity_rate_per_kwh;
        let installation_cost = f64::from(total_count) * model.tons * model.install_cost_per_ton;
        let annual_maintenance_cost = f64::from(total_count) * model.annual_maintenance;
        let ten_year_tco =
            installation_cost + TCO_YEARS * (annual_energy_cost + annual_maintenance_cost);

        Self {
            operating_tons,
            annual_kwh,
            annual_energy_cost,
            installation_cost,
            annual_maintenance_cost,
            ten_year_tco,
            tco_per_mw: ten_year_tco / load_mw,
        }
    }
}
