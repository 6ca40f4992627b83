//! Chiller unit models with performance and cost data.

use ps_core::imperial::{W_PER_MW, W_PER_TON, tons, to_megawatts};
use ps_core::numeric::ensure_positive;
use ps_core::units::Power;

use crate::error::{ChillerError, ChillerResult};

pub fn tons_to_mw(t: f64) -> f64 {
    t * W_PER_TON / W_PER_MW
}

pub fn mw_to_tons(mw: f64) -> f64 {
    mw * W_PER_MW / W_PER_TON
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChillerModel {
    pub name: String,
    /// Nominal capacity, refrigeration tons.
    pub tons: f64,
    pub cop: f64,
    /// Electrical input per ton at rated conditions.
    pub kw_per_ton: f64,
    /// Installed cost, $ per ton.
    pub install_cost_per_ton: f64,
    /// Maintenance, $ per unit per year.
    pub annual_maintenance: f64,
}

impl ChillerModel {
    pub fn new(
        tons: f64,
        cop: f64,
        kw_per_ton: f64,
        install_cost_per_ton: f64,
        annual_maintenance: f64,
    ) -> Self {
        Self {
            name: format!("{tons:.0} ton"),
            tons,
            cop,
            kw_per_ton,
            install_cost_per_ton,
            annual_maintenance,
        }
    }

    pub fn capacity(&self) -> Power {
        tons(self.tons)
    }

    pub fn capacity_mw(&self) -> f64 {
        to_megawatts(self.capacity())
    }

    fn validate(&self) -> ChillerResult<()> {
        ensure_positive(self.tons, "chiller capacity")?;
        ensure_positive(self.cop, "chiller COP")?;
        ensure_positive(self.kw_per_ton, "chiller kW/ton")?;
        if !(self.install_cost_per_ton.is_finite() && self.install_cost_per_ton >= 0.0) {
            return Err(ChillerError::InvalidInput {
                what: "chiller install cost",
                value: self.install_cost_per_ton,
                reason: "must be finite and non-negative",
            });
        }
        if !(self.annual_maintenance.is_finite() && self.annual_maintenance >= 0.0) {
            return Err(ChillerError::InvalidInput {
                what: "chiller maintenance cost",
                value: self.annual_maintenance,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Unit models ordered by capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChillerCatalog {
    models: Vec<ChillerModel>,
}

// (tons, COP, kW/ton, $/ton installed, $/unit/yr maintenance)
const STANDARD_MODELS: [(f64, f64, f64, f64, f64); 10] = [
    (100.0, 5.8, 0.61, 1200.0, 8_000.0),
    (150.0, 6.2, 0.57, 1150.0, 10_000.0),
    (200.0, 6.5, 0.54, 1100.0, 12_000.0),
    (300.0, 6.8, 0.52, 1050.0, 15_000.0),
    (400.0, 7.0, 0.50, 1000.0, 18_000.0),
    (500.0, 7.2, 0.49, 980.0, 22_000.0),
    (750.0, 7.5, 0.47, 950.0, 28_000.0),
    (1000.0, 7.8, 0.45, 920.0, 35_000.0),
    (1500.0, 8.0, 0.44, 900.0, 45_000.0),
    (2000.0, 8.2, 0.43, 880.0, 55_000.0),
];

impl ChillerCatalog {
    pub fn new(mut models: Vec<ChillerModel>) -> ChillerResult<Self> {
        if models.is_empty() {
            return Err(ChillerError::InvalidInput {
                what: "chiller catalog",
                value: 0.0,
                reason: "must contain at least one model",
            });
        }
        for model in &models {
            model.validate()?;
        }
        models.sort_by(|a, b| a.tons.total_cmp(&b.tons));
        Ok(Self { models })
    }

    /// Water-cooled centrifugal/screw units, 100 to 2000 tons.
    pub fn standard() -> Self {
        let models = STANDARD_MODELS
            .iter()
            .map(|&(t, cop, kw, cost, maint)| ChillerModel::new(t, cop, kw, cost, maint))
            .collect();
        Self { models }
    }

    pub fn models(&self) -> &[ChillerModel] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn find_tons(&self, t: f64) -> Option<&ChillerModel> {
        self.models.iter().find(|m| m.tons == t)
    }
}

impl Default for ChillerCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_sorted_and_efficiency_improves() {
        let catalog = ChillerCatalog::standard();
        assert_eq!(catalog.len(), 10);
        for pair in catalog.models().windows(2) {
            assert!(pair[0].tons < pair[1].tons);
            assert!(pair[0].kw_per_ton >= pair[1].kw_per_ton);
        }
        assert_eq!(catalog.models()[7].name, "1000 ton");
    }

    #[test]
    fn thousand_tons_in_mw() {
        assert!((tons_to_mw(1000.0) - 3.516_852_842).abs() < 1e-9);
        assert!((mw_to_tons(tons_to_mw(750.0)) - 750.0).abs() < 1e-9);
        let model = ChillerCatalog::standard().find_tons(1000.0).cloned().unwrap();
        assert!((model.capacity_mw() - 3.516_852_842).abs() < 1e-9);
    }

    #[test]
    fn custom_catalog_validation() {
        assert!(ChillerCatalog::new(Vec::new()).is_err());
        assert!(ChillerCatalog::new(vec![ChillerModel::new(0.0, 6.0, 0.5, 900.0, 1.0)]).is_err());
        assert!(ChillerCatalog::new(vec![ChillerModel::new(500.0, 6.0, 0.5, -1.0, 1.0)]).is_err());

        let catalog = ChillerCatalog::new(vec![
            ChillerModel::new(800.0, 7.0, 0.5, 950.0, 30_000.0),
            ChillerModel::new(400.0, 7.0, 0.5, 1000.0, 18_000.0),
        ])
        .unwrap();
        assert_eq!(catalog.models()[0].tons, 400.0);
    }
}
