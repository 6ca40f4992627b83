//! Enumeration and ranking of chiller plant configurations.

use ps_core::imperial::to_megawatts;
use ps_core::numeric::ensure_positive;
use ps_core::units::{Power, watts};
use tracing::{debug, warn};

use crate::catalog::{ChillerCatalog, ChillerModel};
use crate::cost::{CostAnalysis, Economics};
use crate::error::{ChillerError, ChillerResult};
use crate::policy::{LoadingBand, Redundancy, Strategy};

/// Number of configurations returned by [`ChillerSelector::select`].
pub const TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCriteria {
    pub load: Power,
    pub redundancy: Redundancy,
    pub strategy: Strategy,
    /// Cap on operating + spare units.
    pub max_units: u32,
    pub loading_band: Option<LoadingBand>,
    pub economics: Economics,
}

impl SelectionCriteria {
    pub fn new(load: Power, redundancy: Redundancy, strategy: Strategy, max_units: u32) -> Self {
        Self {
            load,
            redundancy,
            strategy,
            max_units,
            loading_band: None,
            economics: Economics::default(),
        }
    }

    pub fn with_loading_band(mut self, band: LoadingBand) -> Self {
        self.loading_band = Some(band);
        self
    }

    pub fn with_economics(mut self, economics: Economics) -> Self {
        self.economics = economics;
        self
    }

    pub fn load_mw(&self) -> f64 {
        to_megawatts(self.load)
    }

    fn validate(&self) -> ChillerResult<()> {
        ensure_positive(self.load.value, "cooling load")?;
        if self.max_units < 1 {
            return Err(ChillerError::InvalidInput {
                what: "max units",
                value: f64::from(self.max_units),
                reason: "must be at least 1",
            });
        }
        self.redundancy.validate()?;
        ensure_positive(self.economics.annual_hours, "annual hours")?;
        if !(self.economics.electricity_rate_per_kwh.is_finite()
            && self.economics.electricity_rate_per_kwh >= 0.0)
        {
            return Err(ChillerError::InvalidInput {
                what: "electricity rate",
                value: self.economics.electricity_rate_per_kwh,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// One feasible plant: `operating_count` units of `model` plus spares.
#[derive(Debug, Clone, PartialEq)]
pub struct ChillerCandidate {
    pub model: ChillerModel,
    pub unit_capacity: Power,
    pub operating_count: u32,
    pub spare_count: u32,
    pub total_count: u32,
    pub installed_capacity: Power,
    /// Load over total installed capacity, percent.
    pub loading_pct: f64,
    /// Load over operating capacity, percent.
    pub operating_loading_pct: f64,
    /// Spare units over operating units, percent.
    pub redundancy_pct: f64,
    pub score: f64,
    pub costs: CostAnalysis,
}

impl ChillerCandidate {
    pub fn unit_capacity_mw(&self) -> f64 {
        to_megawatts(self.unit_capacity)
    }

    pub fn installed_capacity_mw(&self) -> f64 {
        to_megawatts(self.installed_capacity)
    }

    pub fn installed_tons(&self) -> f64 {
        f64::from(self.total_count) * self.model.tons
    }

    /// Score, then the strategy's tie-break, then a stable fallback.
    fn rank_key(&self, strategy: Strategy) -> (i64, i64, u32, u64, u32) {
        // quantized so plants with equal installed tons compare equal
        let quantize = |x: f64| (x * 1.0e9).round() as i64;
        let secondary = match strategy {
            Strategy::Modular => self.installed_capacity.value.round() as i64,
            Strategy::Central | Strategy::Balanced | Strategy::LifecycleCost => {
                i64::from(self.total_count)
            }
        };
        (
            quantize(self.score),
            secondary,
            self.total_count,
            self.model.tons.round() as u64,
            self.operating_count,
        )
    }
}

fn score(
    strategy: Strategy,
    unit_w: f64,
    installed_w: f64,
    load_w: f64,
    costs: &CostAnalysis,
) -> f64 {
    let central = installed_w / load_w;
    let modular = unit_w / load_w;
    match strategy {
        Strategy::Central => central,
        Strategy::Modular => modular,
        Strategy::Balanced => central + modular,
        Strategy::LifecycleCost => costs.tco_per_mw / 1.0e6,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChillerSelector {
    catalog: ChillerCatalog,
}

impl ChillerSelector {
    pub fn new(catalog: ChillerCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ChillerCatalog {
        &self.catalog
    }

    /// Every configuration within the cap (and loading band, if any), ranked
    /// best first.
    ///
    /// Operating counts run from the smallest count covering the load up to
    /// the largest count whose total stays within the cap.
    pub fn feasible(&self, criteria: &SelectionCriteria) -> ChillerResult<Vec<ChillerCandidate>> {
        criteria.validate()?;
        let load_w = criteria.load.value;
        let load_mw = criteria.load_mw();

        let mut candidates = Vec::new();
        for model in self.catalog.models() {
            let unit_w = model.capacity().value;
            let min_operating = (load_w / unit_w).ceil().max(1.0) as u32;

            for operating in min_operating..criteria.max_units {
                let spares = criteria.redundancy.spares(operating);
                let total = operating + spares;
                if total > criteria.max_units {
                    // spares never shrink as operating grows
                    break;
                }

                let operating_loading_pct = load_w / (f64::from(operating) * unit_w) * 100.0;
                if let Some(band) = criteria.loading_band
                    && !band.contains(operating_loading_pct)
                {
                    debug!(
                        model = %model.name,
                        operating,
                        operating_loading_pct,
                        "outside loading band"
                    );
                    continue;
                }

                let installed_w = f64::from(total) * unit_w;
                let costs = CostAnalysis::compute(model, total, load_mw, &criteria.economics);
                candidates.push(ChillerCandidate {
                    model: model.clone(),
                    unit_capacity: model.capacity(),
                    operating_count: operating,
                    spare_count: spares,
                    total_count: total,
                    installed_capacity: watts(installed_w),
                    loading_pct: load_w / installed_w * 100.0,
                    operating_loading_pct,
                    redundancy_pct: f64::from(spares) / f64::from(operating) * 100.0,
                    score: score(criteria.strategy, unit_w, installed_w, load_w, &costs),
                    costs,
                });
            }
        }

        if candidates.is_empty() {
            warn!(
                load_mw,
                max_units = criteria.max_units,
                redundancy = %criteria.redundancy,
                "no chiller configuration fits"
            );
            return Err(ChillerError::NoFeasibleConfiguration {
                load_mw,
                max_units: criteria.max_units,
            });
        }

        let strategy = criteria.strategy;
        candidates.sort_by_key(|c| c.rank_key(strategy));
        Ok(candidates)
    }

    /// Best [`TOP_N`] configurations; fewer when fewer are feasible.
    pub fn select(&self, criteria: &SelectionCriteria) -> ChillerResult<Vec<ChillerCandidate>> {
        let mut ranked = self.feasible(criteria)?;
        ranked.truncate(TOP_N);
        debug!(
            strategy = %criteria.strategy,
            best = %ranked[0].model.name,
            operating = ranked[0].operating_count,
            "chiller selection"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_core::imperial::{megawatts, tons};

    fn selector() -> ChillerSelector {
        ChillerSelector::new(ChillerCatalog::standard())
    }

    #[test]
    fn two_unit_cap_is_infeasible_for_large_load() {
        let criteria =
            SelectionCriteria::new(megawatts(37.8), Redundancy::NPlusOne, Strategy::Balanced, 2);
        let err = selector().select(&criteria).unwrap_err();
        assert!(matches!(
            err,
            ChillerError::NoFeasibleConfiguration { max_units: 2, .. }
        ));
    }

    #[test]
    fn top_three_are_distinct_and_within_cap() {
        let criteria =
            SelectionCriteria::new(megawatts(37.8), Redundancy::NPlusOne, Strategy::Balanced, 20);
        let top = selector().select(&criteria).unwrap();
        assert_eq!(top.len(), TOP_N);
        for (i, a) in top.iter().enumerate() {
            assert!(a.total_count <= 20);
            assert_eq!(a.spare_count, 1);
            assert!(f64::from(a.operating_count) * a.unit_capacity.value >= criteria.load.value);
            for b in &top[i + 1..] {
                assert!(a.model.tons != b.model.tons || a.operating_count != b.operating_count);
                assert!(a.score <= b.score + 1e-9);
            }
        }
    }

    #[test]
    fn annotations() {
        // 2 × 1000 ton operating + 1 spare for a 1500 ton load
        let criteria =
            SelectionCriteria::new(tons(1500.0), Redundancy::NPlusOne, Strategy::Central, 3);
        let model = ChillerModel::new(1000.0, 7.8, 0.45, 920.0, 35_000.0);
        let catalog = ChillerCatalog::new(vec![model]).unwrap();
        let ranked = ChillerSelector::new(catalog).feasible(&criteria).unwrap();

        assert_eq!(ranked.len(), 1);
        let c = &ranked[0];
        assert_eq!((c.operating_count, c.spare_count, c.total_count), (2, 1, 3));
        assert!((c.loading_pct - 50.0).abs() < 1e-9);
        assert!((c.operating_loading_pct - 75.0).abs() < 1e-9);
        assert!((c.redundancy_pct - 50.0).abs() < 1e-9);
        assert!((c.installed_tons() - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn central_prefers_least_installed_then_fewest_units() {
        let criteria =
            SelectionCriteria::new(megawatts(37.8), Redundancy::NPlusOne, Strategy::Central, 20);
        let top = selector().select(&criteria).unwrap();
        // 12 × 1000 t and 16 × 750 t both install 12 000 t
        assert_eq!(top[0].model.tons, 1000.0);
        assert_eq!(top[0].total_count, 12);
        assert_eq!(top[1].model.tons, 750.0);
        assert_eq!(top[1].total_count, 16);
    }

    #[test]
    fn modular_prefers_smallest_units() {
        let criteria =
            SelectionCriteria::new(megawatts(5.0), Redundancy::NPlusOne, Strategy::Modular, 20);
        let top = selector().select(&criteria).unwrap();
        let smallest = top[0].model.tons;
        assert!(top.iter().all(|c| c.model.tons == smallest));
        assert!(top[0].operating_count < top[1].operating_count);
        // 5 MW = 1422 t, so 15 + 1 units of 100 t fit under the cap
        assert_eq!(smallest, 100.0);
    }

    #[test]
    fn percent_redundancy_spares() {
        let criteria = SelectionCriteria::new(
            megawatts(20.0),
            Redundancy::NPlusPercent(25.0),
            Strategy::Balanced,
            30,
        );
        for c in selector().feasible(&criteria).unwrap() {
            let expected = ((f64::from(c.operating_count) * 0.25).ceil() as u32).max(1);
            assert_eq!(c.spare_count, expected);
            assert!(c.total_count <= 30);
        }
    }

    #[test]
    fn loading_band_filters_candidates() {
        let band = LoadingBand::new(40.0, 80.0).unwrap();
        let criteria =
            SelectionCriteria::new(megawatts(10.0), Redundancy::NPlusOne, Strategy::Balanced, 20)
                .with_loading_band(band);
        let all = selector().feasible(&criteria).unwrap();
        assert!(all.iter().all(|c| band.contains(c.operating_loading_pct)));
    }

    #[test]
    fn lifecycle_ranks_by_tco_per_mw() {
        let criteria = SelectionCriteria::new(
            megawatts(20.0),
            Redundancy::NPlusOne,
            Strategy::LifecycleCost,
            20,
        );
        let ranked = selector().feasible(&criteria).unwrap();
        for pair in ranked.windows(2) {
            assert!(pair[0].costs.tco_per_mw <= pair[1].costs.tco_per_mw + 1e-3);
        }
    }

    #[test]
    fn rejects_invalid_criteria() {
        let s = selector();
        let base =
            SelectionCriteria::new(megawatts(10.0), Redundancy::NPlusOne, Strategy::Balanced, 20);

        let mut zero = base.clone();
        zero.load = megawatts(0.0);
        assert!(matches!(s.select(&zero), Err(ChillerError::InvalidInput { .. })));

        let mut no_units = base.clone();
        no_units.max_units = 0;
        assert!(matches!(s.select(&no_units), Err(ChillerError::InvalidInput { .. })));

        let mut pct = base;
        pct.redundancy = Redundancy::NPlusPercent(0.0);
        assert!(matches!(s.select(&pct), Err(ChillerError::InvalidInput { .. })));
    }
}

#[cfg(test)]
mod proptests {
    use super::{ChillerSelector, SelectionCriteria, TOP_N};
    use crate::{ChillerError, Redundancy};
    use ps_core::imperial::megawatts;
    use proptest::prelude::*;

    fn redundancy() -> impl Strategy<Value = Redundancy> {
        prop_oneof![
            Just(Redundancy::NPlusOne),
            Just(Redundancy::NPlusTwo),
            (1.0_f64..100.0).prop_map(Redundancy::NPlusPercent),
        ]
    }

    proptest! {
        #[test]
        fn never_exceeds_cap(
            mw in 0.1_f64..80.0,
            cap in 1u32..30,
            policy in redundancy(),
        ) {
            let criteria =
                SelectionCriteria::new(megawatts(mw), policy, crate::Strategy::Balanced, cap);
            match ChillerSelector::default().select(&criteria) {
                Ok(top) => {
                    prop_assert!(!top.is_empty() && top.len() <= TOP_N);
                    for c in &top {
                        prop_assert!(c.total_count <= cap);
                        prop_assert_eq!(c.total_count, c.operating_count + c.spare_count);
                        let operating_w = f64::from(c.operating_count) * c.unit_capacity.value;
                        prop_assert!(operating_w >= criteria.load.value);
                    }
                }
                Err(ChillerError::NoFeasibleConfiguration { max_units, .. }) => {
                    prop_assert_eq!(max_units, cap)
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }
}
