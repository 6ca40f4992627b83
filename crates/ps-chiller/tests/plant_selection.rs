use ps_chiller::{
    ChillerCatalog, ChillerError, ChillerModel, ChillerSelector, Economics, LoadingBand,
    Redundancy, SelectionCriteria, Strategy, mw_to_tons,
};
use ps_core::imperial::megawatts;

#[test]
fn building_load_with_two_unit_cap_has_no_plant() {
    let catalog = ChillerCatalog::new(vec![
        ChillerModel::new(500.0, 7.2, 0.49, 980.0, 22_000.0),
        ChillerModel::new(1000.0, 7.8, 0.45, 920.0, 35_000.0),
    ])
    .unwrap();
    let criteria =
        SelectionCriteria::new(megawatts(37.8), Redundancy::NPlusOne, Strategy::Central, 2);

    let err = ChillerSelector::new(catalog).select(&criteria).unwrap_err();
    assert_eq!(
        err,
        ChillerError::NoFeasibleConfiguration {
            load_mw: 37.8,
            max_units: 2,
        }
    );
}

#[test]
fn every_strategy_returns_a_ranked_top_three() {
    let selector = ChillerSelector::default();
    for strategy in Strategy::ALL {
        let criteria = SelectionCriteria::new(megawatts(37.8), Redundancy::NPlusTwo, strategy, 25)
            .with_economics(Economics {
                electricity_rate_per_kwh: 0.10,
                annual_hours: 8760.0,
            });
        let top = selector.select(&criteria).unwrap();
        assert_eq!(top.len(), 3, "{strategy}");
        assert!(top.iter().all(|c| c.spare_count == 2 && c.total_count <= 25));
        assert!(top.windows(2).all(|w| w[0].score <= w[1].score + 1e-9));
    }
}

#[test]
fn loading_band_can_exclude_everything() {
    // a 2-unit cap leaves one operating unit, and none of them runs above 90 %
    let criteria =
        SelectionCriteria::new(megawatts(2.0), Redundancy::NPlusOne, Strategy::Balanced, 2)
            .with_loading_band(LoadingBand::new(90.0, 100.0).unwrap());
    let err = ChillerSelector::default().select(&criteria).unwrap_err();
    assert!(matches!(err, ChillerError::NoFeasibleConfiguration { .. }));
}

#[test]
fn operating_tons_match_the_load() {
    let criteria = SelectionCriteria::new(
        megawatts(12.0),
        Redundancy::NPlusOne,
        Strategy::LifecycleCost,
        20,
    );
    let top = ChillerSelector::default().select(&criteria).unwrap();
    for c in &top {
        assert!((c.costs.operating_tons - mw_to_tons(12.0)).abs() < 1e-6);
        assert!(c.costs.ten_year_tco > c.costs.installation_cost);
    }
}
