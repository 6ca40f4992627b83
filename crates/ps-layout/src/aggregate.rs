//! Column aggregation and per-segment sizing.

use std::collections::BTreeMap;
use std::fmt;

use ps_core::imperial::to_megawatts;
use ps_core::units::{Power, TempInterval, watts};
use ps_hydraulics::{FlowConverter, FlowSpec, HydraulicSizer, SizingResult};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::LayoutResult;
use crate::grid::{HallId, column_letters};
use crate::loads::HallLoads;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiserMode {
    /// One riser per column, shared by every row and floor in it.
    #[default]
    Shared,
    /// Every hall piped on its own branch.
    Independent,
}

impl fmt::Display for RiserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiserMode::Shared => f.write_str("shared"),
            RiserMode::Independent => f.write_str("independent"),
        }
    }
}

/// Loads of all halls sharing one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAggregate {
    pub column: String,
    pub column_index: u32,
    pub it_load: Power,
    pub cooling_load: Power,
    pub hall_count: usize,
    /// Member hall names, sorted.
    pub halls: Vec<String>,
}

impl ColumnAggregate {
    pub fn it_load_mw(&self) -> f64 {
        to_megawatts(self.it_load)
    }

    pub fn cooling_load_mw(&self) -> f64 {
        to_megawatts(self.cooling_load)
    }
}

/// Per-column sums, ordered by column.
pub fn column_aggregates(loads: &HallLoads) -> Vec<ColumnAggregate> {
    let mut by_column: BTreeMap<u32, ColumnAggregate> = BTreeMap::new();
    for hall in loads.halls() {
        let agg = by_column
            .entry(hall.hall.column)
            .or_insert_with(|| ColumnAggregate {
                column: column_letters(hall.hall.column),
                column_index: hall.hall.column,
                it_load: watts(0.0),
                cooling_load: watts(0.0),
                hall_count: 0,
                halls: Vec::new(),
            });
        agg.it_load = watts(agg.it_load.value + hall.it_load.value);
        agg.cooling_load = watts(agg.cooling_load.value + hall.cooling_load().value);
        agg.hall_count += 1;
        agg.halls.push(hall.name.clone());
    }

    by_column
        .into_values()
        .map(|mut agg| {
            agg.halls.sort();
            agg
        })
        .collect()
}

/// A shared vertical riser serving one column.
#[derive(Debug, Clone, PartialEq)]
pub struct RiserStack {
    pub column: ColumnAggregate,
    pub flow: FlowSpec,
    pub sizing: SizingResult,
}

/// An independently piped hall.
#[derive(Debug, Clone, PartialEq)]
pub struct HallBranch {
    pub hall: HallId,
    pub name: String,
    pub flow: FlowSpec,
    pub sizing: SizingResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSizing {
    pub mode: RiserMode,
    /// Filled in shared mode.
    pub risers: Vec<RiserStack>,
    /// Filled in independent mode.
    pub branches: Vec<HallBranch>,
    /// Per-column totals. Display only in independent mode.
    pub columns: Vec<ColumnAggregate>,
    pub total_it_load: Power,
    pub total_cooling_load: Power,
}

/// Turns hall loads into sized riser stacks or hall branches.
///
/// Segments are independent, so they are sized in parallel.
#[derive(Debug, Clone, Copy)]
pub struct LayoutAggregator<'a> {
    converter: FlowConverter,
    sizer: HydraulicSizer<'a>,
    delta_t: TempInterval,
}

impl<'a> LayoutAggregator<'a> {
    pub fn new(converter: FlowConverter, sizer: HydraulicSizer<'a>, delta_t: TempInterval) -> Self {
        Self {
            converter,
            sizer,
            delta_t,
        }
    }

    pub fn riser_stacks(&self, loads: &HallLoads) -> LayoutResult<Vec<RiserStack>> {
        column_aggregates(loads)
            .into_par_iter()
            .map(|column| -> LayoutResult<RiserStack> {
                let flow = self.converter.convert_cooling(column.cooling_load, self.delta_t)?;
                let sizing = self.sizer.size_segment(flow.volumetric)?;
                debug!(column = %column.column, pipe = %sizing.entry.label, "sized riser");
                Ok(RiserStack {
                    column,
                    flow,
                    sizing,
                })
            })
            .collect()
    }

    pub fn hall_branches(&self, loads: &HallLoads) -> LayoutResult<Vec<HallBranch>> {
        loads
            .halls()
            .par_iter()
            .map(|hall| -> LayoutResult<HallBranch> {
                let flow = self.converter.convert_cooling(hall.cooling_load(), self.delta_t)?;
                let sizing = self.sizer.size_segment(flow.volumetric)?;
                debug!(hall = %hall.name, pipe = %sizing.entry.label, "sized branch");
                Ok(HallBranch {
                    hall: hall.hall,
                    name: hall.name.clone(),
                    flow,
                    sizing,
                })
            })
            .collect()
    }

    pub fn size(&self, loads: &HallLoads, mode: RiserMode) -> LayoutResult<LayoutSizing> {
        let (risers, branches) = match mode {
            RiserMode::Shared => (self.riser_stacks(loads)?, Vec::new()),
            RiserMode::Independent => (Vec::new(), self.hall_branches(loads)?),
        };
        info!(
            layout = %loads.layout(),
            %mode,
            segments = risers.len() + branches.len(),
            "layout sized"
        );
        Ok(LayoutSizing {
            mode,
            risers,
            branches,
            columns: column_aggregates(loads),
            total_it_load: loads.total_it_load(),
            total_cooling_load: loads.total_cooling_load(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_layout;
    use ps_core::imperial::delta_f;
    use ps_fluids::{FluidKind, lookup};
    use ps_hydraulics::{ConstraintStatus, PipeCatalog, SizingLimits};

    #[test]
    fn column_sums_match_reference_case() {
        let overrides = BTreeMap::from([
            ("A1-F1".to_string(), 5.0),
            ("A2-F1".to_string(), 3.0),
            ("B1-F1".to_string(), 4.0),
            ("B2-F1".to_string(), 2.0),
            ("A1-F2".to_string(), 5.0),
            ("B1-F2".to_string(), 4.0),
        ]);
        // A2-F2 and B2-F2 stay empty
        let loads =
            HallLoads::per_hall(parse_layout("2x2x2").unwrap(), true, 0.0, &overrides, 0.0)
                .unwrap();
        let cols = column_aggregates(&loads);

        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].column, "A");
        assert!((cols[0].it_load_mw() - 13.0).abs() < 1e-9);
        assert_eq!(cols[0].hall_count, 4);
        assert_eq!(cols[0].halls, ["A1-F1", "A1-F2", "A2-F1", "A2-F2"]);
        assert_eq!(cols[1].column, "B");
        assert!((cols[1].it_load_mw() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn shared_and_independent_segment_counts() {
        let water = lookup(FluidKind::Water, 0).unwrap();
        let catalog = PipeCatalog::schedule_40();
        let limits = SizingLimits::imperial(12.0, 4.0).unwrap();
        let sizer = HydraulicSizer::new(&catalog, water, limits);
        let agg = LayoutAggregator::new(FlowConverter::new(water), sizer, delta_f(15.0));
        let loads = HallLoads::uniform(parse_layout("2x2x3").unwrap(), true, 3.0, 0.05).unwrap();

        let shared = agg.size(&loads, RiserMode::Shared).unwrap();
        assert_eq!(shared.risers.len(), 2);
        assert!(shared.branches.is_empty());
        for riser in &shared.risers {
            assert!((riser.column.cooling_load_mw() - 18.9).abs() < 1e-9);
            assert_eq!(riser.column.hall_count, 6);
        }

        let independent = agg.size(&loads, RiserMode::Independent).unwrap();
        assert_eq!(independent.branches.len(), 12);
        assert!(independent.risers.is_empty());
        assert_eq!(independent.columns.len(), 2);
        let first = &independent.branches[0];
        assert_eq!(first.name, "A1-F1");
        assert!(first.sizing.entry.rank < shared.risers[0].sizing.entry.rank);
    }

    #[test]
    fn empty_column_is_idle() {
        let water = lookup(FluidKind::Water, 0).unwrap();
        let catalog = PipeCatalog::schedule_40();
        let sizer = HydraulicSizer::new(&catalog, water, SizingLimits::default());
        let agg = LayoutAggregator::new(FlowConverter::new(water), sizer, delta_f(15.0));

        let overrides = BTreeMap::from([("A1".to_string(), 2.0)]);
        let loads =
            HallLoads::per_hall(parse_layout("2x1x1").unwrap(), false, 0.0, &overrides, 0.0)
                .unwrap();
        let risers = agg.riser_stacks(&loads).unwrap();
        assert_eq!(risers[0].sizing.status, ConstraintStatus::Satisfied);
        assert_eq!(risers[1].sizing.status, ConstraintStatus::Idle);
        assert!(risers[1].flow.is_zero());
    }
}
