//! ps-layout: hall grids, hall loads and riser aggregation.
//!
//! A building is a grid of `columns × rows × floors` data halls. Halls that
//! share a column can share one vertical riser (shared mode) or each hall can
//! be piped on its own branch (independent mode).
//!
//! Provides:
//! - `LayoutSpec` parsing (`4x3x2`, `4×3×2`) and hall naming
//! - `HallLoads`: uniform or per-hall IT loads with fan heat
//! - `LayoutAggregator`: per-column riser stacks or per-hall branches, sized
//!   with `ps-hydraulics`

pub mod aggregate;
pub mod error;
pub mod grid;
pub mod loads;

pub use aggregate::{
    ColumnAggregate, HallBranch, LayoutAggregator, LayoutSizing, RiserMode, RiserStack,
    column_aggregates,
};
pub use error::{LayoutError, LayoutResult};
pub use grid::{
    HallId, LayoutSpec, LayoutStats, MAX_COLUMNS, MAX_HALLS, column_letters, parse_layout,
};
pub use loads::{HallLoad, HallLoads};
