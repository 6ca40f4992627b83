//! ps-hydraulics: load-to-flow conversion and pipe sizing.
//!
//! Provides:
//! - `FlowConverter`: thermal load, fan heat and ΔT to mass/volumetric flow
//! - `PipeCatalog`: sorted, deduplicated nominal pipe sizes
//! - `HydraulicSizer`: smallest catalog entry meeting velocity and ΔP limits
//!
//! Pressure drop is Darcy–Weisbach with the Swamee–Jain friction factor.
//!
//! # Example
//!
//! ```
//! use ps_core::imperial::{delta_f, megawatts, to_inches};
//! use ps_fluids::{FluidKind, lookup};
//! use ps_hydraulics::{FlowConverter, HydraulicSizer, PipeCatalog, SizingLimits};
//!
//! let water = lookup(FluidKind::Water, 0).unwrap();
//! let flow = FlowConverter::new(water)
//!     .convert(megawatts(36.0), 0.05, delta_f(15.0))
//!     .unwrap();
//!
//! let catalog = PipeCatalog::schedule_40();
//! let sizer = HydraulicSizer::new(&catalog, water, SizingLimits::default());
//! let result = sizer.size(flow.volumetric).unwrap();
//! assert!(to_inches(result.entry.inside_diameter) > 24.0);
//! ```

pub mod catalog;
pub mod error;
pub mod flow;
pub mod friction;
pub mod sizer;

// Re-exports
pub use catalog::{PipeCatalog, PipeCatalogEntry, PipeRecord};
pub use error::{HydraulicError, HydraulicResult};
pub use flow::{FlowConverter, FlowSpec, MAX_FAN_HEAT_FRACTION, mw_to_gpm};
pub use sizer::{
    CandidateEvaluation, ConstraintStatus, HydraulicSizer, SizingLimits, SizingResult,
    SizingWarning,
};
