//! ps-fluids: heat-transfer fluid properties for plantsizer.
//!
//! Provides:
//! - Fluid kinds used in chilled/condenser water loops
//! - A static property table keyed by (kind, concentration)
//! - `FluidProperties` as uom quantities for the hydraulic crates
//!
//! Properties are reference values at typical loop conditions, not derived
//! from an equation of state.
//!
//! # Example
//!
//! ```
//! use ps_fluids::{FluidKind, lookup};
//!
//! let water = lookup(FluidKind::Water, 0).unwrap();
//! assert!(water.density.value > 990.0);
//! ```

pub mod error;
pub mod kind;
pub mod table;

// Re-exports for ergonomics
pub use error::{FluidError, FluidResult};
pub use kind::FluidKind;
pub use table::{FluidProperties, FluidTableEntry, find_entry, fluid_table, lookup};
