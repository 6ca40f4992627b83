//! ps-core: shared foundation for plantsizer.
//!
//! Contains:
//! - units (uom SI types, constructors, imperial conversions)
//! - numeric (Real + tolerances + input guards)
//! - error (shared error type)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
