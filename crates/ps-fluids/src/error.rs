//! Fluid lookup errors.

use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur when selecting fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// No table row for this kind at this concentration.
    #[error("Unknown fluid: {kind} at {concentration_pct}%")]
    UnknownFluid {
        kind: String,
        concentration_pct: u32,
    },

    /// Fluid name that does not match any known kind or alias.
    #[error("Unknown fluid name: {name}")]
    UnknownName { name: String },
}
