//! Error types for flow conversion and pipe sizing.

use ps_core::CoreError;
use thiserror::Error;

/// Errors that can occur during hydraulic calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicError {
    #[error("Invalid input for {what}: {value} ({reason})")]
    InvalidInput {
        what: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Pipe catalog is empty")]
    EmptyCatalog,
}

pub type HydraulicResult<T> = Result<T, HydraulicError>;

impl From<CoreError> for HydraulicError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput {
                what,
                value,
                reason,
            } => HydraulicError::InvalidInput {
                what,
                value,
                reason,
            },
            CoreError::NonFinite { what, value } => HydraulicError::InvalidInput {
                what,
                value,
                reason: "must be finite",
            },
        }
    }
}
