//! Layout error types.

use ps_core::CoreError;
use ps_hydraulics::HydraulicError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid layout '{input}': {reason}")]
    InvalidLayout { input: String, reason: String },

    #[error("Invalid input for {what}: {reason}")]
    InvalidInput { what: String, reason: String },

    #[error(transparent)]
    Hydraulic(#[from] HydraulicError),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

impl LayoutError {
    pub(crate) fn invalid_layout(input: &str, reason: impl Into<String>) -> Self {
        LayoutError::InvalidLayout {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for LayoutError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput {
                what,
                value,
                reason,
            } => LayoutError::InvalidInput {
                what: what.to_string(),
                reason: format!("{value} ({reason})"),
            },
            CoreError::NonFinite { what, value } => LayoutError::InvalidInput {
                what: what.to_string(),
                reason: format!("{value} is not finite"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_input() {
        let err = LayoutError::invalid_layout("4x3", "expected three dimensions");
        let msg = err.to_string();
        assert!(msg.contains("'4x3'"));
        assert!(msg.contains("three dimensions"));
    }

    #[test]
    fn hydraulic_errors_pass_through() {
        let err: LayoutError = HydraulicError::EmptyCatalog.into();
        assert_eq!(err.to_string(), "Pipe catalog is empty");
    }
}
