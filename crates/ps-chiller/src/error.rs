use ps_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChillerError {
    #[error("Invalid input for {what}: {value} ({reason})")]
    InvalidInput {
        what: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("No feasible chiller configuration for {load_mw:.2} MW within {max_units} units")]
    NoFeasibleConfiguration { load_mw: f64, max_units: u32 },

    #[error("Unrecognized {what}: '{input}'")]
    Parse { what: &'static str, input: String },
}

pub type ChillerResult<T> = Result<T, ChillerError>;

impl From<CoreError> for ChillerError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput {
                what,
                value,
                reason,
            } => ChillerError::InvalidInput {
                what,
                value,
                reason,
            },
            CoreError::NonFinite { what, value } => ChillerError::InvalidInput {
                what,
                value,
                reason: "must be finite",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_display() {
        let err = ChillerError::NoFeasibleConfiguration {
            load_mw: 37.8,
            max_units: 2,
        };
        assert_eq!(
            err.to_string(),
            "No feasible chiller configuration for 37.80 MW within 2 units"
        );
    }

    #[test]
    fn core_errors_become_invalid_input() {
        let err: ChillerError = CoreError::NonFinite {
            what: "cooling load",
            value: f64::INFINITY,
        }
        .into();
        assert!(matches!(
            err,
            ChillerError::InvalidInput { what: "cooling load", reason: "must be finite", .. }
        ));
    }
}
