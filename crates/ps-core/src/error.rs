use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid input for {what}: {value} ({reason})")]
    InvalidInput {
        what: &'static str,
        value: f64,
        reason: &'static str,
    },
}
