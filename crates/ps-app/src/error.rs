//! Error types for the ps-app service layer.

use std::path::PathBuf;

use ps_chiller::ChillerError;
use ps_fluids::FluidError;
use ps_hydraulics::HydraulicError;
use ps_layout::LayoutError;
use ps_project::ProjectError;

/// Application error type that wraps errors from the engine crates and
/// provides a single error interface for front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Study error: {0}")]
    Project(#[from] ProjectError),

    #[error("Failed to read study file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Hydraulic error: {0}")]
    Hydraulic(#[from] HydraulicError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Chiller error: {0}")]
    Chiller(#[from] ChillerError),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for ps-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ps_project::ValidationError> for AppError {
    fn from(err: ps_project::ValidationError) -> Self {
        AppError::Project(ProjectError::Validation(err))
    }
}
