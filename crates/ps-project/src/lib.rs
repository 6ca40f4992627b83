//! ps-project: study file format and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{MAX_FAN_HEAT_PCT, ValidationError, validate_study};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn finish(study: Study) -> ProjectResult<Study> {
    let study = migrate_to_latest(study)?;
    validate_study(&study)?;
    Ok(study)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Study> {
    finish(serde_yaml::from_str(content)?)
}

pub fn from_json_str(content: &str) -> ProjectResult<Study> {
    finish(serde_json::from_str(content)?)
}

pub fn to_yaml_string(study: &Study) -> ProjectResult<String> {
    validate_study(study)?;
    Ok(serde_yaml::to_string(study)?)
}

pub fn to_json_string(study: &Study) -> ProjectResult<String> {
    validate_study(study)?;
    Ok(serde_json::to_string_pretty(study)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, study: &Study) -> ProjectResult<()> {
    let content = to_yaml_string(study)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &Path, study: &Study) -> ProjectResult<()> {
    let content = to_json_string(study)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// True for `.json` paths; everything else is treated as YAML.
pub fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

pub fn load(path: &Path) -> ProjectResult<Study> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

pub fn save(path: &Path, study: &Study) -> ProjectResult<()> {
    if is_json(path) {
        save_json(path, study)
    } else {
        save_yaml(path, study)
    }
}
