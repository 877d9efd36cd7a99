//! wt-project: scenario file format, migration and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::Scenario;
pub use validate::{ValidationError, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Migrate and validate a freshly parsed scenario.
fn finish_load(scenario: Scenario) -> ProjectResult<Scenario> {
    let scenario = migrate_to_latest(scenario)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Scenario> {
    finish_load(serde_yaml::from_str(content)?)
}

pub fn from_json_str(content: &str) -> ProjectResult<Scenario> {
    finish_load(serde_json::from_str(content)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    let scenario = migrate_to_latest(scenario.clone())?;
    validate_scenario(&scenario)?;
    let content = serde_yaml::to_string(&scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    from_json_str(&std::fs::read_to_string(path)?)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    let scenario = migrate_to_latest(scenario.clone())?;
    validate_scenario(&scenario)?;
    let content = serde_json::to_string_pretty(&scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ProjectError::Serialization(format!(
            "cannot tell scenario format from '{}' (expected .yaml, .yml or .json)",
            path.display()
        ))),
    }
}

/// Load a scenario, choosing YAML or JSON by file extension.
pub fn load(path: &Path) -> ProjectResult<Scenario> {
    match format_of(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Save a scenario at the latest version, choosing the format by extension.
pub fn save(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    match format_of(path)? {
        Format::Yaml => save_yaml(path, scenario),
        Format::Json => save_json(path, scenario),
    }
}
