//! Shared application service layer for wtsim.
//!
//! Centralizes scenario loading, cached run execution and result queries
//! so frontends stay thin.

pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_service;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use query::{RunSummary, attack_events, extract_series, get_run_summary};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunResponse, RunTimingSummary, SettingsOverrides,
    ensure_run, ensure_run_with_progress, list_runs, load_run,
};
pub use scenario_service::{
    ScenarioSummary, describe_scenario, load_scenario, save_scenario, validate_scenario,
};
