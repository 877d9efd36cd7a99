//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};
use wt_project::Scenario;
use wt_sim::SimOptions;

/// Hex SHA-256 over the scenario, the effective settings and the engine
/// version. Settings are hashed separately since callers may override the
/// ones stored in the scenario.
pub fn compute_run_id(scenario: &Scenario, settings: &SimOptions, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    let settings_json = serde_json::to_string(settings).unwrap_or_default();
    hasher.update(settings_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
