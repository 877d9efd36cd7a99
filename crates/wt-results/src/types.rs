//! Result data types.

use serde::{Deserialize, Serialize};
use wt_sim::SimOptions;

pub use wt_sim::StepRecord;

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub settings: SimOptions,
    pub tick_count: usize,
    pub engine_version: String,
}

impl RunManifest {
    /// Manifest for a run finished now.
    pub fn stamped(
        run_id: RunId,
        scenario_name: impl Into<String>,
        settings: SimOptions,
        tick_count: usize,
        engine_version: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            scenario_name: scenario_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            settings,
            tick_count,
            engine_version: engine_version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamped_timestamp_is_rfc3339() {
        let m = RunManifest::stamped("abc".into(), "demo", SimOptions::default(), 601, "0.1.0");
        assert!(chrono::DateTime::parse_from_rfc3339(&m.timestamp).is_ok());
        assert_eq!(m.tick_count, 601);
    }
}
