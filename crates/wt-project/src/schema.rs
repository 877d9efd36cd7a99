//! Scenario file schema.
//!
//! A scenario is one complete system: the network, its schedules and the
//! run settings. Field names follow the editor's camelCase JSON, and keys
//! the engine does not use (names, layout positions) are ignored on load.

use serde::{Deserialize, Serialize};
use wt_controls::Schedules;
use wt_network::Network;
use wt_sim::SimOptions;

/// Legacy files without a version field are treated as version 1.
fn legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub network: Network,
    #[serde(flatten)]
    pub schedules: Schedules,
    #[serde(default)]
    pub simulation_settings: SimOptions,
}

impl Scenario {
    /// A new scenario at the latest schema version with default settings.
    pub fn new(name: impl Into<String>, network: Network) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            network,
            schedules: Schedules::default(),
            simulation_settings: SimOptions::default(),
        }
    }
}
