//! Scenario loading, saving, validation and introspection.

use std::collections::BTreeMap;
use std::path::Path;

use wt_network::dangling_pipes;
use wt_project::Scenario;
use wt_sim::SimOptions;

use crate::error::AppResult;

/// Overview of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub version: u32,
    /// Component ids grouped by kind name, in file order
    pub components_by_kind: BTreeMap<&'static str, Vec<String>>,
    pub pipe_count: usize,
    /// Pipes naming a component that does not exist
    pub dangling_pipe_count: usize,
    pub control_action_count: usize,
    pub conditional_action_count: usize,
    pub attack_count: usize,
    pub settings: SimOptions,
}

/// Load, migrate and validate a scenario (YAML or JSON by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    Ok(wt_project::load(path)?)
}

/// Save a scenario at the latest schema version.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    Ok(wt_project::save(path, scenario)?)
}

pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    Ok(wt_project::validate_scenario(scenario)?)
}

pub fn describe_scenario(scenario: &Scenario) -> ScenarioSummary {
    let mut components_by_kind: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for comp in &scenario.network.components {
        components_by_kind
            .entry(comp.kind.name())
            .or_default()
            .push(comp.id.clone());
    }

    let schedules = &scenario.schedules;
    ScenarioSummary {
        name: scenario.name.clone(),
        version: scenario.version,
        components_by_kind,
        pipe_count: scenario.network.pipes.len(),
        dangling_pipe_count: dangling_pipes(&scenario.network).len(),
        control_action_count: schedules.control_actions.len(),
        conditional_action_count: schedules.conditional_actions.len(),
        attack_count: schedules.attack_scenarios.len(),
        settings: scenario.simulation_settings,
    }
}
