//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};
use wt_results::{RunManifest, RunStore, StepRecord, compute_run_id};
use wt_sim::SimOptions;

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};
use crate::scenario_service;

/// Engine version folded into run ids, so upgrades miss the cache.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-run replacements for the scenario's own settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsOverrides {
    pub duration: Option<f64>,
    pub time_step: Option<f64>,
    pub ambient_temp: Option<f64>,
}

impl SettingsOverrides {
    pub fn apply(&self, base: SimOptions) -> SimOptions {
        SimOptions {
            duration: self.duration.unwrap_or(base.duration),
            time_step: self.time_step.unwrap_or(base.time_step),
            ambient_temp: self.ambient_temp.unwrap_or(base.ambient_temp),
        }
    }
}

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
    pub overrides: SettingsOverrides,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
            overrides: SettingsOverrides::default(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    pub options: RunOptions,
}

/// Wall-clock timing of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub load_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_stage(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run, reporting stages and finished ticks.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_stage(&mut progress_cb, RunStage::LoadingScenario, started, "Loading scenario");
    let scenario = scenario_service::load_scenario(request.scenario_path)?;
    let settings = request.options.overrides.apply(scenario.simulation_settings);
    settings.validate()?;
    timing.load_time_s = started.elapsed().as_secs_f64();

    emit_stage(&mut progress_cb, RunStage::CheckingCache, started, "Checking run cache");
    let run_id = compute_run_id(&scenario, &settings, &request.options.engine_version);
    let store = RunStore::for_scenario(request.scenario_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_stage(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        debug!(run_id = %run_id, "run loaded from cache");

        emit_stage(&mut progress_cb, RunStage::Completed, started, "Loaded cached run");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_stage(&mut progress_cb, RunStage::Simulating, started, "Simulating");
    let sim_started = Instant::now();
    let output = wt_sim::run_with_progress(
        &scenario.network,
        &scenario.schedules,
        &settings,
        |p| {
            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(RunProgressEvent {
                    stage: RunStage::Simulating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    sim: Some(*p),
                });
            }
        },
    )?;
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();

    emit_stage(&mut progress_cb, RunStage::SavingResults, started, "Saving results");
    let save_started = Instant::now();
    let manifest = RunManifest::stamped(
        run_id.clone(),
        &scenario.name,
        settings,
        output.results.len(),
        &request.options.engine_version,
    );
    store.save_run(&manifest, &output.results)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        run_id = %run_id,
        rows = output.results.len(),
        seconds = timing.total_time_s,
        "run completed"
    );
    emit_stage(&mut progress_cb, RunStage::Completed, started, "Run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// List stored runs of the scenario at `scenario_path`, most recent first.
pub fn list_runs(scenario_path: &Path) -> AppResult<Vec<RunManifest>> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let store = RunStore::for_scenario(scenario_path)?;

    let mut runs = store.list_runs(&scenario.name)?;
    runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(scenario_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<StepRecord>)> {
    let store = RunStore::for_scenario(scenario_path)?;
    if !store.has_run(run_id) {
        return Err(AppError::RunNotFound(run_id.to_string()));
    }

    let manifest = store.load_manifest(run_id)?;
    let rows = store.load_rows(run_id)?;
    Ok((manifest, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let base = SimOptions::default();
        let overrides = SettingsOverrides {
            duration: Some(30.0),
            ..Default::default()
        };
        let opts = overrides.apply(base);
        assert_eq!(opts.duration, 30.0);
        assert_eq!(opts.time_step, base.time_step);
        assert_eq!(opts.ambient_temp, base.ambient_temp);
    }
}
