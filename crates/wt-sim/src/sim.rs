//! Tick loop and run entry points.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wt_controls::{
    Schedules, apply_attack, apply_conditional_actions, apply_timed_control,
    clear_expired_poisoning, validate_schedules,
};
use wt_network::{Network, NetworkIndex, validate_network};

use crate::error::{SimError, SimResult};
use crate::record::{StepRecord, record_step};
use crate::tanks::{TankSnapshot, apply_tank_kinetics, update_tanks};
use crate::transfers::{apply_passive_flows, apply_pump_transfers};

/// Hydraulic passes per tick when tanks are piped directly to each other.
pub const MAX_RELAXATION_PASSES: usize = 3;

/// Volume change per second below which a relaxation pass counts as settled.
pub const RELAXATION_TOLERANCE: f64 = 1e-2;

/// Slack when counting ticks, so `duration / time_step` landing a hair
/// under an integer still includes the last tick.
const TICK_COUNT_SLACK: f64 = 1e-9;

/// Upper bound on rows reserved up front; longer runs grow the buffer.
const MAX_PREALLOCATED_ROWS: usize = 1 << 16;

/// Run settings, stored in scenario files as `simulationSettings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimOptions {
    /// Simulated span (seconds)
    pub duration: f64,
    /// Temperature tanks relax toward (°C)
    pub ambient_temp: f64,
    /// Fixed step (seconds)
    pub time_step: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            duration: 600.0,
            ambient_temp: 20.0,
            time_step: 1.0,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "time_step must be finite and positive",
            });
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(SimError::InvalidArg {
                what: "duration must be finite and non-negative",
            });
        }
        if !self.ambient_temp.is_finite() {
            return Err(SimError::InvalidArg {
                what: "ambient_temp must be finite",
            });
        }
        Ok(())
    }

    /// Number of recorded ticks, `t = 0` included.
    pub fn tick_count(&self) -> usize {
        ((self.duration / self.time_step + TICK_COUNT_SLACK).floor() as usize).saturating_add(1)
    }

    /// Time of tick `k`.
    pub fn tick_time(&self, k: usize) -> f64 {
        k as f64 * self.time_step
    }
}

/// Progress report passed to [`run_with_progress`] after each tick.
#[derive(Debug, Clone, Copy)]
pub struct SimProgress {
    /// Ticks finished so far
    pub tick: usize,
    pub total_ticks: usize,
    /// Time of the finished tick
    pub time: f64,
}

/// Result of a run: the evolved network and one row per tick.
#[derive(Debug, Clone)]
pub struct SimOutput {
    pub final_network: Network,
    pub results: Vec<StepRecord>,
}

/// Per-run state shared by every tick.
#[derive(Debug)]
pub struct Stepper<'a> {
    index: NetworkIndex,
    schedules: &'a Schedules,
    opts: SimOptions,
    passes: usize,
}

impl<'a> Stepper<'a> {
    pub fn new(network: &Network, schedules: &'a Schedules, opts: SimOptions) -> Self {
        let index = NetworkIndex::build(network);
        let passes = if needs_relaxation(network, &index) {
            MAX_RELAXATION_PASSES
        } else {
            1
        };
        Self {
            index,
            schedules,
            opts,
            passes,
        }
    }

    /// Hydraulic passes this network gets per tick.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Advance `network` through the tick at time `t` and record it.
    ///
    /// Order: timed controls, attacks, rules, poisoning expiry, hydraulics
    /// (pumps, passive flow, tank update), kinetics, record. `network` must
    /// be the one this stepper was built from.
    pub fn step(&self, network: &mut Network, t: f64) -> SimResult<StepRecord> {
        if !self.index.fits(network) {
            return Err(SimError::InvalidArg {
                what: "network does not match the one the stepper was built from",
            });
        }
        let dt = self.opts.time_step;

        for action in self.schedules.controls_at(t) {
            apply_timed_control(network, action);
        }
        let fired = self.schedules.attacks_at(t);
        for attack in &fired {
            apply_attack(network, attack);
        }
        apply_conditional_actions(network, &self.schedules.conditional_actions, t);
        clear_expired_poisoning(network, t);

        self.hydraulics(network, dt);
        apply_tank_kinetics(network, dt);

        Ok(record_step(network, t, &fired))
    }

    fn hydraulics(&self, network: &mut Network, dt: f64) {
        let ambient = self.opts.ambient_temp;
        let tolerance = RELAXATION_TOLERANCE * dt;
        let start = TankSnapshot::take(network);

        for pass in 0..self.passes {
            apply_pump_transfers(network, &self.index, dt);
            apply_passive_flows(network, &self.index, dt);
            update_tanks(network, ambient, dt);

            let change = start.max_volume_change(network);
            if change < tolerance {
                break;
            }
            if pass + 1 < self.passes {
                debug!(pass, change, "relaxation pass not settled, retrying");
                start.restore(network);
                update_tanks(network, ambient, 0.0);
            }
        }
    }
}

/// Whether tanks exchange water directly, which calls for repeated passes.
fn needs_relaxation(network: &Network, index: &NetworkIndex) -> bool {
    if network.tank_ids().len() <= 1 {
        return false;
    }
    index.pipe_ids().any(|p| match index.ends(p) {
        (Some(a), Some(b)) => {
            network.component_at(a).as_tank().is_some() && network.component_at(b).as_tank().is_some()
        }
        _ => false,
    })
}

fn warn_late_schedules(schedules: &Schedules, opts: &SimOptions) {
    let late = |time: f64| time > opts.duration;
    for a in schedules.control_actions.iter().filter(|a| late(a.time)) {
        warn!(time = a.time, component = %a.component_id, "control action scheduled after end of run");
    }
    for a in schedules.attack_scenarios.iter().filter(|a| late(a.time)) {
        warn!(time = a.time, component = %a.component_id, "attack scheduled after end of run");
    }
}

fn row_buffer(total_ticks: usize) -> Vec<StepRecord> {
    Vec::with_capacity(total_ticks.min(MAX_PREALLOCATED_ROWS))
}

/// Run a copy of `network` for `opts.duration` seconds.
pub fn run(network: &Network, schedules: &Schedules, opts: &SimOptions) -> SimResult<SimOutput> {
    run_with_progress(network, schedules, opts, |_| {})
}

/// Like [`run`], reporting each finished tick to `on_tick`.
pub fn run_with_progress<F>(
    network: &Network,
    schedules: &Schedules,
    opts: &SimOptions,
    mut on_tick: F,
) -> SimResult<SimOutput>
where
    F: FnMut(&SimProgress),
{
    opts.validate()?;
    warn_late_schedules(schedules, opts);

    let mut state = network.clone();
    let stepper = Stepper::new(&state, schedules, *opts);
    let total_ticks = opts.tick_count();
    info!(
        ticks = total_ticks,
        components = state.components.len(),
        pipes = state.pipes.len(),
        passes = stepper.passes(),
        "simulation started"
    );

    let mut results = row_buffer(total_ticks);
    for k in 0..total_ticks {
        let t = opts.tick_time(k);
        results.push(stepper.step(&mut state, t)?);
        on_tick(&SimProgress {
            tick: k + 1,
            total_ticks,
            time: t,
        });
    }

    info!(
        ticks = results.len(),
        volume = state.total_tank_volume(),
        "simulation finished"
    );
    Ok(SimOutput {
        final_network: state,
        results,
    })
}

/// Check a loaded scenario, then run it with its own settings.
pub fn run_scenario(network: &Network, schedules: &Schedules, settings: &SimOptions) -> SimResult<SimOutput> {
    settings.validate()?;
    validate_network(network)?;
    validate_schedules(network, schedules)?;
    run(network, schedules, settings)
}
