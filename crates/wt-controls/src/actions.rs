//! Control commands on pumps and valves.

use tracing::{debug, trace};

use wt_components::{ValveCommand, set_valve_flow};
use wt_core::clamp_or_low;
use wt_network::{Component, ComponentKind, Network};

use crate::params::{Params, finite_param};
use crate::schedule::{ActionKind, ControlAction};

/// Pump power limits (percent).
pub const POWER_MIN: f64 = 0.0;
pub const POWER_MAX: f64 = 100.0;

fn clamp_power(v: f64) -> f64 {
    clamp_or_low(v, POWER_MIN, POWER_MAX)
}

/// Apply one command to a component.
///
/// Returns `false` when nothing changed because the component is stuck or
/// the command does not fit its kind.
pub fn apply_command(comp: &mut Component, kind: ActionKind, params: &Params) -> bool {
    if comp.stuck {
        trace!(component = %comp.id, action = kind.name(), "component stuck, command ignored");
        return false;
    }

    match (kind, &mut comp.kind) {
        (ActionKind::SetPumpPower, ComponentKind::Pump(p)) => {
            p.power = clamp_power(finite_param(params, "power", 0.0));
        }
        (ActionKind::EmergencyStop, ComponentKind::Pump(p)) => p.power = 0.0,
        (ActionKind::ReducePower, ComponentKind::Pump(p)) => {
            p.power = clamp_power(p.power - finite_param(params, "power", 50.0));
        }
        (ActionKind::IncreasePower, ComponentKind::Pump(p)) => {
            p.power = clamp_power(p.power + finite_param(params, "power", 100.0));
        }
        (ActionKind::SetValveState, ComponentKind::Valve(v)) => {
            let raw = params.get("state").map(|s| s.as_text()).unwrap_or_default();
            ValveCommand::parse(&raw).apply(v);
        }
        (ActionKind::SetValveFlow, ComponentKind::Valve(v)) => {
            set_valve_flow(v, finite_param(params, "flowRate", 0.0));
        }
        (ActionKind::EmergencyClose, ComponentKind::Valve(v)) => v.close(),
        (kind, other) => {
            debug!(
                component = %comp.id,
                action = kind.name(),
                kind = other.name(),
                "command does not apply to component kind"
            );
            return false;
        }
    }
    true
}

/// Apply a scheduled control action. Rule-only kinds are ignored here.
pub fn apply_timed_control(network: &mut Network, action: &ControlAction) -> bool {
    if !action.action_type.is_timed() {
        debug!(action = action.action_type.name(), "not a timed action, ignored");
        return false;
    }
    let Some(comp) = network.component_mut(&action.component_id) else {
        debug!(component = %action.component_id, "control action target missing");
        return false;
    };
    apply_command(comp, action.action_type, &action.params)
}
