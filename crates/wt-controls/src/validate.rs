//! Load-time checks for schedules against a network.

use wt_network::{Component, ComponentKind, Network};

use crate::error::{ControlError, ControlResult};
use crate::params::Params;
use crate::schedule::{ActionKind, AttackKind, Schedules};
use wt_components::ValveCommand;

fn check_time(time: f64, context: &str) -> ControlResult<()> {
    if !time.is_finite() || time < 0.0 {
        return Err(ControlError::InvalidParam {
            context: context.to_string(),
            param: "time",
            value: time.to_string(),
        });
    }
    Ok(())
}

fn lookup<'a>(network: &'a Network, id: &str, context: &str) -> ControlResult<&'a Component> {
    network
        .component(id)
        .ok_or_else(|| ControlError::UnknownComponent {
            id: id.to_string(),
            context: context.to_string(),
        })
}

fn expect_kind(comp: &Component, expected: &'static str, context: &str) -> ControlResult<()> {
    let found = comp.kind.name();
    let ok = match expected {
        "tank or source" => matches!(comp.kind, ComponentKind::Tank(_) | ComponentKind::Source(_)),
        other => found == other,
    };
    if ok {
        Ok(())
    } else {
        Err(ControlError::WrongKind {
            id: comp.id.clone(),
            context: context.to_string(),
            expected,
            found,
        })
    }
}

fn check_number(params: &Params, key: &'static str, context: &str) -> ControlResult<()> {
    if let Some(v) = params.get(key) {
        match v.as_number() {
            Some(n) if n.is_finite() => {}
            _ => {
                return Err(ControlError::InvalidParam {
                    context: context.to_string(),
                    param: key,
                    value: v.as_text(),
                });
            }
        }
    }
    Ok(())
}

fn check_params(kind: ActionKind, params: &Params, context: &str) -> ControlResult<()> {
    match kind {
        ActionKind::SetPumpPower | ActionKind::ReducePower | ActionKind::IncreasePower => {
            check_number(params, "power", context)
        }
        ActionKind::SetValveFlow => check_number(params, "flowRate", context),
        ActionKind::SetValveState => {
            let raw = params.get("state").map(|v| v.as_text()).unwrap_or_default();
            if raw.is_empty() || ValveCommand::parse(&raw) == ValveCommand::Unchanged {
                return Err(ControlError::InvalidParam {
                    context: context.to_string(),
                    param: "state",
                    value: raw,
                });
            }
            Ok(())
        }
        ActionKind::EmergencyStop | ActionKind::EmergencyClose => Ok(()),
    }
}

fn invalid_attack(context: &str, what: impl Into<String>) -> ControlError {
    ControlError::InvalidAttack {
        context: context.to_string(),
        what: what.into(),
    }
}

fn finite(v: Option<f64>) -> bool {
    v.is_none_or(f64::is_finite)
}

/// Check every schedule entry against the network.
///
/// Reports the first problem: unknown ids, wrong target kinds, unparsable
/// parameters and incomplete attack records.
pub fn validate_schedules(network: &Network, schedules: &Schedules) -> ControlResult<()> {
    for (i, action) in schedules.control_actions.iter().enumerate() {
        let context = format!("controlActions[{i}]");
        check_time(action.time, &context)?;
        if !action.action_type.is_timed() {
            return Err(ControlError::InvalidParam {
                context,
                param: "actionType",
                value: action.action_type.name().to_string(),
            });
        }
        let comp = lookup(network, &action.component_id, &context)?;
        expect_kind(comp, action.action_type.target_kind(), &context)?;
        check_params(action.action_type, &action.params, &context)?;
    }

    for (i, rule) in schedules.conditional_actions.iter().enumerate() {
        let context = match &rule.id {
            Some(id) => format!("conditionalActions[{i}] ({id})"),
            None => format!("conditionalActions[{i}]"),
        };
        lookup(network, &rule.source.component_id, &context)?;
        if rule.source.value.trim().is_empty() {
            return Err(ControlError::InvalidParam {
                context,
                param: "source.value",
                value: rule.source.value.clone(),
            });
        }
        if !rule.condition.threshold.is_finite() {
            return Err(ControlError::InvalidParam {
                context,
                param: "threshold",
                value: rule.condition.threshold.to_string(),
            });
        }
        let target = lookup(network, &rule.target.component_id, &context)?;
        expect_kind(target, rule.target.action_type.target_kind(), &context)?;
        check_params(rule.target.action_type, &rule.target.params, &context)?;
    }

    for (i, attack) in schedules.attack_scenarios.iter().enumerate() {
        let context = format!("attackScenarios[{i}]");
        check_time(attack.time, &context)?;
        let comp = lookup(network, &attack.component_id, &context)?;
        match &attack.kind {
            AttackKind::ChemicalDosing {
                chemical_type,
                amount,
            } => {
                expect_kind(comp, "tank or source", &context)?;
                if chemical_type.is_none() {
                    return Err(invalid_attack(&context, "chemical_dosing needs chemicalType"));
                }
                if !finite(*amount) {
                    return Err(invalid_attack(&context, "dose amount must be finite"));
                }
            }
            AttackKind::ChemicalInterference { chemical, amount } => {
                expect_kind(comp, "tank or source", &context)?;
                if chemical.is_none() {
                    return Err(invalid_attack(&context, "chemical_interference needs chemical"));
                }
                if amount.is_none() || !finite(*amount) {
                    return Err(invalid_attack(&context, "interference amount must be finite"));
                }
            }
            AttackKind::PhysicalDamage { damage_type } => {
                let Some(damage) = damage_type else {
                    return Err(invalid_attack(&context, "physical_damage needs damageType"));
                };
                expect_kind(comp, damage.target_kind(), &context)?;
            }
            AttackKind::DataPoisoning {
                poison_type,
                value,
                duration,
            } => {
                if poison_type.as_deref().is_none_or(|k| k.trim().is_empty()) {
                    return Err(invalid_attack(&context, "data_poisoning needs poisonType"));
                }
                if value.is_none() || !finite(*value) {
                    return Err(invalid_attack(&context, "poisoned value must be finite"));
                }
                if !finite(*duration) || duration.is_some_and(|d| d < 0.0) {
                    return Err(invalid_attack(&context, "duration must be finite and >= 0"));
                }
            }
        }
    }

    Ok(())
}
