//! Schedule records: timed actions, conditional rules and attacks.

use serde::{Deserialize, Serialize};

use wt_core::{Tolerances, nearly_equal};
use wt_quality::Species;

use crate::params::Params;
use crate::rules::Operator;

/// What an action or rule target does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SetPumpPower,
    SetValveState,
    SetValveFlow,
    /// Rule-only: pump power to 0.
    EmergencyStop,
    /// Rule-only: valve fully closed.
    EmergencyClose,
    /// Rule-only: subtract `power` (default 50) from pump power.
    ReducePower,
    /// Rule-only: add `power` (default 100) to pump power.
    IncreasePower,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::SetPumpPower => "set_pump_power",
            ActionKind::SetValveState => "set_valve_state",
            ActionKind::SetValveFlow => "set_valve_flow",
            ActionKind::EmergencyStop => "emergency_stop",
            ActionKind::EmergencyClose => "emergency_close",
            ActionKind::ReducePower => "reduce_power",
            ActionKind::IncreasePower => "increase_power",
        }
    }

    /// Whether the kind may appear in the timed control schedule.
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            ActionKind::SetPumpPower | ActionKind::SetValveState | ActionKind::SetValveFlow
        )
    }

    /// Component kind the action applies to.
    pub fn target_kind(self) -> &'static str {
        match self {
            ActionKind::SetPumpPower
            | ActionKind::EmergencyStop
            | ActionKind::ReducePower
            | ActionKind::IncreasePower => "pump",
            ActionKind::SetValveState | ActionKind::SetValveFlow | ActionKind::EmergencyClose => {
                "valve"
            }
        }
    }
}

/// An operator command applied once at `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlAction {
    pub time: f64,
    pub component_id: String,
    pub action_type: ActionKind,
    #[serde(default)]
    pub params: Params,
}

/// Sensor read by a rule: a component and one of its numeric keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSource {
    pub component_id: String,
    /// Field name, e.g. `waterLevel` or `ph`.
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub operator: Operator,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTarget {
    pub component_id: String,
    pub action_type: ActionKind,
    #[serde(default)]
    pub params: Params,
}

/// `if source <op> threshold then target`, evaluated every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: RuleSource,
    pub condition: RuleCondition,
    pub target: RuleTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChemicalType {
    Acid,
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    PumpFailure,
    ValveStuck,
    Leak,
}

impl DamageType {
    pub fn name(self) -> &'static str {
        match self {
            DamageType::PumpFailure => "pump_failure",
            DamageType::ValveStuck => "valve_stuck",
            DamageType::Leak => "leak",
        }
    }

    pub fn target_kind(self) -> &'static str {
        match self {
            DamageType::PumpFailure => "pump",
            DamageType::ValveStuck => "valve",
            DamageType::Leak => "tank",
        }
    }
}

/// Attack payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttackKind {
    /// Shift pH by `amount` (default 1.5) down for acid, up for base.
    #[serde(rename_all = "camelCase")]
    ChemicalDosing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chemical_type: Option<ChemicalType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<f64>,
    },
    /// Add a signed `amount` to one dissolved species.
    ChemicalInterference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chemical: Option<Species>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    PhysicalDamage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damage_type: Option<DamageType>,
    },
    /// Override reads of `poisonType` with `value` for `duration` seconds.
    #[serde(rename_all = "camelCase")]
    DataPoisoning {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        poison_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
}

impl AttackKind {
    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::ChemicalDosing { .. } => "chemical_dosing",
            AttackKind::ChemicalInterference { .. } => "chemical_interference",
            AttackKind::PhysicalDamage { .. } => "physical_damage",
            AttackKind::DataPoisoning { .. } => "data_poisoning",
        }
    }
}

/// An attack applied once at `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackScenario {
    pub time: f64,
    pub component_id: String,
    #[serde(flatten)]
    pub kind: AttackKind,
}

/// All schedules of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedules {
    #[serde(default)]
    pub control_actions: Vec<ControlAction>,
    #[serde(default)]
    pub conditional_actions: Vec<ConditionalRule>,
    #[serde(default)]
    pub attack_scenarios: Vec<AttackScenario>,
}

fn due(time: f64, t: f64) -> bool {
    nearly_equal(time, t, Tolerances::SCHEDULE)
}

impl Schedules {
    pub fn is_empty(&self) -> bool {
        self.control_actions.is_empty()
            && self.conditional_actions.is_empty()
            && self.attack_scenarios.is_empty()
    }

    /// Control actions scheduled at tick time `t`, in file order.
    pub fn controls_at(&self, t: f64) -> Vec<&ControlAction> {
        self.control_actions.iter().filter(|a| due(a.time, t)).collect()
    }

    /// Attacks scheduled at tick time `t`, in file order.
    pub fn attacks_at(&self, t: f64) -> Vec<&AttackScenario> {
        self.attack_scenarios.iter().filter(|a| due(a.time, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_shapes() {
        let json = r#"{
            "controlActions": [
                { "time": 10, "componentId": "p1", "actionType": "set_pump_power", "params": { "power": "60" } }
            ],
            "conditionalActions": [
                { "source": { "componentId": "t1", "value": "waterLevel" },
                  "condition": { "operator": ">", "threshold": 4.5 },
                  "target": { "componentId": "p1", "actionType": "emergency_stop", "params": {} } }
            ],
            "attackScenarios": [
                { "time": 0, "type": "data_poisoning", "componentId": "t1", "poisonType": "waterLevel", "value": 9, "duration": 5 },
                { "time": 3, "type": "chemical_dosing", "componentId": "t1", "chemicalType": "acid", "amount": 2 },
                { "time": 3, "type": "chemical_interference", "componentId": "t1", "chemical": "BODn", "amount": -1 },
                { "time": 4, "type": "physical_damage", "componentId": "p1", "damageType": "pump_failure" }
            ]
        }"#;
        let s: Schedules = serde_json::from_str(json).unwrap();
        assert_eq!(s.control_actions[0].action_type, ActionKind::SetPumpPower);
        assert_eq!(s.conditional_actions[0].condition.operator, Operator::GreaterThan);
        assert_eq!(
            s.attack_scenarios[0].kind,
            AttackKind::DataPoisoning {
                poison_type: Some("waterLevel".into()),
                value: Some(9.0),
                duration: Some(5.0),
            }
        );
        assert_eq!(
            s.attack_scenarios[2].kind,
            AttackKind::ChemicalInterference {
                chemical: Some(Species::Bodn),
                amount: Some(-1.0),
            }
        );
        assert_eq!(s.attacks_at(3.0).len(), 2);
        assert_eq!(s.controls_at(10.0).len(), 1);

        let back: Schedules = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn schedule_match_tolerates_accumulated_time() {
        let s = Schedules {
            control_actions: vec![ControlAction {
                time: 0.3,
                component_id: "p".into(),
                action_type: ActionKind::SetPumpPower,
                params: Params::new(),
            }],
            ..Default::default()
        };
        let t = 0.1 + 0.1 + 0.1;
        assert_ne!(t, 0.3);
        assert_eq!(s.controls_at(t).len(), 1);
        assert!(s.controls_at(0.4).is_empty());
    }

    #[test]
    fn action_metadata() {
        assert!(ActionKind::SetValveFlow.is_timed());
        assert!(!ActionKind::EmergencyClose.is_timed());
        assert_eq!(ActionKind::ReducePower.target_kind(), "pump");
        assert_eq!(DamageType::Leak.target_kind(), "tank");
    }
}
