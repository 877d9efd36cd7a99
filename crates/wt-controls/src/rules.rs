//! Conditional rules.

use serde::{Deserialize, Serialize};
use tracing::debug;

use wt_network::Network;

use crate::actions::apply_command;
use crate::poisoning::get_current_value;
use crate::schedule::ConditionalRule;

/// Comparison between a sensor value and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "==", alias = "=")]
    Equal,
}

impl Operator {
    /// Evaluate against a possibly missing value. A missing value never
    /// satisfies any operator.
    pub fn holds(self, value: Option<f64>, threshold: f64) -> bool {
        match self {
            Operator::GreaterThan => value.unwrap_or(f64::NEG_INFINITY) > threshold,
            Operator::LessThan => value.unwrap_or(f64::INFINITY) < threshold,
            Operator::Equal => value == Some(threshold),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Equal => "==",
        }
    }
}

/// Evaluate every rule at time `t` and apply the targets of those that hold.
///
/// Rules run in order, so a later rule sees the effects of an earlier one.
/// Returns the number of rules whose target changed.
pub fn apply_conditional_actions(network: &mut Network, rules: &[ConditionalRule], t: f64) -> usize {
    let mut fired = 0;
    for rule in rules {
        let Some(source) = network.component(&rule.source.component_id) else {
            continue;
        };
        let value = get_current_value(source, &rule.source.value, t);
        if !rule.condition.operator.holds(value, rule.condition.threshold) {
            continue;
        }

        let Some(target) = network.component_mut(&rule.target.component_id) else {
            continue;
        };
        if apply_command(target, rule.target.action_type, &rule.target.params) {
            debug!(
                t,
                source = %rule.source.component_id,
                key = %rule.source.value,
                op = rule.condition.operator.symbol(),
                threshold = rule.condition.threshold,
                target = %rule.target.component_id,
                action = rule.target.action_type.name(),
                "rule fired"
            );
            fired += 1;
        }
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use crate::schedule::{ActionKind, RuleCondition, RuleSource, RuleTarget};
    use proptest::prelude::*;
    use wt_network::{Component, PoisonedReading, Pump, Tank};

    fn rule(key: &str, operator: Operator, threshold: f64, action: ActionKind) -> ConditionalRule {
        ConditionalRule {
            id: None,
            source: RuleSource {
                component_id: "t".into(),
                value: key.into(),
            },
            condition: RuleCondition {
                operator,
                threshold,
            },
            target: RuleTarget {
                component_id: "p".into(),
                action_type: action,
                params: Params::new(),
            },
        }
    }

    fn network(level: f64) -> Network {
        Network {
            components: vec![
                Component::tank(
                    "t",
                    Tank {
                        water_level: level,
                        ..Default::default()
                    },
                ),
                Component::pump(
                    "p",
                    Pump {
                        power: 80.0,
                        ..Default::default()
                    },
                ),
            ],
            pipes: vec![],
        }
    }

    fn power(n: &Network) -> f64 {
        n.components[1].as_pump().unwrap().power
    }

    #[test]
    fn fires_when_condition_holds() {
        let mut n = network(5.0);
        let rules = [rule("waterLevel", Operator::GreaterThan, 4.0, ActionKind::EmergencyStop)];
        assert_eq!(apply_conditional_actions(&mut n, &rules, 0.0), 1);
        assert_eq!(power(&n), 0.0);
    }

    #[test]
    fn missing_value_is_false_safe() {
        let mut n = network(5.0);
        let rules = [
            rule("ph", Operator::GreaterThan, -1e9, ActionKind::EmergencyStop),
            rule("ph", Operator::LessThan, 1e9, ActionKind::EmergencyStop),
            rule("ph", Operator::Equal, 0.0, ActionKind::EmergencyStop),
        ];
        assert_eq!(apply_conditional_actions(&mut n, &rules, 0.0), 0);
        assert_eq!(power(&n), 80.0);
    }

    #[test]
    fn reads_poisoned_value() {
        let mut n = network(1.0);
        n.components[0].poisoned_readings.insert(
            "waterLevel".into(),
            PoisonedReading {
                value: 9.0,
                start_time: Some(0.0),
                end_time: Some(5.0),
            },
        );
        let rules = [rule("waterLevel", Operator::GreaterThan, 4.0, ActionKind::EmergencyStop)];
        apply_conditional_actions(&mut n, &rules, 3.0);
        assert_eq!(power(&n), 0.0);
        // the physical level is untouched
        assert_eq!(n.components[0].as_tank().unwrap().water_level, 1.0);
    }

    #[test]
    fn re_evaluated_every_call() {
        let mut n = network(5.0);
        let rules = [rule("waterLevel", Operator::GreaterThan, 4.0, ActionKind::ReducePower)];
        apply_conditional_actions(&mut n, &rules, 0.0);
        assert_eq!(power(&n), 30.0);
        apply_conditional_actions(&mut n, &rules, 1.0);
        assert_eq!(power(&n), 0.0);
    }

    #[test]
    fn operator_serde() {
        let op: Operator = serde_json::from_str(r#""==""#).unwrap();
        assert_eq!(op, Operator::Equal);
        assert_eq!(serde_json::to_string(&Operator::LessThan).unwrap(), r#""<""#);
    }

    proptest! {
        #[test]
        fn strict_comparisons(v in -1e6f64..1e6, th in -1e6f64..1e6) {
            prop_assert_eq!(Operator::GreaterThan.holds(Some(v), th), v > th);
            prop_assert_eq!(Operator::LessThan.holds(Some(v), th), v < th);
            prop_assert!(!Operator::GreaterThan.holds(None, th));
            prop_assert!(!Operator::LessThan.holds(None, th));
        }
    }
}
