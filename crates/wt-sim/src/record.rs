//! Flat per-tick output rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wt_controls::{AttackScenario, Readout, describe_attack};
use wt_network::Network;

/// One row of run output: `time`, `<id>_<field>` values, and the labels of
/// attacks that fired on this tick.
///
/// A `<id>_<field>_reported` entry appears only while a poisoning override
/// makes the observed value differ from the true one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub time: f64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
    #[serde(default)]
    pub active_attacks: String,
}

impl StepRecord {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Observed value of `key`: the reported entry if present, else the
    /// true one.
    pub fn reported(&self, key: &str) -> Option<f64> {
        self.values
            .get(&format!("{key}_reported"))
            .or_else(|| self.values.get(key))
            .copied()
    }
}

/// Snapshot every component's numeric state at time `t`.
pub fn record_step(network: &Network, t: f64, fired: &[&AttackScenario]) -> StepRecord {
    let mut values = BTreeMap::new();
    for comp in &network.components {
        comp.for_each_numeric(|key, actual| {
            values.insert(format!("{}_{key}", comp.id), actual);
            if let Some(seen) = comp.reported(key, t)
                && seen != actual
                && !seen.is_nan()
            {
                values.insert(format!("{}_{key}_reported", comp.id), seen);
            }
        });
    }

    let active_attacks = fired
        .iter()
        .map(|a| describe_attack(a))
        .collect::<Vec<_>>()
        .join("; ");

    StepRecord {
        time: t,
        values,
        active_attacks,
    }
}
