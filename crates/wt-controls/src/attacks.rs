//! Attack application and labelling.

use tracing::{debug, info};

use wt_core::clamp_or_low;
use wt_network::{ComponentKind, Network, PoisonedReading};
use wt_quality::{PH_MAX, PH_MIN};

use crate::schedule::{AttackKind, AttackScenario, ChemicalType, DamageType};

/// pH shift when a dosing attack gives no amount.
pub const DEFAULT_DOSE: f64 = 1.5;

/// Fraction of volume a tank keeps after a leak.
pub const LEAK_RETENTION: f64 = 0.95;

/// pH assumed for water that does not track it.
pub const NEUTRAL_PH: f64 = 7.0;

/// Apply an attack once. Returns `false` when it had no effect (missing
/// component, wrong kind, or incomplete record).
pub fn apply_attack(network: &mut Network, attack: &AttackScenario) -> bool {
    let Some(comp) = network.component_mut(&attack.component_id) else {
        debug!(component = %attack.component_id, "attack target missing");
        return false;
    };

    let applied = match &attack.kind {
        AttackKind::ChemicalDosing {
            chemical_type,
            amount,
        } => match (comp.water_mut(), chemical_type) {
            (Some(water), Some(ty)) => {
                let dose = amount.unwrap_or(DEFAULT_DOSE).max(0.0);
                let ph = water.ph.unwrap_or(NEUTRAL_PH);
                let shifted = match ty {
                    ChemicalType::Acid => ph - dose,
                    ChemicalType::Base => ph + dose,
                };
                water.ph = Some(clamp_or_low(shifted, PH_MIN, PH_MAX));
                true
            }
            _ => false,
        },

        AttackKind::ChemicalInterference { chemical, amount } => {
            match (comp.water_mut(), chemical) {
                (Some(water), Some(species)) => {
                    let slot = water.species_mut(*species);
                    let delta = amount.filter(|a| a.is_finite()).unwrap_or(0.0);
                    *slot = Some(species.clamp(slot.unwrap_or(0.0) + delta));
                    true
                }
                _ => false,
            }
        }

        AttackKind::PhysicalDamage { damage_type } => {
            let hit = match (damage_type, &mut comp.kind) {
                (Some(DamageType::PumpFailure), ComponentKind::Pump(p)) => {
                    p.power = 0.0;
                    p.efficiency = Some(0.0);
                    true
                }
                (Some(DamageType::ValveStuck), ComponentKind::Valve(v)) => {
                    v.close();
                    true
                }
                (Some(DamageType::Leak), ComponentKind::Tank(t)) => {
                    t.water_amount *= LEAK_RETENTION;
                    true
                }
                _ => false,
            };
            if hit {
                comp.stuck = true;
            }
            hit
        }

        AttackKind::DataPoisoning {
            poison_type,
            value,
            duration,
        } => match (poison_type, value) {
            (Some(key), Some(value)) => {
                // last write for a key wins, including within one tick
                comp.poisoned_readings.insert(
                    key.clone(),
                    PoisonedReading {
                        value: *value,
                        start_time: Some(attack.time),
                        end_time: Some(attack.time + duration.unwrap_or(0.0)),
                    },
                );
                true
            }
            _ => false,
        },
    };

    if applied {
        info!(t = attack.time, attack = %describe_attack(attack), "attack applied");
    } else {
        debug!(attack = %describe_attack(attack), "attack had no effect");
    }
    applied
}

/// Label for the output row: `type:component[detail]`.
pub fn describe_attack(attack: &AttackScenario) -> String {
    let base = format!("{}:{}", attack.kind.name(), attack.component_id);
    let detail = match &attack.kind {
        AttackKind::ChemicalDosing { chemical_type, .. } => chemical_type.map(|c| match c {
            ChemicalType::Acid => "acid".to_string(),
            ChemicalType::Base => "base".to_string(),
        }),
        AttackKind::ChemicalInterference { chemical, .. } => chemical.map(|s| s.label().to_string()),
        AttackKind::PhysicalDamage { damage_type } => damage_type.map(|d| d.name().to_string()),
        AttackKind::DataPoisoning { poison_type, .. } => poison_type.clone(),
    };
    match detail {
        Some(d) => format!("{base}[{d}]"),
        None => base,
    }
}
