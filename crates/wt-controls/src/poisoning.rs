//! Poisoning-aware sensor reads and override expiry.

use tracing::trace;
use wt_network::{Component, Network};

/// Read access to a component's sensor keys.
pub trait Readout {
    /// True physical value of `key`.
    fn actual(&self, key: &str) -> Option<f64>;

    /// Value an observer sees at time `t`: an active override if one is
    /// installed for `key`, else the true value.
    fn reported(&self, key: &str, t: f64) -> Option<f64>;
}

impl Readout for Component {
    fn actual(&self, key: &str) -> Option<f64> {
        self.numeric(key)
    }

    fn reported(&self, key: &str, t: f64) -> Option<f64> {
        match self.poisoned_readings.get(key) {
            Some(p) if p.is_active(t) => Some(p.value),
            _ => self.actual(key),
        }
    }
}

/// Value of `key` on `comp` as a rule sees it at time `t`.
pub fn get_current_value(comp: &Component, key: &str, t: f64) -> Option<f64> {
    comp.reported(key, t)
}

/// Drop overrides whose window closed before `t`. Returns how many went.
pub fn clear_expired_poisoning(network: &mut Network, t: f64) -> usize {
    let mut removed = 0;
    for comp in &mut network.components {
        let before = comp.poisoned_readings.len();
        comp.poisoned_readings.retain(|_, p| !p.is_expired(t));
        let gone = before - comp.poisoned_readings.len();
        if gone > 0 {
            trace!(component = %comp.id, count = gone, t, "poisoning expired");
        }
        removed += gone;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_network::{PoisonedReading, Tank};

    fn poisoned_tank() -> Component {
        let mut c = Component::tank(
            "t",
            Tank {
                water_level: 2.0,
                ..Default::default()
            },
        );
        c.poisoned_readings.insert(
            "waterLevel".into(),
            PoisonedReading {
                value: 9.0,
                start_time: Some(5.0),
                end_time: Some(10.0),
            },
        );
        c
    }

    #[test]
    fn reads_honour_window() {
        let c = poisoned_tank();
        assert_eq!(get_current_value(&c, "waterLevel", 4.0), Some(2.0));
        assert_eq!(get_current_value(&c, "waterLevel", 5.0), Some(9.0));
        assert_eq!(get_current_value(&c, "waterLevel", 10.0), Some(9.0));
        assert_eq!(get_current_value(&c, "waterLevel", 10.5), Some(2.0));
        assert_eq!(c.actual("waterLevel"), Some(2.0));
        assert_eq!(get_current_value(&c, "ph", 6.0), None);
    }

    #[test]
    fn override_without_base_value() {
        let mut c = Component::junction("j");
        c.poisoned_readings.insert(
            "pressure".into(),
            PoisonedReading {
                value: 3.0,
                start_time: None,
                end_time: None,
            },
        );
        assert_eq!(get_current_value(&c, "pressure", 1e9), Some(3.0));
    }

    #[test]
    fn expiry_is_strict() {
        let mut network = Network {
            components: vec![poisoned_tank()],
            pipes: vec![],
        };
        assert_eq!(clear_expired_poisoning(&mut network, 10.0), 0);
        assert_eq!(clear_expired_poisoning(&mut network, 10.000_1), 1);
        assert!(network.components[0].poisoned_readings.is_empty());
    }
}
