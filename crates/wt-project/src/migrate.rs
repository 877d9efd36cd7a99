//! Schema migration framework.
//!
//! Version 1 is the legacy editor format: valves carry only `isOpen`, and
//! a tank's `waterLevel` is its state. On migration the level replaces any
//! stored `waterAmount`, as the editor did on load. Version 0 is an alias
//! of version 1.

use tracing::debug;
use uom::si::area::square_meter;
use wt_components::cross_section_area;
use wt_network::ComponentKind;

use crate::ProjectError;
use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        1 => migrate_v1_to_v2(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    scenario.version = 1;
    Ok(scenario)
}

fn migrate_v1_to_v2(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    for comp in &mut scenario.network.components {
        match &mut comp.kind {
            ComponentKind::Valve(v) => {
                if v.opening.is_none()
                    && let Some(open) = v.is_open
                {
                    v.opening = Some(if open { 1.0 } else { 0.0 });
                }
            }
            ComponentKind::Tank(t) => {
                t.water_amount = t.water_level * cross_section_area(t).get::<square_meter>();
                debug!(tank = %comp.id, volume = t.water_amount, "volume derived from level");
            }
            _ => {}
        }
    }

    scenario.version = 2;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_network::{Component, Network, Tank, TankShape, Valve};

    fn legacy(components: Vec<Component>) -> Scenario {
        let mut s = Scenario::new("legacy", Network {
            components,
            pipes: vec![],
        });
        s.version = 1;
        s
    }

    #[test]
    fn migrate_latest_is_noop() {
        let scenario = Scenario::new("current", Network::default());
        let migrated = migrate_to_latest(scenario.clone()).unwrap();
        assert_eq!(migrated, scenario);
    }

    #[test]
    fn valve_opening_from_flag() {
        let closed = Component::valve(
            "v1",
            Valve {
                is_open: Some(false),
                ..Default::default()
            },
        );
        let partial = Component::valve(
            "v2",
            Valve {
                opening: Some(0.4),
                is_open: Some(true),
                ..Default::default()
            },
        );
        let migrated = migrate_to_latest(legacy(vec![closed, partial])).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        let opening = |i: usize| match &migrated.network.components[i].kind {
            ComponentKind::Valve(v) => v.opening,
            _ => None,
        };
        assert_eq!(opening(0), Some(0.0));
        assert_eq!(opening(1), Some(0.4));
    }

    #[test]
    fn tank_volume_from_level() {
        let tank = Component::tank(
            "t",
            Tank {
                water_level: 2.0,
                shape: TankShape::Rectangular,
                width: Some(2.0),
                height: Some(3.0),
                ..Default::default()
            },
        );
        let mut v0 = legacy(vec![tank]);
        v0.version = 0;
        let migrated = migrate_to_latest(v0).unwrap();
        let amount = migrated.network.components[0].as_tank().map(|t| t.water_amount);
        assert_eq!(amount, Some(12.0));
    }

    #[test]
    fn legacy_level_replaces_stored_volume() {
        let tank = |level: f64| {
            Component::tank(
                "t",
                Tank {
                    water_level: level,
                    water_amount: 1.0,
                    ..Default::default()
                },
            )
        };
        let migrated = migrate_to_latest(legacy(vec![tank(2.0), tank(0.0)])).unwrap();
        let amount = |i: usize| migrated.network.components[i].as_tank().map(|t| t.water_amount);
        assert_eq!(amount(0), Some(2.0 * std::f64::consts::PI));
        assert_eq!(amount(1), Some(0.0));
    }

    #[test]
    fn current_version_volume_is_authoritative() {
        let tank = Component::tank(
            "t",
            Tank {
                water_level: 2.0,
                water_amount: 1.0,
                ..Default::default()
            },
        );
        let scenario = Scenario::new("current", Network {
            components: vec![tank],
            pipes: vec![],
        });
        let migrated = migrate_to_latest(scenario).unwrap();
        let amount = migrated.network.components[0].as_tank().map(|t| t.water_amount);
        assert_eq!(amount, Some(1.0));
    }
}
