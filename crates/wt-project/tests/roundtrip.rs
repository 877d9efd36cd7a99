use std::path::{Path, PathBuf};

use wt_controls::{ActionKind, AttackKind};
use wt_network::{Component, ComponentKind, Network, Pipe, Pump, Tank};
use wt_project::{
    LATEST_VERSION, ProjectError, Scenario, ValidationError, from_json_str, from_yaml_str, load,
    load_yaml, save, save_yaml, validate_scenario,
};

fn demos() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(name)
}

fn simple_scenario() -> Scenario {
    let network = Network {
        components: vec![
            Component::tank(
                "t1",
                Tank {
                    water_amount: 3.0,
                    radius: Some(1.0),
                    max_level: Some(5.0),
                    ..Default::default()
                },
            ),
            Component::pump(
                "p1",
                Pump {
                    power: 40.0,
                    max_flow_rate: Some(0.5),
                    curve: Some(vec![5.0, -2.0, 0.0]),
                    ..Default::default()
                },
            ),
            Component::tank("t2", Tank::default()).with_elevation(1.5),
        ],
        pipes: vec![
            Pipe::new("t1", "p1").with_hazen_k(1.5, 1.852),
            Pipe::new("p1", "t2").with_darcy(0.02, 10.0, 0.1),
        ],
    };
    Scenario::new("Simple", network)
}

#[test]
fn roundtrip_yaml_empty_scenario() {
    let scenario = Scenario::new("Empty", Network::default());
    validate_scenario(&scenario).unwrap();

    let path = temp_path("wt_project_roundtrip_empty.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_yaml_simple_scenario() {
    let scenario = simple_scenario();
    let path = temp_path("wt_project_roundtrip_simple.yaml");
    save(&path, &scenario).unwrap();
    assert_eq!(load(&path).unwrap(), scenario);
}

#[test]
fn roundtrip_json_simple_scenario() {
    let scenario = simple_scenario();
    let path = temp_path("wt_project_roundtrip_simple.json");
    save(&path, &scenario).unwrap();
    assert_eq!(load(&path).unwrap(), scenario);
}

#[test]
fn unknown_extension_rejected() {
    let err = load(Path::new("scenario.txt")).unwrap_err();
    assert!(matches!(err, ProjectError::Serialization(_)));
}

#[test]
fn demo_scenarios_load_and_validate() {
    for name in ["two_tank.yaml", "legacy_editor.json"] {
        let scenario =
            load(&demos().join(name)).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        assert_eq!(scenario.version, LATEST_VERSION);
        validate_scenario(&scenario).unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn legacy_export_is_migrated() {
    let scenario = load(&demos().join("legacy_editor.json")).unwrap();
    let valve = scenario.network.component("v1").unwrap();
    match &valve.kind {
        ComponentKind::Valve(v) => assert_eq!(v.opening, Some(0.0)),
        other => panic!("expected valve, got {}", other.name()),
    }
    let tank = scenario.network.component("t1").and_then(|c| c.as_tank()).unwrap();
    assert_eq!(tank.water_amount, 4.0);
    assert_eq!(scenario.simulation_settings.ambient_temp, 18.0);
    assert!(matches!(
        scenario.schedules.attack_scenarios[0].kind,
        AttackKind::PhysicalDamage { .. }
    ));
}

#[test]
fn settings_default_when_missing() {
    let scenario = from_json_str(r#"{ "version": 2, "network": { "components": [] } }"#).unwrap();
    assert_eq!(scenario.simulation_settings.duration, 600.0);
    assert_eq!(scenario.simulation_settings.ambient_temp, 20.0);
    assert_eq!(scenario.simulation_settings.time_step, 1.0);
    assert!(scenario.schedules.is_empty());
}

#[test]
fn schedules_parse_from_yaml() {
    let yaml = r#"
version: 2
name: rules
network:
  components:
    - { id: t, type: tank, waterAmount: 1 }
    - { id: p, type: pump }
  pipes: []
controlActions:
  - { time: 5, componentId: p, actionType: set_pump_power, params: { power: 75 } }
conditionalActions:
  - source: { componentId: t, value: waterLevel }
    condition: { operator: "<", threshold: 0.5 }
    target: { componentId: p, actionType: emergency_stop }
"#;
    let scenario = from_yaml_str(yaml).unwrap();
    assert_eq!(scenario.schedules.control_actions.len(), 1);
    assert_eq!(
        scenario.schedules.conditional_actions[0].target.action_type,
        ActionKind::EmergencyStop
    );
}

#[test]
fn wrong_target_kind_rejected_on_load() {
    let yaml = r#"
version: 2
network:
  components:
    - { id: v, type: valve }
controlActions:
  - { time: 0, componentId: v, actionType: set_pump_power, params: { power: "50" } }
"#;
    let err = from_yaml_str(yaml).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::Unsupported { .. })
    ));
}

#[test]
fn missing_attack_target_rejected_on_load() {
    let json = r#"{
        "version": 2,
        "network": { "components": [ { "id": "t", "type": "tank" } ] },
        "attackScenarios": [ { "time": 1, "type": "physical_damage", "componentId": "ghost", "damageType": "leak" } ]
    }"#;
    let err = from_json_str(json).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn newer_version_rejected_on_load() {
    let err = from_json_str(r#"{ "version": 7, "network": {} }"#).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::UnsupportedVersion { version: 7 })
    ));
}
