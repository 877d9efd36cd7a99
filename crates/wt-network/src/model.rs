//! Component, pipe and network data model.
//!
//! Field names serialize in camelCase and match the scenario file format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wt_core::{CompId, PipeId, unit_clamp};
use wt_quality::{ChemistryProfile, DecayRates, WaterQuality};

/// Valve openings at or below this count as closed.
pub const CLOSED_OPENING: f64 = 1e-6;

fn is_false(v: &bool) -> bool {
    !*v
}

/// Override installed by a data-poisoning attack on one sensor key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoisonedReading {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl PoisonedReading {
    /// Whether the override applies at time `t` (window bounds inclusive).
    pub fn is_active(&self, t: f64) -> bool {
        self.start_time.is_none_or(|s| t >= s) && self.end_time.is_none_or(|e| t <= e)
    }

    /// Whether the window has closed before `t`.
    pub fn is_expired(&self, t: f64) -> bool {
        self.end_time.is_some_and(|e| t > e)
    }
}

/// A network element: shared envelope plus kind-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_elevation: Option<f64>,
    /// Set by physical damage; blocks control actions and rules for the run.
    #[serde(default, skip_serializing_if = "is_false")]
    pub stuck: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub poisoned_readings: BTreeMap<String, PoisonedReading>,
    /// Extra numeric readings, read and reported like built-in fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sensors: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentKind {
    Tank(Tank),
    Pump(Pump),
    Valve(Valve),
    Source(Source),
    Sink(Sink),
    Junction,
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Tank(_) => "tank",
            ComponentKind::Pump(_) => "pump",
            ComponentKind::Valve(_) => "valve",
            ComponentKind::Source(_) => "source",
            ComponentKind::Sink(_) => "sink",
            ComponentKind::Junction => "junction",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankShape {
    #[default]
    Cylindrical,
    Rectangular,
    /// Uses the cylindrical cross-section of `radius`.
    Spherical,
}

/// Finite storage. `water_amount` is authoritative; `water_level` is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tank {
    #[serde(default)]
    pub water_amount: f64,
    #[serde(default)]
    pub water_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<f64>,
    #[serde(default)]
    pub shape: TankShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub water: WaterQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_rates: Option<DecayRates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chemistry: Option<ChemistryProfile>,
}

impl Tank {
    /// Blend `volume` of `supply` into this tank and add the volume.
    pub fn receive(&mut self, supply: &WaterQuality, volume: f64) {
        if let Some(total) = self.water.mix_from(self.water_amount, supply, volume) {
            self.water_amount = total;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pump {
    /// Percent of rated capacity, in [0, 100].
    #[serde(default)]
    pub power: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    /// Quadratic head curve `[a0, a1, a2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_head_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_throughput: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<f64>,
}

impl Pump {
    /// Curve coefficients when exactly three are given.
    pub fn curve_coefficients(&self) -> Option<[f64; 3]> {
        match self.curve.as_deref() {
            Some(&[a0, a1, a2]) => Some([a0, a1, a2]),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valve {
    /// Continuous position in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening: Option<f64>,
    /// Boolean position kept in step with `opening`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    /// Nominal flow, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow_rate: Option<f64>,
}

impl Valve {
    /// Effective opening: explicit `opening` clamped to [0, 1], else 0 when
    /// `is_open` is false, else fully open.
    pub fn effective_opening(&self) -> f64 {
        match (self.opening, self.is_open) {
            (Some(o), _) => unit_clamp(o),
            (None, Some(false)) => 0.0,
            (None, _) => 1.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.effective_opening() > CLOSED_OPENING
    }

    /// Set a continuous opening and keep the boolean flag in step.
    pub fn set_opening(&mut self, opening: f64) {
        let opening = unit_clamp(opening);
        self.opening = Some(opening);
        self.is_open = Some(opening > CLOSED_OPENING);
        if opening <= CLOSED_OPENING {
            self.flow_rate = Some(0.0);
        }
    }

    pub fn close(&mut self) {
        self.set_opening(0.0);
    }
}

/// Infinite supply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_level: Option<f64>,
    #[serde(flatten)]
    pub water: WaterQuality,
}

/// Infinite capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<f64>,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            elevation: None,
            base_elevation: None,
            stuck: false,
            poisoned_readings: BTreeMap::new(),
            sensors: BTreeMap::new(),
            kind,
        }
    }

    pub fn tank(id: impl Into<String>, tank: Tank) -> Self {
        Self::new(id, ComponentKind::Tank(tank))
    }

    pub fn pump(id: impl Into<String>, pump: Pump) -> Self {
        Self::new(id, ComponentKind::Pump(pump))
    }

    pub fn valve(id: impl Into<String>, valve: Valve) -> Self {
        Self::new(id, ComponentKind::Valve(valve))
    }

    pub fn source(id: impl Into<String>, source: Source) -> Self {
        Self::new(id, ComponentKind::Source(source))
    }

    pub fn sink(id: impl Into<String>, sink: Sink) -> Self {
        Self::new(id, ComponentKind::Sink(sink))
    }

    pub fn junction(id: impl Into<String>) -> Self {
        Self::new(id, ComponentKind::Junction)
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_sensor(mut self, key: impl Into<String>, value: f64) -> Self {
        self.sensors.insert(key.into(), value);
        self
    }

    /// `baseElevation`, else `elevation`, else 0.
    pub fn datum(&self) -> f64 {
        self.base_elevation.or(self.elevation).unwrap_or(0.0)
    }

    pub fn as_tank(&self) -> Option<&Tank> {
        match &self.kind {
            ComponentKind::Tank(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tank_mut(&mut self) -> Option<&mut Tank> {
        match &mut self.kind {
            ComponentKind::Tank(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_pump(&self) -> Option<&Pump> {
        match &self.kind {
            ComponentKind::Pump(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_pump(&self) -> bool {
        matches!(self.kind, ComponentKind::Pump(_))
    }

    /// Water quality of a tank or source.
    pub fn water(&self) -> Option<&WaterQuality> {
        match &self.kind {
            ComponentKind::Tank(t) => Some(&t.water),
            ComponentKind::Source(s) => Some(&s.water),
            _ => None,
        }
    }

    pub fn water_mut(&mut self) -> Option<&mut WaterQuality> {
        match &mut self.kind {
            ComponentKind::Tank(t) => Some(&mut t.water),
            ComponentKind::Source(s) => Some(&mut s.water),
            _ => None,
        }
    }

    /// Valve opening factor; every other kind is fully open.
    pub fn valve_opening(&self) -> f64 {
        match &self.kind {
            ComponentKind::Valve(v) => v.effective_opening(),
            _ => 1.0,
        }
    }

    /// Non-valves always count as open.
    pub fn is_valve_open(&self) -> bool {
        self.valve_opening() > CLOSED_OPENING
    }

    /// Visit every numeric, non-NaN field by its serialized name.
    pub fn for_each_numeric(&self, mut visit: impl FnMut(&str, f64)) {
        let mut emit = |key: &str, v: Option<f64>| {
            if let Some(v) = v
                && !v.is_nan()
            {
                visit(key, v);
            }
        };

        emit("elevation", self.elevation);
        emit("baseElevation", self.base_elevation);

        match &self.kind {
            ComponentKind::Tank(t) => {
                emit("waterAmount", Some(t.water_amount));
                emit("waterLevel", Some(t.water_level));
                emit("maxLevel", t.max_level);
                emit("radius", t.radius);
                emit("width", t.width);
                emit("height", t.height);
                for (k, v) in t.water.fields() {
                    emit(k, v);
                }
            }
            ComponentKind::Pump(p) => {
                emit("power", Some(p.power));
                emit("maxFlowRate", p.max_flow_rate);
                emit("efficiency", p.efficiency);
                emit("headGain", p.head_gain);
                emit("baseHeadGain", p.base_head_gain);
                emit("maxThroughput", p.max_throughput);
                emit("flowRate", p.flow_rate);
            }
            ComponentKind::Valve(v) => {
                emit("opening", v.opening);
                emit("flowRate", v.flow_rate);
                emit("maxFlowRate", v.max_flow_rate);
            }
            ComponentKind::Source(s) => {
                emit("head", s.head);
                emit("waterLevel", s.water_level);
                for (k, v) in s.water.fields() {
                    emit(k, v);
                }
            }
            ComponentKind::Sink(s) => emit("head", s.head),
            ComponentKind::Junction => {}
        }

        for (k, v) in &self.sensors {
            emit(k.as_str(), Some(*v));
        }
    }

    /// Read a numeric field by its serialized name.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        let mut found = None;
        self.for_each_numeric(|k, v| {
            if found.is_none() && k == key {
                found = Some(v);
            }
        });
        found
    }
}

/// Hazen-Williams configuration. Missing values fall back to geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HazenWilliams {
    #[serde(rename = "K", default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Roughness coefficient.
    #[serde(rename = "C", alias = "c", default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

/// Darcy-Weisbach configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DarcyWeisbach {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
}

/// Directed link between two components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw: Option<HazenWilliams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dw: Option<DarcyWeisbach>,
}

impl Pipe {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_hazen_k(mut self, k: f64, n: f64) -> Self {
        self.hw = Some(HazenWilliams {
            k: Some(k),
            n: Some(n),
            ..Default::default()
        });
        self
    }

    pub fn with_darcy(mut self, f: f64, length: f64, diameter: f64) -> Self {
        self.dw = Some(DarcyWeisbach {
            f: Some(f),
            length: Some(length),
            diameter: Some(diameter),
        });
        self
    }

    /// Label for logs: the pipe id, else `from->to`.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}->{}", self.from, self.to),
        }
    }
}

/// Components plus pipes. Components and pipes are never added or removed
/// during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub pipes: Vec<Pipe>,
}

impl Network {
    /// First component with this id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn component_at(&self, id: CompId) -> &Component {
        &self.components[id.slot()]
    }

    pub fn component_at_mut(&mut self, id: CompId) -> &mut Component {
        &mut self.components[id.slot()]
    }

    pub fn pipe_at(&self, id: PipeId) -> &Pipe {
        &self.pipes[id.slot()]
    }

    /// Arena ids of all tanks, in component order.
    pub fn tank_ids(&self) -> Vec<CompId> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_tank().is_some())
            .map(|(i, _)| CompId::from_index(i as u32))
            .collect()
    }

    /// Sum of all tank volumes.
    pub fn total_tank_volume(&self) -> f64 {
        self.components
            .iter()
            .filter_map(Component::as_tank)
            .map(|t| t.water_amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valve_opening_semantics() {
        let legacy_closed = Valve {
            is_open: Some(false),
            ..Default::default()
        };
        assert_eq!(legacy_closed.effective_opening(), 0.0);
        assert!(!legacy_closed.is_open());

        let unset = Valve::default();
        assert_eq!(unset.effective_opening(), 1.0);

        let partial = Valve {
            opening: Some(0.4),
            is_open: Some(false),
            ..Default::default()
        };
        assert_eq!(partial.effective_opening(), 0.4);

        let over = Valve {
            opening: Some(3.0),
            ..Default::default()
        };
        assert_eq!(over.effective_opening(), 1.0);

        assert!(Component::junction("j").is_valve_open());
    }

    #[test]
    fn closing_zeroes_flow() {
        let mut v = Valve {
            opening: Some(1.0),
            flow_rate: Some(3.0),
            ..Default::default()
        };
        v.close();
        assert_eq!(v.opening, Some(0.0));
        assert_eq!(v.is_open, Some(false));
        assert_eq!(v.flow_rate, Some(0.0));
    }

    #[test]
    fn poison_window_inclusive() {
        let p = PoisonedReading {
            value: 9.0,
            start_time: Some(10.0),
            end_time: Some(20.0),
        };
        assert!(!p.is_active(9.999));
        assert!(p.is_active(10.0));
        assert!(p.is_active(20.0));
        assert!(!p.is_active(20.001));
        assert!(!p.is_expired(20.0));
        assert!(p.is_expired(20.001));
    }

    #[test]
    fn numeric_fields_include_sensors_and_skip_nan() {
        let mut tank = Tank {
            water_amount: 4.0,
            water_level: 2.0,
            ..Default::default()
        };
        tank.water.ph = Some(7.0);
        tank.water.o2 = Some(f64::NAN);
        let c = Component::tank("t", tank).with_sensor("turbidity", 1.5);

        let mut keys = Vec::new();
        c.for_each_numeric(|k, _| keys.push(k.to_string()));
        assert!(keys.contains(&"waterAmount".to_string()));
        assert!(keys.contains(&"ph".to_string()));
        assert!(keys.contains(&"turbidity".to_string()));
        assert!(!keys.contains(&"o2".to_string()));
        assert_eq!(c.numeric("waterLevel"), Some(2.0));
        assert_eq!(c.numeric("power"), None);
    }

    #[test]
    fn datum_prefers_base_elevation() {
        let mut c = Component::junction("j").with_elevation(3.0);
        assert_eq!(c.datum(), 3.0);
        c.base_elevation = Some(1.0);
        assert_eq!(c.datum(), 1.0);
        assert_eq!(Component::junction("k").datum(), 0.0);
    }

    #[test]
    fn curve_needs_three_coefficients() {
        let mut p = Pump {
            curve: Some(vec![5.0, -2.0, 0.0]),
            ..Default::default()
        };
        assert_eq!(p.curve_coefficients(), Some([5.0, -2.0, 0.0]));
        p.curve = Some(vec![5.0, -2.0]);
        assert_eq!(p.curve_coefficients(), None);
    }

    #[test]
    fn tank_receive_mixes_and_adds() {
        let mut t = Tank {
            water_amount: 1.0,
            ..Default::default()
        };
        t.water.ph = Some(6.0);
        let supply = WaterQuality {
            ph: Some(8.0),
            ..Default::default()
        };
        t.receive(&supply, 1.0);
        assert_eq!(t.water_amount, 2.0);
        assert_eq!(t.water.ph, Some(7.0));
    }
}
