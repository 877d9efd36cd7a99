//! Water transfers for one hydraulic pass: pumped flow, then passive flow.
//!
//! Each transfer is planned against an immutable view of the network and
//! then applied, so later pumps and pipes see the volumes moved by earlier
//! ones within the same pass.

use tracing::{debug, trace};
use wt_components::common::EPSILON_FLOW;
use wt_components::{HydraulicLink, PumpCircuit, capacity};
use wt_core::CompId;
use wt_network::{
    CLOSED_OPENING, Entity, Network, NetworkIndex, entity_head, find_downstream_destination,
    find_upstream_supply,
};
use wt_quality::WaterQuality;

/// A planned movement of `volume` from `donor` to `receiver`.
#[derive(Debug, Clone, Copy)]
struct Transfer {
    donor: Entity,
    receiver: Entity,
    volume: f64,
    supply: WaterQuality,
}

fn available(network: &Network, entity: Entity, volume: f64) -> f64 {
    match network.component_at(entity.comp()).as_tank() {
        Some(tank) if entity.is_tank() => volume.min(tank.water_amount),
        _ => volume,
    }
}

fn supply_of(network: &Network, entity: Entity) -> WaterQuality {
    network
        .component_at(entity.comp())
        .water()
        .copied()
        .unwrap_or_default()
}

fn withdraw(network: &mut Network, entity: Entity, volume: f64) {
    if let Entity::Tank(c) = entity
        && let Some(tank) = network.component_at_mut(c).as_tank_mut()
    {
        tank.water_amount -= volume;
    }
}

fn deliver(network: &mut Network, entity: Entity, supply: &WaterQuality, volume: f64) {
    if let Entity::Tank(c) = entity
        && let Some(tank) = network.component_at_mut(c).as_tank_mut()
    {
        tank.receive(supply, volume);
    }
}

fn opening_of(network: &Network, comp: Option<CompId>) -> f64 {
    comp.map_or(1.0, |c| network.component_at(c).valve_opening())
}

fn plan_pump(network: &Network, index: &NetworkIndex, pump_id: CompId, dt: f64) -> Option<Transfer> {
    let comp = network.component_at(pump_id);
    let pump = comp.as_pump()?;
    if !(pump.power > 0.0) {
        return None;
    }

    let inlet_id = index.first_incoming(pump_id)?;
    let outlet_id = index.first_outgoing(pump_id)?;
    let (inlet_from, inlet_to) = index.ends(inlet_id);
    let (outlet_from, outlet_to) = index.ends(outlet_id);

    let source = find_upstream_supply(network, index, inlet_from?)?;
    let dest = match find_downstream_destination(network, index, outlet_to?)? {
        Entity::Tank(c) => Entity::Tank(c),
        _ => return None,
    };

    let valve_factor = [inlet_from, inlet_to, outlet_from, outlet_to]
        .into_iter()
        .map(|c| opening_of(network, c))
        .fold(1.0_f64, f64::min);
    if !(valve_factor > CLOSED_OPENING) {
        return None;
    }

    let cap = capacity(pump, valve_factor);
    if !(cap > 0.0) {
        return None;
    }

    let circuit = PumpCircuit {
        pump,
        inlet: network.pipe_at(inlet_id),
        outlet: network.pipe_at(outlet_id),
        static_head: entity_head(network, dest) - entity_head(network, source),
    };
    let Some(flow) = circuit.solve(cap) else {
        debug!(pump = %comp.id, head = circuit.static_head, "pump cannot overcome static head");
        return None;
    };

    let volume = available(network, source, flow * dt);
    if !(volume > 0.0) {
        return None;
    }
    trace!(pump = %comp.id, flow, volume, "pumped");
    Some(Transfer {
        donor: source,
        receiver: dest,
        volume,
        supply: supply_of(network, source),
    })
}

/// Move water through every powered pump, in component order.
///
/// Returns the number of pumps that moved water.
pub fn apply_pump_transfers(network: &mut Network, index: &NetworkIndex, dt: f64) -> usize {
    let mut moved = 0;
    for slot in 0..index.component_count() {
        let pump_id = CompId::from_index(slot as u32);
        if let Some(t) = plan_pump(network, index, pump_id, dt) {
            deliver(network, t.receiver, &t.supply, t.volume);
            withdraw(network, t.donor, t.volume);
            moved += 1;
        }
    }
    moved
}

fn plan_pipe(network: &Network, index: &NetworkIndex, pipe_id: wt_core::PipeId, dt: f64) -> Option<Transfer> {
    let (Some(from), Some(to)) = index.ends(pipe_id) else {
        return None;
    };
    let (from_comp, to_comp) = (network.component_at(from), network.component_at(to));
    if from_comp.is_pump() || to_comp.is_pump() {
        return None;
    }

    let valve_factor = from_comp.valve_opening().min(to_comp.valve_opening());
    if !(valve_factor > CLOSED_OPENING) {
        return None;
    }

    let up = find_upstream_supply(network, index, from)?;
    let down = find_downstream_destination(network, index, to)?;

    let pipe = network.pipe_at(pipe_id);
    let dh = entity_head(network, up) - entity_head(network, down);
    let flow = pipe.flow_from_head(dh) * valve_factor;
    if !(flow.abs() >= EPSILON_FLOW) {
        return None;
    }

    let (donor, receiver) = if flow > 0.0 { (up, down) } else { (down, up) };
    let volume = available(network, donor, flow.abs() * dt);
    if !(volume > 0.0) {
        return None;
    }
    trace!(pipe = %pipe.label(), flow, volume, "passive flow");
    Some(Transfer {
        donor,
        receiver,
        volume,
        supply: supply_of(network, donor),
    })
}

/// Move water along every pipe not attached to a pump, in pipe order,
/// driven by the head difference between the resolved end entities.
///
/// Water leaving a sink is not delivered anywhere. Returns the number of
/// pipes that carried flow.
pub fn apply_passive_flows(network: &mut Network, index: &NetworkIndex, dt: f64) -> usize {
    let mut moved = 0;
    for pipe_id in index.pipe_ids() {
        if let Some(t) = plan_pipe(network, index, pipe_id, dt) {
            withdraw(network, t.donor, t.volume);
            if !matches!(t.donor, Entity::Sink(_)) {
                deliver(network, t.receiver, &t.supply, t.volume);
            }
            moved += 1;
        }
    }
    moved
}
