//! Supply/destination resolution through junctions and open valves.

use wt_core::CompId;

use crate::indexing::NetworkIndex;
use crate::model::{Component, ComponentKind, Network};

/// A storage or boundary component found by a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Tank(CompId),
    Source(CompId),
    Sink(CompId),
}

impl Entity {
    pub fn comp(self) -> CompId {
        match self {
            Entity::Tank(c) | Entity::Source(c) | Entity::Sink(c) => c,
        }
    }

    pub fn is_tank(self) -> bool {
        matches!(self, Entity::Tank(_))
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Upstream,
    Downstream,
}

fn walk(network: &Network, index: &NetworkIndex, start: CompId, dir: Direction) -> Option<Entity> {
    let mut visited = vec![false; index.component_count()];
    let mut current = start;

    loop {
        let seen = visited.get_mut(current.slot())?;
        if *seen {
            return None;
        }
        *seen = true;

        let comp = network.component_at(current);
        match (&comp.kind, dir) {
            (ComponentKind::Tank(_), _) => return Some(Entity::Tank(current)),
            (ComponentKind::Source(_), Direction::Upstream) => {
                return Some(Entity::Source(current));
            }
            (ComponentKind::Sink(_), Direction::Downstream) => return Some(Entity::Sink(current)),
            (ComponentKind::Junction, _) => {}
            (ComponentKind::Valve(v), _) if v.is_open() => {}
            _ => return None,
        }

        current = match dir {
            Direction::Upstream => {
                let pipe = index.first_incoming(current)?;
                index.ends(pipe).0?
            }
            Direction::Downstream => {
                let pipe = index.first_outgoing(current)?;
                index.ends(pipe).1?
            }
        };
    }
}

/// Nearest tank or source reached by walking incoming pipes from `start`
/// through junctions and open valves.
pub fn find_upstream_supply(network: &Network, index: &NetworkIndex, start: CompId) -> Option<Entity> {
    walk(network, index, start, Direction::Upstream)
}

/// Nearest tank or sink reached by walking outgoing pipes from `start`
/// through junctions and open valves.
pub fn find_downstream_destination(
    network: &Network,
    index: &NetworkIndex,
    start: CompId,
) -> Option<Entity> {
    walk(network, index, start, Direction::Downstream)
}

/// Id of the tank or source feeding `start_id`.
pub fn find_source_tank<'a>(network: &'a Network, index: &NetworkIndex, start_id: &str) -> Option<&'a str> {
    let start = index.lookup(start_id)?;
    find_upstream_supply(network, index, start).map(|e| network.component_at(e.comp()).id.as_str())
}

/// Id of the tank fed by `start_id`; sinks do not count.
pub fn find_dest_tank<'a>(network: &'a Network, index: &NetworkIndex, start_id: &str) -> Option<&'a str> {
    let start = index.lookup(start_id)?;
    match find_downstream_destination(network, index, start)? {
        Entity::Tank(c) => Some(network.component_at(c).id.as_str()),
        _ => None,
    }
}

/// Hydraulic head of a component.
///
/// Tank: datum + level. Source: fixed head, else datum + level, else datum.
/// Sink: fixed head, else datum. Anything else: datum.
pub fn node_head(comp: &Component) -> f64 {
    let datum = comp.datum();
    match &comp.kind {
        ComponentKind::Tank(t) => datum + t.water_level,
        ComponentKind::Source(s) => s
            .head
            .or_else(|| s.water_level.map(|l| datum + l))
            .unwrap_or(datum),
        ComponentKind::Sink(s) => s.head.unwrap_or(datum),
        _ => datum,
    }
}

pub fn entity_head(network: &Network, entity: Entity) -> f64 {
    node_head(network.component_at(entity.comp()))
}
