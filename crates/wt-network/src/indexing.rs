//! Id and adjacency index over a network.
//!
//! Maps string ids to arena positions and records, per component, the first
//! incoming and first outgoing pipe in declaration order. Traversals use the
//! first match, so ambiguous topologies resolve the same way a linear scan
//! over the pipe list would.

use std::collections::HashMap;
use wt_core::{CompId, PipeId};

use crate::error::{NetworkError, NetworkResult};
use crate::model::Network;

#[derive(Debug, Clone, Default)]
pub struct NetworkIndex {
    /// id -> first component carrying it.
    by_id: HashMap<String, CompId>,

    /// Per component: first pipe whose `to` names it.
    first_in: Vec<Option<PipeId>>,

    /// Per component: first pipe whose `from` names it.
    first_out: Vec<Option<PipeId>>,

    /// Per pipe: resolved (from, to); `None` for dangling references.
    pipe_ends: Vec<(Option<CompId>, Option<CompId>)>,
}

impl NetworkIndex {
    pub fn build(network: &Network) -> Self {
        let mut by_id = HashMap::with_capacity(network.components.len());
        for (i, comp) in network.components.iter().enumerate() {
            by_id
                .entry(comp.id.clone())
                .or_insert_with(|| CompId::from_index(i as u32));
        }

        let mut first_in = vec![None; network.components.len()];
        let mut first_out = vec![None; network.components.len()];
        let mut pipe_ends = Vec::with_capacity(network.pipes.len());

        for (i, pipe) in network.pipes.iter().enumerate() {
            let pid = PipeId::from_index(i as u32);
            let from = by_id.get(&pipe.from).copied();
            let to = by_id.get(&pipe.to).copied();
            if let Some(from) = from {
                first_out[from.slot()].get_or_insert(pid);
            }
            if let Some(to) = to {
                first_in[to.slot()].get_or_insert(pid);
            }
            pipe_ends.push((from, to));
        }

        Self {
            by_id,
            first_in,
            first_out,
            pipe_ends,
        }
    }

    pub fn component_count(&self) -> usize {
        self.first_in.len()
    }

    pub fn pipe_count(&self) -> usize {
        self.pipe_ends.len()
    }

    /// Whether `network` has the arena sizes this index was built over.
    pub fn fits(&self, network: &Network) -> bool {
        network.components.len() == self.component_count() && network.pipes.len() == self.pipe_count()
    }

    pub fn lookup(&self, id: &str) -> Option<CompId> {
        self.by_id.get(id).copied()
    }

    pub fn require(&self, id: &str) -> NetworkResult<CompId> {
        self.lookup(id).ok_or_else(|| NetworkError::UnknownComponent { id: id.to_string() })
    }

    pub fn first_incoming(&self, comp: CompId) -> Option<PipeId> {
        self.first_in.get(comp.slot()).copied().flatten()
    }

    pub fn first_outgoing(&self, comp: CompId) -> Option<PipeId> {
        self.first_out.get(comp.slot()).copied().flatten()
    }

    /// Resolved endpoints of a pipe.
    pub fn ends(&self, pipe: PipeId) -> (Option<CompId>, Option<CompId>) {
        self.pipe_ends
            .get(pipe.slot())
            .copied()
            .unwrap_or((None, None))
    }

    pub fn pipe_ids(&self) -> impl Iterator<Item = PipeId> + '_ {
        (0..self.pipe_ends.len()).map(|i| PipeId::from_index(i as u32))
    }
}
