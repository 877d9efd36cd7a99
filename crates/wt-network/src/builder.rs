//! Incremental network builder.

use tracing::warn;

use crate::error::NetworkResult;
use crate::model::{Component, Network, Pipe};
use crate::validate;

/// Builder for assembling a network in code.
///
/// Use `add_component`, `add_pipe` and `connect` to build up the network,
/// then call `build()` to validate it.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    components: Vec<Component>,
    pipes: Vec<Pipe>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn add_pipe(&mut self, pipe: Pipe) -> &mut Self {
        self.pipes.push(pipe);
        self
    }

    /// Add a plain pipe with no resistance configuration.
    pub fn connect(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.add_pipe(Pipe::new(from, to))
    }

    /// Validate ids and return the network.
    ///
    /// Pipes whose endpoints do not resolve are kept and logged; traversals
    /// treat them as no connection.
    pub fn build(&self) -> NetworkResult<Network> {
        let network = Network {
            components: self.components.clone(),
            pipes: self.pipes.clone(),
        };
        validate::validate_network(&network)?;
        for pipe in validate::dangling_pipes(&network) {
            warn!(pipe = %pipe.label(), "pipe endpoint does not name a component");
        }
        Ok(network)
    }
}
