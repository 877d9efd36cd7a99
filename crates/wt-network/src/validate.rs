//! Network validation.

use std::collections::HashSet;

use crate::error::{NetworkError, NetworkResult};
use crate::model::{Network, Pipe};

/// Check that every component has a non-empty, unique id.
pub fn validate_network(network: &Network) -> NetworkResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(network.components.len());
    for (position, comp) in network.components.iter().enumerate() {
        if comp.id.trim().is_empty() {
            return Err(NetworkError::EmptyId { position });
        }
        if !seen.insert(comp.id.as_str()) {
            return Err(NetworkError::DuplicateId {
                id: comp.id.clone(),
            });
        }
    }
    Ok(())
}

/// Pipes with at least one endpoint that names no component.
pub fn dangling_pipes(network: &Network) -> Vec<&Pipe> {
    let ids: HashSet<&str> = network.components.iter().map(|c| c.id.as_str()).collect();
    network
        .pipes
        .iter()
        .filter(|p| !ids.contains(p.from.as_str()) || !ids.contains(p.to.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Component;

    #[test]
    fn validate_empty_network() {
        assert!(validate_network(&Network::default()).is_ok());
    }

    #[test]
    fn validate_empty_id() {
        let network = Network {
            components: vec![Component::junction("a"), Component::junction(" ")],
            pipes: vec![],
        };
        assert_eq!(
            validate_network(&network),
            Err(NetworkError::EmptyId { position: 1 })
        );
    }

    #[test]
    fn dangling_detection() {
        let network = Network {
            components: vec![Component::junction("a"), Component::junction("b")],
            pipes: vec![Pipe::new("a", "b"), Pipe::new("a", "c"), Pipe::new("x", "b")],
        };
        let dangling = dangling_pipes(&network);
        assert_eq!(dangling.len(), 2);
        assert_eq!(dangling[0].to, "c");
        assert_eq!(dangling[1].from, "x");
    }
}
