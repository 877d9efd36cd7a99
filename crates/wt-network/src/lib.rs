//! wt-network: component/network model and topology for wtsim.
//!
//! Provides:
//! - The closed component sum type (tank, pump, valve, source, sink,
//!   junction) with a shared envelope for stuck flags, sensors and
//!   poisoned readings
//! - Pipes with their resistance configuration
//! - An id/adjacency index rebuilt once per tick
//! - Upstream-supply / downstream-destination resolution and node heads
//! - A builder that validates component ids
//!
//! # Example
//!
//! ```
//! use wt_network::{Component, NetworkBuilder, NetworkIndex, Tank, find_downstream_destination};
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add_component(Component::tank("t1", Tank::default()));
//! builder.add_component(Component::junction("j"));
//! builder.add_component(Component::tank("t2", Tank::default()));
//! builder.connect("t1", "j");
//! builder.connect("j", "t2");
//! let network = builder.build().unwrap();
//!
//! let index = NetworkIndex::build(&network);
//! let j = index.lookup("j").unwrap();
//! let dest = find_downstream_destination(&network, &index, j).unwrap();
//! assert_eq!(network.component_at(dest.comp()).id, "t2");
//! ```

pub mod builder;
pub mod error;
pub mod indexing;
pub mod model;
pub mod topology;
pub mod validate;

pub use builder::NetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use indexing::NetworkIndex;
pub use model::*;
pub use topology::{
    Entity, entity_head, find_dest_tank, find_downstream_destination, find_source_tank,
    find_upstream_supply, node_head,
};
pub use validate::{dangling_pipes, validate_network};
