//! Network-specific error types.

use wt_core::WtError;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Network construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Two components share an id.
    DuplicateId { id: String },

    /// A component has an empty id.
    EmptyId { position: usize },

    /// A lookup named an id that is not in the network.
    UnknownComponent { id: String },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::DuplicateId { id } => {
                write!(f, "Component id '{}' is used more than once", id)
            }
            NetworkError::EmptyId { position } => {
                write!(f, "Component at position {} has an empty id", position)
            }
            NetworkError::UnknownComponent { id } => {
                write!(f, "Component '{}' not found in network", id)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<NetworkError> for WtError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::UnknownComponent { id } => WtError::UnknownId { id },
            other => WtError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
