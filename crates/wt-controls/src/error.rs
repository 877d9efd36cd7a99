//! Error types for schedule validation.

use thiserror::Error;
use wt_core::WtError;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Problems found in control actions, rules and attacks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A schedule entry names a component that does not exist.
    #[error("{context}: component '{id}' not found")]
    UnknownComponent { id: String, context: String },

    /// A schedule entry targets a component of the wrong kind.
    #[error("{context}: component '{id}' is a {found}, expected {expected}")]
    WrongKind {
        id: String,
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A parameter is missing or does not parse as a number.
    #[error("{context}: parameter '{param}' has invalid value '{value}'")]
    InvalidParam {
        context: String,
        param: &'static str,
        value: String,
    },

    /// An attack record is malformed.
    #[error("{context}: {what}")]
    InvalidAttack { context: String, what: String },
}

impl From<ControlError> for WtError {
    fn from(e: ControlError) -> Self {
        match e {
            ControlError::InvalidArg { what } => WtError::InvalidArg { what },
            ControlError::UnknownComponent { id, .. } => WtError::UnknownId { id },
            other => WtError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
