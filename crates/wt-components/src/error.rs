//! Error types for component parameter checks.

use thiserror::Error;
use wt_core::WtError;

/// Errors raised when component parameters are outside their physical range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for WtError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => WtError::InvalidArg { what },
            ComponentError::InvalidArg { what } => WtError::InvalidArg { what },
        }
    }
}
