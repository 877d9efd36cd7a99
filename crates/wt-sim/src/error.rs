//! Error types for simulation runs.

use thiserror::Error;

/// Errors reported before a run starts, or when a tick is handed a network
/// its stepper was not built for.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<wt_network::NetworkError> for SimError {
    fn from(e: wt_network::NetworkError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<wt_controls::ControlError> for SimError {
    fn from(e: wt_controls::ControlError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<wt_components::ComponentError> for SimError {
    fn from(e: wt_components::ComponentError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<wt_core::WtError> for SimError {
    fn from(e: wt_core::WtError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
