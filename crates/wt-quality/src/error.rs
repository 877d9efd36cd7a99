//! Chemistry configuration errors.

use thiserror::Error;
use wt_core::WtError;

/// Result type for water-quality operations.
pub type QualityResult<T> = Result<T, QualityError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QualityError {
    /// A rate or factor is NaN or infinite.
    #[error("Non-finite chemistry parameter: {what}")]
    NonFinite { what: &'static str },

    /// A rate that must be non-negative is negative.
    #[error("Negative rate for {what}: {value}")]
    NegativeRate { what: &'static str, value: f64 },

    /// A concentration lies outside its physical range.
    #[error("{what} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl From<QualityError> for WtError {
    fn from(err: QualityError) -> Self {
        WtError::Invariant {
            what: err.to_string(),
        }
    }
}
