//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use wt_core::numeric::ensure_finite;

/// Head differences below this drive no flow (m).
pub const EPSILON_HEAD: f64 = 1e-9;

/// Flows below this carry no head loss and move no water (m³/s).
pub const EPSILON_FLOW: f64 = 1e-12;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Check an optional value is finite and non-negative.
pub fn check_non_negative(value: Option<f64>, what: &'static str) -> ComponentResult<()> {
    if let Some(v) = value {
        check_finite(v, what)?;
        if v < 0.0 {
            return Err(ComponentError::InvalidArg { what });
        }
    }
    Ok(())
}

/// Check an optional value lies in `[lo, hi]`.
pub fn check_range(value: Option<f64>, lo: f64, hi: f64, what: &'static str) -> ComponentResult<()> {
    if let Some(v) = value {
        check_finite(v, what)?;
        if !(lo..=hi).contains(&v) {
            return Err(ComponentError::InvalidArg { what });
        }
    }
    Ok(())
}

/// 1.0 for positive, -1.0 for negative; values within `EPSILON_HEAD` give 0.0.
pub fn flow_direction(dh: f64) -> f64 {
    if dh.abs() < EPSILON_HEAD {
        0.0
    } else if dh > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// JavaScript-style truthiness for optional numbers: present, nonzero and
/// not NaN. Pipe configs use it to fall back from a section value to the
/// pipe's own geometry.
pub(crate) fn or_nonzero(primary: Option<f64>, fallback: Option<f64>) -> Option<f64> {
    primary.filter(|v| *v != 0.0 && !v.is_nan()).or(fallback)
}
