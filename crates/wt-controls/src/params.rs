//! Loosely typed action parameters.
//!
//! Scenario files carry action parameters as strings (`"75"`, `"40%"`,
//! `"open"`), but hand-written files often use bare numbers or booleans.
//! All three are accepted and read back the same way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use wt_core::parse_leading_float;

/// One action parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

pub type Params = BTreeMap<String, ParamValue>;

impl ParamValue {
    /// Numeric reading: leading-number parse of the text form.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Bool(_) => None,
            ParamValue::Text(s) => parse_leading_float(s),
        }
    }

    /// Text form.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{}", v),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

/// Numeric parameter, with `default` when the key is absent.
///
/// `None` means the key was present but did not parse; callers decide
/// whether that is a zero or a no-op.
pub fn number_param(params: &Params, key: &str, default: f64) -> Option<f64> {
    match params.get(key) {
        Some(v) => v.as_number(),
        None => Some(default),
    }
}

/// Numeric parameter that must be finite, else 0.
pub fn finite_param(params: &Params, key: &str, default: f64) -> f64 {
    number_param(params, key, default)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
