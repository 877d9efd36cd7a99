//! Dissolved species tracked per tank.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Species that decay, react and get clamped to a physical bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Dissolved oxygen
    #[serde(rename = "O2", alias = "o2")]
    O2,
    /// Nitrogenous biochemical oxygen demand
    #[serde(rename = "BODn", alias = "bodn")]
    Bodn,
    /// Nitrate
    #[serde(rename = "nitrate")]
    Nitrate,
    /// Dissolved carbon dioxide
    #[serde(rename = "CO2", alias = "co2")]
    Co2,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::O2, Species::Bodn, Species::Nitrate, Species::Co2];

    /// Field name on tanks and sources.
    pub fn key(self) -> &'static str {
        match self {
            Species::O2 => "o2",
            Species::Bodn => "bodn",
            Species::Nitrate => "nitrate",
            Species::Co2 => "co2",
        }
    }

    /// Name used by chemical-interference attacks.
    pub fn label(self) -> &'static str {
        match self {
            Species::O2 => "O2",
            Species::Bodn => "BODn",
            Species::Nitrate => "nitrate",
            Species::Co2 => "CO2",
        }
    }

    /// Upper physical bound; the lower bound is always 0.
    pub fn upper_bound(self) -> f64 {
        match self {
            Species::O2 => 15.0,
            Species::Bodn => 10.0,
            Species::Nitrate => 5.0,
            Species::Co2 => 10.0,
        }
    }

    /// Clamp a concentration into `[0, upper_bound]`.
    pub fn clamp(self, value: f64) -> f64 {
        wt_core::clamp_or_low(value, 0.0, self.upper_bound())
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
