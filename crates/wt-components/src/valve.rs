//! Valve position commands.

use wt_core::{parse_leading_float, unit_clamp};
use wt_network::Valve;

use crate::common::{check_non_negative, check_range};
use crate::error::ComponentResult;

/// A requested valve position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValveCommand {
    /// Continuous opening, clamped to [0, 1] when applied.
    Fraction(f64),
    Open,
    Closed,
    /// Malformed percentage; the valve keeps its position.
    Unchanged,
}

impl ValveCommand {
    /// Parse a state string, case-insensitively.
    ///
    /// `"40%"` is a percentage, a bare number above 1 is a percentage, a bare
    /// number at or below 1 is a fraction, `"open"` opens, and any other text
    /// closes.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.to_lowercase();
        if raw.ends_with('%') {
            return match parse_leading_float(&raw) {
                Some(pct) if !pct.is_nan() => ValveCommand::Fraction(pct / 100.0),
                _ => ValveCommand::Unchanged,
            };
        }
        match parse_leading_float(&raw) {
            Some(v) if v > 1.0 => ValveCommand::Fraction(v / 100.0),
            Some(v) => ValveCommand::Fraction(v),
            None if raw == "open" => ValveCommand::Open,
            None => ValveCommand::Closed,
        }
    }

    pub fn apply(self, valve: &mut Valve) {
        match self {
            ValveCommand::Fraction(f) => valve.set_opening(f),
            ValveCommand::Open => valve.set_opening(1.0),
            ValveCommand::Closed => valve.close(),
            ValveCommand::Unchanged => {}
        }
    }
}

/// Set the nominal flow and derive the opening from it.
///
/// With a positive `maxFlowRate` the opening is `|flow| / maxFlowRate`;
/// otherwise the valve is fully open for positive flow and closed otherwise.
pub fn set_valve_flow(valve: &mut Valve, flow: f64) {
    let flow = if flow.is_finite() { flow } else { 0.0 };
    valve.flow_rate = Some(flow);
    valve.is_open = Some(flow > 0.0);
    valve.opening = Some(match valve.max_flow_rate {
        Some(max) if max > 0.0 => unit_clamp(flow.abs() / max),
        _ if flow > 0.0 => 1.0,
        _ => 0.0,
    });
}

/// Check user-supplied valve parameters.
pub fn check_valve(valve: &Valve) -> ComponentResult<()> {
    check_range(valve.opening, 0.0, 1.0, "valve opening")?;
    check_non_negative(valve.max_flow_rate, "valve maxFlowRate")?;
    Ok(())
}
