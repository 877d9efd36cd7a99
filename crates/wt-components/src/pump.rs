//! Pump head curve and operating-point solver.
//!
//! ## Model
//!
//! A pump between an upstream supply and a downstream tank delivers the
//! largest flow `q` in `[0, capacity]` for which
//!
//! ```text
//! pump_head(q) >= static_head + loss_in(q) + loss_out(q)
//! ```
//!
//! found by bisection. `static_head = dest_head - source_head`.

use wt_core::unit_clamp;
use wt_network::{Pipe, Pump};

use crate::common::{check_non_negative, check_range};
use crate::error::ComponentResult;
use crate::traits::HydraulicLink;

/// Head gain at full power when neither curve nor constant gain is given.
pub const DEFAULT_BASE_HEAD_GAIN: f64 = 5.0;

/// Bisection iteration cap.
pub const MAX_BISECTION_ITERS: usize = 25;

/// Bisection stops once the bracket is narrower than this (m³/s).
pub const BRACKET_TOLERANCE: f64 = 1e-6;

/// Head delivered at flow `q`: quadratic curve, else constant gain, else
/// base gain scaled by power.
pub fn pump_head(pump: &Pump, q: f64) -> f64 {
    if let Some([a0, a1, a2]) = pump.curve_coefficients() {
        return a0 + a1 * q + a2 * q * q;
    }
    if let Some(gain) = pump.head_gain {
        return gain;
    }
    pump.base_head_gain.unwrap_or(DEFAULT_BASE_HEAD_GAIN) * (pump.power / 100.0)
}

/// Flow ceiling: rated flow scaled by power, efficiency and the most closed
/// valve on the pump's path, then capped by `maxThroughput`.
pub fn capacity(pump: &Pump, valve_factor: f64) -> f64 {
    let rated = pump.max_flow_rate.unwrap_or(0.0).max(0.0);
    let power_factor = unit_clamp(pump.power / 100.0);
    let efficiency = pump.efficiency.map_or(1.0, unit_clamp);
    let cap = rated * power_factor * efficiency * valve_factor;
    match pump.max_throughput {
        Some(limit) => cap.min(limit),
        None => cap,
    }
}

/// A pump with its inlet and outlet pipes and the static head it works
/// against.
#[derive(Debug, Clone, Copy)]
pub struct PumpCircuit<'a> {
    pub pump: &'a Pump,
    pub inlet: &'a Pipe,
    pub outlet: &'a Pipe,
    pub static_head: f64,
}

impl PumpCircuit<'_> {
    /// Whether the pump can sustain flow `q` against the circuit.
    pub fn feasible(&self, q: f64) -> bool {
        let required = self.static_head + self.inlet.head_loss(q) + self.outlet.head_loss(q);
        pump_head(self.pump, q) >= required
    }

    /// Largest feasible flow in `[0, cap]`, or `None` if even zero flow is
    /// infeasible.
    pub fn solve(&self, cap: f64) -> Option<f64> {
        if !self.feasible(0.0) {
            return None;
        }
        let (mut low, mut high) = (0.0, cap);
        let mut flow = 0.0;
        for _ in 0..MAX_BISECTION_ITERS {
            let mid = 0.5 * (low + high);
            if self.feasible(mid) {
                flow = mid;
                low = mid;
            } else {
                high = mid;
            }
            if high - low < BRACKET_TOLERANCE {
                break;
            }
        }
        Some(flow)
    }
}

/// Check user-supplied pump parameters.
pub fn check_pump(pump: &Pump) -> ComponentResult<()> {
    check_range(Some(pump.power), 0.0, 100.0, "pump power")?;
    check_range(pump.efficiency, 0.0, 1.0, "pump efficiency")?;
    check_non_negative(pump.max_flow_rate, "pump maxFlowRate")?;
    check_non_negative(pump.max_throughput, "pump maxThroughput")?;
    if let Some(curve) = &pump.curve
        && curve.len() != 3
    {
        return Err(crate::error::ComponentError::InvalidArg {
            what: "pump curve must have three coefficients",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn curve_pump() -> Pump {
        Pump {
            power: 100.0,
            max_flow_rate: Some(1.0),
            curve: Some(vec![5.0, -2.0, 0.0]),
            ..Default::default()
        }
    }

    #[test]
    fn head_precedence() {
        let mut p = curve_pump();
        p.head_gain = Some(9.0);
        assert_eq!(pump_head(&p, 1.0), 3.0);

        p.curve = None;
        assert_eq!(pump_head(&p, 1.0), 9.0);

        p.head_gain = None;
        p.power = 50.0;
        assert_eq!(pump_head(&p, 1.0), 2.5);

        p.base_head_gain = Some(8.0);
        assert_eq!(pump_head(&p, 1.0), 4.0);
    }

    #[test]
    fn capacity_scaling() {
        let mut p = curve_pump();
        p.max_flow_rate = Some(2.0);
        p.power = 50.0;
        p.efficiency = Some(0.5);
        assert_eq!(capacity(&p, 1.0), 0.5);
        assert_eq!(capacity(&p, 0.5), 0.25);

        p.max_throughput = Some(0.1);
        assert_eq!(capacity(&p, 1.0), 0.1);

        p.max_flow_rate = None;
        assert_eq!(capacity(&p, 1.0), 0.0);
    }

    #[test]
    fn solves_against_two_pipes() {
        let pump = curve_pump();
        let inlet = Pipe::new("a", "p").with_hazen_k(1.5, 1.852);
        let outlet = Pipe::new("p", "b").with_hazen_k(1.5, 1.852);
        let circuit = PumpCircuit {
            pump: &pump,
            inlet: &inlet,
            outlet: &outlet,
            static_head: -0.8,
        };
        let q = circuit.solve(capacity(&pump, 1.0)).unwrap();
        assert!(q > 0.0 && q <= 1.0);
        assert!(circuit.feasible(q));
        assert!(!circuit.feasible(q + 1e-4) || q > 1.0 - 1e-4);
    }

    #[test]
    fn infeasible_at_zero() {
        let pump = Pump {
            power: 100.0,
            max_flow_rate: Some(1.0),
            head_gain: Some(1.0),
            ..Default::default()
        };
        let pipe = Pipe::new("a", "b").with_hazen_k(1.0, 2.0);
        let circuit = PumpCircuit {
            pump: &pump,
            inlet: &pipe,
            outlet: &pipe,
            static_head: 2.0,
        };
        assert_eq!(circuit.solve(1.0), None);
    }

    #[test]
    fn check_rejects_bad_params() {
        let mut p = curve_pump();
        assert!(check_pump(&p).is_ok());
        p.power = 120.0;
        assert!(check_pump(&p).is_err());
        p.power = 50.0;
        p.curve = Some(vec![1.0]);
        assert!(check_pump(&p).is_err());
    }

    proptest! {
        #[test]
        fn solved_flow_is_feasible_and_bounded(
            a0 in 0.0f64..20.0,
            static_head in -5.0f64..5.0,
            cap in 0.0f64..5.0,
            k in 0.1f64..10.0,
        ) {
            let pump = Pump {
                power: 100.0,
                curve: Some(vec![a0, -1.0, -0.5]),
                ..Default::default()
            };
            let pipe = Pipe::new("a", "b").with_hazen_k(k, 1.852);
            let circuit = PumpCircuit { pump: &pump, inlet: &pipe, outlet: &pipe, static_head };
            if let Some(q) = circuit.solve(cap) {
                prop_assert!(q >= 0.0 && q <= cap);
                prop_assert!(circuit.feasible(q));
            } else {
                prop_assert!(!circuit.feasible(0.0));
            }
        }
    }
}
