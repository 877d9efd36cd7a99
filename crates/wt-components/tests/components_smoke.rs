//! Integration tests for wt-components against network-model values.

use wt_components::{
    HydraulicLink, PumpCircuit, ValveCommand, capacity, cross_section_area, level_for, pump_head,
};
use wt_network::{Pipe, Pump, Tank, TankShape, Valve};
use uom::si::area::square_meter;
use uom::si::length::meter;

#[test]
fn gravity_transfer_over_one_second() {
    // Tank at level 2 against an empty tank through K = 4, n = 1.852.
    let pipe = Pipe::new("t1", "t2").with_hazen_k(4.0, 1.852);
    let q = pipe.flow_from_head(2.0);
    let expected = (2.0f64 / 4.0).powf(1.0 / 1.852);
    assert!((q - expected).abs() < 1e-12);
}

#[test]
fn pump_matches_reference_bisection() {
    let pump = Pump {
        power: 100.0,
        max_flow_rate: Some(1.0),
        curve: Some(vec![5.0, -2.0, 0.0]),
        ..Default::default()
    };
    let inlet = Pipe::new("tA", "p").with_hazen_k(1.5, 1.852);
    let outlet = Pipe::new("p", "tB").with_hazen_k(1.5, 1.852);
    let static_head = 0.2 - 1.0;
    let circuit = PumpCircuit {
        pump: &pump,
        inlet: &inlet,
        outlet: &outlet,
        static_head,
    };

    let solved = circuit.solve(capacity(&pump, 1.0)).unwrap();

    // independent 30-step bisection of the same balance
    let balance = |q: f64| {
        pump_head(&pump, q) - (static_head + 1.5 * q.powf(1.852) + 1.5 * q.powf(1.852))
    };
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..30 {
        let mid = 0.5 * (lo + hi);
        if balance(mid) >= 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    assert!((solved - lo).abs() < 1e-3, "solved {solved}, reference {lo}");
}

#[test]
fn closed_valve_stops_capacity() {
    let pump = Pump {
        power: 100.0,
        max_flow_rate: Some(3.0),
        ..Default::default()
    };
    let mut valve = Valve::default();
    ValveCommand::parse("closed").apply(&mut valve);
    assert_eq!(capacity(&pump, valve.effective_opening()), 0.0);
    ValveCommand::parse("50%").apply(&mut valve);
    assert_eq!(capacity(&pump, valve.effective_opening()), 1.5);
}

#[test]
fn tank_geometry() {
    let tank = Tank {
        shape: TankShape::Rectangular,
        width: Some(2.0),
        height: Some(5.0),
        water_amount: 25.0,
        ..Default::default()
    };
    assert_eq!(cross_section_area(&tank).get::<square_meter>(), 10.0);
    assert_eq!(level_for(&tank).get::<meter>(), 2.5);
}
