//! Tank geometry and temperature relaxation.

use std::f64::consts::PI;

use wt_core::units::{Area, Length, m, m2, m3};
use wt_network::{Tank, TankShape};

use crate::common::{check_finite, check_non_negative};
use crate::error::{ComponentError, ComponentResult};

/// Fraction of the gap to ambient closed per second.
pub const TEMPERATURE_RELAX_RATE: f64 = 0.001;

fn dimension(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x > 0.0 => x,
        _ => 1.0,
    }
}

/// Horizontal cross-section. Missing or non-positive dimensions count as 1 m;
/// spherical tanks use the cylindrical section of their radius.
pub fn cross_section_area(tank: &Tank) -> Area {
    let area = match tank.shape {
        TankShape::Rectangular => dimension(tank.width) * dimension(tank.height),
        TankShape::Cylindrical | TankShape::Spherical => {
            let r = dimension(tank.radius);
            PI * r * r
        }
    };
    m2(if area > 0.0 { area } else { 1.0 })
}

/// Level of the tank's current volume, capped at `maxLevel` when set.
pub fn level_for(tank: &Tank) -> Length {
    let level: Length = m3(tank.water_amount) / cross_section_area(tank);
    match tank.max_level {
        Some(cap) => level.min(m(cap)),
        None => level,
    }
}

/// Move `current` toward `ambient` over `dt` seconds.
pub fn relax_temperature(current: f64, ambient: f64, dt: f64) -> f64 {
    current + (ambient - current) * TEMPERATURE_RELAX_RATE * dt
}

/// Check user-supplied tank parameters.
pub fn check_tank(tank: &Tank) -> ComponentResult<()> {
    check_finite(tank.water_amount, "tank waterAmount")?;
    if tank.water_amount < 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "tank waterAmount must not be negative",
        });
    }
    check_finite(tank.water_level, "tank waterLevel")?;
    check_non_negative(tank.max_level, "tank maxLevel")?;
    check_non_negative(tank.radius, "tank radius")?;
    check_non_negative(tank.width, "tank width")?;
    check_non_negative(tank.height, "tank height")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::area::square_meter;
    use uom::si::length::meter;

    #[test]
    fn cylindrical_area() {
        let tank = Tank {
            radius: Some(2.0),
            ..Default::default()
        };
        assert!((cross_section_area(&tank).get::<square_meter>() - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn rectangular_defaults() {
        let tank = Tank {
            shape: TankShape::Rectangular,
            width: Some(3.0),
            height: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(cross_section_area(&tank).get::<square_meter>(), 3.0);
    }

    #[test]
    fn level_is_capped() {
        let mut tank = Tank {
            shape: TankShape::Rectangular,
            water_amount: 8.0,
            width: Some(2.0),
            height: Some(2.0),
            ..Default::default()
        };
        assert_eq!(level_for(&tank).get::<meter>(), 2.0);
        tank.max_level = Some(1.5);
        assert_eq!(level_for(&tank).get::<meter>(), 1.5);
    }

    #[test]
    fn temperature_relaxation() {
        assert!((relax_temperature(10.0, 20.0, 1.0) - 10.01).abs() < 1e-12);
        assert_eq!(relax_temperature(20.0, 20.0, 5.0), 20.0);
        // no stability bound: a huge step overshoots
        assert!(relax_temperature(10.0, 20.0, 3000.0) > 20.0);
    }

    #[test]
    fn check_rejects_negative_volume() {
        let tank = Tank {
            water_amount: -1.0,
            ..Default::default()
        };
        assert!(check_tank(&tank).is_err());
        assert!(check_tank(&Tank::default()).is_ok());
    }
}
