//! Pipe resistance selection and the flow/head-loss relations.
//!
//! ## Resistance
//!
//! In order of precedence:
//!
//! ```text
//! hw section:        K given and > 0, else K = 10.67·L / (C^1.852 · D^4.8704)
//! dw section, f > 0: R = 8·f·L / (π²·g·D⁵)
//! diameter only:     Hazen-Williams from geometry, n = 1.852
//! nothing:           linear, R = 1e6
//! ```
//!
//! Missing or non-positive geometry falls back to L = 1, D = 1, C = 130.

use std::f64::consts::PI;

use wt_core::constants::G0_MPS2;
use wt_core::positive_or;
use wt_network::Pipe;

use crate::common::{EPSILON_FLOW, EPSILON_HEAD, check_non_negative, or_nonzero};
use crate::error::ComponentResult;
use crate::traits::HydraulicLink;

/// Default Hazen-Williams exponent.
pub const HAZEN_EXPONENT: f64 = 1.852;

/// Default Hazen-Williams roughness coefficient.
pub const DEFAULT_ROUGHNESS: f64 = 130.0;

/// Resistance of a pipe with no geometry at all.
pub const UNCONFIGURED_RESISTANCE: f64 = 1e6;

/// Friction model selected for a pipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resistance {
    /// Δh = K·|Q|^n
    HazenWilliams { k: f64, n: f64 },
    /// Δh = R·Q²
    DarcyWeisbach { r: f64 },
    /// Q = Δh / R, Δh = R·Q²
    Linear { r: f64 },
}

/// Hazen-Williams coefficient computed from pipe geometry.
pub fn hazen_k(pipe: &Pipe) -> f64 {
    let hw = pipe.hw.unwrap_or_default();
    let length = positive_or(or_nonzero(hw.length, pipe.length), 1.0);
    let diameter = positive_or(pipe.diameter, 1.0);
    let c = positive_or(hw.c, DEFAULT_ROUGHNESS);
    10.67 * length / (c.powf(HAZEN_EXPONENT) * diameter.powf(4.8704))
}

impl Resistance {
    pub fn of(pipe: &Pipe) -> Self {
        if let Some(hw) = pipe.hw {
            let n = hw.n.unwrap_or(HAZEN_EXPONENT);
            let k = match hw.k {
                Some(k) if k > 0.0 => k,
                _ => hazen_k(pipe),
            };
            return Resistance::HazenWilliams { k, n };
        }

        if let Some(dw) = pipe.dw {
            let f = positive_or(dw.f, 0.0);
            let length = positive_or(or_nonzero(dw.length, pipe.length), 1.0);
            let diameter = positive_or(or_nonzero(dw.diameter, pipe.diameter), 1.0);
            if f > 0.0 {
                let r = f * 8.0 * length / (PI * PI * G0_MPS2 * diameter.powi(5));
                if r > 0.0 {
                    return Resistance::DarcyWeisbach { r };
                }
            }
        }

        if or_nonzero(pipe.diameter, None).is_some() {
            return Resistance::HazenWilliams {
                k: hazen_k(pipe),
                n: HAZEN_EXPONENT,
            };
        }

        Resistance::Linear {
            r: UNCONFIGURED_RESISTANCE,
        }
    }

    /// Flow magnitude for a non-negative head difference.
    pub fn flow_magnitude(&self, dh: f64) -> f64 {
        match *self {
            Resistance::HazenWilliams { k, n } => (dh / k).powf(1.0 / n),
            Resistance::DarcyWeisbach { r } => (dh / r).sqrt(),
            Resistance::Linear { r } => dh / r,
        }
    }

    /// Head loss for a non-negative flow magnitude.
    pub fn loss_magnitude(&self, q: f64) -> f64 {
        match *self {
            Resistance::HazenWilliams { k, n } => k * q.powf(n),
            Resistance::DarcyWeisbach { r } | Resistance::Linear { r } => r * q * q,
        }
    }
}

impl HydraulicLink for Pipe {
    fn label(&self) -> String {
        Pipe::label(self)
    }

    fn flow_from_head(&self, dh: f64) -> f64 {
        if dh.abs() < EPSILON_HEAD {
            return 0.0;
        }
        let mut rate = Resistance::of(self).flow_magnitude(dh.abs());
        if let Some(cap) = self.max_flow_rate
            && cap >= 0.0
        {
            rate = rate.min(cap);
        }
        if dh >= 0.0 { rate } else { -rate }
    }

    fn head_loss(&self, flow: f64) -> f64 {
        let q = flow.abs();
        if q < EPSILON_FLOW {
            return 0.0;
        }
        Resistance::of(self).loss_magnitude(q)
    }
}

/// Check user-supplied pipe geometry.
pub fn check_pipe(pipe: &Pipe) -> ComponentResult<()> {
    check_non_negative(pipe.length, "pipe length")?;
    check_non_negative(pipe.diameter, "pipe diameter")?;
    check_non_negative(pipe.max_flow_rate, "pipe maxFlowRate")?;
    if let Some(hw) = pipe.hw {
        check_non_negative(hw.k, "hw.K")?;
        check_non_negative(hw.n, "hw.n")?;
        check_non_negative(hw.length, "hw.length")?;
        check_non_negative(hw.c, "hw.C")?;
    }
    if let Some(dw) = pipe.dw {
        check_non_negative(dw.f, "dw.f")?;
        check_non_negative(dw.length, "dw.length")?;
        check_non_negative(dw.diameter, "dw.diameter")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wt_network::{DarcyWeisbach, HazenWilliams};

    #[test]
    fn explicit_hazen_k() {
        let pipe = Pipe::new("a", "b").with_hazen_k(4.0, 1.852);
        assert_eq!(
            Resistance::of(&pipe),
            Resistance::HazenWilliams { k: 4.0, n: 1.852 }
        );
        let q = pipe.flow_from_head(2.0);
        assert!((q - 0.5f64.powf(1.0 / 1.852)).abs() < 1e-12);
        assert!((pipe.flow_from_head(-2.0) + q).abs() < 1e-12);
    }

    #[test]
    fn hazen_from_geometry() {
        let mut pipe = Pipe::new("a", "b");
        pipe.length = Some(100.0);
        pipe.diameter = Some(0.2);
        pipe.hw = Some(HazenWilliams {
            c: Some(120.0),
            ..Default::default()
        });
        let expected = 10.67 * 100.0 / (120f64.powf(1.852) * 0.2f64.powf(4.8704));
        match Resistance::of(&pipe) {
            Resistance::HazenWilliams { k, n } => {
                assert!((k - expected).abs() < 1e-9 * expected);
                assert_eq!(n, 1.852);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn darcy_resistance() {
        let pipe = Pipe::new("a", "b").with_darcy(0.02, 10.0, 0.1);
        let expected = 0.02 * 8.0 * 10.0 / (PI * PI * G0_MPS2 * 0.1f64.powi(5));
        match Resistance::of(&pipe) {
            Resistance::DarcyWeisbach { r } => assert!((r - expected).abs() < 1e-9 * expected),
            other => panic!("unexpected {other:?}"),
        }
        let q = pipe.flow_from_head(3.0);
        assert!((pipe.head_loss(q) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn darcy_without_friction_falls_through() {
        let mut pipe = Pipe::new("a", "b");
        pipe.dw = Some(DarcyWeisbach {
            f: Some(0.0),
            ..Default::default()
        });
        assert_eq!(
            Resistance::of(&pipe),
            Resistance::Linear {
                r: UNCONFIGURED_RESISTANCE
            }
        );

        pipe.diameter = Some(0.5);
        assert!(matches!(
            Resistance::of(&pipe),
            Resistance::HazenWilliams { n, .. } if n == HAZEN_EXPONENT
        ));
    }

    #[test]
    fn unconfigured_pipe_is_linear() {
        let pipe = Pipe::new("a", "b");
        assert!((pipe.flow_from_head(2.0) - 2e-6).abs() < 1e-18);
        assert!((pipe.head_loss(1e-3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn small_values_are_zero() {
        let pipe = Pipe::new("a", "b").with_hazen_k(1.0, 2.0);
        assert_eq!(pipe.flow_from_head(1e-10), 0.0);
        assert_eq!(pipe.head_loss(1e-13), 0.0);
    }

    #[test]
    fn max_flow_caps_both_directions() {
        let mut pipe = Pipe::new("a", "b").with_hazen_k(1.0, 2.0);
        pipe.max_flow_rate = Some(0.5);
        assert_eq!(pipe.flow_from_head(100.0), 0.5);
        assert_eq!(pipe.flow_from_head(-100.0), -0.5);
    }

    #[test]
    fn check_rejects_negative_geometry() {
        let mut pipe = Pipe::new("a", "b");
        pipe.diameter = Some(-1.0);
        assert!(check_pipe(&pipe).is_err());
        assert!(check_pipe(&Pipe::new("a", "b").with_darcy(0.02, 1.0, 0.1)).is_ok());
    }

    proptest! {
        #[test]
        fn larger_k_means_less_flow(k in 0.01f64..100.0, extra in 0.01f64..100.0, dh in 0.01f64..50.0) {
            let low = Pipe::new("a", "b").with_hazen_k(k, 1.852);
            let high = Pipe::new("a", "b").with_hazen_k(k + extra, 1.852);
            prop_assert!(high.flow_from_head(dh) < low.flow_from_head(dh));
        }

        #[test]
        fn larger_f_means_less_flow(f in 0.001f64..0.1, extra in 0.001f64..0.1, dh in 0.01f64..50.0) {
            let low = Pipe::new("a", "b").with_darcy(f, 10.0, 0.1);
            let high = Pipe::new("a", "b").with_darcy(f + extra, 10.0, 0.1);
            prop_assert!(high.flow_from_head(dh) < low.flow_from_head(dh));
        }

        #[test]
        fn head_loss_inverts_flow(k in 0.1f64..10.0, dh in 0.01f64..20.0) {
            let pipe = Pipe::new("a", "b").with_hazen_k(k, 1.852);
            let q = pipe.flow_from_head(dh);
            prop_assert!((pipe.head_loss(q) - dh).abs() < 1e-9 * dh.max(1.0));
        }
    }
}
