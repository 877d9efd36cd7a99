use crate::WtError;

/// Floating point type used throughout the engine
pub type Real = f64;

/// Absolute/relative tolerance pair
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tolerance used to match schedule times against tick times.
    pub const SCHEDULE: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, WtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WtError::NonFinite { what, value: v })
    }
}

/// Clamp into `[lo, hi]`, mapping NaN to `lo`.
pub fn clamp_or_low(v: Real, lo: Real, hi: Real) -> Real {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

/// Clamp into `[0, 1]`.
pub fn unit_clamp(v: Real) -> Real {
    clamp_or_low(v, 0.0, 1.0)
}

/// Use `v` when it is present and strictly positive, otherwise `fallback`.
pub fn positive_or(v: Option<Real>, fallback: Real) -> Real {
    match v {
        Some(x) if x > 0.0 => x,
        _ => fallback,
    }
}

/// Parse the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// Accepts an optional sign, decimal digits with an optional fraction and
/// exponent, or `Infinity`. Trailing garbage is ignored: `"12.5 m"` is 12.5.
/// Returns `None` when no digits lead the string.
pub fn parse_leading_float(text: &str) -> Option<Real> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        let inf = Real::INFINITY;
        return Some(if bytes.first() == Some(&b'-') { -inf } else { inf });
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances::default();
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn schedule_tolerance_absorbs_accumulation() {
        let mut t = 0.0;
        for _ in 0..10 {
            t += 0.1;
        }
        assert_ne!(t, 1.0);
        assert!(nearly_equal(t, 1.0, Tolerances::SCHEDULE));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        assert!(format!("{err}").contains("Non-finite"));
    }

    #[test]
    fn positive_or_falls_back() {
        assert_eq!(positive_or(Some(2.0), 1.0), 2.0);
        assert_eq!(positive_or(Some(0.0), 1.0), 1.0);
        assert_eq!(positive_or(Some(-3.0), 1.0), 1.0);
        assert_eq!(positive_or(None, 130.0), 130.0);
    }

    #[test]
    fn nan_clamps_low() {
        assert_eq!(unit_clamp(f64::NAN), 0.0);
        assert_eq!(clamp_or_low(f64::NAN, 2.0, 3.0), 2.0);
    }

    #[test]
    fn leading_float_prefixes() {
        assert_eq!(parse_leading_float("42"), Some(42.0));
        assert_eq!(parse_leading_float("  -1.5e2xyz"), Some(-150.0));
        assert_eq!(parse_leading_float("50%"), Some(50.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("3."), Some(3.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_leading_float("open"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    proptest! {
        #[test]
        fn unit_clamp_stays_in_range(v in proptest::num::f64::ANY) {
            let c = unit_clamp(v);
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
