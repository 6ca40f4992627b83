use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons
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

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidInput {
            what,
            value: v,
            reason: "must be greater than zero",
        })
    }
}

/// Finite and zero or greater.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidInput {
            what,
            value: v,
            reason: "must not be negative",
        })
    }
}

/// Finite and inside the closed interval `[lo, hi]`.
pub fn ensure_in_range(v: Real, lo: Real, hi: Real, what: &'static str) -> Result<Real, CoreError> {
    ensure_finite(v, what)?;
    if (lo..=hi).contains(&v) {
        Ok(v)
    } else {
        Err(CoreError::InvalidInput {
            what,
            value: v,
            reason: "outside allowed range",
        })
    }
}
