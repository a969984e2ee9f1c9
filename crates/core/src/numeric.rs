//! Numeric helpers shared by the classifier, forecaster and policy calculator.
//!
//! Everything here is deterministic and total: empty inputs yield `0.0`, and
//! undefined results are reported through [`SENTINEL`] instead of `NaN` or
//! infinity.

use crate::error::{DomainError, DomainResult};

/// Stand-in for "undefined / unbounded" (CV with zero mean, MAPE with no
/// non-zero actuals, ...). Large enough to lose every comparison.
pub const SENTINEL: f64 = 999.0;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Population standard deviation (divides by N).
pub fn population_std_dev(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Replace a non-finite value by [`SENTINEL`].
pub fn finite_or_sentinel(value: f64) -> f64 {
    if value.is_finite() { value } else { SENTINEL }
}

/// Reject negative or non-finite inputs where the domain requires `>= 0`.
pub fn ensure_non_negative(field: &str, value: f64) -> DomainResult<f64> {
    if !value.is_finite() {
        return Err(DomainError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} cannot be negative (got {value})"
        )));
    }
    Ok(value)
}

/// Largest quantity the calculators hand out as whole units. Exactly
/// representable in `f64`, with headroom for stock arithmetic in `i64`.
pub const MAX_UNITS: i64 = 1_000_000_000_000_000;

/// Convert an already-rounded quantity to whole units, rejecting values that
/// are non-finite or beyond [`MAX_UNITS`].
pub fn to_units(field: &str, value: f64) -> DomainResult<i64> {
    let value = ensure_non_negative(field, value)?;
    if value > MAX_UNITS as f64 {
        return Err(DomainError::validation(format!(
            "{field} is out of range (got {value})"
        )));
    }
    Ok(value as i64)
}
