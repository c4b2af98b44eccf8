//! Numeric helpers shared by the overlap and suppression routines.

use crate::util::{NmsError, NmsResult};
use num_traits::{Float, NumCast};
use std::cmp::Ordering;
use std::fmt::Debug;

/// Floating-point element type accepted by every routine in the crate.
///
/// Implemented for `f32` and `f64`; outputs always keep the input element
/// type.
pub trait Element: Float + Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Float + Debug + Send + Sync + 'static {}

/// Casts an `f64` configuration value to the element type.
pub(crate) fn cast<T: Element>(value: f64) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::nan)
}

/// Orders scores descending; NaN sorts after every number.
pub(crate) fn score_cmp_desc<T: Element>(a: T, b: T) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Validates a threshold that must lie in `[0, 1]`.
pub(crate) fn check_unit_interval(name: &'static str, value: f64) -> NmsResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(NmsError::InvalidThreshold {
            name,
            value,
            expected: "a value in [0, 1]",
        });
    }
    Ok(())
}

/// Validates a finite, strictly positive parameter.
pub(crate) fn check_positive(name: &'static str, value: f64) -> NmsResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(NmsError::InvalidThreshold {
            name,
            value,
            expected: "a finite value > 0",
        });
    }
    Ok(())
}

/// Validates a finite, non-negative parameter.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> NmsResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(NmsError::InvalidThreshold {
            name,
            value,
            expected: "a finite value >= 0",
        });
    }
    Ok(())
}
