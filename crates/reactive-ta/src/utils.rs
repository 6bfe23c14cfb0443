//! Floating-point comparison helpers.
//!
//! Indicator outputs accumulate rounding error, so tests and callers compare
//! them with a tolerance rather than `==`. NaN is treated as equal to NaN
//! because indicators emit NaN during warm-up.
//!
//! # Example
//!
//! ```
//! use reactive_ta::utils::{approx_eq, EPSILON};
//!
//! let a = 1.0 / 3.0;
//! let b = 0.333333333333333;
//! assert!(approx_eq(a, b, EPSILON));
//! ```

use crate::traits::SeriesElement;

/// Standard epsilon for high-precision floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for results of many accumulated operations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Returns `true` if `a` and `b` are within `tolerance` of each other, or both NaN.
///
/// ```
/// use reactive_ta::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(!approx_eq(1.0, 2.0, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Element-wise [`approx_eq`] over two series; lengths must match.
#[must_use]
pub fn series_approx_eq<T: SeriesElement>(a: &[T], b: &[T], tolerance: T) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| approx_eq(x, y, tolerance))
}

/// Counts the NaN values at the start of a series (an indicator's warm-up).
///
/// ```
/// use reactive_ta::utils::count_nan_prefix;
///
/// let data = vec![f64::NAN, f64::NAN, 1.0, 2.0, f64::NAN];
/// assert_eq!(count_nan_prefix(&data), 2);
/// ```
#[inline]
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}
