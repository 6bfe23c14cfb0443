//! Stateless statistical helpers.
//!
//! These operate on a whole window at once (usually the ordered contents of a
//! [`CircularBuffer`](crate::kernels::CircularBuffer)) and keep no state.
//!
//! # Mathematical Conventions
//!
//! - **Population formulas**: standard deviation divides by `n`, not `n - 1`
//! - **Slope**: ordinary least squares of `y` on `x`

use crate::error::Result;
use crate::traits::{SeriesElement, ValidatedInput};

/// Arithmetic mean of `values`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `values` is empty.
///
/// # Example
///
/// ```
/// use reactive_ta::indicators::statistics::average;
///
/// assert!((average(&[1.0_f64, 2.0, 3.0, 4.0]).unwrap() - 2.5).abs() < 1e-10);
/// ```
pub fn average<T: SeriesElement>(values: &[T]) -> Result<T> {
    values.validate_not_empty()?;
    let n = T::from_usize(values.len())?;
    Ok(values.iter().fold(T::zero(), |acc, &x| acc + x) / n)
}

/// Population standard deviation of `values`.
///
/// A single value has zero deviation.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `values` is empty.
///
/// # Example
///
/// ```
/// use reactive_ta::indicators::statistics::std_dev;
///
/// let sd = std_dev(&[2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((sd - 2.0).abs() < 1e-10);
/// ```
pub fn std_dev<T: SeriesElement>(values: &[T]) -> Result<T> {
    let mean = average(values)?;
    if values.len() < 2 {
        return Ok(T::zero());
    }
    let n = T::from_usize(values.len())?;
    let sum_sq = values.iter().fold(T::zero(), |acc, &x| {
        let d = x - mean;
        acc + d * d
    });
    Ok((sum_sq / n).sqrt())
}

/// Least-squares slope of `y` regressed on `x`.
///
/// When every `x` is identical the slope is undefined and NaN is returned.
///
/// # Errors
///
/// - `Error::EmptyInput` if `x` is empty
/// - `Error::LengthMismatch` if `x` and `y` differ in length
///
/// # Example
///
/// ```
/// use reactive_ta::indicators::statistics::slope;
///
/// let x = [1.0_f64, 2.0, 3.0, 4.0];
/// let y = [3.0_f64, 5.0, 7.0, 9.0];
/// assert!((slope(&x, &y).unwrap() - 2.0).abs() < 1e-10);
/// ```
pub fn slope<T: SeriesElement>(x: &[T], y: &[T]) -> Result<T> {
    x.validate_not_empty()?;
    y.validate_same_length(x.len())?;

    let avg_x = average(x)?;
    let avg_y = average(y)?;

    let (sum_sq_x, sum_sq_xy) = x
        .iter()
        .zip(y)
        .fold((T::zero(), T::zero()), |(sxx, sxy), (&xi, &yi)| {
            let dev_x = xi - avg_x;
            let dev_y = yi - avg_y;
            (sxx + dev_x * dev_x, sxy + dev_x * dev_y)
        });

    if sum_sq_x == T::zero() {
        return Ok(T::nan());
    }
    Ok(sum_sq_xy / sum_sq_x)
}
