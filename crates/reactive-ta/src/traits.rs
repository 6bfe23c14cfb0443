//! Core numeric traits.
//!
//! [`SeriesElement`] abstracts over `f32` and `f64` for the windowed
//! accumulator and the indicators built on it. [`ValidatedInput`] and
//! [`validate_period`] hold the input checks shared by those indicators.
//!
//! # Example
//!
//! ```
//! use reactive_ta::traits::{validate_period, SeriesElement, ValidatedInput};
//!
//! fn mean<T: SeriesElement>(data: &[T]) -> reactive_ta::Result<T> {
//!     data.validate_not_empty()?;
//!     let n = T::from_usize(data.len())?;
//!     Ok(data.iter().fold(T::zero(), |acc, &x| acc + x) / n)
//! }
//!
//! assert!(validate_period(0).is_err());
//! assert!((mean(&[1.0_f64, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-10);
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A numeric type usable as an element of a price series.
///
/// Extends `num_traits::Float` with the conversions indicators need when
/// turning window lengths and configuration values into the series type.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Validation helpers for input series.
pub trait ValidatedInput {
    /// The element type of the series.
    type Element: SeriesElement;

    /// Returns the length of the series.
    fn len(&self) -> usize;

    /// Returns true if the series is empty.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates that the series is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the series is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }

    /// Validates that this series is as long as a paired series.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the lengths differ.
    #[inline]
    fn validate_same_length(&self, expected: usize) -> Result<()> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                expected,
                actual: self.len(),
            })
        }
    }
}

impl<T: SeriesElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

impl<T: SeriesElement> ValidatedInput for Vec<T> {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

/// Validates that a period is usable as a window length.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if the period is zero.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}
