//! Streaming Simple Moving Average (SMA).
//!
//! The arithmetic mean of the last `period` observations. Output is NaN
//! until `period` observations have been seen.
//!
//! # Formula
//!
//! ```text
//! SMA = (P₁ + P₂ + ... + Pₙ) / n
//! ```
//!
//! # Example
//!
//! ```
//! use reactive_ta::indicators::{Sma, StreamingIndicator};
//!
//! let mut sma: Sma<f64> = Sma::new(3).unwrap();
//! let out = sma.feed([1.0, 2.0, 3.0, 4.0]);
//!
//! assert!(out[0].is_nan());
//! assert!(out[1].is_nan());
//! assert!((out[2] - 2.0).abs() < 1e-10);
//! assert!((out[3] - 3.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::indicators::StreamingIndicator;
use crate::kernels::CircularBuffer;
use crate::traits::SeriesElement;

/// Streaming simple moving average over a fixed window.
#[derive(Debug, Clone)]
pub struct Sma<T> {
    window: CircularBuffer<T>,
    period_t: T,
}

impl<T: SeriesElement> Sma<T> {
    /// Creates an SMA over `period` observations.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if `period` is zero.
    pub fn new(period: usize) -> Result<Self> {
        Ok(Self {
            window: CircularBuffer::new(period)?,
            period_t: T::from_usize(period)?,
        })
    }
}

impl<T: SeriesElement> StreamingIndicator<T> for Sma<T> {
    fn next(&mut self, value: T) -> T {
        self.window.push(value);
        if !self.window.is_full() {
            return T::nan();
        }
        // Summing the slots directly: the mean does not depend on order.
        let sum = self.window.values().iter().fold(T::zero(), |acc, &x| acc + x);
        sum / self.period_t
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn period(&self) -> usize {
        self.window.capacity()
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }
}
