//! Streaming Arnaud Legoux Moving Average (ALMA).
//!
//! ALMA weights the window with a Gaussian curve whose peak sits at
//! `offset` along the window (0 = oldest, 1 = newest). `sigma` controls the
//! curve's width: larger values give a sharper, more selective filter.
//!
//! # Formula
//!
//! ```text
//! m   = offset × (n - 1)
//! s   = n / sigma
//! wᵢ  = exp(-(i - m)² / (2 s²))          i = 0 (oldest) .. n-1 (newest)
//! ALMA = Σ wᵢ Pᵢ / Σ wᵢ
//! ```
//!
//! # Example
//!
//! ```
//! use reactive_ta::indicators::{AlmaConfig, StreamingIndicator};
//!
//! let mut alma = AlmaConfig::new().period(3).build::<f64>().unwrap();
//! let out = alma.feed([5.0, 5.0, 5.0, 5.0]);
//!
//! assert!(out[1].is_nan());
//! assert!((out[3] - 5.0).abs() < 1e-10);
//! ```

use crate::error::{Error, Result};
use crate::indicators::StreamingIndicator;
use crate::kernels::CircularBuffer;
use crate::traits::{validate_period, SeriesElement};

/// ALMA configuration.
///
/// Defaults to period 20, offset 0.85, sigma 6.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlmaConfig {
    period: usize,
    offset: f64,
    sigma: f64,
}

impl Default for AlmaConfig {
    fn default() -> Self {
        Self {
            period: 20,
            offset: 0.85,
            sigma: 6.0,
        }
    }
}

impl AlmaConfig {
    /// Creates a configuration with the standard parameters (20, 0.85, 6.0).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window length.
    ///
    /// Default: 20
    #[must_use]
    pub const fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Sets where along the window the Gaussian peaks, in `[0, 1]`.
    ///
    /// Default: 0.85
    #[must_use]
    pub const fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the Gaussian width divisor; must be positive.
    ///
    /// Default: 6.0
    #[must_use]
    pub const fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Validates the configuration and builds a streaming ALMA.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` if the period is zero
    /// - `Error::InvalidParameter` if offset is outside `[0, 1]` or sigma is not positive
    pub fn build<T: SeriesElement>(self) -> Result<Alma<T>> {
        validate_period(self.period)?;
        if !(0.0..=1.0).contains(&self.offset) {
            return Err(Error::InvalidParameter {
                name: "offset",
                reason: "offset must be within [0, 1]",
            });
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(Error::InvalidParameter {
                name: "sigma",
                reason: "sigma must be a positive finite number",
            });
        }

        let m = self.offset * (self.period as f64 - 1.0);
        let s = self.period as f64 / self.sigma;
        let weights = (0..self.period)
            .map(|i| {
                let d = i as f64 - m;
                T::from_f64((-(d * d) / (2.0 * s * s)).exp())
            })
            .collect::<Result<Vec<T>>>()?;
        let norm = weights.iter().fold(T::zero(), |acc, &w| acc + w);

        Ok(Alma {
            window: CircularBuffer::new(self.period)?,
            weights,
            norm,
        })
    }
}

/// Streaming ALMA with precomputed weights.
#[derive(Debug, Clone)]
pub struct Alma<T> {
    window: CircularBuffer<T>,
    weights: Vec<T>,
    norm: T,
}

impl<T: SeriesElement> Alma<T> {
    /// The Gaussian weights, oldest position first.
    #[must_use]
    pub fn weights(&self) -> &[T] {
        &self.weights
    }
}

impl<T: SeriesElement> StreamingIndicator<T> for Alma<T> {
    fn next(&mut self, value: T) -> T {
        self.window.push(value);
        if !self.window.is_full() {
            return T::nan();
        }
        let sum = self
            .window
            .ordered_values()
            .zip(&self.weights)
            .fold(T::zero(), |acc, (x, &w)| acc + x * w);
        sum / self.norm
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
