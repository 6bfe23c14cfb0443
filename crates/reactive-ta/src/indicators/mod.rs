//! Streaming technical analysis indicators.
//!
//! Each indicator is fed one observation at a time through
//! [`StreamingIndicator::next`] and returns NaN until its window is full.
//! Windows are held in a [`CircularBuffer`](crate::kernels::CircularBuffer).
//!
//! # Indicators
//!
//! - [`Sma`] - Simple Moving Average
//! - [`Alma`] - Arnaud Legoux Moving Average (Gaussian-weighted)
//! - [`statistics`] - stateless average, standard deviation and slope
//!
//! # Example
//!
//! ```
//! use reactive_ta::indicators::{Sma, StreamingIndicator};
//!
//! let mut sma: Sma<f64> = Sma::new(2).unwrap();
//! assert!(sma.next(1.0).is_nan());
//! assert!((sma.next(3.0) - 2.0).abs() < 1e-10);
//! ```

pub mod alma;
pub mod sma;
pub mod statistics;

pub use alma::{Alma, AlmaConfig};
pub use sma::Sma;
pub use statistics::{average, slope, std_dev};

use crate::traits::SeriesElement;

/// An indicator consuming a stream one observation at a time.
pub trait StreamingIndicator<T: SeriesElement> {
    /// Consumes one observation and returns the indicator value, NaN while warming up.
    fn next(&mut self, value: T) -> T;

    /// Forgets all observations.
    fn reset(&mut self);

    /// The window length.
    fn period(&self) -> usize;

    /// True once enough observations have been seen to produce values.
    fn is_ready(&self) -> bool;

    /// Feeds every value in order and collects the outputs.
    fn feed<I>(&mut self, values: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        values.into_iter().map(|v| self.next(v)).collect()
    }
}
