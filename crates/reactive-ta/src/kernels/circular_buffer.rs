//! Fixed-capacity windowed accumulator.
//!
//! [`CircularBuffer`] holds the last `capacity` observations of a stream.
//! Streaming indicators push one observation per step and read the window
//! back in chronological order once it is full.
//!
//! # Algorithm
//!
//! Values live in a flat array of length `capacity`. `start` is the slot the
//! next push overwrites, which once the buffer is full is also the oldest
//! value. Reading in chronological order walks `capacity` slots starting at
//! `start`, wrapping around.
//!
//! # Example
//!
//! ```
//! use reactive_ta::kernels::circular_buffer::CircularBuffer;
//!
//! let mut window: CircularBuffer<f64> = CircularBuffer::new(3).unwrap();
//! for x in [1.0, 2.0, 3.0, 4.0] {
//!     window.push(x);
//! }
//!
//! assert!(window.is_full());
//! let ordered: Vec<f64> = window.ordered_values().collect();
//! assert_eq!(ordered, vec![2.0, 3.0, 4.0]);
//! ```

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};

/// A ring buffer of the most recent `capacity` observations.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    buffer: Vec<T>,
    start: usize,
    filled: usize,
}

impl<T: SeriesElement> CircularBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        validate_period(capacity)?;
        Ok(Self {
            buffer: vec![T::zero(); capacity],
            start: 0,
            filled: 0,
        })
    }

    /// Records one more observation, evicting the oldest once at capacity.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.buffer[self.start] = value;
        self.start = (self.start + 1) % self.buffer.len();
        self.filled = (self.filled + 1).min(self.buffer.len());
    }

    /// The fixed capacity of the window.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// How many observations are held, saturating at capacity.
    #[inline]
    #[must_use]
    pub const fn filled_len(&self) -> usize {
        self.filled
    }

    /// True once `capacity` observations have been pushed.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled >= self.buffer.len()
    }

    /// The held values in chronological order, oldest first.
    ///
    /// Empty until the buffer is full. The iterator borrows the buffer and
    /// can be recreated any number of times.
    pub fn ordered_values(&self) -> impl Iterator<Item = T> + '_ {
        let len = if self.is_full() { self.buffer.len() } else { 0 };
        (0..len).map(move |i| self.buffer[(self.start + i) % self.buffer.len()])
    }

    /// The raw storage in slot order (not chronological); empty until full.
    ///
    /// Order-insensitive reductions such as sums can use this directly.
    #[must_use]
    pub fn values(&self) -> &[T] {
        if self.is_full() {
            &self.buffer
        } else {
            &[]
        }
    }

    /// The oldest held value, or NaN until the buffer is full.
    #[must_use]
    pub fn first(&self) -> T {
        if self.is_full() {
            self.buffer[self.start]
        } else {
            T::nan()
        }
    }

    /// The newest held value, or NaN until the buffer is full.
    #[must_use]
    pub fn last(&self) -> T {
        if self.is_full() {
            let len = self.buffer.len();
            self.buffer[(self.start + len - 1) % len]
        } else {
            T::nan()
        }
    }

    /// Forgets every observation; capacity is kept.
    pub fn clear(&mut self) {
        self.buffer.iter_mut().for_each(|slot| *slot = T::zero());
        self.start = 0;
        self.filled = 0;
    }
}
