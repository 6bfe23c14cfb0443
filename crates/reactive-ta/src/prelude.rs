//! Commonly used types and traits for convenient importing.
//!
//! # Usage
//!
//! ```
//! use reactive_ta::prelude::*;
//!
//! let mut prices = VersionedVec::new(vec![10.0_f64, 11.0, 12.0], 8);
//! let mut view = MappedView::new(&prices, |p: &f64| p / 10.0, 8);
//! prices.update(|draft| draft.set(0, 20.0).map(drop)).unwrap();
//!
//! assert_eq!(view.value(&prices).unwrap(), &[2.0, 1.1, 1.2]);
//! ```
//!
//! # Contents
//!
//! ## Error Handling
//! - [`Error`], [`Result`]
//!
//! ## Reactive Core
//! - [`VersionedVec`], [`Draft`], [`MappedView`], [`DiffSource`], [`DiffsSince`]
//! - [`Diff`], [`Op`], [`Epoch`]
//!
//! ## Quotes
//! - [`Quote`], [`CandlePart`], [`Quotes`]
//!
//! ## Indicators
//! - [`Sma`], [`Alma`], [`AlmaConfig`], [`StreamingIndicator`], [`CircularBuffer`]

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::traits::{SeriesElement, ValidatedInput};

// Reactive core
pub use crate::reactive::{Diff, DiffSource, DiffsSince, Draft, Epoch, MappedView, Op, VersionedVec};

// Quotes
pub use crate::quote::{CandlePart, Quote};
pub use crate::quotes::{Quotes, DEFAULT_HISTORY_CAPACITY};

// Indicators
pub use crate::indicators::{average, slope, std_dev, Alma, AlmaConfig, Sma, StreamingIndicator};
pub use crate::kernels::CircularBuffer;
