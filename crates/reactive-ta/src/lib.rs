//! reactive-ta: Incremental technical analysis over versioned price series
//!
//! This crate keeps derived series (prices projected from quotes, or any
//! other per-element mapping) up to date by replaying recorded diffs instead
//! of recomputing them, and provides streaming moving averages to consume
//! them.
//!
//! # Features
//!
//! - **Versioned sources**: [`reactive::VersionedVec`] records every mutation
//!   as diffs in a bounded, epoch-keyed history
//! - **Incremental views**: [`reactive::MappedView`] replays those diffs and
//!   falls back to a full remap when the history no longer reaches back
//! - **Quotes**: validated OHLCV bars in a date-ordered [`quotes::Quotes`] series
//! - **Streaming indicators**: SMA and ALMA over a fixed-size ring buffer
//!
//! # Quick Start
//!
//! ```
//! use reactive_ta::prelude::*;
//!
//! let mut source = VersionedVec::new(vec![1.0_f64, 2.0, 3.0], 16);
//! let mut doubled = MappedView::new(&source, |v: &f64| v * 2.0, 16);
//! assert_eq!(doubled.value(&source).unwrap(), &[2.0, 4.0, 6.0]);
//!
//! // Only the inserted element goes through the mapper.
//! source.update(|draft| draft.insert(1, 10.0)).unwrap();
//! assert_eq!(doubled.value(&source).unwrap(), &[2.0, 20.0, 4.0, 6.0]);
//!
//! let mut sma: Sma<f64> = Sma::new(2).unwrap();
//! let smoothed = sma.feed(doubled.value(&source).unwrap().iter().copied());
//! assert!(smoothed[0].is_nan());
//! assert!((smoothed[1] - 11.0).abs() < 1e-10);
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]. History exhaustion is
//! not an error; views recover from it on their own:
//!
//! ```
//! use reactive_ta::prelude::*;
//!
//! let mut source = VersionedVec::new(vec![1, 2, 3], 16);
//! let result = source.update(|draft| draft.remove(5).map(drop));
//! assert!(matches!(result, Err(Error::InvalidTransform { .. })));
//! assert_eq!(source.epoch(), 0);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod indicators;
pub mod kernels;
pub mod prelude;
pub mod quote;
pub mod quotes;
pub mod reactive;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use reactive::{Diff, DiffSource, Epoch, MappedView, VersionedVec};
pub use traits::{SeriesElement, ValidatedInput};
pub use utils::{approx_eq, count_nan_prefix, series_approx_eq, EPSILON, LOOSE_EPSILON};
