//! Versioned sequences and incrementally maintained views over them.
//!
//! - [`diff`]: the change records ([`Diff`], [`Op`], [`PathSegment`])
//! - [`history`]: the bounded per-epoch batch ring ([`HistoryBuffer`])
//! - [`source`]: the versioned container ([`VersionedVec`], [`Draft`]) and
//!   the [`DiffSource`] trait
//! - [`view`]: the incremental mapped view ([`MappedView`])
//!
//! Everything here is single-threaded and pull-based: sources record diffs
//! when updated, and views consume them only when asked for their value.

pub mod diff;
pub mod history;
pub mod source;
pub mod view;

pub use diff::{Diff, DiffBatch, Epoch, Op, PathSegment};
pub use history::HistoryBuffer;
pub use source::{DiffSource, DiffsSince, Draft, SourceId, VersionedVec};
pub use view::MappedView;
