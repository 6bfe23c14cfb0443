//! Change records for versioned sequences.
//!
//! A [`Diff`] describes one atomic change to a sequence. Shallow changes
//! (`Add`, `Replace`, `Remove`) carry the whole element; a length marker
//! resizes the sequence; a nested change only names the element and the
//! field path that changed inside it, because its payload would be a
//! sub-field rather than an element.
//!
//! Each diff can also be read in the generic `{path, op, value}` form, with
//! a path whose first segment is the element index or the length marker:
//!
//! ```
//! use reactive_ta::reactive::{Diff, Op, PathSegment};
//!
//! let diff: Diff<f64> = Diff::Nested {
//!     index: 1,
//!     path: vec!["close".to_string()],
//!     op: Op::Replace,
//! };
//! assert_eq!(
//!     diff.path(),
//!     vec![PathSegment::Index(1), PathSegment::Field("close".to_string())]
//! );
//! assert_eq!(diff.pointer(), "/1/close");
//! assert_eq!(diff.op(), Op::Replace);
//! assert!(diff.value().is_none());
//! ```

use std::fmt;

/// Identifies a state of a versioned sequence; incremented by one per update.
pub type Epoch = u64;

/// The diffs produced by one update, in emission order.
pub type DiffBatch<T> = Vec<Diff<T>>;

/// The kind of change a diff performs at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Something was inserted.
    Add,
    /// Something was overwritten.
    Replace,
    /// Something was deleted.
    Remove,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
        })
    }
}

/// One segment of a diff path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An element index; always the first segment of an indexed diff.
    Index(usize),
    /// The sequence length marker; only ever a whole path on its own.
    Length,
    /// A field inside an element.
    Field(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Length => f.write_str("length"),
            Self::Field(name) => f.write_str(name),
        }
    }
}

/// A single change to a sequence of `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum Diff<T> {
    /// `value` was inserted at `index`, shifting later elements up.
    Add {
        /// Insertion position.
        index: usize,
        /// The inserted element.
        value: T,
    },
    /// The element at `index` was overwritten with `value`.
    Replace {
        /// Position of the replaced element.
        index: usize,
        /// The new element.
        value: T,
    },
    /// The element at `index` was deleted, shifting later elements down.
    Remove {
        /// Position of the removed element.
        index: usize,
    },
    /// The sequence was truncated or extended to `len` elements.
    Length {
        /// The new length.
        len: usize,
    },
    /// A field inside the element at `index` changed.
    ///
    /// Consumers that need the element must read it from the sequence.
    Nested {
        /// Position of the changed element.
        index: usize,
        /// Field path inside the element; never empty.
        path: Vec<String>,
        /// What happened at the field path.
        op: Op,
    },
}

impl<T> Diff<T> {
    /// The operation in the generic form; a length marker is a replace.
    #[must_use]
    pub fn op(&self) -> Op {
        match self {
            Self::Add { .. } => Op::Add,
            Self::Replace { .. } | Self::Length { .. } => Op::Replace,
            Self::Remove { .. } => Op::Remove,
            Self::Nested { op, .. } => *op,
        }
    }

    /// The element index this diff targets; `None` for a length marker.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Add { index, .. }
            | Self::Replace { index, .. }
            | Self::Remove { index }
            | Self::Nested { index, .. } => Some(*index),
            Self::Length { .. } => None,
        }
    }

    /// The full element payload, for shallow adds and replaces.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Add { value, .. } | Self::Replace { value, .. } => Some(value),
            Self::Remove { .. } | Self::Length { .. } | Self::Nested { .. } => None,
        }
    }

    /// True for changes inside an element rather than to the sequence itself.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self, Self::Nested { .. })
    }

    /// The path in the generic form.
    ///
    /// The first segment is the element index, or [`PathSegment::Length`]
    /// for a length marker. Only nested diffs have more than one segment.
    #[must_use]
    pub fn path(&self) -> Vec<PathSegment> {
        match self {
            Self::Length { .. } => vec![PathSegment::Length],
            Self::Nested { index, path, .. } => std::iter::once(PathSegment::Index(*index))
                .chain(path.iter().cloned().map(PathSegment::Field))
                .collect(),
            Self::Add { index, .. } | Self::Replace { index, .. } | Self::Remove { index } => {
                vec![PathSegment::Index(*index)]
            }
        }
    }

    /// The path formatted as a JSON Pointer (RFC 6901), e.g. `/3/close`.
    #[must_use]
    pub fn pointer(&self) -> String {
        self.path().iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment.to_string().replace('~', "~0").replace('/', "~1"));
            acc
        })
    }
}
