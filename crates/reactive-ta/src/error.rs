//! Error types for reactive-ta.
//!
//! This module defines the error type shared by the indicators, the quote
//! model and the reactive core. History exhaustion is deliberately absent:
//! it is reported through [`DiffsSince::Exhausted`](crate::reactive::DiffsSince)
//! and recovered by the mapped view, never surfaced to callers.

use thiserror::Error;

/// The main error type for reactive-ta operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// The period (window length) parameter is invalid.
    ///
    /// Returned when a window length is zero, or otherwise unusable for the
    /// requested indicator or accumulator.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Description of why the period is invalid.
        reason: &'static str,
    },

    /// A non-period indicator parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Description of the accepted range.
        reason: &'static str,
    },

    /// Failed to convert a numeric value to the target type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },

    /// Two paired series were expected to have the same length.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Length of the reference series.
        expected: usize,
        /// Length of the series that did not match.
        actual: usize,
    },

    /// A quote failed OHLCV validation.
    #[error("invalid quote: {reason}")]
    InvalidQuote {
        /// Which constraint was violated.
        reason: String,
    },

    /// Two quotes in one series share the same timestamp.
    #[error("duplicate date found on {date}")]
    DuplicateDate {
        /// The duplicated timestamp, RFC 3339 formatted.
        date: String,
    },

    /// A source update was rejected.
    ///
    /// Either the caller's transform returned an error, or it attempted an
    /// operation the draft cannot record (an out-of-range index, an empty
    /// nested path). Nothing is committed when this is returned.
    #[error("invalid transform: {reason}")]
    InvalidTransform {
        /// Description of the rejected operation.
        reason: String,
    },

    /// The mapper of a mapped view failed for one element.
    ///
    /// The view keeps its previous value and epoch when this is returned.
    #[error("mapper failed at index {index}: {reason}")]
    MapperFailure {
        /// Index of the source element being mapped.
        index: usize,
        /// The mapper's own error message.
        reason: String,
    },

    /// A mapped view was evaluated against a source it was not built for.
    #[error("mapped view evaluated against a different source")]
    SourceMismatch,
}

impl Error {
    /// Shorthand for an [`Error::InvalidTransform`] with the given reason.
    pub fn invalid_transform(reason: impl Into<String>) -> Self {
        Self::InvalidTransform {
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using the reactive-ta Error type.
pub type Result<T> = std::result::Result<T, Error>;
