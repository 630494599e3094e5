// perma - Error types for collection operations
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Error types for perma collection operations.

use std::fmt;

/// Result type for perma operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when a collection contract is violated.
///
/// Absent-key lookups on a map are not errors; they return `None`. An
/// `Error` is only produced at the call that violates an operation's
/// contract, and no operation has partial effects on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Index outside `[0, length)` on a list or node-store path
    IndexOutOfRange { index: i64, length: usize },
    /// Record access or update of a field not in its schema
    UnknownField { field: String, record: String },
    /// A single-use generator-backed Seq was forced a second time
    SequenceExhausted,
    /// Wrong value type for a conversion
    TypeError {
        expected: &'static str,
        got: &'static str,
    },
    /// Malformed JSON text passed to the JSON bridge
    InvalidJson(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfRange { index, length } => {
                write!(
                    f,
                    "Index {} out of range for collection of length {}",
                    index, length
                )
            }
            Error::UnknownField { field, record } => {
                write!(f, "Unknown field '{}' on record {}", field, record)
            }
            Error::SequenceExhausted => {
                write!(f, "Sequence source is exhausted and cannot be re-iterated")
            }
            Error::TypeError { expected, got } => {
                write!(f, "Type error: expected {}, got {}", expected, got)
            }
            Error::InvalidJson(msg) => {
                write!(f, "Invalid JSON: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Create an index-out-of-range error.
    pub fn index_out_of_range(index: i64, length: usize) -> Self {
        Error::IndexOutOfRange { index, length }
    }

    /// Create an unknown-field error.
    pub fn unknown_field(field: impl Into<String>, record: impl Into<String>) -> Self {
        Error::UnknownField {
            field: field.into(),
            record: record.into(),
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::TypeError { expected, got }
    }
}
