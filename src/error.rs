//! Error types for row parsing operations.
//!
//! Configuration-level errors (`EmptyFile`, `EmptyHeader`, `InvalidDelimiter`)
//! always abort a parse call. Row-level errors are governed by the configured
//! [`ErrorStrategy`](crate::config::ErrorStrategy).

use crate::convert::FieldType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    /// The input had no lines at all, not even a header.
    #[error("input is empty")]
    EmptyFile,

    /// The header line was present but empty.
    #[error("header line is empty")]
    EmptyHeader,

    #[error("delimiter cannot be empty")]
    InvalidDelimiter,

    #[error("column count mismatch at line {line}: expected {expected} columns, found {found}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A column resolved to a canonical name that matches no record field.
    #[error("unknown column '{column}' at line {line}")]
    UnknownColumn { column: String, line: usize },

    /// No converter is registered for the field's declared type.
    #[error("unsupported type conversion for {ty} at line {line}")]
    UnsupportedType { ty: FieldType, line: usize },

    #[error("failed to convert '{value}' to {ty} at line {line}: {reason}")]
    ConversionFailed {
        value: String,
        ty: FieldType,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}
