//! Error types for the photometric codecs.
//!
//! This module provides a unified error type [`LuxError`] that covers
//! all error conditions that can occur while reading, validating, writing
//! and converting IES and EULUMDAT documents.

use thiserror::Error;

/// Result type alias using [`LuxError`].
pub type Result<T> = std::result::Result<T, LuxError>;

/// Unified error type for all Luxfile operations.
#[derive(Error, Debug)]
pub enum LuxError {
    // ============ I/O Errors ============
    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended where another line was required
    #[error("Unexpected end of input after line {line}")]
    UnexpectedEof { line: usize },

    /// Error opening or reading a photometric file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error creating or writing a photometric file
    #[error("Failed to write file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ Line Errors ============
    /// Line exceeds the active format's length budget (strict mode only)
    #[error("Line {line} exceeds maximum allowed length: {length} > {max}")]
    LineTooLong {
        line: usize,
        length: usize,
        max: usize,
    },

    /// Line was empty after cleanup where a value was expected
    #[error("Line {line} contains no {expected}")]
    NoValue { line: usize, expected: &'static str },

    /// Text could not be parsed as the required number type
    #[error("Malformed {expected} '{value}' at line {line}")]
    MalformedValue {
        line: usize,
        value: String,
        expected: &'static str,
    },

    /// Line matches none of the shapes expected at its position
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    // ============ Standards Errors ============
    /// Format identifier line not recognized, or revision cannot be written
    #[error("Unsupported or unrecognized format '{found}'")]
    UnsupportedFormat { found: String },

    /// Keyword not permitted by the detected revision
    #[error("Keyword '{keyword}' at line {line} is not allowed for {format}")]
    DisallowedKeyword {
        line: usize,
        keyword: String,
        format: String,
    },

    /// Revision-required keywords absent
    #[error("Required keywords missing for {format}: {}", missing.join(", "))]
    MissingRequiredKeywords { format: String, missing: Vec<String> },

    /// BLOCK/ENDBLOCK misuse
    #[error("Block nesting error at line {line}: {message}")]
    BlockNesting { line: usize, message: String },

    /// MORE or continuation line before any keyword
    #[error("Continuation at line {line} occurred before any keyword")]
    ContinuationWithoutKeyword { line: usize },

    /// TILT data in an external file
    #[error("TILT specification from file '{name}' is not supported")]
    UnsupportedTiltFile { name: String },

    /// EULUMDAT symmetry indicator outside 0..=4
    #[error("Invalid symmetry indicator {value} (expected 0-4)")]
    InvalidSymmetry { value: i64 },

    // ============ Validation Errors ============
    /// Declared count disagrees with collected length
    #[error("{field} length mismatch: expected {expected}, got {actual}")]
    ValidationMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Field value outside what the standard permits (strict validation)
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: &'static str, message: String },

    // ============ Conversion Errors ============
    /// Operation defined but deliberately not implemented
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: &'static str },

    /// Input model lacks data the conversion needs
    #[error("Conversion failed: {message}")]
    Conversion { message: String },
}

impl LuxError {
    /// Create a syntax error
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create a malformed value error
    pub fn malformed(line: usize, value: impl Into<String>, expected: &'static str) -> Self {
        Self::MalformedValue {
            line,
            value: value.into(),
            expected,
        }
    }

    /// Create a length mismatch error
    pub fn mismatch(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::ValidationMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Create a block nesting error
    pub fn block_nesting(line: usize, message: impl Into<String>) -> Self {
        Self::BlockNesting {
            line,
            message: message.into(),
        }
    }
}
