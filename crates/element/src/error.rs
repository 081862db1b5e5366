//! Error types.
//!
//! Malformed input is always reported through [`ParseFailure`]; nothing in
//! the parse path panics on bad bytes or text. Panics are reserved for
//! contract violations by the caller (wrong-kind accessors, out-of-range
//! indices, nodes from a different navigator).

use thiserror::Error;

use crate::value::ElementKind;

/// Structural problems found while validating a binary buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported format marker 0x{0:02x}")]
    UnsupportedFormat(u8),
    #[error("unexpected end of buffer at offset {0}")]
    UnexpectedEof(usize),
    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },
    #[error("invalid utf-8 in string at offset {0}")]
    InvalidUtf8(usize),
    #[error("object key at offset {0} is not a string")]
    NonStringKey(usize),
    #[error("unsupported extension type {ext_type} with a {len} byte payload at offset {offset}")]
    InvalidExtension {
        offset: usize,
        ext_type: i8,
        len: usize,
    },
    #[error("trailing bytes after the root value at offset {0}")]
    TrailingBytes(usize),
}

/// A configured [`Limits`](crate::Limits) bound was exceeded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LimitError {
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// A value had a different kind than the one requested.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected} but found {actual}")]
pub struct KindMismatch {
    pub expected: ElementKind,
    pub actual: ElementKind,
}

/// Failure returned by every parse entrypoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("empty input")]
    Empty,
    #[error("invalid json at line {line}, column {column}: {message}")]
    Text {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("input is neither a binary document nor utf-8 text (invalid byte at offset {offset})")]
    NotText { offset: usize },
    #[error("invalid binary document: {0}")]
    Binary(#[from] DecodeError),
    #[error(transparent)]
    Limit(#[from] LimitError),
    #[error(transparent)]
    UnexpectedKind(#[from] KindMismatch),
}

impl ParseFailure {
    /// True for failures caused by the input itself rather than by asking for
    /// the wrong kind of value.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ParseFailure::UnexpectedKind(_))
    }
}

impl From<serde_json::Error> for ParseFailure {
    fn from(err: serde_json::Error) -> Self {
        ParseFailure::Text {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Failure while serializing a value.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum WriteError {
    #[error("non-finite number {0} cannot be written as json")]
    NonFiniteNumber(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_errors_keep_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": tru }").unwrap_err();
        let failure = ParseFailure::from(err);
        match failure {
            ParseFailure::Text { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn kind_mismatch_is_not_malformed() {
        let failure = ParseFailure::from(KindMismatch {
            expected: ElementKind::Array,
            actual: ElementKind::Object,
        });
        assert!(!failure.is_malformed());
        assert_eq!(failure.to_string(), "expected array but found object");
        assert!(ParseFailure::Empty.is_malformed());
    }
}
