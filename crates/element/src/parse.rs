//! One-shot parse entrypoints returning eager values.
//!
//! These read the input once through a [`Document`] and copy the result into
//! an `ElementValue<'static>`, so nothing borrows the input afterwards. Use
//! [`Document`] directly to keep lazy access instead.

use crate::document::Document;
use crate::error::ParseFailure;
use crate::value::{ElementValue, FromElement};
use crate::Limits;

/// Parses JSON text.
pub fn parse(text: &str) -> Result<ElementValue<'static>, ParseFailure> {
    parse_with_limits(text, &Limits::default())
}

pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<ElementValue<'static>, ParseFailure> {
    Ok(Document::parse_with_limits(text, limits)?.root().to_eager())
}

/// Parses JSON text into a specific kind, e.g. `parse_as::<ArrayValue>`.
pub fn parse_as<T: FromElement<'static>>(text: &str) -> Result<T, ParseFailure> {
    parse_as_with_limits(text, &Limits::default())
}

pub fn parse_as_with_limits<T: FromElement<'static>>(
    text: &str,
    limits: &Limits,
) -> Result<T, ParseFailure> {
    Ok(parse_with_limits(text, limits)?.into_kind()?)
}

/// Like [`parse`], discarding the failure.
pub fn try_parse(text: &str) -> Option<ElementValue<'static>> {
    parse(text).ok()
}

/// Like [`parse_as`], discarding the failure. A kind mismatch is also `None`.
pub fn try_parse_as<T: FromElement<'static>>(text: &str) -> Option<T> {
    parse_as(text).ok()
}

/// Reads a binary document or UTF-8 JSON text, chosen by the first byte.
pub fn from_buffer(buffer: &[u8]) -> Result<ElementValue<'static>, ParseFailure> {
    from_buffer_with_limits(buffer, &Limits::default())
}

pub fn from_buffer_with_limits(
    buffer: &[u8],
    limits: &Limits,
) -> Result<ElementValue<'static>, ParseFailure> {
    Ok(Document::from_buffer_with_limits(buffer, limits)?.root().to_eager())
}

pub fn from_buffer_as<T: FromElement<'static>>(buffer: &[u8]) -> Result<T, ParseFailure> {
    from_buffer_as_with_limits(buffer, &Limits::default())
}

pub fn from_buffer_as_with_limits<T: FromElement<'static>>(
    buffer: &[u8],
    limits: &Limits,
) -> Result<T, ParseFailure> {
    Ok(from_buffer_with_limits(buffer, limits)?.into_kind()?)
}

/// Like [`from_buffer`], discarding the failure.
pub fn try_from_buffer(buffer: &[u8]) -> Option<ElementValue<'static>> {
    from_buffer(buffer).ok()
}

/// Like [`from_buffer_as`], discarding the failure.
pub fn try_from_buffer_as<T: FromElement<'static>>(buffer: &[u8]) -> Option<T> {
    from_buffer_as(buffer).ok()
}
