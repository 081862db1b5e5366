//! Byte buffer primitives shared by the binary navigator and the binary
//! serializer.
//!
//! [`Reader`] walks a borrowed slice with a cursor and bounds-checked reads;
//! [`Writer`] is an append-only big-endian writer.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::{BigEndian, Writer};

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
}
