//! Navigator over the binary document format.
//!
//! A binary document is one [`BINARY_FORMAT_MARKER`] byte followed by a single
//! MessagePack value. Native MessagePack integers and floats are untyped
//! numbers; typed numbers and GUIDs travel as fixed-size extensions with
//! big-endian payloads (see [`ext_type`]).
//!
//! The whole buffer is validated once, iteratively, when the navigator is
//! built. Navigation afterwards re-reads headers in place and never allocates.

use doc_element_buffers::Reader;
use uuid::Uuid;

use super::{
    kind_violation, Navigator, NavigatorNode, NodeIter, NodeKind, ObjectProperty, PropertyIter,
    SerializationFormat,
};
use crate::error::{DecodeError, ParseFailure};
use crate::Limits;

/// First byte of every binary document.
///
/// `0x80` is an empty MessagePack map, which never starts JSON text and never
/// starts a valid UTF-8 sequence.
pub const BINARY_FORMAT_MARKER: u8 = 0x80;

/// MessagePack extension type codes for the typed kinds.
pub(crate) mod ext_type {
    pub const INT8: i8 = 1;
    pub const INT16: i8 = 2;
    pub const INT32: i8 = 3;
    pub const INT64: i8 = 4;
    pub const UINT32: i8 = 5;
    pub const FLOAT32: i8 = 6;
    pub const FLOAT64: i8 = 7;
    pub const GUID: i8 = 8;
}

/// Node kind of an extension, or `None` when the type code or payload size
/// is not one this format defines.
fn ext_kind(code: i8, len: usize) -> Option<NodeKind> {
    let kind = match (code, len) {
        (ext_type::INT8, 1) => NodeKind::Int8,
        (ext_type::INT16, 2) => NodeKind::Int16,
        (ext_type::INT32, 4) => NodeKind::Int32,
        (ext_type::INT64, 8) => NodeKind::Int64,
        (ext_type::UINT32, 4) => NodeKind::UInt32,
        (ext_type::FLOAT32, 4) => NodeKind::Float32,
        (ext_type::FLOAT64, 8) => NodeKind::Float64,
        (ext_type::GUID, 16) => NodeKind::Guid,
        _ => return None,
    };
    Some(kind)
}

/// One decoded MessagePack header. Payloads are referenced by offset.
#[derive(Debug, Clone, Copy)]
enum Header {
    Null,
    False,
    True,
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Str { start: usize, len: usize },
    Bin { start: usize, len: usize },
    Array { len: usize },
    Map { len: usize },
    Ext { code: i8, start: usize, len: usize },
}

impl Header {
    fn kind(self) -> NodeKind {
        match self {
            Header::Null => NodeKind::Null,
            Header::False => NodeKind::False,
            Header::True => NodeKind::True,
            Header::Int(_) | Header::UInt(_) | Header::Float32(_) | Header::Float64(_) => {
                NodeKind::Number
            }
            Header::Str { .. } => NodeKind::String,
            Header::Bin { .. } => NodeKind::Binary,
            Header::Array { .. } => NodeKind::Array,
            Header::Map { .. } => NodeKind::Object,
            Header::Ext { code, len, .. } => match ext_kind(code, len) {
                Some(kind) => kind,
                None => unreachable!("extension {code}/{len} passed validation"),
            },
        }
    }
}

/// Reads one header and skips over its inline payload. Container children are
/// left unread.
fn read_header(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    let offset = reader.pos;
    let eof = |_| DecodeError::UnexpectedEof(offset);
    let byte = reader.try_u8().map_err(eof)?;
    let header = match byte {
        0x00..=0x7f => Header::Int(byte as i64),
        0x80..=0x8f => Header::Map {
            len: (byte & 0x0f) as usize,
        },
        0x90..=0x9f => Header::Array {
            len: (byte & 0x0f) as usize,
        },
        0xa0..=0xbf => str_header(reader, (byte & 0x1f) as usize, offset)?,
        0xc0 => Header::Null,
        0xc1 => return Err(DecodeError::InvalidByte { offset, byte }),
        0xc2 => Header::False,
        0xc3 => Header::True,
        0xc4 => {
            let len = reader.try_u8().map_err(eof)? as usize;
            bin_header(reader, len, offset)?
        }
        0xc5 => {
            let len = reader.try_u16().map_err(eof)? as usize;
            bin_header(reader, len, offset)?
        }
        0xc6 => {
            let len = reader.try_u32().map_err(eof)? as usize;
            bin_header(reader, len, offset)?
        }
        0xc7 => {
            let len = reader.try_u8().map_err(eof)? as usize;
            ext_header(reader, len, offset)?
        }
        0xc8 => {
            let len = reader.try_u16().map_err(eof)? as usize;
            ext_header(reader, len, offset)?
        }
        0xc9 => {
            let len = reader.try_u32().map_err(eof)? as usize;
            ext_header(reader, len, offset)?
        }
        0xca => Header::Float32(f32::from_be_bytes(reader.try_array().map_err(eof)?)),
        0xcb => Header::Float64(f64::from_be_bytes(reader.try_array().map_err(eof)?)),
        0xcc => Header::UInt(reader.try_u8().map_err(eof)? as u64),
        0xcd => Header::UInt(reader.try_u16().map_err(eof)? as u64),
        0xce => Header::UInt(reader.try_u32().map_err(eof)? as u64),
        0xcf => Header::UInt(u64::from_be_bytes(reader.try_array().map_err(eof)?)),
        0xd0 => Header::Int(i8::from_be_bytes(reader.try_array().map_err(eof)?) as i64),
        0xd1 => Header::Int(i16::from_be_bytes(reader.try_array().map_err(eof)?) as i64),
        0xd2 => Header::Int(i32::from_be_bytes(reader.try_array().map_err(eof)?) as i64),
        0xd3 => Header::Int(i64::from_be_bytes(reader.try_array().map_err(eof)?)),
        0xd4 => ext_header(reader, 1, offset)?,
        0xd5 => ext_header(reader, 2, offset)?,
        0xd6 => ext_header(reader, 4, offset)?,
        0xd7 => ext_header(reader, 8, offset)?,
        0xd8 => ext_header(reader, 16, offset)?,
        0xd9 => {
            let len = reader.try_u8().map_err(eof)? as usize;
            str_header(reader, len, offset)?
        }
        0xda => {
            let len = reader.try_u16().map_err(eof)? as usize;
            str_header(reader, len, offset)?
        }
        0xdb => {
            let len = reader.try_u32().map_err(eof)? as usize;
            str_header(reader, len, offset)?
        }
        0xdc => Header::Array {
            len: reader.try_u16().map_err(eof)? as usize,
        },
        0xdd => Header::Array {
            len: reader.try_u32().map_err(eof)? as usize,
        },
        0xde => Header::Map {
            len: reader.try_u16().map_err(eof)? as usize,
        },
        0xdf => Header::Map {
            len: reader.try_u32().map_err(eof)? as usize,
        },
        0xe0..=0xff => Header::Int(byte as i8 as i64),
    };
    Ok(header)
}

fn payload(reader: &mut Reader<'_>, len: usize, offset: usize) -> Result<usize, DecodeError> {
    let start = reader.pos;
    reader
        .try_skip(len)
        .map_err(|_| DecodeError::UnexpectedEof(offset))?;
    Ok(start)
}

fn str_header(reader: &mut Reader<'_>, len: usize, offset: usize) -> Result<Header, DecodeError> {
    let start = payload(reader, len, offset)?;
    Ok(Header::Str { start, len })
}

fn bin_header(reader: &mut Reader<'_>, len: usize, offset: usize) -> Result<Header, DecodeError> {
    let start = payload(reader, len, offset)?;
    Ok(Header::Bin { start, len })
}

fn ext_header(reader: &mut Reader<'_>, len: usize, offset: usize) -> Result<Header, DecodeError> {
    let code = reader
        .try_u8()
        .map_err(|_| DecodeError::UnexpectedEof(offset))? as i8;
    let start = payload(reader, len, offset)?;
    Ok(Header::Ext { code, start, len })
}

/// An open container during validation.
enum Frame {
    Array { remaining: usize },
    Map { remaining: usize, key_next: bool },
}

impl Frame {
    fn advance(&mut self) {
        match self {
            Frame::Array { remaining } => *remaining -= 1,
            Frame::Map {
                remaining,
                key_next,
            } => {
                if *key_next {
                    *key_next = false;
                } else {
                    *remaining -= 1;
                    *key_next = true;
                }
            }
        }
    }

    fn done(&self) -> bool {
        match self {
            Frame::Array { remaining } | Frame::Map { remaining, .. } => *remaining == 0,
        }
    }
}

/// Walks the value after the marker without recursion.
fn validate(buffer: &[u8], limits: &Limits) -> Result<(), ParseFailure> {
    let mut reader = Reader::at(buffer, 1);
    let mut stack: Vec<Frame> = Vec::new();
    loop {
        let offset = reader.pos;
        let expects_key = matches!(stack.last(), Some(Frame::Map { key_next: true, .. }));
        let header = read_header(&mut reader)?;
        match header {
            Header::Str { start, len } => {
                if std::str::from_utf8(&buffer[start..start + len]).is_err() {
                    return Err(DecodeError::InvalidUtf8(offset).into());
                }
            }
            _ if expects_key => return Err(DecodeError::NonStringKey(offset).into()),
            Header::Ext { code, len, .. } if ext_kind(code, len).is_none() => {
                return Err(DecodeError::InvalidExtension {
                    offset,
                    ext_type: code,
                    len,
                }
                .into());
            }
            _ => {}
        }
        if let Some(frame) = stack.last_mut() {
            frame.advance();
        }
        match header {
            Header::Array { len } => {
                limits.check_depth(stack.len() + 1)?;
                if len > 0 {
                    stack.push(Frame::Array { remaining: len });
                }
            }
            Header::Map { len } => {
                limits.check_depth(stack.len() + 1)?;
                if len > 0 {
                    stack.push(Frame::Map {
                        remaining: len,
                        key_next: true,
                    });
                }
            }
            _ => {}
        }
        while stack.last().is_some_and(Frame::done) {
            stack.pop();
        }
        if stack.is_empty() {
            break;
        }
    }
    if reader.pos != buffer.len() {
        return Err(DecodeError::TrailingBytes(reader.pos).into());
    }
    Ok(())
}

/// Offset just past the value starting at `position`.
fn skip_value(buffer: &[u8], position: usize) -> usize {
    let mut reader = Reader::at(buffer, position);
    let mut pending = 1usize;
    while pending > 0 {
        pending -= 1;
        match read_header(&mut reader) {
            Ok(Header::Array { len }) => pending += len,
            Ok(Header::Map { len }) => pending += 2 * len,
            Ok(_) => {}
            Err(err) => panic!("node at offset {position} does not belong to this buffer: {err}"),
        }
    }
    reader.pos
}

/// Reads a validated binary document in place.
#[derive(Debug, Clone, Copy)]
pub struct BinaryNavigator<'a> {
    buffer: &'a [u8],
}

impl<'a> BinaryNavigator<'a> {
    /// Validates `buffer` under the default [`Limits`].
    pub fn new(buffer: &'a [u8]) -> Result<Self, ParseFailure> {
        Self::with_limits(buffer, &Limits::default())
    }

    pub fn with_limits(buffer: &'a [u8], limits: &Limits) -> Result<Self, ParseFailure> {
        limits.check_input_size(buffer.len())?;
        match buffer.first() {
            None => return Err(ParseFailure::Empty),
            Some(&BINARY_FORMAT_MARKER) => {}
            Some(&other) => return Err(DecodeError::UnsupportedFormat(other).into()),
        }
        validate(buffer, limits)?;
        tracing::trace!(target: "doc_element", len = buffer.len(), "binary navigator ready");
        Ok(Self { buffer })
    }

    /// The whole document, marker included.
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Header of the node and the offset of whatever follows it.
    #[track_caller]
    fn header_at(&self, node: NavigatorNode) -> (Header, usize) {
        let mut reader = Reader::at(self.buffer, node.position());
        match read_header(&mut reader) {
            Ok(header) => (header, reader.pos),
            Err(err) => panic!(
                "node at offset {} does not belong to this buffer: {err}",
                node.position()
            ),
        }
    }

    #[track_caller]
    fn ext_payload<const N: usize>(&self, node: NavigatorNode, expected: NodeKind) -> [u8; N] {
        let (header, _) = self.header_at(node);
        match header {
            Header::Ext { code, start, len } if ext_kind(code, len) == Some(expected) => {
                let mut out = [0u8; N];
                out.copy_from_slice(&self.buffer[start..start + N]);
                out
            }
            other => kind_violation(expected, other.kind()),
        }
    }

    #[track_caller]
    fn array_header(&self, node: NavigatorNode) -> (usize, usize) {
        match self.header_at(node) {
            (Header::Array { len }, first) => (len, first),
            (other, _) => kind_violation(NodeKind::Array, other.kind()),
        }
    }

    #[track_caller]
    fn map_header(&self, node: NavigatorNode) -> (usize, usize) {
        match self.header_at(node) {
            (Header::Map { len }, first) => (len, first),
            (other, _) => kind_violation(NodeKind::Object, other.kind()),
        }
    }
}

struct BinaryItems<'a> {
    buffer: &'a [u8],
    next: usize,
    remaining: usize,
}

impl Iterator for BinaryItems<'_> {
    type Item = NavigatorNode;

    fn next(&mut self) -> Option<NavigatorNode> {
        if self.remaining == 0 {
            return None;
        }
        let node = NavigatorNode::new(self.next);
        self.next = skip_value(self.buffer, self.next);
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

struct BinaryProperties<'a> {
    buffer: &'a [u8],
    next: usize,
    remaining: usize,
}

impl Iterator for BinaryProperties<'_> {
    type Item = ObjectProperty;

    fn next(&mut self) -> Option<ObjectProperty> {
        if self.remaining == 0 {
            return None;
        }
        let name = NavigatorNode::field_name(self.next);
        let value_at = skip_value(self.buffer, self.next);
        self.next = skip_value(self.buffer, value_at);
        self.remaining -= 1;
        Some(ObjectProperty {
            name,
            value: NavigatorNode::new(value_at),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl Navigator for BinaryNavigator<'_> {
    fn serialization_format(&self) -> SerializationFormat {
        SerializationFormat::Binary
    }

    fn root_node(&self) -> NavigatorNode {
        NavigatorNode::new(1)
    }

    fn node_kind(&self, node: NavigatorNode) -> NodeKind {
        match self.header_at(node).0 {
            Header::Str { .. } if node.is_field_name() => NodeKind::FieldName,
            header => header.kind(),
        }
    }

    fn number_value(&self, node: NavigatorNode) -> f64 {
        match self.header_at(node).0 {
            Header::Int(v) => v as f64,
            Header::UInt(v) => v as f64,
            Header::Float32(v) => v as f64,
            Header::Float64(v) => v,
            other => kind_violation(NodeKind::Number, other.kind()),
        }
    }

    fn int8_value(&self, node: NavigatorNode) -> i8 {
        i8::from_be_bytes(self.ext_payload(node, NodeKind::Int8))
    }

    fn int16_value(&self, node: NavigatorNode) -> i16 {
        i16::from_be_bytes(self.ext_payload(node, NodeKind::Int16))
    }

    fn int32_value(&self, node: NavigatorNode) -> i32 {
        i32::from_be_bytes(self.ext_payload(node, NodeKind::Int32))
    }

    fn int64_value(&self, node: NavigatorNode) -> i64 {
        i64::from_be_bytes(self.ext_payload(node, NodeKind::Int64))
    }

    fn uint32_value(&self, node: NavigatorNode) -> u32 {
        u32::from_be_bytes(self.ext_payload(node, NodeKind::UInt32))
    }

    fn float32_value(&self, node: NavigatorNode) -> f32 {
        f32::from_be_bytes(self.ext_payload(node, NodeKind::Float32))
    }

    fn float64_value(&self, node: NavigatorNode) -> f64 {
        f64::from_be_bytes(self.ext_payload(node, NodeKind::Float64))
    }

    fn string_value(&self, node: NavigatorNode) -> &str {
        match self.header_at(node).0 {
            // Checked during validation.
            Header::Str { start, len } => {
                std::str::from_utf8(&self.buffer[start..start + len]).unwrap_or("")
            }
            other => kind_violation(NodeKind::String, other.kind()),
        }
    }

    fn guid_value(&self, node: NavigatorNode) -> Uuid {
        Uuid::from_bytes(self.ext_payload(node, NodeKind::Guid))
    }

    fn binary_value(&self, node: NavigatorNode) -> &[u8] {
        match self.header_at(node).0 {
            Header::Bin { start, len } => &self.buffer[start..start + len],
            other => kind_violation(NodeKind::Binary, other.kind()),
        }
    }

    fn array_item_count(&self, node: NavigatorNode) -> usize {
        self.array_header(node).0
    }

    fn array_item_at(&self, node: NavigatorNode, index: usize) -> NavigatorNode {
        let (len, first) = self.array_header(node);
        if index >= len {
            panic!("array index {index} out of range for {len} items");
        }
        let mut position = first;
        for _ in 0..index {
            position = skip_value(self.buffer, position);
        }
        NavigatorNode::new(position)
    }

    fn array_items(&self, node: NavigatorNode) -> NodeIter<'_> {
        let (len, first) = self.array_header(node);
        Box::new(BinaryItems {
            buffer: self.buffer,
            next: first,
            remaining: len,
        })
    }

    fn object_property_count(&self, node: NavigatorNode) -> usize {
        self.map_header(node).0
    }

    fn object_properties(&self, node: NavigatorNode) -> PropertyIter<'_> {
        let (len, first) = self.map_header(node);
        Box::new(BinaryProperties {
            buffer: self.buffer,
            next: first,
            remaining: len,
        })
    }

    fn try_get_object_property(&self, node: NavigatorNode, name: &str) -> Option<ObjectProperty> {
        self.object_properties(node)
            .find(|property| self.string_value(property.name) == name)
    }

    fn try_get_buffered_raw(&self, node: NavigatorNode) -> Option<&[u8]> {
        let start = node.position();
        let end = skip_value(self.buffer, start);
        Some(&self.buffer[start..end])
    }
}
