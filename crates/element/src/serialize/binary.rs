//! Binary document writer.
//!
//! Output is what [`BinaryNavigator`](crate::BinaryNavigator) reads: the
//! format marker, then one MessagePack value. Untyped numbers use the
//! smallest native integer form when they are integral and exactly
//! representable, otherwise a 64-bit float. Typed numbers and GUIDs use
//! fixed-size extensions, so every kind survives a round trip.

use doc_element_buffers::Writer;
use uuid::Uuid;

use crate::navigator::{ext_type, BINARY_FORMAT_MARKER};
use crate::value::{ArrayValue, ElementValue, Number, ObjectValue};
use crate::visitor::ElementVisitor;

/// Integral untyped numbers up to this magnitude are written as integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

pub struct BinaryWriter {
    pub writer: Writer,
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes a complete document, marker included.
    pub fn encode(&mut self, value: &ElementValue<'_>) -> Vec<u8> {
        self.writer.byte(BINARY_FORMAT_MARKER);
        value.accept(self);
        self.writer.flush()
    }

    pub fn write_float(&mut self, float: f64) {
        self.writer.tagged(0xcb, float);
    }

    pub fn write_u_integer(&mut self, uint: u64) {
        if uint <= 0x7f {
            self.writer.byte(uint as u8);
        } else if uint <= 0xff {
            self.writer.put(0xcc00 | uint as u16);
        } else if uint <= 0xffff {
            self.writer.tagged(0xcd, uint as u16);
        } else if uint <= 0xffff_ffff {
            self.writer.tagged(0xce, uint as u32);
        } else {
            self.writer.tagged(0xcf, uint);
        }
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_u_integer(int as u64);
        } else if int >= -0x20 {
            // negative fixint: 0xe0..0xff
            self.writer.put(int as i8);
        } else if int >= i8::MIN as i64 {
            self.writer.byte(0xd0);
            self.writer.put(int as i8);
        } else if int >= i16::MIN as i64 {
            self.writer.byte(0xd1);
            self.writer.put(int as i16);
        } else if int >= i32::MIN as i64 {
            self.writer.byte(0xd2);
            self.writer.put(int as i32);
        } else {
            self.writer.byte(0xd3);
            self.writer.put(int);
        }
    }

    fn write_untyped(&mut self, v: f64) {
        let integral = v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER;
        if integral && !(v == 0.0 && v.is_sign_negative()) {
            self.write_integer(v as i64);
        } else {
            self.write_float(v);
        }
    }

    /// Fixed-size extension header. `length` is 1, 2, 4, 8 or 16.
    fn write_fixext_hdr(&mut self, tag: i8, length: usize) {
        let marker: u16 = match length {
            1 => 0xd4,
            2 => 0xd5,
            4 => 0xd6,
            8 => 0xd7,
            _ => 0xd8,
        };
        self.writer.put((marker << 8) | tag as u8 as u16);
    }

    pub fn write_str_hdr(&mut self, length: usize) {
        if length <= 0x1f {
            self.writer.byte(0xa0 | length as u8);
        } else if length <= 0xff {
            self.writer.put(0xd900 | length as u16);
        } else if length <= 0xffff {
            self.writer.tagged(0xda, length as u16);
        } else {
            self.writer.tagged(0xdb, length as u32);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len());
        self.writer.str(s);
    }

    pub fn write_bin_hdr(&mut self, length: usize) {
        if length <= 0xff {
            self.writer.put(0xc400 | length as u16);
        } else if length <= 0xffff {
            self.writer.tagged(0xc5, length as u16);
        } else {
            self.writer.tagged(0xc6, length as u32);
        }
    }

    pub fn write_arr_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.byte(0x90 | length as u8);
        } else if length <= 0xffff {
            self.writer.tagged(0xdc, length as u16);
        } else {
            self.writer.tagged(0xdd, length as u32);
        }
    }

    pub fn write_obj_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.byte(0x80 | length as u8);
        } else if length <= 0xffff {
            self.writer.tagged(0xde, length as u16);
        } else {
            self.writer.tagged(0xdf, length as u32);
        }
    }
}

impl<'a> ElementVisitor<'a> for BinaryWriter {
    type Output = ();

    fn visit_null(&mut self) {
        self.writer.byte(0xc0);
    }

    fn visit_boolean(&mut self, value: bool) {
        self.writer.byte(if value { 0xc3 } else { 0xc2 });
    }

    fn visit_number(&mut self, value: Number) {
        match value {
            Number::Number64(v) => self.write_untyped(v),
            Number::Int8(v) => {
                self.write_fixext_hdr(ext_type::INT8, 1);
                self.writer.put(v);
            }
            Number::Int16(v) => {
                self.write_fixext_hdr(ext_type::INT16, 2);
                self.writer.put(v);
            }
            Number::Int32(v) => {
                self.write_fixext_hdr(ext_type::INT32, 4);
                self.writer.put(v);
            }
            Number::Int64(v) => {
                self.write_fixext_hdr(ext_type::INT64, 8);
                self.writer.put(v);
            }
            Number::UInt32(v) => {
                self.write_fixext_hdr(ext_type::UINT32, 4);
                self.writer.put(v);
            }
            Number::Float32(v) => {
                self.write_fixext_hdr(ext_type::FLOAT32, 4);
                self.writer.put(v);
            }
            Number::Float64(v) => {
                self.write_fixext_hdr(ext_type::FLOAT64, 8);
                self.writer.put(v);
            }
        }
    }

    fn visit_string(&mut self, value: &str) {
        self.write_str(value);
    }

    fn visit_guid(&mut self, value: Uuid) {
        self.write_fixext_hdr(ext_type::GUID, 16);
        self.writer.bytes(value.as_bytes());
    }

    fn visit_binary(&mut self, value: &[u8]) {
        self.write_bin_hdr(value.len());
        self.writer.bytes(value);
    }

    fn visit_array(&mut self, value: &ArrayValue<'a>) {
        if let Some(raw) = value
            .lazy_parts()
            .and_then(|(navigator, node)| navigator.try_get_buffered_raw(node))
        {
            self.writer.bytes(raw);
            return;
        }
        self.write_arr_hdr(value.len());
        for item in value {
            item.accept(self);
        }
    }

    fn visit_object(&mut self, value: &ObjectValue<'a>) {
        if let Some(raw) = value
            .lazy_parts()
            .and_then(|(navigator, node)| navigator.try_get_buffered_raw(node))
        {
            self.writer.bytes(raw);
            return;
        }
        self.write_obj_hdr(value.len());
        for (key, item) in value {
            self.write_str(&key);
            item.accept(self);
        }
    }
}

/// Encodes `value` as a binary document.
pub fn to_binary(value: &ElementValue<'_>) -> Vec<u8> {
    BinaryWriter::new().encode(value)
}
