//! JSON text writer.
//!
//! Values without a JSON counterpart are written as strings: GUIDs in
//! hyphenated form, binary blobs as
//! `"data:application/octet-stream;base64,<base64>"`. Typed numbers are
//! written as plain JSON numbers, so their kind does not survive a text
//! round trip.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use doc_element_buffers::Writer;
use uuid::Uuid;

use crate::error::WriteError;
use crate::value::{ArrayValue, ElementValue, Number, ObjectValue};
use crate::visitor::ElementVisitorWithArg;

/// `data:application/octet-stream;base64,` prefix, opening quote included.
const BIN_URI_PREFIX: &[u8] = b"\"data:application/octet-stream;base64,";

/// Largest magnitude below which integral `f64` values print without a
/// fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Writes values as JSON text, compact or pretty.
///
/// The `usize` visitor argument is the current indentation level.
pub struct JsonWriter {
    pub writer: Writer,
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
            pretty: false,
        }
    }

    /// A writer that indents nested containers by two spaces.
    pub fn pretty() -> Self {
        Self {
            writer: Writer::new(),
            pretty: true,
        }
    }

    /// Encodes `value` and returns the UTF-8 bytes.
    pub fn encode(&mut self, value: &ElementValue<'_>) -> Result<Vec<u8>, WriteError> {
        let result = value.accept_with(self, 0usize);
        let bytes = self.writer.flush();
        result.map(|()| bytes)
    }

    fn newline(&mut self, depth: usize) {
        if self.pretty {
            self.writer.byte(b'\n');
            for _ in 0..depth {
                self.writer.bytes(b"  ");
            }
        }
    }

    fn write_f64(&mut self, v: f64) -> Result<(), WriteError> {
        if !v.is_finite() {
            return Err(WriteError::NonFiniteNumber(v));
        }
        if v.fract() == 0.0 && v.abs() < MAX_SAFE_INTEGER {
            self.writer.str(&(v as i64).to_string());
            return Ok(());
        }
        match serde_json::Number::from_f64(v) {
            Some(n) => {
                self.writer.str(&n.to_string());
                Ok(())
            }
            None => Err(WriteError::NonFiniteNumber(v)),
        }
    }

    fn write_f32(&mut self, v: f32) -> Result<(), WriteError> {
        if !v.is_finite() {
            return Err(WriteError::NonFiniteNumber(v as f64));
        }
        // Display prints the shortest digits that read back as the same f32.
        self.writer.str(&v.to_string());
        Ok(())
    }

    /// Writes a quoted, escaped JSON string.
    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.writer.byte(b'"');
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let escape: &[u8] = match b {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x08 => b"\\b",
                0x0c => b"\\f",
                0x00..=0x1f => b"",
                _ => continue,
            };
            self.writer.bytes(&bytes[start..i]);
            if escape.is_empty() {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                self.writer.bytes(b"\\u00");
                self.writer.byte(HEX[(b >> 4) as usize]);
                self.writer.byte(HEX[(b & 0x0f) as usize]);
            } else {
                self.writer.bytes(escape);
            }
            start = i + 1;
        }
        self.writer.bytes(&bytes[start..]);
        self.writer.byte(b'"');
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ElementVisitorWithArg<'a, usize> for JsonWriter {
    type Output = Result<(), WriteError>;

    fn visit_null(&mut self, _: usize) -> Self::Output {
        self.writer.bytes(b"null");
        Ok(())
    }

    fn visit_boolean(&mut self, value: bool, _: usize) -> Self::Output {
        let literal: &[u8] = if value { b"true" } else { b"false" };
        self.writer.bytes(literal);
        Ok(())
    }

    fn visit_number(&mut self, value: Number, _: usize) -> Self::Output {
        match value {
            Number::Number64(v) | Number::Float64(v) => self.write_f64(v)?,
            Number::Float32(v) => self.write_f32(v)?,
            Number::Int8(v) => {
                self.writer.str(&v.to_string());
            }
            Number::Int16(v) => {
                self.writer.str(&v.to_string());
            }
            Number::Int32(v) => {
                self.writer.str(&v.to_string());
            }
            Number::Int64(v) => {
                self.writer.str(&v.to_string());
            }
            Number::UInt32(v) => {
                self.writer.str(&v.to_string());
            }
        }
        Ok(())
    }

    fn visit_string(&mut self, value: &str, _: usize) -> Self::Output {
        self.write_str(value);
        Ok(())
    }

    fn visit_guid(&mut self, value: Uuid, _: usize) -> Self::Output {
        self.writer.byte(b'"');
        self.writer.str(value.hyphenated().encode_lower(&mut Uuid::encode_buffer()));
        self.writer.byte(b'"');
        Ok(())
    }

    fn visit_binary(&mut self, value: &[u8], _: usize) -> Self::Output {
        self.writer.bytes(BIN_URI_PREFIX);
        self.writer.str(&STANDARD.encode(value));
        self.writer.byte(b'"');
        Ok(())
    }

    fn visit_array(&mut self, value: &ArrayValue<'a>, depth: usize) -> Self::Output {
        self.writer.byte(b'[');
        let mut empty = true;
        for (i, item) in value.iter().enumerate() {
            if i > 0 {
                self.writer.byte(b',');
            }
            self.newline(depth + 1);
            item.accept_with(self, depth + 1)?;
            empty = false;
        }
        if !empty {
            self.newline(depth);
        }
        self.writer.byte(b']');
        Ok(())
    }

    fn visit_object(&mut self, value: &ObjectValue<'a>, depth: usize) -> Self::Output {
        self.writer.byte(b'{');
        let mut empty = true;
        for (i, (key, item)) in value.iter().enumerate() {
            if i > 0 {
                self.writer.byte(b',');
            }
            self.newline(depth + 1);
            self.write_str(&key);
            let separator: &[u8] = if self.pretty { b": " } else { b":" };
            self.writer.bytes(separator);
            item.accept_with(self, depth + 1)?;
            empty = false;
        }
        if !empty {
            self.newline(depth);
        }
        self.writer.byte(b'}');
        Ok(())
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    // The writer only emits ASCII structure around UTF-8 string contents.
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Compact JSON text.
pub fn to_json_string(value: &ElementValue<'_>) -> Result<String, WriteError> {
    JsonWriter::new().encode(value).map(into_string)
}

/// JSON text indented by two spaces per level.
pub fn to_json_string_pretty(value: &ElementValue<'_>) -> Result<String, WriteError> {
    JsonWriter::pretty().encode(value).map(into_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(value: &ElementValue<'_>) -> String {
        to_json_string(value).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(json(&ElementValue::Null), "null");
        assert_eq!(json(&ElementValue::from(false)), "false");
        assert_eq!(json(&ElementValue::from(1.0f64)), "1");
        assert_eq!(json(&ElementValue::from(-0.0f64)), "0");
        assert_eq!(json(&ElementValue::from(1.5f64)), "1.5");
        assert_eq!(json(&ElementValue::from(1e300f64)), "1e+300");
        assert_eq!(json(&ElementValue::from(0.1f32)), "0.1");
        assert_eq!(json(&ElementValue::from(-7i8)), "-7");
        assert_eq!(json(&ElementValue::from(u32::MAX)), "4294967295");
        assert_eq!(json(&ElementValue::from(i64::MIN)), "-9223372036854775808");
    }

    #[test]
    fn escapes_strings() {
        assert_eq!(json(&ElementValue::from("plain")), r#""plain""#);
        assert_eq!(
            json(&ElementValue::from("q\"b\\n\n\u{1}é")),
            r#""q\"b\\n\n\u0001é""#
        );
        let round_trip: String = serde_json::from_str(&json(&ElementValue::from("\t\u{1f}\u{7f}"))).unwrap();
        assert_eq!(round_trip, "\t\u{1f}\u{7f}");
    }

    #[test]
    fn extended_scalars_become_strings() {
        let guid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(
            json(&ElementValue::from(guid)),
            r#""67e55044-10b1-426f-9247-bb680e5fe0c8""#
        );
        assert_eq!(
            json(&ElementValue::from(vec![1u8, 2, 3])),
            r#""data:application/octet-stream;base64,AQID""#
        );
    }

    #[test]
    fn non_finite_numbers_fail() {
        assert_eq!(
            to_json_string(&ElementValue::from(f64::INFINITY)),
            Err(WriteError::NonFiniteNumber(f64::INFINITY))
        );
        let nested = ElementValue::Array(ArrayValue::new([ElementValue::from(f32::NEG_INFINITY)]));
        assert!(to_json_string(&nested).is_err());
    }

    #[test]
    fn containers() {
        let value = ElementValue::Object(ObjectValue::new([
            ("a", ElementValue::Array(ArrayValue::new([ElementValue::from(1i32), ElementValue::Null]))),
            ("b", ElementValue::Object(ObjectValue::default())),
            ("c", ElementValue::Array(ArrayValue::default())),
        ]));
        assert_eq!(json(&value), r#"{"a":[1,null],"b":{},"c":[]}"#);
        assert_eq!(
            to_json_string_pretty(&value).unwrap(),
            "{\n  \"a\": [\n    1,\n    null\n  ],\n  \"b\": {},\n  \"c\": []\n}"
        );
    }
}
