//! 128-bit content fingerprints.
//!
//! A [`Fingerprint`] is a pure function of a value's structure: it does not
//! depend on the materialization strategy, the backend, the process or the
//! run. Array fingerprints are order-sensitive and object fingerprints are
//! order-independent, matching equality. Query layers use fingerprints for
//! distinct and order-by; [`compare`] is the ordering they sort by.

use std::cmp::Ordering;
use std::fmt;

use crate::hash::murmur3_x64_128;
use crate::value::{ArrayValue, ElementValue, ObjectValue};

const TAG_NULL: u64 = 0;
const TAG_FALSE: u64 = 1;
const TAG_TRUE: u64 = 2;
const TAG_NUMBER: u64 = 3;
const TAG_STRING: u64 = 4;
const TAG_GUID: u64 = 5;
const TAG_BINARY: u64 = 6;
const TAG_ARRAY: u64 = 7;
const TAG_OBJECT: u64 = 8;
const TAG_ENTRY: u64 = 9;

/// Content digest of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub u128);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Fingerprint of any value.
pub fn fingerprint(value: &ElementValue<'_>) -> Fingerprint {
    Fingerprint(digest(value))
}

/// Total order over values by fingerprint. Equal values compare `Equal`.
///
/// The order is arbitrary but stable: it is the same for every process and
/// every backend.
pub fn compare(a: &ElementValue<'_>, b: &ElementValue<'_>) -> Ordering {
    fingerprint(a).cmp(&fingerprint(b))
}

fn digest(value: &ElementValue<'_>) -> u128 {
    match value {
        ElementValue::Null => murmur3_x64_128(&[], TAG_NULL),
        ElementValue::Boolean(false) => murmur3_x64_128(&[], TAG_FALSE),
        ElementValue::Boolean(true) => murmur3_x64_128(&[], TAG_TRUE),
        ElementValue::Number(n) => {
            let mut payload = [0u8; 9];
            payload[0] = n.kind().tag();
            payload[1..].copy_from_slice(&n.canonical_bits().to_le_bytes());
            murmur3_x64_128(&payload, TAG_NUMBER)
        }
        ElementValue::String(s) => string_digest(s),
        ElementValue::Guid(g) => murmur3_x64_128(g.as_bytes(), TAG_GUID),
        ElementValue::Binary(b) => murmur3_x64_128(b, TAG_BINARY),
        ElementValue::Array(a) => array_digest(a),
        ElementValue::Object(o) => object_digest(o),
    }
}

fn string_digest(s: &str) -> u128 {
    murmur3_x64_128(s.as_bytes(), TAG_STRING)
}

fn array_digest(array: &ArrayValue<'_>) -> u128 {
    let mut payload = Vec::with_capacity(8 + 16 * array.len());
    payload.extend_from_slice(&(array.len() as u64).to_le_bytes());
    for item in array {
        payload.extend_from_slice(&digest(&item).to_le_bytes());
    }
    murmur3_x64_128(&payload, TAG_ARRAY)
}

fn object_digest(object: &ObjectValue<'_>) -> u128 {
    let mut sum = 0u128;
    let mut count = 0u64;
    for (key, value) in object {
        let mut entry = [0u8; 32];
        entry[..16].copy_from_slice(&string_digest(&key).to_le_bytes());
        entry[16..].copy_from_slice(&digest(&value).to_le_bytes());
        sum = sum.wrapping_add(murmur3_x64_128(&entry, TAG_ENTRY));
        count += 1;
    }
    let mut payload = [0u8; 24];
    payload[..8].copy_from_slice(&count.to_le_bytes());
    payload[8..].copy_from_slice(&sum.to_le_bytes());
    murmur3_x64_128(&payload, TAG_OBJECT)
}

impl ElementValue<'_> {
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(self)
    }
}

// Ordered by fingerprint; agrees with `compare`.
impl PartialOrd for ElementValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElementValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for ArrayValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ArrayValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        array_digest(self).cmp(&array_digest(other))
    }
}

impl PartialOrd for ObjectValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        object_digest(self).cmp(&object_digest(other))
    }
}
