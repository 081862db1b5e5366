//! 32-bit structural hash.
//!
//! Agrees with equality: equal values hash equally regardless of strategy or
//! backend. Arrays fold their item hashes in order starting from
//! [`ARRAY_SEED`]; objects sum per-entry hashes so property order does not
//! matter. All mixing is MurmurHash3.

use std::hash::{Hash, Hasher};

use crate::value::{ArrayValue, ElementValue, Number, ObjectValue};

// ── Seeds ──────────────────────────────────────────────────────────────────

pub const ARRAY_SEED: u32 = 2_533_142_560;
pub const OBJECT_SEED: u32 = 1_275_696_788;
pub const STRING_SEED: u32 = 2_136_428_778;
pub const NUMBER_SEED: u32 = 4_223_931_231;
pub const GUID_SEED: u32 = 527_095_639;
pub const BINARY_SEED: u32 = 1_536_618_171;

pub const NULL_HASH: u32 = 448_955_911;
pub const TRUE_HASH: u32 = 1_071_096_595;
pub const FALSE_HASH: u32 = 1_211_219_739;

// ── MurmurHash3 ────────────────────────────────────────────────────────────

const C1_32: u32 = 0xcc9e_2d51;
const C2_32: u32 = 0x1b87_3593;

#[inline]
fn mix_k32(k: u32) -> u32 {
    k.wrapping_mul(C1_32).rotate_left(15).wrapping_mul(C2_32)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// MurmurHash3 x86_32.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k32(k);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }
    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k ^= (byte as u32) << (8 * i);
        }
        h ^= mix_k32(k);
    }
    fmix32(h ^ data.len() as u32)
}

/// MurmurHash3 x86_32 of the four little-endian bytes of `value`.
pub fn murmur3_32_u32(value: u32, seed: u32) -> u32 {
    murmur3_32(&value.to_le_bytes(), seed)
}

const C1_64: u64 = 0x87c3_7b91_1142_53d5;
const C2_64: u64 = 0x4cf5_ad43_2745_937f;

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b93f_e53e_c4ad);
    k ^= k >> 33;
    k
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1_64).rotate_left(31).wrapping_mul(C2_64)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2_64).rotate_left(33).wrapping_mul(C1_64)
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut k = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        k ^= (byte as u64) << (8 * i);
    }
    k
}

/// MurmurHash3 x64_128. The first 64-bit half is the low half of the result.
pub fn murmur3_x64_128(data: &[u8], seed: u64) -> u128 {
    let mut h1 = seed;
    let mut h2 = seed;
    let mut blocks = data.chunks_exact(16);
    for block in &mut blocks {
        h1 ^= mix_k1(le_u64(&block[..8]));
        h1 = h1
            .rotate_left(27)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dc_e729);
        h2 ^= mix_k2(le_u64(&block[8..]));
        h2 = h2
            .rotate_left(31)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x3849_5ab5);
    }
    let tail = blocks.remainder();
    if tail.len() > 8 {
        h2 ^= mix_k2(le_u64(&tail[8..]));
    }
    if !tail.is_empty() {
        h1 ^= mix_k1(le_u64(&tail[..tail.len().min(8)]));
    }

    let len = data.len() as u64;
    h1 ^= len;
    h2 ^= len;
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    h1 = fmix64(h1);
    h2 = fmix64(h2);
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    ((h2 as u128) << 64) | h1 as u128
}

// ── Element hashing ────────────────────────────────────────────────────────

fn number_hash(number: Number) -> u32 {
    let seed = murmur3_32(&[number.kind().tag()], NUMBER_SEED);
    murmur3_32(&number.canonical_bits().to_le_bytes(), seed)
}

/// Structural hash of any value.
pub fn element_hash(value: &ElementValue<'_>) -> u32 {
    match value {
        ElementValue::Null => NULL_HASH,
        ElementValue::Boolean(true) => TRUE_HASH,
        ElementValue::Boolean(false) => FALSE_HASH,
        ElementValue::Number(n) => number_hash(*n),
        ElementValue::String(s) => murmur3_32(s.as_bytes(), STRING_SEED),
        ElementValue::Guid(g) => murmur3_32(g.as_bytes(), GUID_SEED),
        ElementValue::Binary(b) => murmur3_32(b, BINARY_SEED),
        ElementValue::Array(a) => array_hash(a),
        ElementValue::Object(o) => object_hash(o),
    }
}

/// Order-sensitive fold of the item hashes.
pub fn array_hash(array: &ArrayValue<'_>) -> u32 {
    array.iter().fold(ARRAY_SEED, |hash, item| {
        murmur3_32_u32(element_hash(&item), hash)
    })
}

/// Order-independent sum of the entry hashes, folded with the entry count.
pub fn object_hash(object: &ObjectValue<'_>) -> u32 {
    let mut sum = 0u32;
    let mut count = 0u32;
    for (key, value) in object {
        let key_hash = murmur3_32(key.as_bytes(), STRING_SEED);
        sum = sum.wrapping_add(murmur3_32_u32(element_hash(&value), key_hash));
        count = count.wrapping_add(1);
    }
    murmur3_32_u32(sum, murmur3_32_u32(count, OBJECT_SEED))
}

impl Hash for ElementValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(element_hash(self));
    }
}

impl Hash for ArrayValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(array_hash(self));
    }
}

impl Hash for ObjectValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(object_hash(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::navigator::TextNavigator;

    const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

    #[test]
    fn murmur3_32_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmur3_32(b"hello", 0), 0x248b_fa47);
        assert_eq!(murmur3_32(b"Hello, world!", 1234), 0xfaf6_cdb3);
        assert_eq!(murmur3_32(FOX, 0), 0x2e4f_f723);
    }

    #[test]
    fn murmur3_x64_128_vectors() {
        assert_eq!(murmur3_x64_128(b"", 0), 0);
        assert_eq!(
            murmur3_x64_128(b"hello", 0),
            0x47c6_b684_53f0_47c3_d392_1a56_d9e3_4421
        );
        assert_eq!(
            murmur3_x64_128(b"foo", 0),
            0xb873_e00c_2364_0a64_a100_f291_2e51_f8c7
        );
        assert_eq!(
            murmur3_x64_128(FOX, 0),
            0xd675_dd22_7ad1_7131_e3fd_515d_f9f3_a75b
        );
    }

    #[test]
    fn array_hash_folds_from_seed() {
        assert_eq!(array_hash(&ArrayValue::default()), ARRAY_SEED);
        let one = ArrayValue::new([ElementValue::Null]);
        assert_eq!(array_hash(&one), murmur3_32_u32(NULL_HASH, ARRAY_SEED));
    }

    #[test]
    fn array_hash_is_order_sensitive() {
        let a = ArrayValue::new([ElementValue::from(1i32), ElementValue::from(2i32)]);
        let b = ArrayValue::new([ElementValue::from(2i32), ElementValue::from(1i32)]);
        assert_ne!(array_hash(&a), array_hash(&b));
    }

    #[test]
    fn object_hash_is_order_independent() {
        let a = ObjectValue::new([("x", ElementValue::from(1i32)), ("y", ElementValue::Null)]);
        let b = ObjectValue::new([("y", ElementValue::Null), ("x", ElementValue::from(1i32))]);
        assert_eq!(object_hash(&a), object_hash(&b));
        let swapped = ObjectValue::new([("x", ElementValue::Null), ("y", ElementValue::from(1i32))]);
        assert_ne!(object_hash(&a), object_hash(&swapped));
    }

    #[test]
    fn equal_floats_hash_equally() {
        let zero = ElementValue::from(0.0f64);
        let negative_zero = ElementValue::from(-0.0f64);
        assert_eq!(zero, negative_zero);
        assert_eq!(element_hash(&zero), element_hash(&negative_zero));
        assert_eq!(
            element_hash(&ElementValue::from(f64::NAN)),
            element_hash(&ElementValue::from(-f64::NAN))
        );
    }

    #[test]
    fn number_kinds_hash_apart() {
        assert_ne!(
            element_hash(&ElementValue::from(1.0f64)),
            element_hash(&ElementValue::from(1i32))
        );
        assert_ne!(
            element_hash(&ElementValue::from(1i32)),
            element_hash(&ElementValue::from(1i64))
        );
    }

    #[test]
    fn lazy_and_eager_hash_equally() {
        let nav = TextNavigator::parse(r#"{"a": [1, "x"], "b": {"c": null}}"#).unwrap();
        let lazy = ElementValue::from_navigator(&nav);
        let eager = lazy.to_eager();
        assert_eq!(element_hash(&lazy), element_hash(&eager));

        let mut set = HashSet::new();
        set.insert(eager);
        assert!(set.contains(&lazy.to_eager()));
    }
}
