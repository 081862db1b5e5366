//! Numeric payload of [`ElementValue::Number`](super::ElementValue::Number).

use std::fmt;

/// A JSON number, untyped or carrying an explicit storage kind.
///
/// The kind is part of the value: `Number64(1.0)` and `Int32(1)` are not
/// equal. Floats compare by canonical bits, so `0.0 == -0.0` and every NaN
/// equals every other NaN of the same kind.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// The untyped JSON number.
    Number64(f64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Number64,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    Float32,
    Float64,
}

impl NumberKind {
    /// Stable one-byte code used by the content hashes.
    pub(crate) fn tag(self) -> u8 {
        match self {
            NumberKind::Number64 => 0,
            NumberKind::Int8 => 1,
            NumberKind::Int16 => 2,
            NumberKind::Int32 => 3,
            NumberKind::Int64 => 4,
            NumberKind::UInt32 => 5,
            NumberKind::Float32 => 6,
            NumberKind::Float64 => 7,
        }
    }
}

const CANONICAL_NAN_64: u64 = 0x7ff8_0000_0000_0000;
const CANONICAL_NAN_32: u32 = 0x7fc0_0000;
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn canonical_f64(v: f64) -> u64 {
    if v.is_nan() {
        CANONICAL_NAN_64
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn canonical_f32(v: f32) -> u32 {
    if v.is_nan() {
        CANONICAL_NAN_32
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

impl Number {
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Number64(_) => NumberKind::Number64,
            Number::Int8(_) => NumberKind::Int8,
            Number::Int16(_) => NumberKind::Int16,
            Number::Int32(_) => NumberKind::Int32,
            Number::Int64(_) => NumberKind::Int64,
            Number::UInt32(_) => NumberKind::UInt32,
            Number::Float32(_) => NumberKind::Float32,
            Number::Float64(_) => NumberKind::Float64,
        }
    }

    /// The value widened to `f64`. Lossy for `Int64` beyond 2^53.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Number64(v) | Number::Float64(v) => v,
            Number::Int8(v) => v as f64,
            Number::Int16(v) => v as f64,
            Number::Int32(v) => v as f64,
            Number::Int64(v) => v as f64,
            Number::UInt32(v) => v as f64,
            Number::Float32(v) => v as f64,
        }
    }

    /// The value as an integer, when it is one.
    ///
    /// Floating kinds answer only for integral values inside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int8(v) => Some(v as i64),
            Number::Int16(v) => Some(v as i64),
            Number::Int32(v) => Some(v as i64),
            Number::Int64(v) => Some(v),
            Number::UInt32(v) => Some(v as i64),
            Number::Number64(_) | Number::Float32(_) | Number::Float64(_) => {
                let v = self.as_f64();
                // 2^63 itself is out of range; -2^63 is in.
                if v.fract() == 0.0 && (-TWO_POW_63..TWO_POW_63).contains(&v) {
                    Some(v as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_integer_kind(&self) -> bool {
        matches!(
            self.kind(),
            NumberKind::Int8
                | NumberKind::Int16
                | NumberKind::Int32
                | NumberKind::Int64
                | NumberKind::UInt32
        )
    }

    /// Bits that identify the value within its kind: integers sign-extended,
    /// floats with zero and NaN canonicalized.
    pub(crate) fn canonical_bits(&self) -> u64 {
        match *self {
            Number::Number64(v) | Number::Float64(v) => canonical_f64(v),
            Number::Float32(v) => canonical_f32(v) as u64,
            Number::Int8(v) => v as i64 as u64,
            Number::Int16(v) => v as i64 as u64,
            Number::Int32(v) => v as i64 as u64,
            Number::Int64(v) => v as u64,
            Number::UInt32(v) => v as u64,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for Number {}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Number64(v) | Number::Float64(v) => write!(f, "{v}"),
            Number::Int8(v) => write!(f, "{v}"),
            Number::Int16(v) => write!(f, "{v}"),
            Number::Int32(v) => write!(f, "{v}"),
            Number::Int64(v) => write!(f, "{v}"),
            Number::UInt32(v) => write!(f, "{v}"),
            Number::Float32(v) => write!(f, "{v}"),
        }
    }
}

/// An untyped JSON number.
impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Number64(v)
    }
}

macro_rules! typed_number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(v: $ty) -> Self {
                    Number::$variant(v)
                }
            }
        )*
    };
}

typed_number_from! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u32 => UInt32,
    f32 => Float32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_kind_sensitive() {
        assert_eq!(Number::Int32(1), Number::Int32(1));
        assert_ne!(Number::Int32(1), Number::Int64(1));
        assert_ne!(Number::Number64(1.0), Number::Float64(1.0));
        assert_ne!(Number::Number64(1.0), Number::Int32(1));
    }

    #[test]
    fn float_equality_is_reflexive() {
        assert_eq!(Number::Number64(f64::NAN), Number::Number64(-f64::NAN));
        assert_eq!(Number::Number64(0.0), Number::Number64(-0.0));
        assert_eq!(Number::Float32(f32::NAN), Number::Float32(f32::NAN));
        assert_eq!(Number::Float32(-0.0), Number::Float32(0.0));
        assert_ne!(Number::Float64(1.0), Number::Float64(1.0 + f64::EPSILON));
    }

    #[test]
    fn integer_views() {
        assert_eq!(Number::UInt32(u32::MAX).as_i64(), Some(u32::MAX as i64));
        assert_eq!(Number::Number64(3.0).as_i64(), Some(3));
        assert_eq!(Number::Number64(3.5).as_i64(), None);
        assert_eq!(Number::Number64(f64::INFINITY).as_i64(), None);
        assert_eq!(Number::Number64(9.3e18).as_i64(), None);
        assert_eq!(Number::Int8(-4).as_f64(), -4.0);
        assert!(Number::Int16(0).is_integer_kind());
        assert!(!Number::Float32(0.0).is_integer_kind());
    }

    #[test]
    fn conversions_pick_the_kind() {
        assert_eq!(Number::from(1.5f64).kind(), NumberKind::Number64);
        assert_eq!(Number::from(1.5f32).kind(), NumberKind::Float32);
        assert_eq!(Number::from(7u32).kind(), NumberKind::UInt32);
        assert_eq!(Number::from(-7i64), Number::Int64(-7));
    }
}
