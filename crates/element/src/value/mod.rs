//! The element value model.
//!
//! [`ElementValue`] is a closed tagged union over every JSON value shape plus
//! the GUID and binary scalar kinds. Arrays and objects come in two
//! interchangeable strategies: lazy views that resolve through a
//! [`Navigator`], and eager values that own their contents. Equality, hashing
//! and fingerprints ignore the strategy.

mod array;
mod number;
mod object;

pub use array::{ArrayIter, ArrayValue};
pub use number::{Number, NumberKind};
pub use object::{ObjectIter, ObjectValue};

use std::borrow::Cow;
use std::fmt;

use uuid::Uuid;

use crate::error::KindMismatch;
use crate::navigator::{Navigator, NavigatorNode, NodeKind};

/// Runtime tag of an [`ElementValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Null,
    Boolean,
    Number,
    String,
    Guid,
    Binary,
    Array,
    Object,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Null => "null",
            ElementKind::Boolean => "boolean",
            ElementKind::Number => "number",
            ElementKind::String => "string",
            ElementKind::Guid => "guid",
            ElementKind::Binary => "binary",
            ElementKind::Array => "array",
            ElementKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A document value.
///
/// `'a` is the lifetime of the navigator (and through it, the input) that
/// lazy parts of the value borrow from. [`ElementValue::to_eager`] produces
/// an `ElementValue<'static>` with no such dependency.
#[derive(Debug, Clone)]
pub enum ElementValue<'a> {
    Null,
    Boolean(bool),
    Number(Number),
    String(Cow<'a, str>),
    Guid(Uuid),
    Binary(Cow<'a, [u8]>),
    Array(ArrayValue<'a>),
    Object(ObjectValue<'a>),
}

impl<'a> ElementValue<'a> {
    /// Wraps `node` as a value. Scalars are read immediately (strings and
    /// binary borrow from the navigator); arrays and objects stay lazy.
    ///
    /// Field-name nodes read as strings.
    pub fn lazy(navigator: &'a dyn Navigator, node: NavigatorNode) -> Self {
        match navigator.node_kind(node) {
            NodeKind::Null => ElementValue::Null,
            NodeKind::True => ElementValue::Boolean(true),
            NodeKind::False => ElementValue::Boolean(false),
            NodeKind::Number => Number::Number64(navigator.number_value(node)).into(),
            NodeKind::Int8 => Number::Int8(navigator.int8_value(node)).into(),
            NodeKind::Int16 => Number::Int16(navigator.int16_value(node)).into(),
            NodeKind::Int32 => Number::Int32(navigator.int32_value(node)).into(),
            NodeKind::Int64 => Number::Int64(navigator.int64_value(node)).into(),
            NodeKind::UInt32 => Number::UInt32(navigator.uint32_value(node)).into(),
            NodeKind::Float32 => Number::Float32(navigator.float32_value(node)).into(),
            NodeKind::Float64 => Number::Float64(navigator.float64_value(node)).into(),
            NodeKind::String | NodeKind::FieldName => {
                ElementValue::String(Cow::Borrowed(navigator.string_value(node)))
            }
            NodeKind::Guid => ElementValue::Guid(navigator.guid_value(node)),
            NodeKind::Binary => ElementValue::Binary(Cow::Borrowed(navigator.binary_value(node))),
            NodeKind::Array => ElementValue::Array(ArrayValue::from_node(navigator, node)),
            NodeKind::Object => ElementValue::Object(ObjectValue::from_node(navigator, node)),
        }
    }

    /// The lazy root value of a navigator.
    pub fn from_navigator(navigator: &'a dyn Navigator) -> Self {
        Self::lazy(navigator, navigator.root_node())
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementValue::Null => ElementKind::Null,
            ElementValue::Boolean(_) => ElementKind::Boolean,
            ElementValue::Number(_) => ElementKind::Number,
            ElementValue::String(_) => ElementKind::String,
            ElementValue::Guid(_) => ElementKind::Guid,
            ElementValue::Binary(_) => ElementKind::Binary,
            ElementValue::Array(_) => ElementKind::Array,
            ElementValue::Object(_) => ElementKind::Object,
        }
    }

    /// A deep copy that owns everything and no longer borrows a navigator.
    pub fn to_eager(&self) -> ElementValue<'static> {
        match self {
            ElementValue::Null => ElementValue::Null,
            ElementValue::Boolean(v) => ElementValue::Boolean(*v),
            ElementValue::Number(v) => ElementValue::Number(*v),
            ElementValue::String(v) => ElementValue::String(Cow::Owned(v.as_ref().to_owned())),
            ElementValue::Guid(v) => ElementValue::Guid(*v),
            ElementValue::Binary(v) => ElementValue::Binary(Cow::Owned(v.to_vec())),
            ElementValue::Array(v) => ElementValue::Array(v.to_eager()),
            ElementValue::Object(v) => ElementValue::Object(v.to_eager()),
        }
    }

    /// True when this value, or any container nested in it, reads through a
    /// navigator.
    pub fn is_lazy(&self) -> bool {
        match self {
            ElementValue::Array(v) => v.is_lazy() || v.iter().any(|item| item.is_lazy()),
            ElementValue::Object(v) => v.is_lazy() || v.values().any(|item| item.is_lazy()),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ElementValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ElementValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            ElementValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ElementValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<Uuid> {
        match self {
            ElementValue::Guid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            ElementValue::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue<'a>> {
        match self {
            ElementValue::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue<'a>> {
        match self {
            ElementValue::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Converts into `T`, failing when the kinds differ.
    pub fn into_kind<T: FromElement<'a>>(self) -> Result<T, KindMismatch> {
        T::from_element(self)
    }
}

/// Typed extraction from an [`ElementValue`].
///
/// Used by the typed lookups ([`ObjectValue::get_as`]) and the typed parse
/// entrypoints. A kind mismatch is an ordinary error, never a panic.
pub trait FromElement<'a>: Sized {
    fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch>;
}

impl<'a> FromElement<'a> for ElementValue<'a> {
    fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch> {
        Ok(value)
    }
}

macro_rules! from_element {
    ($ty:ty, $kind:ident, $pat:pat => $out:expr) => {
        impl<'a> FromElement<'a> for $ty {
            fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch> {
                match value {
                    $pat => Ok($out),
                    other => Err(mismatch(ElementKind::$kind, &other)),
                }
            }
        }
    };
}

from_element!(bool, Boolean, ElementValue::Boolean(v) => v);
from_element!(Number, Number, ElementValue::Number(v) => v);
from_element!(String, String, ElementValue::String(v) => v.into_owned());
from_element!(Uuid, Guid, ElementValue::Guid(v) => v);
from_element!(Vec<u8>, Binary, ElementValue::Binary(v) => v.into_owned());

fn mismatch(expected: ElementKind, value: &ElementValue<'_>) -> KindMismatch {
    KindMismatch {
        expected,
        actual: value.kind(),
    }
}

impl<'a> FromElement<'a> for Cow<'a, str> {
    fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch> {
        match value {
            ElementValue::String(v) => Ok(v),
            other => Err(mismatch(ElementKind::String, &other)),
        }
    }
}

impl<'a> FromElement<'a> for Cow<'a, [u8]> {
    fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch> {
        match value {
            ElementValue::Binary(v) => Ok(v),
            other => Err(mismatch(ElementKind::Binary, &other)),
        }
    }
}

impl<'a> FromElement<'a> for ArrayValue<'a> {
    fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch> {
        match value {
            ElementValue::Array(v) => Ok(v),
            other => Err(mismatch(ElementKind::Array, &other)),
        }
    }
}

impl<'a> FromElement<'a> for ObjectValue<'a> {
    fn from_element(value: ElementValue<'a>) -> Result<Self, KindMismatch> {
        match value {
            ElementValue::Object(v) => Ok(v),
            other => Err(mismatch(ElementKind::Object, &other)),
        }
    }
}

impl From<bool> for ElementValue<'_> {
    fn from(v: bool) -> Self {
        ElementValue::Boolean(v)
    }
}

impl From<Number> for ElementValue<'_> {
    fn from(v: Number) -> Self {
        ElementValue::Number(v)
    }
}

macro_rules! element_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ElementValue<'_> {
                fn from(v: $ty) -> Self {
                    ElementValue::Number(Number::from(v))
                }
            }
        )*
    };
}

element_from_number!(f64, i8, i16, i32, i64, u32, f32);

impl<'a> From<&'a str> for ElementValue<'a> {
    fn from(v: &'a str) -> Self {
        ElementValue::String(Cow::Borrowed(v))
    }
}

impl From<String> for ElementValue<'_> {
    fn from(v: String) -> Self {
        ElementValue::String(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for ElementValue<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        ElementValue::String(v)
    }
}

impl From<Uuid> for ElementValue<'_> {
    fn from(v: Uuid) -> Self {
        ElementValue::Guid(v)
    }
}

impl<'a> From<&'a [u8]> for ElementValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        ElementValue::Binary(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for ElementValue<'_> {
    fn from(v: Vec<u8>) -> Self {
        ElementValue::Binary(Cow::Owned(v))
    }
}

impl<'a> From<ArrayValue<'a>> for ElementValue<'a> {
    fn from(v: ArrayValue<'a>) -> Self {
        ElementValue::Array(v)
    }
}

impl<'a> From<ObjectValue<'a>> for ElementValue<'a> {
    fn from(v: ObjectValue<'a>) -> Self {
        ElementValue::Object(v)
    }
}

impl<'a, T: Into<ElementValue<'a>>> From<Option<T>> for ElementValue<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(ElementValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::TextNavigator;

    #[test]
    fn lazy_scalars_borrow_from_the_navigator() {
        let nav = TextNavigator::parse(r#"["s", 2.5, true, null]"#).unwrap();
        let root = ElementValue::from_navigator(&nav);
        let array = root.as_array().unwrap();
        assert!(array.is_lazy());
        assert!(matches!(array.item_at(0), ElementValue::String(Cow::Borrowed("s"))));
        assert_eq!(array.item_at(1), ElementValue::from(2.5f64));
        assert_eq!(array.item_at(2).as_bool(), Some(true));
        assert!(array.item_at(3).is_null());
    }

    #[test]
    fn to_eager_detaches_from_the_navigator() {
        let eager = {
            let nav = TextNavigator::parse(r#"{"a": [1, {"b": "c"}]}"#).unwrap();
            let root = ElementValue::from_navigator(&nav);
            assert!(root.is_lazy());
            root.to_eager()
        };
        assert!(!eager.is_lazy());
        let inner = eager.as_object().unwrap().get("a").unwrap();
        assert_eq!(inner.as_array().unwrap().len(), 2);
    }

    #[test]
    fn typed_extraction_reports_kinds() {
        assert_eq!(ElementValue::from(true).into_kind::<bool>(), Ok(true));
        assert_eq!(
            ElementValue::from("x").into_kind::<String>(),
            Ok("x".to_string())
        );
        assert_eq!(
            ElementValue::Null.into_kind::<ArrayValue<'_>>().unwrap_err(),
            KindMismatch {
                expected: ElementKind::Array,
                actual: ElementKind::Null
            }
        );
        let bytes = ElementValue::from(vec![1u8, 2]);
        assert_eq!(bytes.into_kind::<Vec<u8>>(), Ok(vec![1, 2]));
    }

    #[test]
    fn option_maps_none_to_null() {
        assert!(ElementValue::from(None::<bool>).is_null());
        assert_eq!(ElementValue::from(Some(3i32)), ElementValue::Number(Number::Int32(3)));
        assert_eq!(ElementKind::Guid.to_string(), "guid");
    }
}
