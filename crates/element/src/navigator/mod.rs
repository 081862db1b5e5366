//! Node-level access to a parsed document without materializing it.
//!
//! A [`Navigator`] is bound to one immutable input and hands out
//! [`NavigatorNode`] handles into it. Lazy [`ArrayValue`](crate::ArrayValue)
//! and [`ObjectValue`](crate::ObjectValue) views hold a navigator reference
//! plus a node and resolve every access through this trait.
//!
//! Two backends ship with the crate:
//! - [`BinaryNavigator`] reads a marker-prefixed MessagePack buffer in place;
//! - [`TextNavigator`] parses JSON text into an arena of syntax nodes.

mod binary;
mod text;

pub use binary::{BinaryNavigator, BINARY_FORMAT_MARKER};
pub(crate) use binary::ext_type;
pub use text::TextNavigator;

use std::fmt;

use uuid::Uuid;

/// Syntactic kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    String,
    /// Untyped JSON number.
    Number,
    True,
    False,
    Null,
    /// Property name inside an object.
    FieldName,
    Guid,
    Binary,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    Float32,
    Float64,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Encoding a navigator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationFormat {
    Text,
    Binary,
}

/// Opaque handle to a position inside one navigator's input.
///
/// A node means nothing on its own: it is only valid with the navigator that
/// produced it, and it deliberately has no equality or hashing. Compare the
/// values it resolves to instead.
#[derive(Debug, Clone, Copy)]
pub struct NavigatorNode {
    position: usize,
    field_name: bool,
}

impl NavigatorNode {
    /// A value node at a backend-defined position.
    pub const fn new(position: usize) -> Self {
        Self {
            position,
            field_name: false,
        }
    }

    /// A property-name node at a backend-defined position.
    pub const fn field_name(position: usize) -> Self {
        Self {
            position,
            field_name: true,
        }
    }

    pub const fn position(self) -> usize {
        self.position
    }

    pub const fn is_field_name(self) -> bool {
        self.field_name
    }
}

/// A `(name, value)` node pair of one object property.
#[derive(Debug, Clone, Copy)]
pub struct ObjectProperty {
    pub name: NavigatorNode,
    pub value: NavigatorNode,
}

pub type NodeIter<'n> = Box<dyn Iterator<Item = NavigatorNode> + 'n>;
pub type PropertyIter<'n> = Box<dyn Iterator<Item = ObjectProperty> + 'n>;

/// Read-only traversal of one parsed input.
///
/// Implementations must not mutate after construction: lazy values share a
/// navigator freely, including across threads.
///
/// Every accessor assumes the node has the matching [`NodeKind`] (field-name
/// nodes answer [`Navigator::string_value`]). Calling an accessor on a node of
/// another kind, or with a node from a different navigator, is a programming
/// error and panics.
pub trait Navigator: Send + Sync {
    fn serialization_format(&self) -> SerializationFormat;

    fn root_node(&self) -> NavigatorNode;

    fn node_kind(&self, node: NavigatorNode) -> NodeKind;

    /// Value of an untyped number node.
    fn number_value(&self, node: NavigatorNode) -> f64;

    fn int8_value(&self, node: NavigatorNode) -> i8;

    fn int16_value(&self, node: NavigatorNode) -> i16;

    fn int32_value(&self, node: NavigatorNode) -> i32;

    fn int64_value(&self, node: NavigatorNode) -> i64;

    fn uint32_value(&self, node: NavigatorNode) -> u32;

    fn float32_value(&self, node: NavigatorNode) -> f32;

    fn float64_value(&self, node: NavigatorNode) -> f64;

    /// Value of a string or field-name node.
    fn string_value(&self, node: NavigatorNode) -> &str;

    fn guid_value(&self, node: NavigatorNode) -> Uuid;

    fn binary_value(&self, node: NavigatorNode) -> &[u8];

    fn array_item_count(&self, node: NavigatorNode) -> usize;

    /// Panics when `index` is out of range.
    fn array_item_at(&self, node: NavigatorNode, index: usize) -> NavigatorNode;

    fn array_items(&self, node: NavigatorNode) -> NodeIter<'_>;

    fn object_property_count(&self, node: NavigatorNode) -> usize;

    fn object_properties(&self, node: NavigatorNode) -> PropertyIter<'_>;

    fn try_get_object_property(&self, node: NavigatorNode, name: &str) -> Option<ObjectProperty>;

    /// Encoded bytes of the subtree at `node`, when the backend can hand them
    /// out without re-encoding.
    fn try_get_buffered_raw(&self, _node: NavigatorNode) -> Option<&[u8]> {
        None
    }
}

#[track_caller]
pub(crate) fn kind_violation(expected: NodeKind, actual: NodeKind) -> ! {
    panic!("navigator accessor for {expected} called on a {actual} node")
}
