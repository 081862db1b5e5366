//! Format-agnostic document values.
//!
//! An [`ElementValue`] is a JSON value (plus GUID and binary scalars) that
//! does not care where it came from. Arrays and objects are either lazy views
//! over a [`Navigator`] or eager owned values; both behave identically for
//! reads, equality, hashing and fingerprints.
//!
//! Two backends are provided: [`BinaryNavigator`] reads a compact
//! MessagePack-based binary document in place, [`TextNavigator`] reads JSON
//! text.
//!
//! ```
//! use doc_element::{Document, ElementValue, ObjectValue};
//!
//! let doc = Document::parse(r#"{"name": "x", "tags": [1, 2]}"#).unwrap();
//! let root = doc.root_as::<ObjectValue>().unwrap();
//! assert_eq!(root.get("name"), Some(ElementValue::from("x")));
//!
//! let packed = doc_element::to_binary(&doc.root());
//! let again = Document::from_buffer(&packed).unwrap();
//! assert_eq!(doc.root(), again.root());
//! ```

mod document;
mod equality;
mod error;
mod fingerprint;
mod limits;
mod parse;

pub mod cli;
pub mod hash;
pub mod navigator;
pub mod serialize;
pub mod value;
pub mod visitor;

pub use document::Document;
pub use error::{DecodeError, KindMismatch, LimitError, ParseFailure, WriteError};
pub use fingerprint::{compare, fingerprint, Fingerprint};
pub use hash::{array_hash, element_hash, object_hash};
pub use limits::{Limits, MAX_TEXT_NESTING_DEPTH};
pub use navigator::{
    BinaryNavigator, Navigator, NavigatorNode, NodeKind, ObjectProperty, SerializationFormat,
    TextNavigator, BINARY_FORMAT_MARKER,
};
pub use parse::{
    from_buffer, from_buffer_as, from_buffer_as_with_limits, from_buffer_with_limits, parse,
    parse_as, parse_as_with_limits, parse_with_limits, try_from_buffer, try_from_buffer_as,
    try_parse, try_parse_as,
};
pub use serialize::{to_binary, to_json_string, to_json_string_pretty, to_json_value};
pub use value::{
    ArrayIter, ArrayValue, ElementKind, ElementValue, FromElement, Number, NumberKind, ObjectIter,
    ObjectValue,
};
pub use visitor::{ElementVisitor, ElementVisitorWithArg};
