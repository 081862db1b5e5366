//! Navigator over JSON text.
//!
//! The text is parsed with `serde_json` and flattened into an arena of
//! syntax nodes; a [`NavigatorNode`] is an index into that arena. Children are
//! stored before their parent, so the root is always the last node.

use serde_json::{Number, Value};
use uuid::Uuid;

use super::{
    kind_violation, Navigator, NavigatorNode, NodeIter, NodeKind, ObjectProperty, PropertyIter,
    SerializationFormat,
};
use crate::error::{LimitError, ParseFailure};
use crate::Limits;

#[derive(Debug)]
enum TextNode {
    Null,
    True,
    False,
    Number(Number),
    String(String),
    FieldName(String),
    Array(Vec<usize>),
    Object(Vec<(usize, usize)>),
}

impl TextNode {
    fn kind(&self) -> NodeKind {
        match self {
            TextNode::Null => NodeKind::Null,
            TextNode::True => NodeKind::True,
            TextNode::False => NodeKind::False,
            TextNode::Number(_) => NodeKind::Number,
            TextNode::String(_) => NodeKind::String,
            TextNode::FieldName(_) => NodeKind::FieldName,
            TextNode::Array(_) => NodeKind::Array,
            TextNode::Object(_) => NodeKind::Object,
        }
    }
}

/// Rejects text whose brackets nest deeper than `limit`, skipping string
/// contents. Runs before `serde_json`, whose own recursion cap would otherwise
/// surface as a syntax error.
fn check_nesting(text: &str, limit: usize) -> Result<(), LimitError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return Err(LimitError::NestingTooDeep { limit });
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Reads a JSON text document.
///
/// Owns its node arena, so unlike [`BinaryNavigator`](super::BinaryNavigator)
/// it does not borrow the input. Number nodes are always untyped; the typed
/// accessors narrow the parsed number with `as` casts.
#[derive(Debug)]
pub struct TextNavigator {
    nodes: Vec<TextNode>,
    root: usize,
}

impl TextNavigator {
    /// Parses `text` under the default [`Limits`].
    pub fn parse(text: &str) -> Result<Self, ParseFailure> {
        Self::parse_with_limits(text, &Limits::default())
    }

    pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<Self, ParseFailure> {
        limits.check_input_size(text.len())?;
        if text.trim().is_empty() {
            return Err(ParseFailure::Empty);
        }
        check_nesting(text, limits.text_nesting_depth())?;
        let value: Value = serde_json::from_str(text)?;
        let mut navigator = Self {
            nodes: Vec::new(),
            root: 0,
        };
        navigator.root = navigator.flatten(value);
        tracing::trace!(
            target: "doc_element",
            len = text.len(),
            nodes = navigator.nodes.len(),
            "text navigator ready"
        );
        Ok(navigator)
    }

    /// Number of arena nodes, field names included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, node: TextNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn flatten(&mut self, value: Value) -> usize {
        let node = match value {
            Value::Null => TextNode::Null,
            Value::Bool(true) => TextNode::True,
            Value::Bool(false) => TextNode::False,
            Value::Number(n) => TextNode::Number(n),
            Value::String(s) => TextNode::String(s),
            Value::Array(items) => {
                TextNode::Array(items.into_iter().map(|item| self.flatten(item)).collect())
            }
            Value::Object(map) => {
                let mut properties = Vec::with_capacity(map.len());
                for (key, item) in map {
                    let name = self.push(TextNode::FieldName(key));
                    let value = self.flatten(item);
                    properties.push((name, value));
                }
                TextNode::Object(properties)
            }
        };
        self.push(node)
    }

    #[track_caller]
    fn node(&self, node: NavigatorNode) -> &TextNode {
        match self.nodes.get(node.position()) {
            Some(text_node) => text_node,
            None => panic!(
                "node {} does not belong to this navigator of {} nodes",
                node.position(),
                self.nodes.len()
            ),
        }
    }

    #[track_caller]
    fn number(&self, node: NavigatorNode) -> &Number {
        match self.node(node) {
            TextNode::Number(n) => n,
            other => kind_violation(NodeKind::Number, other.kind()),
        }
    }

    fn integer(&self, node: NavigatorNode) -> i64 {
        let n = self.number(node);
        match (n.as_i64(), n.as_u64()) {
            (Some(v), _) => v,
            (None, Some(v)) => v as i64,
            _ => self.number_value(node) as i64,
        }
    }

    #[track_caller]
    fn array(&self, node: NavigatorNode) -> &[usize] {
        match self.node(node) {
            TextNode::Array(children) => children,
            other => kind_violation(NodeKind::Array, other.kind()),
        }
    }

    #[track_caller]
    fn object(&self, node: NavigatorNode) -> &[(usize, usize)] {
        match self.node(node) {
            TextNode::Object(properties) => properties,
            other => kind_violation(NodeKind::Object, other.kind()),
        }
    }
}

fn property(&(name, value): &(usize, usize)) -> ObjectProperty {
    ObjectProperty {
        name: NavigatorNode::field_name(name),
        value: NavigatorNode::new(value),
    }
}

impl Navigator for TextNavigator {
    fn serialization_format(&self) -> SerializationFormat {
        SerializationFormat::Text
    }

    fn root_node(&self) -> NavigatorNode {
        NavigatorNode::new(self.root)
    }

    fn node_kind(&self, node: NavigatorNode) -> NodeKind {
        self.node(node).kind()
    }

    fn number_value(&self, node: NavigatorNode) -> f64 {
        // Without arbitrary precision every serde_json number has an f64 view.
        self.number(node).as_f64().unwrap_or(f64::NAN)
    }

    fn int8_value(&self, node: NavigatorNode) -> i8 {
        self.integer(node) as i8
    }

    fn int16_value(&self, node: NavigatorNode) -> i16 {
        self.integer(node) as i16
    }

    fn int32_value(&self, node: NavigatorNode) -> i32 {
        self.integer(node) as i32
    }

    fn int64_value(&self, node: NavigatorNode) -> i64 {
        self.integer(node)
    }

    fn uint32_value(&self, node: NavigatorNode) -> u32 {
        self.integer(node) as u32
    }

    fn float32_value(&self, node: NavigatorNode) -> f32 {
        self.number_value(node) as f32
    }

    fn float64_value(&self, node: NavigatorNode) -> f64 {
        self.number_value(node)
    }

    fn string_value(&self, node: NavigatorNode) -> &str {
        match self.node(node) {
            TextNode::String(s) | TextNode::FieldName(s) => s,
            other => kind_violation(NodeKind::String, other.kind()),
        }
    }

    fn guid_value(&self, node: NavigatorNode) -> Uuid {
        kind_violation(NodeKind::Guid, self.node_kind(node))
    }

    fn binary_value(&self, node: NavigatorNode) -> &[u8] {
        kind_violation(NodeKind::Binary, self.node_kind(node))
    }

    fn array_item_count(&self, node: NavigatorNode) -> usize {
        self.array(node).len()
    }

    fn array_item_at(&self, node: NavigatorNode, index: usize) -> NavigatorNode {
        let children = self.array(node);
        match children.get(index) {
            Some(&child) => NavigatorNode::new(child),
            None => panic!(
                "array index {index} out of range for {} items",
                children.len()
            ),
        }
    }

    fn array_items(&self, node: NavigatorNode) -> NodeIter<'_> {
        Box::new(self.array(node).iter().map(|&child| NavigatorNode::new(child)))
    }

    fn object_property_count(&self, node: NavigatorNode) -> usize {
        self.object(node).len()
    }

    fn object_properties(&self, node: NavigatorNode) -> PropertyIter<'_> {
        Box::new(self.object(node).iter().map(property))
    }

    fn try_get_object_property(&self, node: NavigatorNode, name: &str) -> Option<ObjectProperty> {
        self.object(node)
            .iter()
            .find(|(key, _)| matches!(&self.nodes[*key], TextNode::FieldName(k) if k == name))
            .map(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::MAX_TEXT_NESTING_DEPTH;

    #[test]
    fn navigates_nested_document() {
        let nav = TextNavigator::parse(r#"{"b": [1, "x", null], "a": true}"#).unwrap();
        let root = nav.root_node();
        assert_eq!(nav.serialization_format(), SerializationFormat::Text);
        assert_eq!(nav.node_kind(root), NodeKind::Object);
        assert_eq!(nav.object_property_count(root), 2);

        let names: Vec<&str> = nav
            .object_properties(root)
            .map(|p| nav.string_value(p.name))
            .collect();
        assert_eq!(names, ["b", "a"]);

        let b = nav.try_get_object_property(root, "b").unwrap();
        assert_eq!(nav.node_kind(b.name), NodeKind::FieldName);
        assert_eq!(nav.array_item_count(b.value), 3);
        let kinds: Vec<NodeKind> = nav.array_items(b.value).map(|n| nav.node_kind(n)).collect();
        assert_eq!(kinds, [NodeKind::Number, NodeKind::String, NodeKind::Null]);
        assert_eq!(nav.string_value(nav.array_item_at(b.value, 1)), "x");

        let a = nav.try_get_object_property(root, "a").unwrap();
        assert_eq!(nav.node_kind(a.value), NodeKind::True);
        assert!(nav.try_get_object_property(root, "c").is_none());
        assert!(nav.try_get_buffered_raw(root).is_none());
    }

    #[test]
    fn typed_accessors_narrow() {
        let nav = TextNavigator::parse("[300, -1, 4294967297, 1.5, 18446744073709551615]").unwrap();
        let items: Vec<NavigatorNode> = nav.array_items(nav.root_node()).collect();
        assert_eq!(nav.int8_value(items[0]), 300i64 as i8);
        assert_eq!(nav.int16_value(items[0]), 300);
        assert_eq!(nav.uint32_value(items[1]), u32::MAX);
        assert_eq!(nav.uint32_value(items[2]), 1);
        assert_eq!(nav.int32_value(items[3]), 1);
        assert_eq!(nav.float32_value(items[3]), 1.5);
        assert_eq!(nav.int64_value(items[4]), -1);
        assert_eq!(nav.number_value(items[4]), u64::MAX as f64);
    }

    #[test]
    fn scalar_roots() {
        for (text, kind) in [
            ("null", NodeKind::Null),
            ("false", NodeKind::False),
            (" 12 ", NodeKind::Number),
            ("\"s\"", NodeKind::String),
        ] {
            let nav = TextNavigator::parse(text).unwrap();
            assert_eq!(nav.node_kind(nav.root_node()), kind, "{text}");
        }
    }

    #[test]
    fn rejects_bad_text() {
        assert_eq!(TextNavigator::parse("").unwrap_err(), ParseFailure::Empty);
        assert_eq!(TextNavigator::parse(" \n").unwrap_err(), ParseFailure::Empty);
        match TextNavigator::parse("[1,\n 2,") {
            Err(ParseFailure::Text { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            TextNavigator::parse("[1] 2"),
            Err(ParseFailure::Text { .. })
        ));
    }

    #[test]
    fn enforces_limits() {
        let limits = Limits {
            max_input_size: 32,
            max_nesting_depth: 2,
        };
        assert!(TextNavigator::parse_with_limits("[[1], {\"a\": 2}]", &limits).is_ok());
        assert_eq!(
            TextNavigator::parse_with_limits("[[[]]]", &limits).unwrap_err(),
            ParseFailure::Limit(LimitError::NestingTooDeep { limit: 2 })
        );
        assert_eq!(
            TextNavigator::parse_with_limits(&"1".repeat(33), &limits).unwrap_err(),
            ParseFailure::Limit(LimitError::InputTooLarge {
                size: 33,
                limit: 32
            })
        );
    }

    #[test]
    fn nesting_ignores_brackets_in_strings() {
        let limits = Limits {
            max_input_size: 64,
            max_nesting_depth: 1,
        };
        let nav = TextNavigator::parse_with_limits(r#"["[[{", "\"[[", "]]"]"#, &limits).unwrap();
        assert_eq!(nav.array_item_count(nav.root_node()), 3);
    }

    #[test]
    fn text_depth_stops_at_the_serde_json_ceiling() {
        let nested = |depth: usize| "[".repeat(depth) + &"]".repeat(depth);
        assert!(TextNavigator::parse(&nested(MAX_TEXT_NESTING_DEPTH)).is_ok());
        assert_eq!(
            TextNavigator::parse(&nested(MAX_TEXT_NESTING_DEPTH + 1)).unwrap_err(),
            ParseFailure::Limit(LimitError::NestingTooDeep {
                limit: MAX_TEXT_NESTING_DEPTH
            })
        );
        let generous = Limits {
            max_input_size: 1024,
            max_nesting_depth: 1000,
        };
        assert_eq!(
            TextNavigator::parse_with_limits(&nested(200), &generous).unwrap_err(),
            ParseFailure::Limit(LimitError::NestingTooDeep {
                limit: MAX_TEXT_NESTING_DEPTH
            })
        );
    }

    #[test]
    #[should_panic(expected = "accessor for Guid called on a String node")]
    fn guid_accessor_panics() {
        let nav = TextNavigator::parse("\"67e55044-10b1-426f-9247-bb680e5fe0c8\"").unwrap();
        nav.guid_value(nav.root_node());
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn foreign_node_panics() {
        let nav = TextNavigator::parse("[]").unwrap();
        nav.node_kind(NavigatorNode::new(7));
    }
}
