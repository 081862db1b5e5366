use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::{ElementValue, FromElement};
use crate::navigator::{
    kind_violation, Navigator, NavigatorNode, NodeKind, ObjectProperty, PropertyIter,
};

type Entry<'a> = (Cow<'a, str>, ElementValue<'a>);

/// A mapping from string keys to values.
///
/// Keys come out in source order: navigator order for a lazy object,
/// insertion order for an eager one. The source is responsible for key
/// uniqueness; lookups return the first match.
#[derive(Clone)]
pub struct ObjectValue<'a> {
    repr: Repr<'a>,
}

#[derive(Clone)]
enum Repr<'a> {
    Lazy {
        navigator: &'a dyn Navigator,
        node: NavigatorNode,
    },
    Eager(Arc<[Entry<'a>]>),
}

impl<'a> ObjectValue<'a> {
    /// A lazy view of the object at `node`.
    ///
    /// Panics when `node` is not an object node of `navigator`.
    #[track_caller]
    pub fn lazy(navigator: &'a dyn Navigator, node: NavigatorNode) -> Self {
        let kind = navigator.node_kind(node);
        if kind != NodeKind::Object {
            kind_violation(NodeKind::Object, kind);
        }
        Self::from_node(navigator, node)
    }

    pub(crate) fn from_node(navigator: &'a dyn Navigator, node: NavigatorNode) -> Self {
        Self {
            repr: Repr::Lazy { navigator, node },
        }
    }

    /// An eager object holding `entries` in order.
    pub fn new<K>(entries: impl IntoIterator<Item = (K, ElementValue<'a>)>) -> Self
    where
        K: Into<Cow<'a, str>>,
    {
        entries.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Lazy { navigator, node } => navigator.object_property_count(*node),
            Repr::Eager(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.repr, Repr::Lazy { .. })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match &self.repr {
            Repr::Lazy { navigator, node } => navigator.try_get_object_property(*node, key).is_some(),
            Repr::Eager(entries) => entries.iter().any(|(k, _)| k == key),
        }
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<ElementValue<'a>> {
        match &self.repr {
            Repr::Lazy { navigator, node } => {
                let navigator: &'a dyn Navigator = *navigator;
                let property = navigator.try_get_object_property(*node, key)?;
                Some(ElementValue::lazy(navigator, property.value))
            }
            Repr::Eager(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value.clone()),
        }
    }

    /// The value under `key` converted to `T`; `None` when the key is absent
    /// or holds a value of another kind.
    ///
    /// ```
    /// use doc_element::{ArrayValue, Document};
    ///
    /// let doc = Document::parse(r#"{"tags": ["a", "b"], "name": "x"}"#).unwrap();
    /// let root = doc.root_as::<doc_element::ObjectValue>().unwrap();
    /// assert_eq!(root.get_as::<ArrayValue>("tags").map(|a| a.len()), Some(2));
    /// assert!(root.get_as::<ArrayValue>("name").is_none());
    /// assert!(root.get_as::<ArrayValue>("missing").is_none());
    /// ```
    pub fn get_as<T: FromElement<'a>>(&self, key: &str) -> Option<T> {
        T::from_element(self.get(key)?).ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = Cow<'a, str>> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values in the same order as [`ObjectValue::keys`].
    pub fn values(&self) -> impl Iterator<Item = ElementValue<'a>> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Iterates `(key, value)` pairs. Each call starts over.
    pub fn iter(&self) -> ObjectIter<'_, 'a> {
        let inner = match &self.repr {
            Repr::Lazy { navigator, node } => {
                let navigator: &'a dyn Navigator = *navigator;
                IterInner::Lazy {
                    navigator,
                    properties: navigator.object_properties(*node),
                }
            }
            Repr::Eager(entries) => IterInner::Eager(entries.iter()),
        };
        ObjectIter { inner }
    }

    /// A deep copy with no navigator dependency.
    pub fn to_eager(&self) -> ObjectValue<'static> {
        self.iter()
            .map(|(key, value)| (Cow::Owned(key.into_owned()), value.to_eager()))
            .collect()
    }

    pub(crate) fn lazy_parts(&self) -> Option<(&'a dyn Navigator, NavigatorNode)> {
        match self.repr {
            Repr::Lazy { navigator, node } => Some((navigator, node)),
            Repr::Eager(_) => None,
        }
    }
}

impl Default for ObjectValue<'_> {
    fn default() -> Self {
        Self::new(std::iter::empty::<(&str, ElementValue<'_>)>())
    }
}

impl<'a, K: Into<Cow<'a, str>>> FromIterator<(K, ElementValue<'a>)> for ObjectValue<'a> {
    fn from_iter<I: IntoIterator<Item = (K, ElementValue<'a>)>>(iter: I) -> Self {
        Self {
            repr: Repr::Eager(
                iter.into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for ObjectValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over the `(key, value)` pairs of an [`ObjectValue`].
pub struct ObjectIter<'s, 'a> {
    inner: IterInner<'s, 'a>,
}

enum IterInner<'s, 'a> {
    Lazy {
        navigator: &'a dyn Navigator,
        properties: PropertyIter<'a>,
    },
    Eager(std::slice::Iter<'s, Entry<'a>>),
}

impl<'a> Iterator for ObjectIter<'_, 'a> {
    type Item = (Cow<'a, str>, ElementValue<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Lazy {
                navigator,
                properties,
            } => {
                let ObjectProperty { name, value } = properties.next()?;
                let navigator: &'a dyn Navigator = *navigator;
                Some((
                    Cow::Borrowed(navigator.string_value(name)),
                    ElementValue::lazy(navigator, value),
                ))
            }
            IterInner::Eager(entries) => entries.next().cloned(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Lazy { properties, .. } => properties.size_hint(),
            IterInner::Eager(entries) => entries.size_hint(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s ObjectValue<'a> {
    type Item = (Cow<'a, str>, ElementValue<'a>);
    type IntoIter = ObjectIter<'s, 'a>;

    fn into_iter(self) -> ObjectIter<'s, 'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::TextNavigator;
    use crate::value::{ArrayValue, Number};

    #[test]
    fn lazy_lookups() {
        let nav = TextNavigator::parse(r#"{"z": 1, "a": [true], "m": "s"}"#).unwrap();
        let object = ObjectValue::lazy(&nav, nav.root_node());
        assert_eq!(object.len(), 3);
        assert_eq!(object.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert!(object.contains_key("a"));
        assert!(!object.contains_key("b"));
        assert_eq!(object.get("z"), Some(ElementValue::Number(Number::Number64(1.0))));
        assert_eq!(object.get_as::<bool>("z"), None);
        assert_eq!(object.get_as::<String>("m").as_deref(), Some("s"));
        assert_eq!(object.get_as::<ArrayValue>("a").map(|a| a.len()), Some(1));
    }

    #[test]
    fn eager_preserves_insertion_order() {
        let object = ObjectValue::new([
            ("b", ElementValue::from(1i32)),
            ("a", ElementValue::from(2i32)),
        ]);
        assert!(!object.is_lazy());
        assert_eq!(object.keys().collect::<Vec<_>>(), ["b", "a"]);
        let values: Vec<_> = object.values().collect();
        assert_eq!(values, [ElementValue::from(1i32), ElementValue::from(2i32)]);
        assert_eq!(object.get("a"), Some(ElementValue::from(2i32)));
        assert!(object.get("c").is_none());
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let object = ObjectValue::new([
            ("k", ElementValue::from(1i32)),
            ("k", ElementValue::from(2i32)),
        ]);
        assert_eq!(object.len(), 2);
        assert_eq!(object.get("k"), Some(ElementValue::from(1i32)));
    }

    #[test]
    fn to_eager_matches_lazy() {
        let nav = TextNavigator::parse(r#"{"x": {"y": null}}"#).unwrap();
        let lazy = ObjectValue::lazy(&nav, nav.root_node());
        let eager = lazy.to_eager();
        assert_eq!(lazy, eager);
        assert_eq!(format!("{eager:?}"), r#"{"x": Object({"y": Null})}"#);
        assert!(ObjectValue::default().is_empty());
    }
}
