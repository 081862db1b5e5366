use std::fmt;
use std::sync::Arc;

use super::ElementValue;
use crate::navigator::{kind_violation, Navigator, NavigatorNode, NodeIter, NodeKind};

/// An ordered sequence of values.
///
/// A lazy array resolves every access through its navigator; an eager array
/// owns a shared, immutable item list. Both behave identically and compare
/// equal when their items do. Cloning either form is cheap.
#[derive(Clone)]
pub struct ArrayValue<'a> {
    repr: Repr<'a>,
}

#[derive(Clone)]
enum Repr<'a> {
    Lazy {
        navigator: &'a dyn Navigator,
        node: NavigatorNode,
    },
    Eager(Arc<[ElementValue<'a>]>),
}

impl<'a> ArrayValue<'a> {
    /// A lazy view of the array at `node`.
    ///
    /// Panics when `node` is not an array node of `navigator`.
    #[track_caller]
    pub fn lazy(navigator: &'a dyn Navigator, node: NavigatorNode) -> Self {
        let kind = navigator.node_kind(node);
        if kind != NodeKind::Array {
            kind_violation(NodeKind::Array, kind);
        }
        Self::from_node(navigator, node)
    }

    pub(crate) fn from_node(navigator: &'a dyn Navigator, node: NavigatorNode) -> Self {
        Self {
            repr: Repr::Lazy { navigator, node },
        }
    }

    /// An eager array holding `items` in order.
    pub fn new(items: impl IntoIterator<Item = ElementValue<'a>>) -> Self {
        items.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Lazy { navigator, node } => navigator.array_item_count(*node),
            Repr::Eager(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.repr, Repr::Lazy { .. })
    }

    /// The item at `index`. Panics when `index >= len()`.
    #[track_caller]
    pub fn item_at(&self, index: usize) -> ElementValue<'a> {
        match &self.repr {
            Repr::Lazy { navigator, node } => {
                ElementValue::lazy(*navigator, navigator.array_item_at(*node, index))
            }
            Repr::Eager(items) => match items.get(index) {
                Some(item) => item.clone(),
                None => panic!(
                    "array index {index} out of range for {} items",
                    items.len()
                ),
            },
        }
    }

    pub fn get(&self, index: usize) -> Option<ElementValue<'a>> {
        if index < self.len() {
            Some(self.item_at(index))
        } else {
            None
        }
    }

    /// Iterates the items in index order. Each call starts over.
    pub fn iter(&self) -> ArrayIter<'_, 'a> {
        let inner = match &self.repr {
            Repr::Lazy { navigator, node } => {
                let navigator: &'a dyn Navigator = *navigator;
                IterInner::Lazy {
                    navigator,
                    nodes: navigator.array_items(*node),
                }
            }
            Repr::Eager(items) => IterInner::Eager(items.iter()),
        };
        ArrayIter { inner }
    }

    /// A deep copy with no navigator dependency.
    pub fn to_eager(&self) -> ArrayValue<'static> {
        self.iter().map(|item| item.to_eager()).collect()
    }

    /// The shared items of an eager array.
    pub(crate) fn eager_items(&self) -> Option<&Arc<[ElementValue<'a>]>> {
        match &self.repr {
            Repr::Eager(items) => Some(items),
            Repr::Lazy { .. } => None,
        }
    }

    /// Navigator and node of a lazy array.
    pub(crate) fn lazy_parts(&self) -> Option<(&'a dyn Navigator, NavigatorNode)> {
        match self.repr {
            Repr::Lazy { navigator, node } => Some((navigator, node)),
            Repr::Eager(_) => None,
        }
    }
}

impl Default for ArrayValue<'_> {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<'a> FromIterator<ElementValue<'a>> for ArrayValue<'a> {
    fn from_iter<I: IntoIterator<Item = ElementValue<'a>>>(iter: I) -> Self {
        Self {
            repr: Repr::Eager(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for ArrayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the items of an [`ArrayValue`].
pub struct ArrayIter<'s, 'a> {
    inner: IterInner<'s, 'a>,
}

enum IterInner<'s, 'a> {
    Lazy {
        navigator: &'a dyn Navigator,
        nodes: NodeIter<'a>,
    },
    Eager(std::slice::Iter<'s, ElementValue<'a>>),
}

impl<'a> Iterator for ArrayIter<'_, 'a> {
    type Item = ElementValue<'a>;

    fn next(&mut self) -> Option<ElementValue<'a>> {
        match &mut self.inner {
            IterInner::Lazy { navigator, nodes } => {
                let node = nodes.next()?;
                Some(ElementValue::lazy(*navigator, node))
            }
            IterInner::Eager(items) => items.next().cloned(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Lazy { nodes, .. } => nodes.size_hint(),
            IterInner::Eager(items) => items.size_hint(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s ArrayValue<'a> {
    type Item = ElementValue<'a>;
    type IntoIter = ArrayIter<'s, 'a>;

    fn into_iter(self) -> ArrayIter<'s, 'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::TextNavigator;

    #[test]
    fn lazy_and_eager_agree() {
        let nav = TextNavigator::parse("[1, \"two\", [3]]").unwrap();
        let lazy = ArrayValue::lazy(&nav, nav.root_node());
        let eager = lazy.to_eager();
        assert!(lazy.is_lazy());
        assert!(!eager.is_lazy());
        assert_eq!(lazy.len(), 3);
        assert_eq!(eager.len(), 3);
        for i in 0..3 {
            assert_eq!(lazy.item_at(i), eager.item_at(i));
        }
        assert!(lazy.get(3).is_none());
        assert!(eager.get(3).is_none());
    }

    #[test]
    fn iteration_restarts() {
        let array = ArrayValue::new([ElementValue::from(1i32), ElementValue::from(2i32)]);
        let first: Vec<_> = array.iter().collect();
        let second: Vec<_> = (&array).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(array.iter().size_hint(), (2, Some(2)));
    }

    #[test]
    fn empty_array() {
        let array = ArrayValue::default();
        assert!(array.is_empty());
        assert_eq!(array.iter().count(), 0);
        assert_eq!(format!("{array:?}"), "[]");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn eager_item_at_panics_out_of_range() {
        ArrayValue::new([ElementValue::Null]).item_at(1);
    }

    #[test]
    #[should_panic(expected = "accessor for Array called on a Object node")]
    fn lazy_rejects_non_array_node() {
        let nav = TextNavigator::parse("{}").unwrap();
        ArrayValue::lazy(&nav, nav.root_node());
    }
}
