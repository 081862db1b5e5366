//! Structural equality.
//!
//! Equality never looks at the materialization strategy or the backing
//! format: a lazy binary array, a lazy text array and an eager array with the
//! same items are all equal. Arrays compare in order. Objects compare as
//! key/value sets, so property order does not matter.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::value::{ArrayValue, ElementValue, ObjectValue};

impl PartialEq for ElementValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementValue::Null, ElementValue::Null) => true,
            (ElementValue::Boolean(a), ElementValue::Boolean(b)) => a == b,
            (ElementValue::Number(a), ElementValue::Number(b)) => a == b,
            (ElementValue::String(a), ElementValue::String(b)) => a == b,
            (ElementValue::Guid(a), ElementValue::Guid(b)) => a == b,
            (ElementValue::Binary(a), ElementValue::Binary(b)) => a == b,
            (ElementValue::Array(a), ElementValue::Array(b)) => a == b,
            (ElementValue::Object(a), ElementValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ElementValue<'_> {}

impl PartialEq for ArrayValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.eager_items(), other.eager_items()) {
            if Arc::ptr_eq(a, b) {
                return true;
            }
        }
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for ArrayValue<'_> {}

/// Objects at or below this size compare by linear scan.
const INDEXED_COMPARE_THRESHOLD: usize = 8;

impl PartialEq for ObjectValue<'_> {
    /// Entries match as a multiset: every entry of one side pairs with a
    /// distinct, equal entry of the other. Repeated keys are compared by
    /// value rather than collapsed.
    fn eq(&self, other: &Self) -> bool {
        let len = self.len();
        if len != other.len() {
            return false;
        }
        if len <= INDEXED_COMPARE_THRESHOLD {
            let theirs: Vec<_> = other.iter().collect();
            let mut used = [false; INDEXED_COMPARE_THRESHOLD];
            return self.iter().all(|(key, value)| {
                let found = theirs
                    .iter()
                    .enumerate()
                    .position(|(i, (k, v))| !used[i] && *k == key && *v == value);
                match found {
                    Some(i) => {
                        used[i] = true;
                        true
                    }
                    None => false,
                }
            });
        }
        let mut theirs: HashMap<Cow<'_, str>, Vec<ElementValue<'_>>> = HashMap::with_capacity(len);
        for (key, value) in other {
            theirs.entry(key).or_default().push(value);
        }
        self.iter().all(|(key, value)| {
            let Some(bucket) = theirs.get_mut(key.as_ref()) else {
                return false;
            };
            match bucket.iter().position(|v| *v == value) {
                Some(i) => {
                    bucket.swap_remove(i);
                    true
                }
                None => false,
            }
        })
    }
}

impl Eq for ObjectValue<'_> {}
