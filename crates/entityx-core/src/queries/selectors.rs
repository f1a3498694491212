use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::{Key, Snapshot};

/// Keys in collection order
pub fn list_keys<T, E>(snapshot: &Snapshot<T, E>) -> &[Key] {
    snapshot.order()
}

/// Records by key
pub fn list_records<T, E>(snapshot: &Snapshot<T, E>) -> &HashMap<Key, Arc<T>> {
    snapshot.records()
}

/// Records in collection order
pub fn list_all<T, E>(snapshot: &Snapshot<T, E>) -> Vec<&T> {
    snapshot.iter().collect()
}

pub fn count<T, E>(snapshot: &Snapshot<T, E>) -> usize {
    snapshot.len()
}

/// The four read views as plain function values
///
/// Handy where a caller wants to pass a view around or wrap it in its own
/// memoization layer.
pub struct Selectors<T, E = ()> {
    pub list_keys: fn(&Snapshot<T, E>) -> &[Key],
    pub list_records: fn(&Snapshot<T, E>) -> &HashMap<Key, Arc<T>>,
    pub list_all: fn(&Snapshot<T, E>) -> Vec<&T>,
    pub count: fn(&Snapshot<T, E>) -> usize,
}

impl<T, E> Selectors<T, E> {
    pub fn new() -> Self {
        Self {
            list_keys,
            list_records,
            list_all,
            count,
        }
    }
}

impl<T, E> Default for Selectors<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Selectors<T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for Selectors<T, E> {}

impl<T, E> fmt::Debug for Selectors<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selectors")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeySelector;
    use crate::ops::{apply, Classification};
    use serde_json::{json, Value};
    use std::convert::Infallible;

    fn seeded() -> Snapshot<Value> {
        let keys = KeySelector::<Value>::default();
        apply("seed", (), &Snapshot::default(), |(), draft| {
            for id in ["b", "a", "c"] {
                let record = json!({"id": id});
                let key = keys.extract_key(&record).unwrap();
                draft.order_mut().push(key.clone());
                draft.records_mut().insert(key, Arc::new(record));
            }
            Ok::<_, Infallible>(Classification::Both)
        })
        .unwrap()
    }

    #[test]
    fn test_views_follow_order() {
        let s = seeded();
        assert_eq!(list_keys(&s), ["b", "a", "c"]);
        assert_eq!(count(&s), 3);
        let ids: Vec<&Value> = list_all(&s).into_iter().map(|r| &r["id"]).collect();
        assert_eq!(ids, [&json!("b"), &json!("a"), &json!("c")]);
        assert_eq!(list_records(&s).len(), 3);
    }

    #[test]
    fn test_views_are_identity_projections() {
        let s = seeded();
        assert!(std::ptr::eq(list_keys(&s), s.order()));
        assert!(std::ptr::eq(list_records(&s), s.records()));
    }

    #[test]
    fn test_selector_bundle_matches_free_functions() {
        let s = seeded();
        let selectors = Selectors::<Value>::new();
        let copy = selectors;
        assert_eq!((copy.count)(&s), 3);
        assert_eq!((selectors.list_keys)(&s), list_keys(&s));
        assert_eq!((selectors.list_all)(&s).len(), 3);
        assert!((selectors.list_records)(&s).contains_key("a"));
    }

    #[test]
    fn test_views_on_empty_snapshot() {
        let s = Snapshot::<Value>::default();
        assert!(list_keys(&s).is_empty());
        assert!(list_all(&s).is_empty());
        assert_eq!(count(&s), 0);
    }
}
