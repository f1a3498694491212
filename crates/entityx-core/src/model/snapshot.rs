use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::record::Key;

/// Immutable view of a normalized collection
///
/// A snapshot pairs an ordering of keys with a key → record map, plus any
/// extra state the owner colocates with the collection. Both collection
/// fields sit behind shared pointers: operations that leave a field alone
/// hand back the same pointer, so callers can detect "nothing changed here"
/// with [`shares_order_with`] / [`shares_records_with`] instead of comparing
/// contents.
///
/// Invariant: `order` holds exactly the keys of `records`, each once.
///
/// [`shares_order_with`]: Snapshot::shares_order_with
/// [`shares_records_with`]: Snapshot::shares_records_with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRepr<T, E>")]
pub struct Snapshot<T, E = ()> {
    pub(crate) order: Arc<Vec<Key>>,
    pub(crate) records: Arc<HashMap<Key, Arc<T>>>,
    pub(crate) extra: E,
}

impl<T, E> Snapshot<T, E> {
    /// An empty collection carrying `extra`
    pub fn new(extra: E) -> Self {
        Self {
            order: Arc::new(Vec::new()),
            records: Arc::new(HashMap::new()),
            extra,
        }
    }

    /// Keys in collection order
    pub fn order(&self) -> &[Key] {
        &self.order
    }

    /// Records by key
    pub fn records(&self) -> &HashMap<Key, Arc<T>> {
        &self.records
    }

    /// Extra state passed through untouched by every operation
    pub fn extra(&self) -> &E {
        &self.extra
    }

    /// Same collection with different extra state
    ///
    /// The order and records pointers are shared with `self`.
    pub fn with_extra<E2>(&self, extra: E2) -> Snapshot<T, E2> {
        Snapshot {
            order: Arc::clone(&self.order),
            records: Arc::clone(&self.records),
            extra,
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.records.get(key).map(Arc::as_ref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in collection order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.records.get(key).map(Arc::as_ref))
    }

    /// True when `other` is this very snapshot: both collection fields are
    /// the same allocations
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.shares_order_with(other) && self.shares_records_with(other)
    }

    pub fn shares_order_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.order, &other.order)
    }

    pub fn shares_records_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl<T, E: Default> Default for Snapshot<T, E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

/// Wire shape of a snapshot; validated on the way in
#[derive(Deserialize)]
struct SnapshotRepr<T, E> {
    order: Vec<Key>,
    records: HashMap<Key, T>,
    extra: E,
}

impl<T, E> TryFrom<SnapshotRepr<T, E>> for Snapshot<T, E> {
    type Error = String;

    fn try_from(repr: SnapshotRepr<T, E>) -> std::result::Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(repr.order.len());
        for key in &repr.order {
            if !seen.insert(key.as_str()) {
                return Err(format!("duplicate key in order: {}", key));
            }
            if !repr.records.contains_key(key) {
                return Err(format!("ordered key has no record: {}", key));
            }
        }
        if seen.len() != repr.records.len() {
            return Err(format!(
                "order lists {} keys but there are {} records",
                seen.len(),
                repr.records.len()
            ));
        }

        let records = repr
            .records
            .into_iter()
            .map(|(key, record)| (key, Arc::new(record)))
            .collect();

        Ok(Snapshot {
            order: Arc::new(repr.order),
            records: Arc::new(records),
            extra: repr.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_snapshot_is_empty() {
        let snapshot: Snapshot<String> = Snapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert!(snapshot.records().is_empty());
    }

    #[test]
    fn test_clone_shares_both_fields() {
        let snapshot: Snapshot<String> = Snapshot::default();
        let copy = snapshot.clone();
        assert!(snapshot.ptr_eq(&copy));
    }

    #[test]
    fn test_with_extra_shares_collection() {
        let snapshot: Snapshot<String> = Snapshot::default();
        let loading = snapshot.with_extra(true);
        assert!(*loading.extra());
        assert!(Arc::ptr_eq(&snapshot.order, &loading.order));
        assert!(Arc::ptr_eq(&snapshot.records, &loading.records));
    }

    #[test]
    fn test_round_trips_through_json() {
        let encoded = json!({
            "order": ["b", "a"],
            "records": {"a": 1, "b": 2},
            "extra": null
        });
        let snapshot: Snapshot<u32> = serde_json::from_value(encoded.clone()).unwrap();
        assert_eq!(snapshot.order(), ["b", "a"]);
        assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), encoded);
    }

    #[test]
    fn test_deserialize_rejects_broken_bijection() {
        let duplicate = json!({"order": ["a", "a"], "records": {"a": 1}, "extra": null});
        assert!(serde_json::from_value::<Snapshot<u32>>(duplicate).is_err());

        let dangling = json!({"order": ["a", "b"], "records": {"a": 1}, "extra": null});
        assert!(serde_json::from_value::<Snapshot<u32>>(dangling).is_err());

        let unlisted = json!({"order": ["a"], "records": {"a": 1, "b": 2}, "extra": null});
        assert!(serde_json::from_value::<Snapshot<u32>>(unlisted).is_err());
    }
}
