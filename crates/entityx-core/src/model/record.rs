use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a record within a collection
pub type Key = String;

/// A record that can be stored in a collection
///
/// `Changes` is the partial form of the record: the set of fields an update
/// may touch. `merge` overlays those fields on an existing record. If the
/// changes include the identity field, the merged record carries a new key
/// and the collection moves it accordingly.
///
/// Upsert and map hand over whole records rather than `Changes`; those are
/// laid over the stored record with [`overlay`](Record::overlay).
pub trait Record: Clone + std::fmt::Debug {
    type Changes: Clone + std::fmt::Debug;

    /// Produce the record that results from applying `changes` to `self`
    fn merge(&self, changes: &Self::Changes) -> Self;

    /// Produce the record that results from laying `whole` over `self`
    ///
    /// A typed record has no unset fields, so the default is `whole` itself.
    /// Records with optional fields should keep what `whole` leaves out.
    fn overlay(&self, whole: &Self) -> Self {
        whole.clone()
    }
}

/// Partial changes addressed to the record currently stored under `key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update<C> {
    pub key: Key,
    pub changes: C,
}

impl<C> Update<C> {
    pub fn new(key: impl Into<Key>, changes: C) -> Self {
        Self {
            key: key.into(),
            changes,
        }
    }
}

/// How an existing record is rewritten by an update-style operation
///
/// Updates carry `Changes`; upsert and map supply whole records.
#[derive(Debug, Clone)]
pub(crate) enum Revision<T: Record> {
    Merge(T::Changes),
    Overlay(T),
}

impl<T: Record> Revision<T> {
    pub(crate) fn apply_to(&self, original: &T) -> T {
        match self {
            Revision::Merge(changes) => original.merge(changes),
            Revision::Overlay(record) => original.overlay(record),
        }
    }
}

/// An update resolved against the collection: the key it targets and the rewrite
pub(crate) type Pending<T> = (Key, Revision<T>);

pub(crate) fn pending_from_updates<T: Record>(updates: Vec<Update<T::Changes>>) -> Vec<Pending<T>> {
    updates
        .into_iter()
        .map(|u| (u.key, Revision::Merge(u.changes)))
        .collect()
}

/// Dynamic records: a JSON object updated by shallow field overlay
///
/// A non-object record is replaced by the changes object, matching object
/// spread over a non-object value.
impl Record for Value {
    type Changes = Map<String, Value>;

    fn merge(&self, changes: &Self::Changes) -> Self {
        let mut merged = match self {
            Value::Object(fields) => fields.clone(),
            _ => Map::new(),
        };
        for (field, value) in changes {
            merged.insert(field.clone(), value.clone());
        }
        Value::Object(merged)
    }

    /// Fields of `whole` win; fields it omits keep their stored value
    fn overlay(&self, whole: &Self) -> Self {
        match whole {
            Value::Object(fields) => self.merge(fields),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn changes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_json_merge_overlays_fields() {
        let original = json!({"id": "2", "name": "Potato Sr", "rank": 4});
        let merged = original.merge(&changes(json!({"name": "John Sena"})));
        assert_eq!(merged, json!({"id": "2", "name": "John Sena", "rank": 4}));
    }

    #[test]
    fn test_json_merge_can_change_identity() {
        let original = json!({"id": "2", "name": "Potato Sr"});
        let merged = original.merge(&changes(json!({"id": "7"})));
        assert_eq!(merged["id"], json!("7"));
        assert_eq!(merged["name"], json!("Potato Sr"));
    }

    #[test]
    fn test_json_merge_over_non_object() {
        let merged = json!(5).merge(&changes(json!({"id": "1"})));
        assert_eq!(merged, json!({"id": "1"}));
    }

    #[test]
    fn test_json_overlay_keeps_omitted_fields() {
        let original = json!({"id": "1", "name": "a", "rank": 3});
        let rev: Revision<Value> = Revision::Overlay(json!({"id": "1", "name": "b"}));
        assert_eq!(rev.apply_to(&original), json!({"id": "1", "name": "b", "rank": 3}));
    }

    #[test]
    fn test_json_overlay_with_non_object_replaces() {
        let original = json!({"id": "1"});
        assert_eq!(original.overlay(&json!(7)), json!(7));
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Pair(u8, u8);

    impl Record for Pair {
        type Changes = u8;

        fn merge(&self, changes: &u8) -> Self {
            Pair(self.0, *changes)
        }
    }

    #[test]
    fn test_default_overlay_takes_whole_record() {
        let rev: Revision<Pair> = Revision::Overlay(Pair(1, 9));
        assert_eq!(rev.apply_to(&Pair(1, 2)), Pair(1, 9));
    }
}
