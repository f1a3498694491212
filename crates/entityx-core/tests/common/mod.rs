use std::cmp::Ordering;
use std::collections::HashSet;

use entityx_core::{EntityAdapter, KeySelector, Record, Snapshot};
use serde_json::{json, Value};

/// Calendar date as (year, month, day); tuple order is chronological
#[allow(dead_code)]
pub type Date = (u16, u8, u8);

/// Typed record used by the sorted suites
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub created_at: Date,
}

/// Partial form of [`Item`]; `None` leaves a field untouched
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub id: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<Date>,
}

impl Record for Item {
    type Changes = ItemChanges;

    fn merge(&self, changes: &ItemChanges) -> Self {
        Item {
            id: changes.id.clone().unwrap_or_else(|| self.id.clone()),
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            created_at: changes.created_at.unwrap_or(self.created_at),
        }
    }
}

#[allow(dead_code)]
pub fn item(id: &str, name: &str, created_at: Date) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        created_at,
    }
}

/// Newest first
#[allow(dead_code)]
pub fn by_date_desc(a: &Item, b: &Item) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

#[allow(dead_code)]
pub fn item_keys() -> KeySelector<Item> {
    KeySelector::new(|item: &Item| Some(item.id.clone()))
}

#[allow(dead_code)]
pub fn sorted_adapter() -> EntityAdapter<Item> {
    EntityAdapter::sorted(item_keys(), by_date_desc)
}

/// Five dated items inserted one at a time; resulting order is 4, 5, 3, 1, 2
#[allow(dead_code)]
pub fn sorted_fixture(adapter: &EntityAdapter<Item>) -> Snapshot<Item> {
    let items = [
        item("1", "Potato Jr", (2016, 9, 12)),
        item("2", "Potato Sr", (2015, 11, 22)),
        item("3", "Apple", (2016, 9, 25)),
        item("4", "Banana", (2018, 3, 24)),
        item("5", "General Kenobi", (2016, 12, 3)),
    ];
    items.into_iter().fold(adapter.initial_state(), |state, item| {
        adapter
            .insert_one(item, &state)
            .expect("fixture items have keys")
    })
}

#[allow(dead_code)]
pub fn unsorted_adapter() -> EntityAdapter<Value> {
    EntityAdapter::unsorted(KeySelector::default())
}

/// Five named JSON records in key order 1..=5
#[allow(dead_code)]
pub fn unsorted_fixture(adapter: &EntityAdapter<Value>) -> Snapshot<Value> {
    adapter
        .insert_many(
            vec![
                json!({"id": "1", "name": "Potato Jr"}),
                json!({"id": "2", "name": "Potato Sr"}),
                json!({"id": "3", "name": "Apple"}),
                json!({"id": "4", "name": "Banana"}),
                json!({"id": "5", "name": "General Kenobi"}),
            ],
            &adapter.initial_state(),
        )
        .expect("fixture records have keys")
}

/// Changes object for a JSON record update
#[allow(dead_code)]
pub fn changes(value: Value) -> serde_json::Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("changes must be a JSON object")
}

/// Assert `order` and `records` describe the same key set, each key once
#[allow(dead_code)]
pub fn assert_bijection<T, E>(snapshot: &Snapshot<T, E>) {
    let ordered: HashSet<&str> = snapshot.order().iter().map(String::as_str).collect();
    assert_eq!(
        ordered.len(),
        snapshot.order().len(),
        "order holds a duplicate key: {:?}",
        snapshot.order()
    );
    let stored: HashSet<&str> = snapshot.records().keys().map(String::as_str).collect();
    assert_eq!(ordered, stored, "order and records disagree");
}

/// Assert adjacent records never compare `Greater`
#[allow(dead_code)]
pub fn assert_sorted<T, E>(snapshot: &Snapshot<T, E>, compare: impl Fn(&T, &T) -> Ordering) {
    let records: Vec<&T> = snapshot.iter().collect();
    for pair in records.windows(2) {
        assert_ne!(
            compare(pair[0], pair[1]),
            Ordering::Greater,
            "order is not sorted: {:?}",
            snapshot.order()
        );
    }
}
