/// Scenario 6: Upsert and map lay whole records over stored ones
///
/// A record handed to upsert or returned from map is applied the way an
/// update is: fields it carries win, fields it omits keep their stored value.
mod common;

use std::borrow::Cow;

use common::{assert_bijection, changes, unsorted_adapter};
use entityx_core::{AdapterConfig, EntityAdapter, Snapshot, Update};
use serde_json::{json, Value};

fn by_rank() -> EntityAdapter<Value> {
    AdapterConfig::<Value>::default()
        .sort_by(|a: &Value, b: &Value| a["rank"].as_i64().cmp(&b["rank"].as_i64()))
        .build()
}

fn ranked(adapter: &EntityAdapter<Value>) -> Snapshot<Value> {
    adapter
        .insert_many(
            vec![
                json!({"id": "1", "name": "a", "rank": 3}),
                json!({"id": "2", "name": "b", "rank": 1}),
            ],
            &adapter.initial_state(),
        )
        .expect("Should insert")
}

fn adapters() -> [EntityAdapter<Value>; 2] {
    [unsorted_adapter(), by_rank()]
}

#[test]
fn test_scenario_06_happy_upsert_one_matches_update_one() {
    for adapter in adapters() {
        // GIVEN record 1 with name and rank
        let state = ranked(&adapter);

        // WHEN upserting record 1 with only a new name
        let upserted = adapter
            .upsert_one(json!({"id": "1", "name": "z"}), &state)
            .expect("Should upsert");
        let updated = adapter
            .update_one(Update::new("1", changes(json!({"id": "1", "name": "z"}))), &state)
            .expect("Should update");

        // THEN rank survives, exactly as an update leaves it
        assert_eq!(
            upserted.get("1").unwrap(),
            &json!({"id": "1", "name": "z", "rank": 3})
        );
        assert_eq!(upserted.get("1"), updated.get("1"));
        assert_eq!(upserted.order(), updated.order());
        assert_bijection(&upserted);
    }
}

#[test]
fn test_scenario_06_happy_upsert_many_overlays_and_inserts() {
    for adapter in adapters() {
        // GIVEN records 1 and 2
        let state = ranked(&adapter);

        // WHEN upserting a partial record 2 and a new record 3
        let result = adapter
            .upsert_many(
                vec![
                    json!({"id": "2", "name": "bee"}),
                    json!({"id": "3", "name": "c", "rank": 2}),
                ],
                &state,
            )
            .expect("Should upsert");

        // THEN record 2 keeps its rank and record 3 is added
        assert_eq!(
            result.get("2").unwrap(),
            &json!({"id": "2", "name": "bee", "rank": 1})
        );
        assert_eq!(result.get("3").unwrap()["name"], json!("c"));
        assert_eq!(result.order().len(), 3);
        assert_bijection(&result);
    }
}

#[test]
fn test_scenario_06_happy_map_keeps_omitted_fields() {
    for adapter in adapters() {
        // GIVEN records 1 and 2
        let state = ranked(&adapter);

        // WHEN mapping record 1 to a record without its rank
        let result = adapter
            .map(
                |r: &Value| {
                    if r["id"] == json!("1") {
                        Cow::Owned(json!({"id": "1", "name": "c"}))
                    } else {
                        Cow::Borrowed(r)
                    }
                },
                &state,
            )
            .expect("Should map");

        // THEN the mapped record keeps its rank and record 2 is untouched
        assert_eq!(
            result.get("1").unwrap(),
            &json!({"id": "1", "name": "c", "rank": 3})
        );
        assert!(std::sync::Arc::ptr_eq(
            result.records().get("2").unwrap(),
            state.records().get("2").unwrap()
        ));
        assert!(result.shares_order_with(&state));
        assert_bijection(&result);
    }
}
