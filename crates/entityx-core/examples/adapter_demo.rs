//! Entity Adapter Demonstration
//!
//! This example walks a small sorted collection through the adapter's
//! operations and shows when snapshots share their allocations.
//!
//! Key concepts illustrated:
//! 1. Snapshot threading (every operation returns the next snapshot)
//! 2. Comparator-ordered collections
//! 3. No-op detection by pointer identity
//! 4. Atomic failure on a keyless record

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::borrow::Cow;

use entityx_core::logging_facility::{init, Profile};
use entityx_core::{AdapterConfig, CollectionError, Selection, Update};
use serde_json::{json, Value};

fn main() -> Result<(), CollectionError> {
    init(Profile::Development);
    println!("=== EntityX Adapter Demo ===\n");

    // ===== Part 1: Sorted inserts =====
    println!("## Part 1: Sorted Inserts\n");

    let tasks = AdapterConfig::<Value>::default()
        .sort_by(|a, b| a["priority"].as_i64().cmp(&b["priority"].as_i64()))
        .build();

    let state = tasks.insert_many(
        vec![
            json!({"id": "t1", "title": "Write docs", "priority": 3}),
            json!({"id": "t2", "title": "Fix login", "priority": 1}),
            json!({"id": "t3", "title": "Review PR", "priority": 2}),
        ],
        &tasks.initial_state(),
    )?;
    println!("Order by priority: {:?}", tasks.list_keys(&state));

    // ===== Part 2: Updates =====
    println!("\n## Part 2: Updates\n");

    let rename = json!({"title": "Write API docs"}).as_object().cloned().unwrap();
    let renamed = tasks.update_one(Update::new("t1", rename), &state)?;
    println!(
        "Renamed t1; order reused: {}",
        renamed.shares_order_with(&state)
    );

    let bump = json!({"priority": 0}).as_object().cloned().unwrap();
    let bumped = tasks.update_one(Update::new("t1", bump), &renamed)?;
    println!("Bumped t1 to the front: {:?}", tasks.list_keys(&bumped));

    // ===== Part 3: No-ops =====
    println!("\n## Part 3: No-ops\n");

    let same = tasks.remove_one("t9", &bumped);
    println!("Removing an unknown key returns the input: {}", same.ptr_eq(&bumped));

    let same = tasks.map(|task| Cow::Borrowed(task), &bumped)?;
    println!("Identity map returns the input: {}", same.ptr_eq(&bumped));

    // ===== Part 4: Failure =====
    println!("\n## Part 4: Atomic Failure\n");

    let batch = vec![json!({"id": "t4", "priority": 5}), json!({"priority": 4})];
    match tasks.upsert_many(batch, &bumped) {
        Ok(_) => println!("unexpected success"),
        Err(err) => println!("✓ Rejected batch [{}]: {}", err.code(), err),
    }
    println!("Collection still holds {} tasks", tasks.count(&bumped));

    let done = tasks.remove_many(
        Selection::predicate(|task: &Value| task["priority"].as_i64() == Some(0)),
        &bumped,
    );
    println!("\nRemaining after clearing priority 0: {:?}", tasks.list_keys(&done));

    println!("\n=== Demo Complete ===");
    Ok(())
}
