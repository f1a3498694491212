//! Snapshot operator: the functional boundary for every collection operation
//!
//! Each operation is written as a *mutator* that edits a [`Draft`] and reports
//! which parts of the collection it touched as a [`Classification`]. The
//! operator turns that report into the snapshot handed back to the caller:
//!
//! | Classification | Returned snapshot                                     |
//! |----------------|-------------------------------------------------------|
//! | `NoChange`     | the input snapshot itself (both pointers unchanged)   |
//! | `RecordsOnly`  | input `order` pointer, draft's new `records`          |
//! | `Both`         | draft's `order` and `records`                         |
//!
//! ## Atomicity Contract
//!
//! The draft starts out sharing the caller's allocations and copies a field
//! the first time it is written (`Arc::make_mut`), so nothing a mutator does
//! is visible through the caller's snapshot. If the mutator fails, the draft
//! is dropped and the error is returned; the caller's snapshot is unchanged.
//!
//! A mutator must not report `RecordsOnly` after changing the order: the
//! operator would discard the new order and break the key/record bijection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core_types::schema::{OUTCOME_BOTH, OUTCOME_NO_CHANGE, OUTCOME_RECORDS_ONLY};
use crate::errors::ExError;
use crate::model::{Key, Record, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};

/// Which parts of a snapshot an operation changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Nothing changed; the input snapshot is returned as-is
    NoChange,
    /// Records changed but the key order did not
    RecordsOnly,
    /// Both the key order and the records changed
    Both,
}

impl Classification {
    /// Combine the outcomes of two steps of one operation
    ///
    /// Precedence is `Both > RecordsOnly > NoChange`.
    pub fn combine(self, other: Classification) -> Classification {
        match (self, other) {
            (Classification::Both, _) | (_, Classification::Both) => Classification::Both,
            (Classification::RecordsOnly, _) | (_, Classification::RecordsOnly) => {
                Classification::RecordsOnly
            }
            (Classification::NoChange, Classification::NoChange) => Classification::NoChange,
        }
    }

    /// Stable label used in log events
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::NoChange => OUTCOME_NO_CHANGE,
            Classification::RecordsOnly => OUTCOME_RECORDS_ONLY,
            Classification::Both => OUTCOME_BOTH,
        }
    }
}

/// Per-call working copy of a snapshot's collection fields
///
/// Reads go straight to the shared data. The first write to a field copies
/// it if the caller's snapshot still holds it; later writes are in place.
pub struct Draft<T> {
    order: Arc<Vec<Key>>,
    records: Arc<HashMap<Key, Arc<T>>>,
}

impl<T> Draft<T> {
    fn of<E>(snapshot: &Snapshot<T, E>) -> Self {
        Self {
            order: Arc::clone(&snapshot.order),
            records: Arc::clone(&snapshot.records),
        }
    }

    pub fn order(&self) -> &[Key] {
        &self.order
    }

    pub fn records(&self) -> &HashMap<Key, Arc<T>> {
        &self.records
    }

    pub fn get(&self, key: &str) -> Option<&Arc<T>> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn order_mut(&mut self) -> &mut Vec<Key> {
        Arc::make_mut(&mut self.order)
    }

    pub fn records_mut(&mut self) -> &mut HashMap<Key, Arc<T>> {
        Arc::make_mut(&mut self.records)
    }

    /// Replace the order wholesale, without copying the current one
    pub fn set_order(&mut self, order: Vec<Key>) {
        self.order = Arc::new(order);
    }

    /// Empty both fields, without copying either
    pub fn clear(&mut self) {
        self.order = Arc::new(Vec::new());
        self.records = Arc::new(HashMap::new());
    }

    /// Handle on the order as it stands, for later positional comparison
    pub(crate) fn order_handle(&self) -> Arc<Vec<Key>> {
        Arc::clone(&self.order)
    }

    fn commit<E: Clone>(self, original: &Snapshot<T, E>, outcome: Classification) -> Snapshot<T, E>
    where
        T: Clone,
    {
        match outcome {
            Classification::NoChange => original.clone(),
            Classification::RecordsOnly => Snapshot {
                order: Arc::clone(&original.order),
                records: self.records,
                extra: original.extra.clone(),
            },
            Classification::Both => Snapshot {
                order: self.order,
                records: self.records,
                extra: original.extra.clone(),
            },
        }
    }
}

/// Run `mutator` against a draft of `snapshot` and commit per its classification
///
/// `op` names the operation in log events. Mutators that cannot fail use
/// [`std::convert::Infallible`] as their error type.
///
/// # Errors
///
/// Returns whatever error the mutator returns; `snapshot` is untouched.
pub fn apply<T, E, A, M, Err>(
    op: &'static str,
    arg: A,
    snapshot: &Snapshot<T, E>,
    mutator: M,
) -> std::result::Result<Snapshot<T, E>, Err>
where
    T: Record,
    E: Clone,
    M: FnOnce(A, &mut Draft<T>) -> std::result::Result<Classification, Err>,
    Err: Clone + Into<ExError>,
{
    log_op_start!(op, len = snapshot.len());
    let start = Instant::now();

    let mut draft = Draft::of(snapshot);
    let outcome = mutator(arg, &mut draft).map_err(|e| {
        log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    let next = draft.commit(snapshot, outcome);
    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        outcome = outcome,
        len = next.len()
    );

    Ok(next)
}
