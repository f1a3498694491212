//! Comparator-ordered collection strategy
//!
//! The order is kept ascending under the adapter's comparator. Anything that
//! brings records in (insert, replace, update, upsert, map) goes through
//! [`merge`]: the incoming batch is sorted on its own and then walked against
//! the already-sorted order, so a batch of `m` records costs
//! `O(n + m log m)` instead of a full re-sort. Removal is the unsorted
//! strategy's; dropping keys cannot unsort anything.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::operator::{Classification, Draft};
use super::unsorted::{changed_by, keyed, partition_upserts};
use crate::errors::Result;
use crate::model::record::Pending;
use crate::model::{Key, KeySelector, Record};

/// Total order over records, ascending
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Merge `incoming` into the draft's sorted order and write the records
///
/// Ties go to the incoming record: it lands immediately before any existing
/// record that compares equal. Keys in `incoming` must be unique and absent
/// from the draft.
pub(crate) fn merge<T: Record>(
    compare: &Comparator<T>,
    mut incoming: Vec<(Key, T)>,
    draft: &mut Draft<T>,
) {
    // stable: equal incoming records keep their batch order
    incoming.sort_by(|(_, a), (_, b)| compare(a, b));

    let merged = {
        let existing = draft.order();
        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        let (mut i, mut j) = (0, 0);

        while i < incoming.len() && j < existing.len() {
            let (key, record) = &incoming[i];
            let takes_incoming = match draft.get(&existing[j]) {
                Some(resident) => compare(record, resident) != Ordering::Greater,
                None => true,
            };
            if takes_incoming {
                merged.push(key.clone());
                i += 1;
            } else {
                merged.push(existing[j].clone());
                j += 1;
            }
        }

        merged.extend(incoming[i..].iter().map(|(key, _)| key.clone()));
        merged.extend(existing[j..].iter().cloned());
        merged
    };

    draft.set_order(merged);
    let records = draft.records_mut();
    for (key, record) in incoming {
        records.insert(key, Arc::new(record));
    }
}

/// Drop records already present, and repeats within the batch (first wins)
fn fresh<T: Record>(draft: &Draft<T>, keyed: Vec<(Key, T)>) -> Vec<(Key, T)> {
    let mut seen = HashSet::new();
    keyed
        .into_iter()
        .filter(|(key, _)| !draft.contains_key(key) && seen.insert(key.clone()))
        .collect()
}

fn insert_keyed_many<T: Record>(
    compare: &Comparator<T>,
    keyed: Vec<(Key, T)>,
    draft: &mut Draft<T>,
) -> Classification {
    let incoming = fresh(draft, keyed);
    if incoming.is_empty() {
        return Classification::NoChange;
    }
    merge(compare, incoming, draft);
    Classification::Both
}

pub(crate) fn insert_many<T: Record>(
    keys: &KeySelector<T>,
    compare: &Comparator<T>,
    records: Vec<T>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let keyed = keyed(keys, records)?;
    Ok(insert_keyed_many(compare, keyed, draft))
}

pub(crate) fn replace_all<T: Record>(
    keys: &KeySelector<T>,
    compare: &Comparator<T>,
    records: Vec<T>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let keyed = keyed(keys, records)?;
    if keyed.is_empty() && draft.order().is_empty() {
        return Ok(Classification::NoChange);
    }
    draft.clear();
    insert_keyed_many(compare, keyed, draft);
    Ok(Classification::Both)
}

/// A record lifted out of the collection while its batch of updates runs
struct Staged<T> {
    origin: Key,
    key: Key,
    record: T,
}

pub(crate) fn update_many<T: Record>(
    keys: &KeySelector<T>,
    compare: &Comparator<T>,
    pending: Vec<Pending<T>>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let mut staged: Vec<Option<Staged<T>>> = Vec::new();
    let mut by_key: HashMap<Key, usize> = HashMap::new();

    for (key, revision) in pending {
        // a second update to the same record composes with the first
        let (slot, origin, updated) = if let Some(slot) = by_key.remove(&key) {
            let Some(entry) = staged[slot].take() else {
                continue;
            };
            (slot, entry.origin, revision.apply_to(&entry.record))
        } else if let Some(original) = draft.get(&key).cloned() {
            draft.records_mut().remove(&key);
            staged.push(None);
            (staged.len() - 1, key, revision.apply_to(&original))
        } else {
            continue;
        };

        let new_key = keys.extract_key(&updated)?;

        // whoever holds the new key already is displaced by this record
        if let Some(other) = by_key.remove(&new_key) {
            staged[other] = None;
        }
        draft.records_mut().remove(&new_key);

        by_key.insert(new_key.clone(), slot);
        staged[slot] = Some(Staged {
            origin,
            key: new_key,
            record: updated,
        });
    }

    let staged: Vec<Staged<T>> = staged.into_iter().flatten().collect();
    if staged.is_empty() {
        return Ok(Classification::NoChange);
    }
    let rekeyed = staged.iter().any(|entry| entry.origin != entry.key);

    let before = draft.order_handle();
    let retained = before
        .iter()
        .filter(|key| draft.contains_key(key))
        .cloned()
        .collect();
    draft.set_order(retained);

    merge(
        compare,
        staged
            .into_iter()
            .map(|entry| (entry.key, entry.record))
            .collect(),
        draft,
    );

    if !rekeyed && draft.order() == before.as_slice() {
        Ok(Classification::RecordsOnly)
    } else {
        Ok(Classification::Both)
    }
}

pub(crate) fn upsert_many<T: Record>(
    keys: &KeySelector<T>,
    compare: &Comparator<T>,
    records: Vec<T>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let keyed = keyed(keys, records)?;
    let (updates, inserts) = partition_upserts(draft, keyed);
    let updated = update_many(keys, compare, updates, draft)?;
    let inserted = insert_keyed_many(compare, inserts, draft);
    Ok(updated.combine(inserted))
}

pub(crate) fn map<T, F>(
    keys: &KeySelector<T>,
    compare: &Comparator<T>,
    transform: F,
    draft: &mut Draft<T>,
) -> Result<Classification>
where
    T: Record,
    F: for<'r> FnMut(&'r T) -> Cow<'r, T>,
{
    let pending = changed_by(draft, transform);
    update_many(keys, compare, pending, draft)
}
