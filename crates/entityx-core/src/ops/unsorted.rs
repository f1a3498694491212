//! Insertion-ordered collection strategy
//!
//! New keys are appended; updates keep each record in its slot, including
//! updates that change the record's key. Removal lives here too and is shared
//! with the sorted strategy, since dropping keys never breaks a sort order.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::operator::{Classification, Draft};
use super::selection::Selection;
use crate::errors::Result;
use crate::model::record::{Pending, Revision};
use crate::model::{Key, KeySelector, Record};

/// Pair every record with its key, failing before anything is written
pub(crate) fn keyed<T: Record>(keys: &KeySelector<T>, records: Vec<T>) -> Result<Vec<(Key, T)>> {
    records
        .into_iter()
        .map(|record| -> Result<(Key, T)> { Ok((keys.extract_key(&record)?, record)) })
        .collect()
}

/// Whole-record overlays for every record `transform` hands back owned
pub(crate) fn changed_by<T, F>(draft: &Draft<T>, mut transform: F) -> Vec<Pending<T>>
where
    T: Record,
    F: for<'r> FnMut(&'r T) -> Cow<'r, T>,
{
    draft
        .order()
        .iter()
        .filter_map(|key| {
            let record = draft.get(key)?;
            match transform(record.as_ref()) {
                Cow::Borrowed(_) => None,
                Cow::Owned(changed) => Some((key.clone(), Revision::Overlay(changed))),
            }
        })
        .collect()
}

/// Split keyed records into (present → overlay, absent → insertion)
pub(crate) fn partition_upserts<T: Record>(
    draft: &Draft<T>,
    keyed: Vec<(Key, T)>,
) -> (Vec<Pending<T>>, Vec<(Key, T)>) {
    let mut updates = Vec::new();
    let mut inserts = Vec::new();
    for (key, record) in keyed {
        if draft.contains_key(&key) {
            updates.push((key, Revision::Overlay(record)));
        } else {
            inserts.push((key, record));
        }
    }
    (updates, inserts)
}

fn insert_keyed<T: Record>(draft: &mut Draft<T>, key: Key, record: T) -> Classification {
    if draft.contains_key(&key) {
        return Classification::NoChange;
    }
    draft.order_mut().push(key.clone());
    draft.records_mut().insert(key, Arc::new(record));
    Classification::Both
}

fn insert_keyed_many<T: Record>(draft: &mut Draft<T>, keyed: Vec<(Key, T)>) -> Classification {
    keyed
        .into_iter()
        .fold(Classification::NoChange, |outcome, (key, record)| {
            outcome.combine(insert_keyed(draft, key, record))
        })
}

pub(crate) fn insert_many<T: Record>(
    keys: &KeySelector<T>,
    records: Vec<T>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let keyed = keyed(keys, records)?;
    Ok(insert_keyed_many(draft, keyed))
}

pub(crate) fn replace_all<T: Record>(
    keys: &KeySelector<T>,
    records: Vec<T>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let keyed = keyed(keys, records)?;
    if keyed.is_empty() && draft.order().is_empty() {
        return Ok(Classification::NoChange);
    }
    draft.clear();
    insert_keyed_many(draft, keyed);
    Ok(Classification::Both)
}

pub(crate) fn remove_many<T: Record>(
    selection: Selection<'_, T>,
    draft: &mut Draft<T>,
) -> Classification {
    let doomed: HashSet<Key> = match selection {
        Selection::ByKeys(keys) => keys
            .into_iter()
            .filter(|key| draft.contains_key(key))
            .collect(),
        Selection::ByPredicate(predicate) => draft
            .order()
            .iter()
            .filter(|key| draft.get(key).is_some_and(|record| predicate(record.as_ref())))
            .cloned()
            .collect(),
    };

    if doomed.is_empty() {
        return Classification::NoChange;
    }

    let records = draft.records_mut();
    for key in &doomed {
        records.remove(key);
    }
    draft.order_mut().retain(|key| !doomed.contains(key));
    Classification::Both
}

pub(crate) fn remove_all<T>(draft: &mut Draft<T>) -> Classification {
    if draft.order().is_empty() {
        return Classification::NoChange;
    }
    draft.clear();
    Classification::Both
}

/// In-place key rewrites over an order, applied one rename at a time
struct Rekey {
    slots: Vec<Option<Key>>,
    index: HashMap<Key, usize>,
}

impl Rekey {
    fn of(order: &[Key]) -> Self {
        Self {
            slots: order.iter().cloned().map(Some).collect(),
            index: order
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), i))
                .collect(),
        }
    }

    /// Move `old`'s slot to `new`; a record already holding `new` loses its slot
    fn rename(&mut self, old: &str, new: &Key) {
        if let Some(displaced) = self.index.remove(new) {
            self.slots[displaced] = None;
        }
        if let Some(slot) = self.index.remove(old) {
            self.slots[slot] = Some(new.clone());
            self.index.insert(new.clone(), slot);
        }
    }

    fn finish(self) -> Vec<Key> {
        self.slots.into_iter().flatten().collect()
    }
}

pub(crate) fn update_many<T: Record>(
    keys: &KeySelector<T>,
    pending: Vec<Pending<T>>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let mut touched = false;
    let mut rekey: Option<Rekey> = None;

    for (key, revision) in pending {
        let Some(original) = draft.get(&key) else {
            continue;
        };
        let updated = revision.apply_to(original);
        let new_key = keys.extract_key(&updated)?;
        touched = true;

        if new_key != key {
            rekey
                .get_or_insert_with(|| Rekey::of(draft.order()))
                .rename(&key, &new_key);
            draft.records_mut().remove(&key);
        }
        draft.records_mut().insert(new_key, Arc::new(updated));
    }

    Ok(match (touched, rekey) {
        (false, _) => Classification::NoChange,
        (true, None) => Classification::RecordsOnly,
        (true, Some(rekey)) => {
            draft.set_order(rekey.finish());
            Classification::Both
        }
    })
}

pub(crate) fn upsert_many<T: Record>(
    keys: &KeySelector<T>,
    records: Vec<T>,
    draft: &mut Draft<T>,
) -> Result<Classification> {
    let keyed = keyed(keys, records)?;
    let (updates, inserts) = partition_upserts(draft, keyed);
    let updated = update_many(keys, updates, draft)?;
    let inserted = insert_keyed_many(draft, inserts);
    Ok(updated.combine(inserted))
}

pub(crate) fn map<T, F>(
    keys: &KeySelector<T>,
    transform: F,
    draft: &mut Draft<T>,
) -> Result<Classification>
where
    T: Record,
    F: for<'r> FnMut(&'r T) -> Cow<'r, T>,
{
    let pending = changed_by(draft, transform);
    update_many(keys, pending, draft)
}
