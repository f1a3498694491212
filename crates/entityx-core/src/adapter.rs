//! Entity adapter: the public face of the collection engine
//!
//! An [`EntityAdapter`] is configured once with a key selector and an
//! ordering mode, then applied to any number of [`Snapshot`]s. It holds no
//! collection state itself; every operation takes a snapshot and returns the
//! next one, which is the input itself whenever nothing changed.
//!
//! ```
//! use entityx_core::{EntityAdapter, KeySelector};
//! use serde_json::json;
//!
//! let books = EntityAdapter::unsorted(KeySelector::default());
//! let s0 = books.initial_state();
//! let s1 = books.insert_one(json!({"id": "b1", "title": "Dune"}), &s0)?;
//! let s2 = books.insert_one(json!({"id": "b1", "title": "Dune"}), &s1)?;
//!
//! assert_eq!(books.count(&s1), 1);
//! assert!(s2.ptr_eq(&s1));
//! # Ok::<(), entityx_core::CollectionError>(())
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::Result;
use crate::model::record::pending_from_updates;
use crate::model::{Key, KeySelector, Record, Snapshot, Update};
use crate::ops::{apply, sorted, unsorted, Comparator, Selection};
use crate::queries::{self, Selectors};

/// How a collection keeps its keys ordered
pub enum OrderingMode<T> {
    /// Insertion order; updates keep records in place
    Insertion,
    /// Ascending under the comparator; ties place newer records first
    Sorted(Comparator<T>),
}

impl<T> OrderingMode<T> {
    pub fn sorted_by<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        OrderingMode::Sorted(Arc::new(compare))
    }
}

impl<T> Default for OrderingMode<T> {
    fn default() -> Self {
        OrderingMode::Insertion
    }
}

impl<T> Clone for OrderingMode<T> {
    fn clone(&self) -> Self {
        match self {
            OrderingMode::Insertion => OrderingMode::Insertion,
            OrderingMode::Sorted(compare) => OrderingMode::Sorted(Arc::clone(compare)),
        }
    }
}

impl<T> fmt::Debug for OrderingMode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingMode::Insertion => f.write_str("Insertion"),
            OrderingMode::Sorted(_) => f.write_str("Sorted(..)"),
        }
    }
}

/// Builder for an [`EntityAdapter`]
#[derive(Debug, Clone)]
pub struct AdapterConfig<T> {
    key_selector: KeySelector<T>,
    ordering: OrderingMode<T>,
}

impl<T: Record> AdapterConfig<T> {
    /// Start from a key selector, in insertion order
    pub fn new(key_selector: KeySelector<T>) -> Self {
        Self {
            key_selector,
            ordering: OrderingMode::Insertion,
        }
    }

    /// Keep the collection sorted ascending under `compare`
    pub fn sort_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.ordering = OrderingMode::sorted_by(compare);
        self
    }

    pub fn ordering(mut self, ordering: OrderingMode<T>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn build(self) -> EntityAdapter<T> {
        EntityAdapter::new(self.key_selector, self.ordering)
    }
}

impl Default for AdapterConfig<Value> {
    fn default() -> Self {
        Self::new(KeySelector::default())
    }
}

/// Operations over normalized collections of `T`
///
/// Cloning is cheap: the key selector and comparator are shared.
#[derive(Debug, Clone)]
pub struct EntityAdapter<T> {
    key_selector: KeySelector<T>,
    ordering: OrderingMode<T>,
}

impl<T: Record> EntityAdapter<T> {
    pub fn new(key_selector: KeySelector<T>, ordering: OrderingMode<T>) -> Self {
        Self {
            key_selector,
            ordering,
        }
    }

    pub fn unsorted(key_selector: KeySelector<T>) -> Self {
        Self::new(key_selector, OrderingMode::Insertion)
    }

    pub fn sorted<F>(key_selector: KeySelector<T>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::new(key_selector, OrderingMode::sorted_by(compare))
    }

    pub fn key_selector(&self) -> &KeySelector<T> {
        &self.key_selector
    }

    pub fn ordering(&self) -> &OrderingMode<T> {
        &self.ordering
    }

    pub fn is_sorted(&self) -> bool {
        matches!(self.ordering, OrderingMode::Sorted(_))
    }

    // ===== State =====

    pub fn initial_state(&self) -> Snapshot<T> {
        Snapshot::default()
    }

    /// Empty collection carrying caller-owned `extra` state
    ///
    /// `extra` rides along unchanged through every operation.
    pub fn initial_state_with<E>(&self, extra: E) -> Snapshot<T, E> {
        Snapshot::new(extra)
    }

    pub fn selectors<E>(&self) -> Selectors<T, E> {
        Selectors::new()
    }

    // ===== Insert =====

    /// Add `record` unless its key is already present
    ///
    /// # Errors
    ///
    /// `MissingKey` if `record` has no key.
    pub fn insert_one<E: Clone>(
        &self,
        record: T,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        self.insert("insert_one", vec![record], snapshot)
    }

    /// Add every record whose key is not yet present
    ///
    /// Within the batch, the first record for a key wins.
    ///
    /// # Errors
    ///
    /// `MissingKey` if any record has no key; nothing is inserted.
    pub fn insert_many<E: Clone>(
        &self,
        records: Vec<T>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        self.insert("insert_many", records, snapshot)
    }

    fn insert<E: Clone>(
        &self,
        op: &'static str,
        records: Vec<T>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        apply(op, records, snapshot, |records, draft| match &self.ordering {
            OrderingMode::Insertion => unsorted::insert_many(&self.key_selector, records, draft),
            OrderingMode::Sorted(compare) => {
                sorted::insert_many(&self.key_selector, compare, records, draft)
            }
        })
    }

    /// Discard the collection's contents and load `records` instead
    ///
    /// # Errors
    ///
    /// `MissingKey` if any record has no key; the snapshot is kept.
    pub fn replace_all<E: Clone>(
        &self,
        records: Vec<T>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        apply("replace_all", records, snapshot, |records, draft| match &self.ordering {
            OrderingMode::Insertion => unsorted::replace_all(&self.key_selector, records, draft),
            OrderingMode::Sorted(compare) => {
                sorted::replace_all(&self.key_selector, compare, records, draft)
            }
        })
    }

    // ===== Remove =====

    pub fn remove_one<E: Clone>(
        &self,
        key: impl Into<Key>,
        snapshot: &Snapshot<T, E>,
    ) -> Snapshot<T, E> {
        self.remove("remove_one", Selection::ByKeys(vec![key.into()]), snapshot)
    }

    /// Remove the selected records; unknown keys are ignored
    pub fn remove_many<E: Clone>(
        &self,
        selection: Selection<'_, T>,
        snapshot: &Snapshot<T, E>,
    ) -> Snapshot<T, E> {
        self.remove("remove_many", selection, snapshot)
    }

    pub fn remove_all<E: Clone>(&self, snapshot: &Snapshot<T, E>) -> Snapshot<T, E> {
        infallible(apply("remove_all", (), snapshot, |(), draft| {
            Ok(unsorted::remove_all(draft))
        }))
    }

    fn remove<E: Clone>(
        &self,
        op: &'static str,
        selection: Selection<'_, T>,
        snapshot: &Snapshot<T, E>,
    ) -> Snapshot<T, E> {
        infallible(apply(op, selection, snapshot, |selection, draft| {
            Ok(unsorted::remove_many(selection, draft))
        }))
    }

    // ===== Update =====

    /// Overlay `update.changes` on the record stored under `update.key`
    ///
    /// An unknown key is a no-op. If the changes give the record a new key,
    /// the record moves to it (displacing any record already there).
    ///
    /// # Errors
    ///
    /// `MissingKey` if the updated record has no key.
    pub fn update_one<E: Clone>(
        &self,
        update: Update<T::Changes>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        self.update("update_one", vec![update], snapshot)
    }

    /// Apply `updates` in order; updates to unknown keys are skipped
    ///
    /// # Errors
    ///
    /// `MissingKey` if any updated record has no key; nothing is applied.
    pub fn update_many<E: Clone>(
        &self,
        updates: Vec<Update<T::Changes>>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        self.update("update_many", updates, snapshot)
    }

    fn update<E: Clone>(
        &self,
        op: &'static str,
        updates: Vec<Update<T::Changes>>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        apply(op, updates, snapshot, |updates, draft| {
            let pending = pending_from_updates::<T>(updates);
            match &self.ordering {
                OrderingMode::Insertion => {
                    unsorted::update_many(&self.key_selector, pending, draft)
                }
                OrderingMode::Sorted(compare) => {
                    sorted::update_many(&self.key_selector, compare, pending, draft)
                }
            }
        })
    }

    // ===== Upsert =====

    /// Insert `record`, or lay it over the record already stored under its key
    ///
    /// An existing record is rewritten with [`Record::overlay`], so for JSON
    /// records the fields `record` omits keep their stored values.
    ///
    /// # Errors
    ///
    /// `MissingKey` if `record` has no key.
    pub fn upsert_one<E: Clone>(
        &self,
        record: T,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        self.upsert("upsert_one", vec![record], snapshot)
    }

    /// # Errors
    ///
    /// `MissingKey` if any record has no key; nothing is written.
    pub fn upsert_many<E: Clone>(
        &self,
        records: Vec<T>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        self.upsert("upsert_many", records, snapshot)
    }

    fn upsert<E: Clone>(
        &self,
        op: &'static str,
        records: Vec<T>,
        snapshot: &Snapshot<T, E>,
    ) -> Result<Snapshot<T, E>> {
        apply(op, records, snapshot, |records, draft| match &self.ordering {
            OrderingMode::Insertion => unsorted::upsert_many(&self.key_selector, records, draft),
            OrderingMode::Sorted(compare) => {
                sorted::upsert_many(&self.key_selector, compare, records, draft)
            }
        })
    }

    // ===== Map =====

    /// Run `transform` over every record, in order
    ///
    /// Returning `Cow::Borrowed` leaves a record as it is; `Cow::Owned` is
    /// laid over it with [`Record::overlay`] and applied as an update.
    ///
    /// # Errors
    ///
    /// `MissingKey` if a replacement record has no key; nothing is applied.
    pub fn map<E, F>(&self, transform: F, snapshot: &Snapshot<T, E>) -> Result<Snapshot<T, E>>
    where
        E: Clone,
        F: for<'r> FnMut(&'r T) -> Cow<'r, T>,
    {
        apply("map", transform, snapshot, |transform, draft| match &self.ordering {
            OrderingMode::Insertion => unsorted::map(&self.key_selector, transform, draft),
            OrderingMode::Sorted(compare) => {
                sorted::map(&self.key_selector, compare, transform, draft)
            }
        })
    }

    // ===== Read views =====

    pub fn list_keys<'s, E>(&self, snapshot: &'s Snapshot<T, E>) -> &'s [Key] {
        queries::list_keys(snapshot)
    }

    pub fn list_records<'s, E>(&self, snapshot: &'s Snapshot<T, E>) -> &'s HashMap<Key, Arc<T>> {
        queries::list_records(snapshot)
    }

    pub fn list_all<'s, E>(&self, snapshot: &'s Snapshot<T, E>) -> Vec<&'s T> {
        queries::list_all(snapshot)
    }

    pub fn count<E>(&self, snapshot: &Snapshot<T, E>) -> usize {
        queries::count(snapshot)
    }
}

fn infallible<S>(result: std::result::Result<S, Infallible>) -> S {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
