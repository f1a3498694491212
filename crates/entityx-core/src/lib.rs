//! EntityX Core - normalized collection engine
//!
//! This crate keeps collections of records in normalized form: an ordered
//! list of keys next to a key → record map. It provides:
//! - [`Snapshot`], the immutable collection value, with pointer-level change
//!   detection
//! - [`EntityAdapter`], which applies insert/remove/update/upsert/map
//!   operations to snapshots, in insertion order or sorted by a comparator
//! - Read views (`list_keys`, `list_records`, `list_all`, `count`)
//! - A structured logging facility for operation tracing
//!
//! Operations never mutate their input. An operation that changes nothing
//! returns the input snapshot itself, and one that changes only records keeps
//! the input's key order allocation.

pub mod adapter;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod queries;

#[doc(hidden)]
pub use tracing;

pub use entityx_core_types as core_types;

// Re-export commonly used types
pub use adapter::{AdapterConfig, EntityAdapter, OrderingMode};
pub use errors::{CollectionError, ExError, ExErrorKind, Result};
pub use model::{Key, KeySelector, Record, Snapshot, Update};
pub use ops::{Classification, Comparator, Selection};
pub use queries::Selectors;
