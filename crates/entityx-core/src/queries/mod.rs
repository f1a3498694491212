//! Read-only views over a snapshot
//!
//! Every view is a total function of the snapshot it is given. Views borrow
//! from the snapshot instead of copying, so memoizing on snapshot identity
//! (see [`Snapshot::ptr_eq`](crate::model::Snapshot::ptr_eq)) is left to the
//! caller.

pub mod selectors;

pub use selectors::{count, list_all, list_keys, list_records, Selectors};
