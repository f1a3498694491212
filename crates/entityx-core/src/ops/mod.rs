//! Collection operations
//!
//! `operator` is the boundary every operation runs through; `unsorted` and
//! `sorted` hold the per-strategy mutators the adapter dispatches to.

pub mod operator;
pub mod selection;
pub(crate) mod sorted;
pub(crate) mod unsorted;

pub use operator::{apply, Classification, Draft};
pub use selection::Selection;
pub use sorted::Comparator;
