//! Core types shared across EntityX facilities
//!
//! This crate provides the canonical schema constants used by the logging
//! facility and by tests that assert on captured events:
//!
//! - **Field keys**: component, op, event, duration, outcome, error fields
//! - **Event names**: start, end, end_error
//! - **Outcome values**: the stable labels for change classifications

pub mod schema;
