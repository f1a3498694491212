//! Structured logging facility for EntityX
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Collection operations run on hot reducer paths, so the macros emit at
//! `debug` level. Nothing is printed unless a subscriber is installed.
//!
//! # Usage
//!
//! ```rust
//! use entityx_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! # Logging Macros
//!
//! - `log_op_start!(op, len = ...)` - Log operation start
//! - `log_op_end!(op, duration_ms = ..., outcome = <Classification>, len = ...)` - Log operation end
//! - `log_op_error!(op, err, duration_ms = ...)` - Log operation error, tagged with `op`

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
