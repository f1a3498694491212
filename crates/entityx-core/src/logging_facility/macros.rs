//! Operation logging macros
//!
//! Every collection operation logs one `start` event and then exactly one of
//! `end` or `end_error`. The arms below are the shapes the operator emits;
//! field names come from `entityx_core_types::schema`.

/// Log the start of an operation, optionally with the input snapshot's size
///
/// # Example
///
/// ```
/// # use entityx_core::log_op_start;
/// log_op_start!("insert_one");
/// log_op_start!("insert_one", len = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, len = $len:expr) => {
        $crate::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            len = $len,
        );
    };
}

/// Log the end of an operation
///
/// `outcome` takes a [`Classification`](crate::ops::Classification) and is
/// recorded under its stable label.
///
/// # Example
///
/// ```
/// # use entityx_core::{log_op_end, Classification};
/// log_op_end!("insert_one", duration_ms = 0);
/// log_op_end!("insert_one", duration_ms = 0, outcome = Classification::Both, len = 4);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, outcome = $outcome:expr, len = $len:expr) => {{
        let outcome: $crate::ops::Classification = $outcome;
        $crate::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            outcome = outcome.as_str(),
            len = $len,
        );
    }};
}

/// Log a failed operation
///
/// The error is converted into an [`ExError`](crate::errors::ExError) tagged
/// with `op`, so the event carries a stable kind and code plus the rendered
/// error.
///
/// # Example
///
/// ```
/// # use entityx_core::{log_op_error, errors::CollectionError};
/// let err = CollectionError::MissingKey { record: "{}".to_string() };
/// log_op_error!("insert_one", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let op = $op;
        let ex_err: $crate::errors::ExError = ::core::convert::Into::into($err);
        let ex_err = ex_err.with_op(op);
        $crate::tracing::warn!(
            component = module_path!(),
            op = op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.detail = %ex_err,
        );
    }};
}
