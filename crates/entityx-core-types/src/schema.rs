//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the engine's
//! operation logging and anything that consumes captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_OUTCOME: &str = "outcome";

// Collection size after the operation (before it, on `start`)
pub const FIELD_LEN: &str = "len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
// Rendered error, including the operation it was raised in
pub const FIELD_ERR_DETAIL: &str = "err.detail";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Outcome values, one per change classification
pub const OUTCOME_NO_CHANGE: &str = "no_change";
pub const OUTCOME_RECORDS_ONLY: &str = "records_only";
pub const OUTCOME_BOTH: &str = "both";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_OUTCOME.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_outcomes_are_distinct() {
        assert_ne!(OUTCOME_NO_CHANGE, OUTCOME_RECORDS_ONLY);
        assert_ne!(OUTCOME_NO_CHANGE, OUTCOME_BOTH);
        assert_ne!(OUTCOME_RECORDS_ONLY, OUTCOME_BOTH);
    }
}
