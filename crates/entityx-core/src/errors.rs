use thiserror::Error;

/// Result type alias using CollectionError
pub type Result<T> = std::result::Result<T, CollectionError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Key extraction yielded no key, or an empty one
    MissingKey,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MissingKey => "ERR_MISSING_KEY",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context for
/// debugging. Produced from [`CollectionError`] at logging boundaries.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    record: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            record: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add a rendering of the offending record
    pub fn with_record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(record) = &self.record {
            write!(f, " (record: {})", record)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Errors raised by collection operations
///
/// Stale keys in batch operations are not errors; they are filtered out and
/// at worst degrade the operation to a no-op. The only failure is a record
/// whose key cannot be derived, which callers should treat as a programming
/// error rather than a recoverable condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The key selector returned nothing (or an empty string) for a record
    #[error(
        "key selector returned no key for record {record}; \
         supply a selector that reads the record's identity field"
    )]
    MissingKey { record: String },
}

impl CollectionError {
    pub(crate) fn missing_key(record: &impl std::fmt::Debug) -> Self {
        CollectionError::MissingKey {
            record: format!("{:?}", record),
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            CollectionError::MissingKey { .. } => ExErrorKind::MissingKey,
        }
    }

    /// Stable error code of this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl From<CollectionError> for ExError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::MissingKey { record } => ExError::new(ExErrorKind::MissingKey)
                .with_record(record)
                .with_message("Key selector returned no key"),
        }
    }
}

/// Infallible operations (removals) share the fallible logging path
impl From<std::convert::Infallible> for ExError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_renders_record() {
        let err = CollectionError::missing_key(&("no-id", 3));
        assert_eq!(
            err,
            CollectionError::MissingKey {
                record: "(\"no-id\", 3)".to_string()
            }
        );
        assert!(err.to_string().contains("no-id"));
    }

    #[test]
    fn test_kind_and_code() {
        let err = CollectionError::missing_key(&"x");
        assert_eq!(err.kind(), ExErrorKind::MissingKey);
        assert_eq!(err.code(), "ERR_MISSING_KEY");
    }

    #[test]
    fn test_ex_error_display() {
        let ex: ExError = CollectionError::missing_key(&"x").into();
        let ex = ex.with_op("insert_one");
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_MISSING_KEY] in operation 'insert_one'"));
        assert!(rendered.contains("(record: \"x\")"));
    }
}
