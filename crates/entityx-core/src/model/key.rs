use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::record::Key;
use crate::errors::{CollectionError, Result};

type SelectFn<T> = dyn Fn(&T) -> Option<Key> + Send + Sync;

/// Derives the identity key of a record
///
/// Every operation routes each incoming record through [`extract_key`]
/// before touching its working copy, so a record without a usable key aborts
/// the operation with nothing changed.
///
/// [`extract_key`]: KeySelector::extract_key
pub struct KeySelector<T> {
    select: Arc<SelectFn<T>>,
}

impl<T> KeySelector<T> {
    /// Wrap a selector function; `None` or an empty string means "no key"
    pub fn new<F>(select: F) -> Self
    where
        F: Fn(&T) -> Option<Key> + Send + Sync + 'static,
    {
        Self {
            select: Arc::new(select),
        }
    }

    /// Derive and validate the key of `record`
    ///
    /// # Errors
    ///
    /// Returns `MissingKey` if the selector yields no key or an empty one.
    pub fn extract_key(&self, record: &T) -> Result<Key>
    where
        T: fmt::Debug,
    {
        match (self.select)(record) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CollectionError::missing_key(record)),
        }
    }
}

impl KeySelector<Value> {
    /// Read the identity from a top-level field of a JSON object
    ///
    /// Strings are used as-is and numbers by their decimal rendering; any
    /// other value (or an absent field) has no key.
    pub fn field(name: &str) -> Self {
        let name = name.to_string();
        Self::new(move |record: &Value| match record.get(&name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

impl Default for KeySelector<Value> {
    /// Selects the `id` field
    fn default() -> Self {
        Self::field("id")
    }
}

impl<T> Clone for KeySelector<T> {
    fn clone(&self) -> Self {
        Self {
            select: Arc::clone(&self.select),
        }
    }
}

impl<T> fmt::Debug for KeySelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySelector").finish_non_exhaustive()
    }
}
