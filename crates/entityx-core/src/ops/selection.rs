use std::fmt;

use crate::model::Key;

/// Which records a bulk removal targets
pub enum Selection<'a, T> {
    /// Exactly these keys; keys not in the collection are ignored
    ByKeys(Vec<Key>),
    /// Every record the predicate accepts
    ByPredicate(Box<dyn Fn(&T) -> bool + 'a>),
}

impl<'a, T> Selection<'a, T> {
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Selection::ByKeys(keys.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        Selection::ByPredicate(Box::new(predicate))
    }
}

impl<T> fmt::Debug for Selection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::ByKeys(keys) => f.debug_tuple("ByKeys").field(keys).finish(),
            Selection::ByPredicate(_) => f.write_str("ByPredicate(..)"),
        }
    }
}
