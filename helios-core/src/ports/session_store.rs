//! Persisted session state port

use crate::domain::result::Result;
use crate::domain::StorageKey;

/// Key-value storage for the session credentials and user record
///
/// Values are opaque strings; the user record is stored as JSON. Writers
/// replace whole values, so concurrent writes resolve last-writer-wins.
pub trait SessionStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: StorageKey) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    fn set(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: StorageKey) -> Result<()>;
}
