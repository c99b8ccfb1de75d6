//! Key-value persistence port.
//!
//! The application keeps bookmarks and settings as JSON strings under fixed
//! keys, the way a browser keeps them in local storage. [`KeyValueStore`] is
//! the seam; [`MemoryStore`] backs tests and demo runs, and the platform crate
//! provides a file-backed store.

use std::{fmt, io};

use dashmap::DashMap;
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O failure in the backing medium.
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
    /// A value could not be encoded before writing.
    #[error("failed to serialize value for key `{key}`: {source}")]
    Serialize {
        /// Key being written.
        key: String,
        /// Encoder error.
        source: serde_json::Error,
    },
    /// The key cannot be represented by the backend.
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// String-keyed, string-valued persistent store.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store; state is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `items`.
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: items
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.items.len())
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|value| value.clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryStore};

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::with_items([("settings", r#"{"useStars":false}"#)]);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_item("settings").expect("memory reads succeed"),
            Some(r#"{"useStars":false}"#.to_string())
        );
        assert_eq!(store.get_item("missing").expect("memory reads succeed"), None);

        store.set_item("settings", "{}").expect("memory writes succeed");
        assert_eq!(
            store.get_item("settings").expect("memory reads succeed").as_deref(),
            Some("{}")
        );

        store.remove_item("settings").expect("memory removes succeed");
        store.remove_item("settings").expect("removing twice is fine");
        assert!(store.is_empty());
        assert_eq!(store.name(), "MemoryStore");
    }
}
