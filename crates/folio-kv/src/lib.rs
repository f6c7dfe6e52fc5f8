//! Durable key-value boundary for folio.
//!
//! Decouples persistence consumers (the document store, the diagram render
//! cache) from where bytes actually live. One trait forms the core API:
//!
//! - [`KeyValueStore`]: get/set/remove raw bytes by string key
//!
//! # Implementations
//!
//! - [`MemoryStore`]: in-process map, used as the injected fake in tests
//! - [`FileStore`]: one file per key under a root directory, atomic replace
//! - [`NullStore`]: never stores anything (disabled caches)
//!
//! Typed access is provided by [`KeyValueStoreExt`].
//!
//! # Example
//!
//! ```
//! use folio_kv::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("greeting", b"hello").unwrap();
//! assert_eq!(store.get("greeting").unwrap(), Some(b"hello".to_vec()));
//! ```

mod ext;
mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

pub use ext::KeyValueStoreExt;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Error raised by a [`KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// Key cannot be mapped onto the backend (empty, absolute, `..`).
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    /// Backend I/O failure.
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        /// Backend path that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Value could not be serialized.
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Stored bytes could not be deserialized.
    #[error("failed to decode value for {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Byte store addressable by string keys.
///
/// Writes replace the whole value for a key. Implementations decide
/// atomicity; [`FileStore`] replaces values atomically from the caller's point
/// of view.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        (**self).remove(key)
    }
}

/// No-op [`KeyValueStore`] that never stores or retrieves data.
///
/// Every `get` returns `Ok(None)`; every `set` is silently discarded.
/// Use when caching is disabled.
#[derive(Debug, Default)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), KvError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), KvError> {
        Ok(())
    }
}
