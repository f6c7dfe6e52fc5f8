//! Extension trait for [`KeyValueStore`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{KeyValueStore, KvError};

/// Typed JSON access on top of any [`KeyValueStore`].
///
/// Kept separate from the core trait so backends only deal in bytes and the
/// core trait stays object-safe.
///
/// # Example
///
/// ```
/// use folio_kv::{KeyValueStoreExt, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set_json("numbers", &vec![1, 2, 3]).unwrap();
/// let numbers: Option<Vec<u32>> = store.get_json("numbers").unwrap();
/// assert_eq!(numbers, Some(vec![1, 2, 3]));
/// ```
pub trait KeyValueStoreExt: KeyValueStore {
    /// Retrieve and deserialize a JSON value.
    ///
    /// Returns `Ok(None)` when the key is absent and [`KvError::Decode`] when
    /// the stored bytes are not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        let Some(bytes) = self.get(key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| KvError::Decode {
                key: key.to_owned(),
                source,
            })
    }

    /// Serialize `value` as JSON and store it under `key`.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let bytes = serde_json::to_vec(value).map_err(|source| KvError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.set(key, &bytes)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
