//! File-based key-value store.
//!
//! [`FileStore`] keeps one file per key under a root directory. Keys may
//! contain `/` to nest values in subdirectories:
//!
//! ```text
//! {root}/
//! +-- folio.documents      # key "folio.documents"
//! +-- diagrams/            # keys "diagrams/<hash>"
//!     +-- 3f1a...
//! ```
//!
//! Writes go to a sibling temporary file first and are then renamed over the
//! target, so readers see either the old value or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::{KeyValueStore, KvError};

/// Suffix for in-flight writes.
const TMP_SUFFIX: &str = ".tmp";

/// File-based [`KeyValueStore`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto a path under the root, rejecting keys that would escape it.
    fn path_for(&self, key: &str) -> Result<PathBuf, KvError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(KvError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(KvError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| KvError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, value).map_err(|source| KvError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| KvError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(key, bytes = value.len(), "Wrote value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(KvError::Io { path, source }),
        }
    }
}
