//! Content-addressed cache of rendered diagrams.

use std::sync::Arc;

use folio_kv::KeyValueStore;
use folio_markup::DiagramLanguage;
use sha2::{Digest, Sha256};

/// Key prefix for cached SVGs inside the backing store.
const PREFIX: &str = "diagrams";

/// Inputs that determine a rendered diagram.
#[derive(Debug)]
pub struct DiagramKey<'a> {
    pub source: &'a str,
    pub endpoint: &'a str,
}

impl DiagramKey<'_> {
    /// SHA-256 of `"{endpoint}:svg:{source}"`, hex-encoded.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let content = format!("{}:svg:{}", self.endpoint, self.source);
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// SVG cache over a [`KeyValueStore`].
///
/// Failures of the backing store are logged and treated as misses. Lookups
/// are blocking; clones share the same store.
#[derive(Clone)]
pub struct DiagramCache {
    store: Arc<dyn KeyValueStore>,
}

impl DiagramCache {
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store: Arc::from(store),
        }
    }

    pub fn get(&self, language: DiagramLanguage, source: &str) -> Option<String> {
        let key = cache_key(language, source);
        match self.store.get(&key) {
            Ok(bytes) => bytes.and_then(|bytes| String::from_utf8(bytes).ok()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Diagram cache read failed");
                None
            }
        }
    }

    pub fn set(&self, language: DiagramLanguage, source: &str, svg: &str) {
        let key = cache_key(language, source);
        if let Err(e) = self.store.set(&key, svg.as_bytes()) {
            tracing::warn!(key, error = %e, "Diagram cache write failed");
        }
    }
}

fn cache_key(language: DiagramLanguage, source: &str) -> String {
    let hash = DiagramKey {
        source,
        endpoint: language.kroki_endpoint(),
    }
    .compute_hash();
    format!("{PREFIX}/{hash}")
}
