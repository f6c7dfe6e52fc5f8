//! Repository over the persisted document collection.

use folio_kv::{KeyValueStore, KeyValueStoreExt, KvError};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::document::{Document, Version};

/// Fixed key holding the whole serialized collection.
pub const DOCUMENTS_KEY: &str = "folio.documents";

/// Error returned by mutating [`DocumentStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The collection could not be written to the backend.
    #[error("failed to persist documents: {0}")]
    Persist(#[source] KvError),
}

/// Versioned document repository.
///
/// Holds the collection in memory, ordered most-recently-updated first, and
/// rewrites the whole collection under [`DOCUMENTS_KEY`] after every mutation.
///
/// # Single writer
///
/// Each mutation is a read-modify-write of the entire record. Two stores
/// opened over the same backend will silently overwrite each other's changes,
/// so only one writer may hold a store at a time. A failed [`create`] is
/// rolled back. For other mutations the in-memory state is updated before the
/// write; on [`StoreError::Persist`] it is ahead of the backend until the next
/// successful mutation.
///
/// [`create`]: DocumentStore::create
pub struct DocumentStore {
    backend: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    documents: Vec<Document>,
}

impl DocumentStore {
    /// Load the collection from `backend` using the system clock.
    ///
    /// Missing or unreadable data yields an empty store; it is logged and
    /// never returned as an error.
    #[must_use]
    pub fn open(backend: Box<dyn KeyValueStore>) -> Self {
        Self::with_clock(backend, Box::new(SystemClock))
    }

    /// Load the collection from `backend` with an explicit clock.
    #[must_use]
    pub fn with_clock(backend: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let documents = load(backend.as_ref());
        Self {
            backend,
            clock,
            documents,
        }
    }

    /// All documents, most recently updated first.
    #[must_use]
    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by identity.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Most recent version of a document.
    #[must_use]
    pub fn latest_version(&self, id: &str) -> Option<&Version> {
        self.get_by_id(id)?.latest_version()
    }

    /// A specific version of a document.
    #[must_use]
    pub fn version(&self, id: &str, number: u32) -> Option<&Version> {
        self.get_by_id(id)?.version(number)
    }

    /// Create a document with a single version numbered 1.
    ///
    /// If the collection cannot be persisted the document is dropped again, so
    /// an error means nothing was created.
    pub fn create(
        &mut self,
        topic: impl Into<String>,
        overview: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Document, StoreError> {
        let now = self.clock.now();
        let document = Document {
            id: new_id(),
            topic: topic.into(),
            overview: overview.into(),
            created_at: now,
            updated_at: now,
            versions: vec![Version {
                id: new_id(),
                version_number: 1,
                content: content.into(),
                created_at: now,
            }],
        };

        self.documents.insert(0, document.clone());
        if let Err(e) = self.persist() {
            self.documents.remove(0);
            return Err(e);
        }
        tracing::info!(id = %document.id, topic = %document.topic, "Created document");
        Ok(document)
    }

    /// Append a version to a document and move it to the front.
    ///
    /// Returns `Ok(None)` if no document has this identity. Content identical
    /// to the latest version is appended anyway; skipping no-op edits is the
    /// caller's policy.
    pub fn append_version(
        &mut self,
        id: &str,
        content: impl Into<String>,
    ) -> Result<Option<Document>, StoreError> {
        let Some(position) = self.documents.iter().position(|doc| doc.id == id) else {
            tracing::debug!(id, "Append to unknown document");
            return Ok(None);
        };

        let mut document = self.documents.remove(position);
        // Never let a clock step backwards break updated_at >= created_at.
        let now = self.clock.now().max(document.updated_at);
        let version_number = next_version_number(&document);
        document.versions.push(Version {
            id: new_id(),
            version_number,
            content: content.into(),
            created_at: now,
        });
        document.updated_at = now;

        self.documents.insert(0, document.clone());
        tracing::info!(id, version = version_number, "Appended version");
        self.persist()?;
        Ok(Some(document))
    }

    /// Delete a document and all its versions.
    ///
    /// Deleting an unknown identity is a no-op and does not touch the backend.
    /// Returns whether a document was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.documents.len();
        self.documents.retain(|doc| doc.id != id);
        if self.documents.len() == before {
            return Ok(false);
        }

        tracing::info!(id, "Deleted document");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.backend
            .set_json(DOCUMENTS_KEY, &self.documents)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to persist documents");
                StoreError::Persist(e)
            })
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn next_version_number(document: &Document) -> u32 {
    u32::try_from(document.versions.len())
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

/// Read the collection, treating absent or corrupt data as empty.
fn load(backend: &dyn KeyValueStore) -> Vec<Document> {
    let mut documents = match backend.get_json::<Vec<Document>>(DOCUMENTS_KEY) {
        Ok(Some(documents)) => documents,
        Ok(None) => {
            tracing::debug!(key = DOCUMENTS_KEY, "No stored documents");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key = DOCUMENTS_KEY, error = %e, "Ignoring unreadable documents");
            return Vec::new();
        }
    };

    documents.retain(|doc| {
        let keep = !doc.versions.is_empty();
        if !keep {
            tracing::warn!(id = %doc.id, "Dropping stored document without versions");
        }
        keep
    });
    documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    tracing::debug!(count = documents.len(), "Loaded documents");
    documents
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use folio_kv::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clock::SteppingClock;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn open(backend: &Arc<MemoryStore>) -> DocumentStore {
        DocumentStore::with_clock(
            Box::new(Arc::clone(backend)),
            Box::new(SteppingClock::new(start(), Duration::minutes(1))),
        )
    }

    /// Backend whose writes always fail.
    struct ReadOnly;

    impl KeyValueStore for ReadOnly {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KvError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &[u8]) -> Result<(), KvError> {
            Err(KvError::InvalidKey(key.to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<(), KvError> {
            Ok(())
        }
    }

    /// In-memory backend whose writes start failing once `fail` is set.
    #[derive(Default)]
    struct FailingWrites {
        inner: MemoryStore,
        fail: AtomicBool,
    }

    impl KeyValueStore for FailingWrites {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(KvError::InvalidKey(key.to_owned()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), KvError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_create_has_single_first_version() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);

        let doc = store.create("Topic", "Overview", "# Body").unwrap();

        assert_eq!(doc.versions.len(), 1);
        assert_eq!(doc.versions[0].version_number, 1);
        assert_eq!(doc.versions[0].content, "# Body");
        assert_eq!(doc.created_at, doc.updated_at);
        assert_eq!(doc.updated_at, doc.versions[0].created_at);
        assert_eq!(store.list()[0].id, doc.id);
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);

        let a = store.create("a", "", "").unwrap();
        let b = store.create("b", "", "").unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.versions[0].id, b.versions[0].id);
    }

    #[test]
    fn test_version_numbers_are_contiguous() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        let doc = store.create("t", "o", "v1").unwrap();

        for content in ["v2", "v3", "v4"] {
            store.append_version(&doc.id, content).unwrap().unwrap();
        }

        let numbers: Vec<u32> = store
            .get_by_id(&doc.id)
            .unwrap()
            .versions
            .iter()
            .map(|v| v.version_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_append_moves_document_to_front() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        let first = store.create("first", "", "a").unwrap();
        let second = store.create("second", "", "b").unwrap();
        let third = store.create("third", "", "c").unwrap();
        assert_eq!(store.list()[2].id, first.id);

        let updated = store.append_version(&first.id, "a2").unwrap().unwrap();

        let order: Vec<&str> = store.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec![first.id.as_str(), third.id.as_str(), second.id.as_str()]);
        assert_eq!(updated.updated_at, updated.versions[1].created_at);
        assert!(updated.updated_at > updated.created_at);
    }

    #[test]
    fn test_list_ordered_by_descending_updated_at() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        let a = store.create("a", "", "").unwrap();
        let b = store.create("b", "", "").unwrap();
        store.create("c", "", "").unwrap();
        store.append_version(&b.id, "b2").unwrap();
        store.append_version(&a.id, "a2").unwrap();

        let list = store.list();
        assert!(list.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
    }

    #[test]
    fn test_append_identical_content_still_appends() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        let doc = store.create("t", "o", "same").unwrap();

        let updated = store.append_version(&doc.id, "same").unwrap().unwrap();

        assert_eq!(updated.versions.len(), 2);
        assert_eq!(updated.versions[1].version_number, 2);
    }

    #[test]
    fn test_append_unknown_document_is_absent() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        store.create("t", "o", "c").unwrap();

        assert_eq!(store.append_version("missing", "x").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        let doc = store.create("t", "o", "c").unwrap();

        assert!(!store.delete("missing").unwrap());
        assert_eq!(store.len(), 1);

        assert!(store.delete(&doc.id).unwrap());
        assert!(!store.delete(&doc.id).unwrap());
        assert!(store.is_empty());
        assert_eq!(store.get_by_id(&doc.id), None);
    }

    #[test]
    fn test_mutations_persist_whole_collection() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open(&backend);
        let a = store.create("a", "", "one").unwrap();
        store.create("b", "", "two").unwrap();
        store.append_version(&a.id, "one again").unwrap();

        let stored: Vec<Document> = backend.get_json(DOCUMENTS_KEY).unwrap().unwrap();

        assert_eq!(stored, store.list().to_vec());
        assert_eq!(stored[0].id, a.id);
    }

    #[test]
    fn test_reopen_restores_state() {
        let backend = Arc::new(MemoryStore::new());
        let doc = {
            let mut store = open(&backend);
            let doc = store.create("t", "o", "v1").unwrap();
            store.append_version(&doc.id, "v2").unwrap();
            doc
        };

        let reopened = open(&backend);

        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.latest_version(&doc.id).unwrap().content, "v2");
        assert_eq!(reopened.version(&doc.id, 1).unwrap().content, "v1");
        assert_eq!(reopened.version(&doc.id, 3), None);
    }

    #[test]
    fn test_corrupt_record_opens_empty() {
        let backend = Arc::new(MemoryStore::new().with_entry(DOCUMENTS_KEY, "{broken"));

        let store = open(&backend);

        assert!(store.is_empty());
    }

    #[test]
    fn test_wrong_shape_record_opens_empty() {
        let backend = Arc::new(MemoryStore::new().with_entry(DOCUMENTS_KEY, r#"{"id": 1}"#));

        let store = open(&backend);

        assert!(store.is_empty());
    }

    #[test]
    fn test_load_drops_versionless_documents_and_sorts() {
        let raw = r#"[
            {"id": "old", "topic": "", "overview": "", "createdAt": "2024-01-01T00:00:00Z",
             "updatedAt": "2024-01-01T00:00:00Z",
             "versions": [{"id": "v", "versionNumber": 1, "content": "", "createdAt": "2024-01-01T00:00:00Z"}]},
            {"id": "empty", "topic": "", "overview": "", "createdAt": "2024-01-03T00:00:00Z",
             "updatedAt": "2024-01-03T00:00:00Z", "versions": []},
            {"id": "new", "topic": "", "overview": "", "createdAt": "2024-01-02T00:00:00Z",
             "updatedAt": "2024-01-02T00:00:00Z",
             "versions": [{"id": "w", "versionNumber": 1, "content": "", "createdAt": "2024-01-02T00:00:00Z"}]}
        ]"#;
        let backend = Arc::new(MemoryStore::new().with_entry(DOCUMENTS_KEY, raw));

        let store = open(&backend);

        let ids: Vec<&str> = store.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_append_with_earlier_clock_keeps_updated_at_monotonic() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = DocumentStore::with_clock(
            Box::new(Arc::clone(&backend)),
            Box::new(SteppingClock::new(start(), Duration::minutes(-1))),
        );
        let doc = store.create("t", "o", "v1").unwrap();

        let updated = store.append_version(&doc.id, "v2").unwrap().unwrap();

        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(updated.updated_at, updated.versions[1].created_at);
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let mut store = DocumentStore::open(Box::new(ReadOnly));

        let err = store.create("t", "o", "c").unwrap_err();

        assert!(matches!(err, StoreError::Persist(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_create_keeps_earlier_documents() {
        let backend = Arc::new(FailingWrites::default());
        let mut store = DocumentStore::open(Box::new(Arc::clone(&backend)));
        let kept = store.create("kept", "", "one").unwrap();

        backend.fail.store(true, Ordering::SeqCst);
        store.create("lost", "", "two").unwrap_err();

        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].id, kept.id);
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let id = {
            let mut store = DocumentStore::open(Box::new(folio_kv::FileStore::new(tmp.path())));
            store.create("t", "o", "persisted").unwrap().id
        };

        let store = DocumentStore::open(Box::new(folio_kv::FileStore::new(tmp.path())));

        assert_eq!(store.latest_version(&id).unwrap().content, "persisted");
    }
}
