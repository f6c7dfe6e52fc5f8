//! Versioned document store.
//!
//! Documents own an append-only chain of full-content versions numbered
//! `1, 2, 3, ...`. The [`DocumentStore`] keeps the collection ordered most
//! recently updated first and writes it through an injected
//! [`KeyValueStore`](folio_kv::KeyValueStore) backend.
//!
//! # Example
//!
//! ```
//! use folio_kv::MemoryStore;
//! use folio_store::DocumentStore;
//!
//! let mut store = DocumentStore::open(Box::new(MemoryStore::new()));
//! let doc = store.create("Caching", "An overview", "# Caching").unwrap();
//! let doc = store.append_version(&doc.id, "# Caching\n\nMore.").unwrap().unwrap();
//! assert_eq!(doc.versions.len(), 2);
//! assert_eq!(store.list()[0].id, doc.id);
//! ```

mod clock;
mod document;
mod store;

pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use document::{Document, Version};
pub use store::{DOCUMENTS_KEY, DocumentStore, StoreError};
