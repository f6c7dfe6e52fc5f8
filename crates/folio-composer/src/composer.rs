//! Generation, editing and rendering over one document store.

use std::sync::Arc;

use folio_diagrams::{DiagramRenderer, DiagramSlots};
use folio_store::{Document, DocumentStore, StoreError};

use crate::render::{RenderedDocument, render_content};
use crate::source::{ContentSource, SourceError};

/// Error from a [`Composer`] operation.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("content generation failed: {0}")]
    Source(#[from] SourceError),
    #[error("no content source configured")]
    NoSource,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of [`Composer::save_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Content matched the latest version byte for byte; nothing was written.
    Unchanged,
    /// A new version was appended.
    Appended(Document),
    /// No document has this identity.
    NotFound,
}

/// Ties the document store to the content source and the diagram renderer.
pub struct Composer {
    store: DocumentStore,
    renderer: DiagramRenderer,
    source: Option<Arc<dyn ContentSource>>,
}

impl Composer {
    #[must_use]
    pub fn new(store: DocumentStore, renderer: DiagramRenderer) -> Self {
        Self {
            store,
            renderer,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Generate content for a topic and store it as a new document.
    ///
    /// A source failure is terminal: nothing is stored.
    pub async fn generate(&mut self, topic: &str, overview: &str) -> Result<Document, ComposeError> {
        let source = self.source.as_ref().ok_or(ComposeError::NoSource)?;
        let content = source.generate(topic, overview).await.inspect_err(|e| {
            tracing::warn!(topic, error = %e, "Content generation failed");
        })?;
        Ok(self.store.create(topic, overview, content)?)
    }

    /// Store user-supplied content as a new document.
    pub fn import(&mut self, topic: &str, overview: &str, content: &str) -> Result<Document, ComposeError> {
        Ok(self.store.create(topic, overview, content)?)
    }

    /// Save edited content, skipping edits identical to the latest version.
    pub fn save_edit(&mut self, id: &str, content: &str) -> Result<EditOutcome, ComposeError> {
        let Some(latest) = self.store.latest_version(id) else {
            return Ok(EditOutcome::NotFound);
        };
        if latest.content == content {
            tracing::debug!(id, "Edit unchanged, not saving");
            return Ok(EditOutcome::Unchanged);
        }

        Ok(match self.store.append_version(id, content)? {
            Some(document) => EditOutcome::Appended(document),
            None => EditOutcome::NotFound,
        })
    }

    /// Delete a document. Returns whether it existed.
    pub fn delete(&mut self, id: &str) -> Result<bool, ComposeError> {
        Ok(self.store.delete(id)?)
    }

    /// Render a version of a document; the latest when `version` is `None`.
    ///
    /// Returns `None` if the document or version does not exist.
    pub async fn render(&self, id: &str, version: Option<u32>) -> Option<RenderedDocument> {
        let version = match version {
            Some(number) => self.store.version(id, number)?,
            None => self.store.latest_version(id)?,
        };
        Some(self.render_content(&version.content).await)
    }

    /// Render arbitrary content with fresh diagram slots.
    pub async fn render_content(&self, content: &str) -> RenderedDocument {
        let slots = DiagramSlots::new();
        render_content(&self.renderer, &slots, content).await
    }

    /// Render content into long-lived slots, e.g. across successive edits.
    pub async fn render_into(&self, slots: &DiagramSlots, content: &str) -> RenderedDocument {
        render_content(&self.renderer, slots, content).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use folio_diagrams::DisabledEngine;
    use folio_kv::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;

    struct FixedSource(&'static str);

    #[async_trait]
    impl ContentSource for FixedSource {
        async fn generate(&self, topic: &str, _overview: &str) -> Result<String, SourceError> {
            Ok(format!("# {topic}\n\n{}", self.0))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ContentSource for FailingSource {
        async fn generate(&self, _topic: &str, _overview: &str) -> Result<String, SourceError> {
            Err(SourceError::Http("connection refused".to_owned()))
        }
    }

    fn composer() -> Composer {
        Composer::new(
            DocumentStore::open(Box::new(MemoryStore::new())),
            DiagramRenderer::new(DisabledEngine),
        )
    }

    #[tokio::test]
    async fn test_generate_creates_document() {
        let mut composer = composer().with_source(Arc::new(FixedSource("Body")));

        let doc = composer.generate("Rust", "Overview").await.unwrap();

        assert_eq!(doc.topic, "Rust");
        assert_eq!(doc.overview, "Overview");
        assert_eq!(doc.latest_content(), Some("# Rust\n\nBody"));
        assert_eq!(composer.store().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_failure_stores_nothing() {
        let mut composer = composer().with_source(Arc::new(FailingSource));

        let err = composer.generate("Rust", "Overview").await.unwrap_err();

        assert!(matches!(err, ComposeError::Source(_)));
        assert!(composer.store().is_empty());
    }

    #[tokio::test]
    async fn test_generate_without_source() {
        let mut composer = composer();

        let err = composer.generate("Rust", "Overview").await.unwrap_err();

        assert!(matches!(err, ComposeError::NoSource));
    }

    #[test]
    fn test_save_edit_identical_is_unchanged() {
        let mut composer = composer();
        let doc = composer.import("t", "o", "same").unwrap();

        let outcome = composer.save_edit(&doc.id, "same").unwrap();

        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(composer.store().get_by_id(&doc.id).unwrap().version_count(), 1);
    }

    #[test]
    fn test_save_edit_appends() {
        let mut composer = composer();
        let doc = composer.import("t", "o", "v1").unwrap();

        let EditOutcome::Appended(updated) = composer.save_edit(&doc.id, "v2").unwrap() else {
            panic!("expected append");
        };

        assert_eq!(updated.versions.len(), 2);
        assert_eq!(updated.latest_content(), Some("v2"));
    }

    #[test]
    fn test_save_edit_whitespace_change_is_an_edit() {
        let mut composer = composer();
        let doc = composer.import("t", "o", "v1").unwrap();

        let outcome = composer.save_edit(&doc.id, "v1\n").unwrap();

        assert!(matches!(outcome, EditOutcome::Appended(_)));
    }

    #[test]
    fn test_save_edit_unknown_document() {
        let mut composer = composer();

        assert_eq!(composer.save_edit("missing", "x").unwrap(), EditOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_render_missing_version() {
        let mut composer = composer();
        let doc = composer.import("t", "o", "text").unwrap();

        assert!(composer.render(&doc.id, Some(2)).await.is_none());
        assert!(composer.render("missing", None).await.is_none());
        assert!(composer.render(&doc.id, Some(1)).await.is_some());
    }

    #[tokio::test]
    async fn test_render_disabled_engine_shows_source() {
        let mut composer = composer();
        let doc = composer
            .import("t", "o", "intro\n```mermaid\nA --> B\n```\n")
            .unwrap();

        let rendered = composer.render(&doc.id, None).await.unwrap();

        assert_eq!(rendered.failed_diagrams(), 1);
    }
}
