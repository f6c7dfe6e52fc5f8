//! Diagram renderer adapter.

use std::sync::Arc;

use folio_kv::KeyValueStore;
use folio_markup::DiagramLanguage;

use crate::cache::DiagramCache;
use crate::engine::{DiagramEngine, DiagramImage, RenderTarget};
use crate::result::{DiagramFailure, DiagramRenderResult};
use crate::slot::DiagramSlots;

/// Renders diagram source through a [`DiagramEngine`].
///
/// Every invocation gets a fresh [`RenderTarget`]. Engine failures become
/// [`DiagramRenderResult::Failed`] carrying the original source; nothing is
/// retried.
///
/// # Example
///
/// ```
/// use folio_diagrams::{DiagramRenderer, DisabledEngine};
/// use folio_markup::DiagramLanguage;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let renderer = DiagramRenderer::new(DisabledEngine);
/// let result = renderer.render(DiagramLanguage::Mermaid, "A --> B").await;
/// assert_eq!(result.failure().unwrap().source, "A --> B");
/// # });
/// ```
pub struct DiagramRenderer {
    engine: Arc<dyn DiagramEngine>,
    cache: Option<DiagramCache>,
}

impl DiagramRenderer {
    #[must_use]
    pub fn new(engine: impl DiagramEngine + 'static) -> Self {
        Self::from_arc(Arc::new(engine))
    }

    #[must_use]
    pub fn from_arc(engine: Arc<dyn DiagramEngine>) -> Self {
        Self {
            engine,
            cache: None,
        }
    }

    /// Cache successful renders in `store`.
    #[must_use]
    pub fn with_cache(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.cache = Some(DiagramCache::new(store));
        self
    }

    /// Render `source` once.
    ///
    /// Cache lookups and writes run on the blocking thread pool.
    pub async fn render(&self, language: DiagramLanguage, source: &str) -> DiagramRenderResult {
        if let Some(svg) = self.cached(language, source).await {
            tracing::debug!(?language, "Diagram cache hit");
            return DiagramRenderResult::Rendered(DiagramImage { svg });
        }

        let target = RenderTarget::new();
        match self.engine.render(&target, language, source).await {
            Ok(image) => {
                tracing::debug!(target_id = %target, ?language, "Rendered diagram");
                self.store_cached(language, source, &image.svg).await;
                DiagramRenderResult::Rendered(image)
            }
            Err(e) => {
                tracing::warn!(target_id = %target, ?language, error = %e, "Diagram rendering failed");
                DiagramRenderResult::Failed(DiagramFailure::new(source, &e))
            }
        }
    }

    async fn cached(&self, language: DiagramLanguage, source: &str) -> Option<String> {
        let cache = self.cache.clone()?;
        let source = source.to_owned();
        tokio::task::spawn_blocking(move || cache.get(language, &source))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Diagram cache lookup task failed"))
            .ok()
            .flatten()
    }

    async fn store_cached(&self, language: DiagramLanguage, source: &str, svg: &str) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let (source, svg) = (source.to_owned(), svg.to_owned());
        if let Err(e) = tokio::task::spawn_blocking(move || cache.set(language, &source, &svg)).await {
            tracing::warn!(error = %e, "Diagram cache write task failed");
        }
    }

    /// Render into `slot`, superseding any render still in flight for it.
    ///
    /// Returns whether this invocation's result was applied. A `false` return
    /// means a newer render for the same slot was started meanwhile.
    pub async fn render_into(
        &self,
        slots: &DiagramSlots,
        slot: usize,
        language: DiagramLanguage,
        source: &str,
    ) -> bool {
        let generation = slots.begin(slot);
        let result = self.render(language, source).await;
        let applied = slots.complete(slot, generation, result);
        if !applied {
            tracing::debug!(slot, generation = generation.get(), "Discarded stale diagram render");
        }
        applied
    }
}
