//! Diagram rendering for folio documents.
//!
//! - [`DiagramEngine`]: boundary to an external renderer ([`KrokiEngine`],
//!   [`DisabledEngine`])
//! - [`DiagramRenderer`]: turns engine outcomes into [`DiagramRenderResult`]s,
//!   optionally caching successes by content hash
//! - [`DiagramSlots`]: per-diagram display state; only the latest issued render
//!   for a slot is ever displayed
//!
//! A failed diagram is reported as [`DiagramFailure`] holding the unmodified
//! source so it can be shown in place of the image. Failures never propagate
//! past the diagram they belong to.

mod cache;
mod engine;
mod kroki;
mod renderer;
mod result;
mod slot;

pub use cache::{DiagramCache, DiagramKey};
pub use engine::{DiagramEngine, DiagramImage, DisabledEngine, EngineError, RenderTarget};
pub use kroki::{DEFAULT_TIMEOUT, KrokiEngine, create_agent, strip_google_fonts_import};
pub use renderer::DiagramRenderer;
pub use result::{DiagramFailure, DiagramRenderResult};
pub use slot::{DiagramSlot, DiagramSlots, Generation};
