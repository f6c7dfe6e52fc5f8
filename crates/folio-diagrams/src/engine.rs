//! Boundary to the external diagram rendering engine.

use std::fmt;

use async_trait::async_trait;
use folio_markup::DiagramLanguage;
use serde::Serialize;
use uuid::Uuid;

/// Unique identity for one render invocation.
///
/// Engines that draw into a named target (a DOM node, a temp file) use it to
/// keep concurrent invocations apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTarget(String);

impl RenderTarget {
    /// Generate a fresh `diagram-<uuid>` identity.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("diagram-{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendered visual payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramImage {
    /// SVG markup.
    pub svg: String,
}

/// Failure reported by a [`DiagramEngine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Transport failure (connection refused, timeout).
    #[error("HTTP error: {0}")]
    Http(String),
    /// Engine answered with an error status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Response could not be read or was not valid SVG text.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
    /// No engine is configured.
    #[error("no diagram renderer configured")]
    Disabled,
}

/// External diagram rendering engine.
///
/// Implementations render `source` into an image or fail; they never retry
/// and never return partial output.
#[async_trait]
pub trait DiagramEngine: Send + Sync {
    async fn render(
        &self,
        target: &RenderTarget,
        language: DiagramLanguage,
        source: &str,
    ) -> Result<DiagramImage, EngineError>;
}

/// Engine used when diagram rendering is switched off. Every call fails with
/// [`EngineError::Disabled`], so diagrams show their source.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEngine;

#[async_trait]
impl DiagramEngine for DisabledEngine {
    async fn render(
        &self,
        _target: &RenderTarget,
        _language: DiagramLanguage,
        _source: &str,
    ) -> Result<DiagramImage, EngineError> {
        Err(EngineError::Disabled)
    }
}
