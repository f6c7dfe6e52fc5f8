//! Outcome of rendering one diagram.

use std::fmt::Display;

use serde::Serialize;

use crate::engine::DiagramImage;

/// Fallback display for a diagram that failed to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramFailure {
    /// Original diagram source, unmodified.
    pub source: String,
    /// Human-readable explanation.
    pub message: String,
}

impl DiagramFailure {
    #[must_use]
    pub fn new(source: impl Into<String>, cause: &impl Display) -> Self {
        Self {
            source: source.into(),
            message: format!("Diagram rendering failed: {cause}"),
        }
    }
}

/// Either a rendered image or a failure carrying the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiagramRenderResult {
    Rendered(DiagramImage),
    Failed(DiagramFailure),
}

impl DiagramRenderResult {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    #[must_use]
    pub fn svg(&self) -> Option<&str> {
        match self {
            Self::Rendered(image) => Some(&image.svg),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&DiagramFailure> {
        match self {
            Self::Rendered(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}
