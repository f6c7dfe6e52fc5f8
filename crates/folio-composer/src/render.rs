//! Rendering a version's content into displayable nodes.

use folio_diagrams::{DiagramRenderResult, DiagramRenderer, DiagramSlots};
use folio_markup::{Block, DiagramLanguage, DocumentNode, parse_document};
use futures::future::join_all;
use serde::Serialize;

/// One top-level node of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedNode {
    Blocks {
        index: usize,
        blocks: Vec<Block>,
    },
    Diagram {
        index: usize,
        language: DiagramLanguage,
        source: String,
        /// `None` while a newer render for the same slot is still in flight.
        result: Option<DiagramRenderResult>,
    },
}

/// Ordered, fully rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub nodes: Vec<RenderedNode>,
}

impl RenderedDocument {
    /// Diagram nodes in document order.
    pub fn diagrams(&self) -> impl Iterator<Item = &RenderedNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node, RenderedNode::Diagram { .. }))
    }

    /// Number of diagrams that failed to render.
    #[must_use]
    pub fn failed_diagrams(&self) -> usize {
        self.diagrams()
            .filter(|node| {
                matches!(
                    node,
                    RenderedNode::Diagram {
                        result: Some(DiagramRenderResult::Failed(_)),
                        ..
                    }
                )
            })
            .count()
    }
}

/// Parse `content` and render its diagrams concurrently into `slots`.
///
/// Slots are keyed by segment index. Slots for indices that no longer hold a
/// diagram are dropped first.
pub async fn render_content(
    renderer: &DiagramRenderer,
    slots: &DiagramSlots,
    content: &str,
) -> RenderedDocument {
    let nodes = parse_document(content);

    let diagram_indices: Vec<usize> = nodes
        .iter()
        .filter_map(|node| match node {
            DocumentNode::Diagram { index, .. } => Some(*index),
            DocumentNode::Blocks { .. } => None,
        })
        .collect();
    slots.retain(|slot| diagram_indices.contains(&slot));

    let renders = nodes.iter().filter_map(|node| match node {
        DocumentNode::Diagram {
            index,
            language,
            source,
        } => Some(renderer.render_into(slots, *index, *language, source)),
        DocumentNode::Blocks { .. } => None,
    });
    let applied = join_all(renders).await;
    tracing::debug!(
        diagrams = applied.len(),
        superseded = applied.iter().filter(|a| !**a).count(),
        "Rendered diagrams"
    );

    let nodes = nodes
        .into_iter()
        .map(|node| match node {
            DocumentNode::Blocks { index, blocks } => RenderedNode::Blocks { index, blocks },
            DocumentNode::Diagram {
                index,
                language,
                source,
            } => RenderedNode::Diagram {
                index,
                language,
                source: source.to_owned(),
                result: slots.result(index),
            },
        })
        .collect();

    RenderedDocument { nodes }
}
