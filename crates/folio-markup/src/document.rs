//! Whole-document parsing.
//!
//! Runs the document segmenter and feeds each text segment through the block
//! segmenter. Diagram segments are passed through untouched; rendering them is
//! the caller's job.

use crate::block::{Block, to_blocks};
use crate::language::DiagramLanguage;
use crate::segment::{SegmentKind, segment};

/// One top-level node of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum DocumentNode<'a> {
    /// Blocks of a text segment.
    Blocks { index: usize, blocks: Vec<Block> },
    /// Diagram source awaiting rendering.
    Diagram {
        index: usize,
        language: DiagramLanguage,
        source: &'a str,
    },
}

impl DocumentNode<'_> {
    /// Segment index this node was derived from.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Blocks { index, .. } | Self::Diagram { index, .. } => *index,
        }
    }
}

/// Parse a raw document into its ordered nodes.
///
/// Text segments that contain no blocks (whitespace only) still produce a
/// node with an empty block list, so node indices match segment indices.
#[must_use]
pub fn parse_document(raw: &str) -> Vec<DocumentNode<'_>> {
    segment(raw)
        .into_iter()
        .map(|segment| match segment.kind {
            SegmentKind::Text => DocumentNode::Blocks {
                index: segment.index,
                blocks: to_blocks(segment.content),
            },
            SegmentKind::Diagram(language) => DocumentNode::Diagram {
                index: segment.index,
                language,
                source: segment.content,
            },
        })
        .collect()
}
