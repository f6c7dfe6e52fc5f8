//! Document composition pipeline for generated research documents.
//!
//! Turns one long text stream (prose, pipe tables, fenced diagram source)
//! into typed, renderable nodes without a full markdown grammar:
//!
//! - [`segment`]: split raw text into text and diagram [`Segment`]s
//! - [`to_blocks`]: classify a text segment's lines into [`Block`]s
//! - [`parse_table`]: turn buffered pipe rows into a header/body [`Table`]
//! - [`format_inline`]: split a line into flat [`StyledRun`]s
//! - [`parse_document`]: all of the above in one call
//!
//! Every function here is total. Malformed input degrades to paragraphs,
//! plain runs or literal text; nothing returns an error.
//!
//! # Example
//!
//! ```
//! use folio_markup::{parse_document, DocumentNode};
//!
//! let nodes = parse_document("# Results\n\n```mermaid\nA --> B\n```\n");
//! assert_eq!(nodes.len(), 3);
//! assert!(matches!(nodes[1], DocumentNode::Diagram { source: "A --> B", .. }));
//! ```

mod block;
mod document;
mod inline;
mod language;
mod segment;
mod table;

pub use block::{Block, HeadingLevel, LineKind, classify_line, to_blocks};
pub use document::{DocumentNode, parse_document};
pub use inline::{StyledRun, format_inline};
pub use language::DiagramLanguage;
pub use segment::{Segment, SegmentKind, segment};
pub use table::{Table, parse_table};
