//! Document generation, editing and rendering for folio.
//!
//! Wires the pieces together along the document's data flow:
//!
//! ```text
//! ContentSource --generate--> DocumentStore --content--> parse_document
//!                                  ^                         |
//!                             save_edit              DiagramRenderer (per slot)
//!                                  |                         v
//!                               editor  <------------  RenderedDocument
//! ```
//!
//! Content-source failures abort the operation without storing anything.
//! Diagram failures stay inside their own [`RenderedNode`].

mod composer;
mod render;
mod source;

pub use composer::{ComposeError, Composer, EditOutcome};
pub use render::{RenderedDocument, RenderedNode, render_content};
pub use source::{ContentSource, HttpContentSource, SourceError};
