//! Top-level document segmentation.
//!
//! Splits a raw document into an ordered list of [`Segment`]s: plain text spans
//! and fenced diagram blocks. Segments borrow from the input.
//!
//! A diagram fence opens with ```` ```<language> ```` on its own line and
//! closes with ```` ``` ```` on its own line. An opening fence without a
//! matching close is not a diagram; it stays inside the text segment verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::language::DiagramLanguage;

static DIAGRAM_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let tags = DiagramLanguage::FENCE_TAGS.join("|");
    Regex::new(&format!(
        r"(?mR)^```(?:kroki-)?(?P<lang>{tags})[ \t]*\r?\n(?P<body>(?s:.*?))^```[ \t]*$"
    ))
    .unwrap()
});

/// Kind of a top-level segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "language", rename_all = "snake_case")
)]
pub enum SegmentKind {
    /// Prose, lists, headings and tables.
    Text,
    /// Diagram source in the given language.
    Diagram(DiagramLanguage),
}

/// A typed span of the raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Segment<'a> {
    /// Position of this segment in the segmented output.
    pub index: usize,
    /// Segment kind.
    pub kind: SegmentKind,
    /// Text for text segments; trimmed fence interior for diagrams.
    pub content: &'a str,
}

impl Segment<'_> {
    /// Whether this is a diagram segment.
    #[must_use]
    pub fn is_diagram(&self) -> bool {
        matches!(self.kind, SegmentKind::Diagram(_))
    }
}

/// Split `raw` into text and diagram segments, in document order.
///
/// Zero-length text spans between adjacent fences are not emitted. A document
/// with no diagram fence yields exactly one text segment equal to the input
/// (including the empty document).
///
/// # Example
///
/// ```
/// use folio_markup::{segment, SegmentKind, DiagramLanguage};
///
/// let segments = segment("A\n```mermaid\nX-->Y\n```\nB");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[0].content, "A\n");
/// assert_eq!(segments[1].kind, SegmentKind::Diagram(DiagramLanguage::Mermaid));
/// assert_eq!(segments[1].content, "X-->Y");
/// assert_eq!(segments[2].content, "\nB");
/// ```
#[must_use]
pub fn segment(raw: &str) -> Vec<Segment<'_>> {
    let mut spans: Vec<(SegmentKind, &str)> = Vec::new();
    let mut last_end = 0;

    for caps in DIAGRAM_FENCE_RE.captures_iter(raw) {
        let (Some(whole), Some(lang), Some(body)) =
            (caps.get(0), caps.name("lang"), caps.name("body"))
        else {
            continue;
        };
        let Some(language) = DiagramLanguage::parse(lang.as_str()) else {
            continue;
        };

        if whole.start() > last_end {
            spans.push((SegmentKind::Text, &raw[last_end..whole.start()]));
        }
        spans.push((SegmentKind::Diagram(language), body.as_str().trim()));
        last_end = whole.end();
    }

    if last_end < raw.len() || spans.is_empty() {
        spans.push((SegmentKind::Text, &raw[last_end..]));
    }

    spans
        .into_iter()
        .enumerate()
        .map(|(index, (kind, content))| Segment {
            index,
            kind,
            content,
        })
        .collect()
}
