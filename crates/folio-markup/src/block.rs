//! Block segmentation of text segments.
//!
//! A single pass over the lines of a text segment. Each line is classified
//! into a [`LineKind`]; the only state carried between lines is the buffer of
//! pending table rows. A table is flushed when a non-table line arrives or the
//! segment ends.
//!
//! Classification (on the trimmed line, first match wins):
//!
//! 1. starts with `|` → table row
//! 2. blank → skipped
//! 3. `### `, `## `, `# ` → heading level 3, 2, 1
//! 4. `- ` or `* ` → bullet item
//! 5. digits followed by `.` → ordered item
//! 6. anything else → paragraph

use std::sync::LazyLock;

use regex::Regex;

use crate::inline::{StyledRun, format_inline};
use crate::table::{Table, parse_table};

static ORDERED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Heading depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric level (1-3).
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }
}

/// A structural unit within a text segment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Block {
    Heading {
        level: HeadingLevel,
        runs: Vec<StyledRun>,
    },
    BulletItem {
        runs: Vec<StyledRun>,
    },
    OrderedItem {
        runs: Vec<StyledRun>,
    },
    Paragraph {
        runs: Vec<StyledRun>,
    },
    Table(Table),
}

/// Classification of a single line.
///
/// Total over all inputs: every line maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Pipe table row (the trimmed line).
    TableRow(&'a str),
    /// Whitespace-only line.
    Blank,
    /// Heading with its inline content.
    Heading(HeadingLevel, &'a str),
    /// Bullet item with its inline content.
    BulletItem(&'a str),
    /// Ordered item with the `N. ` marker stripped.
    OrderedItem(&'a str),
    /// Paragraph with the full trimmed line.
    Paragraph(&'a str),
}

/// Classify one line.
#[must_use]
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if trimmed.starts_with('|') {
        return LineKind::TableRow(trimmed);
    }
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return LineKind::Heading(HeadingLevel::H3, rest);
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return LineKind::Heading(HeadingLevel::H2, rest);
    }
    if let Some(rest) = trimmed.strip_prefix("# ") {
        return LineKind::Heading(HeadingLevel::H1, rest);
    }
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return LineKind::BulletItem(rest);
    }
    if let Some(marker) = ORDERED_ITEM_RE.find(trimmed) {
        return LineKind::OrderedItem(&trimmed[marker.end()..]);
    }
    LineKind::Paragraph(trimmed)
}

/// Convert a text segment into an ordered list of blocks.
///
/// # Example
///
/// ```
/// use folio_markup::{to_blocks, Block, HeadingLevel};
///
/// let blocks = to_blocks("# Title\n\n| a |\n|---|\n| 1 |\nDone.");
/// assert_eq!(blocks.len(), 3);
/// assert!(matches!(blocks[0], Block::Heading { level: HeadingLevel::H1, .. }));
/// assert!(matches!(blocks[1], Block::Table(_)));
/// assert!(matches!(blocks[2], Block::Paragraph { .. }));
/// ```
#[must_use]
pub fn to_blocks(segment: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut table_rows: Vec<&str> = Vec::new();

    for line in segment.lines() {
        let kind = classify_line(line);

        if let LineKind::TableRow(row) = kind {
            table_rows.push(row);
            continue;
        }
        if !table_rows.is_empty() {
            blocks.push(Block::Table(parse_table(&table_rows)));
            table_rows.clear();
        }

        match kind {
            LineKind::TableRow(_) | LineKind::Blank => {}
            LineKind::Heading(level, text) => blocks.push(Block::Heading {
                level,
                runs: format_inline(text),
            }),
            LineKind::BulletItem(text) => blocks.push(Block::BulletItem {
                runs: format_inline(text),
            }),
            LineKind::OrderedItem(text) => blocks.push(Block::OrderedItem {
                runs: format_inline(text),
            }),
            LineKind::Paragraph(text) => blocks.push(Block::Paragraph {
                runs: format_inline(text),
            }),
        }
    }

    if !table_rows.is_empty() {
        blocks.push(Block::Table(parse_table(&table_rows)));
    }

    blocks
}
