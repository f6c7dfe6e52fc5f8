//! Inline emphasis formatting.
//!
//! A single regex alternation finds `**bold**` and `*italic*` spans
//! (non-greedy). Everything between matches is plain text. Runs never nest
//! and there is no escaping: a marker without a partner is emitted verbatim
//! inside a plain run.

use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*.+?\*\*|\*.+?\*").unwrap());

/// A contiguous piece of text tagged with an emphasis tier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "style", content = "text", rename_all = "snake_case")
)]
pub enum StyledRun {
    Plain(String),
    Bold(String),
    Italic(String),
}

impl StyledRun {
    /// Text of the run without markers.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Bold(text) | Self::Italic(text) => text,
        }
    }
}

/// Convert one line of text into styled runs.
///
/// Empty fragments are not emitted, so an empty input yields no runs.
///
/// # Example
///
/// ```
/// use folio_markup::{format_inline, StyledRun};
///
/// let runs = format_inline("plain **bold** and *italic*");
/// assert_eq!(
///     runs,
///     vec![
///         StyledRun::Plain("plain ".to_owned()),
///         StyledRun::Bold("bold".to_owned()),
///         StyledRun::Plain(" and ".to_owned()),
///         StyledRun::Italic("italic".to_owned()),
///     ]
/// );
/// ```
#[must_use]
pub fn format_inline(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut last_end = 0;

    for m in EMPHASIS_RE.find_iter(text) {
        if m.start() > last_end {
            runs.push(StyledRun::Plain(text[last_end..m.start()].to_owned()));
        }
        runs.push(classify(m.as_str()));
        last_end = m.end();
    }

    if last_end < text.len() {
        runs.push(StyledRun::Plain(text[last_end..].to_owned()));
    }

    runs
}

/// Reclassify a matched emphasis fragment by its markers.
fn classify(fragment: &str) -> StyledRun {
    if fragment.len() >= 4 && fragment.starts_with("**") && fragment.ends_with("**") {
        StyledRun::Bold(fragment[2..fragment.len() - 2].to_owned())
    } else if fragment.len() >= 2 && fragment.starts_with('*') && fragment.ends_with('*') {
        StyledRun::Italic(fragment[1..fragment.len() - 1].to_owned())
    } else {
        StyledRun::Plain(fragment.to_owned())
    }
}
