//! Pipe table parsing.
//!
//! Tables are buffered by the block segmenter and handed over as a run of
//! lines. Parsing is positional and never fails:
//!
//! - line 0 is the header row
//! - line 1 is the divider and is discarded without inspection
//! - lines 2.. are body rows
//!
//! Body rows keep whatever cell count they have; nothing is padded or truncated.

/// A parsed pipe table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Table {
    /// Header cells.
    pub headers: Vec<String>,
    /// Body rows, each a list of cells.
    pub rows: Vec<Vec<String>>,
}

/// Parse a buffered run of pipe-delimited lines into a [`Table`].
///
/// # Example
///
/// ```
/// use folio_markup::parse_table;
///
/// let table = parse_table(&["| a | b |", "|---|---|", "| 1 | 2 |"]);
/// assert_eq!(table.headers, vec!["a", "b"]);
/// assert_eq!(table.rows, vec![vec!["1", "2"]]);
/// ```
#[must_use]
pub fn parse_table<S: AsRef<str>>(lines: &[S]) -> Table {
    let Some((header, rest)) = lines.split_first() else {
        return Table::default();
    };

    Table {
        headers: split_row(header.as_ref()),
        rows: rest
            .iter()
            .skip(1)
            .map(|line| split_row(line.as_ref()))
            .collect(),
    }
}

/// Split a row on `|` and trim each cell.
///
/// The empty fragments produced by a leading or trailing pipe are dropped.
/// Interior empty cells are kept so columns stay aligned.
fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();

    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }

    cells.into_iter().map(str::to_owned).collect()
}
