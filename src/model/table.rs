//! Table model structures.

use serde::{Deserialize, Serialize};

/// A cell in a table, reduced to its plain text.
///
/// Multiple paragraphs inside the cell are joined with `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Plain text content
    #[serde(default)]
    pub text: String,
}

impl Cell {
    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Text as it appears in a single Markdown table row: trimmed, with
    /// interior newlines replaced by spaces.
    pub fn inline_text(&self) -> String {
        self.text.trim().replace('\n', " ")
    }

    /// Check if this cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a row from cell texts.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(Cell::with_text).collect(),
        }
    }

    /// Number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A table: rows of cells, with no column reconciliation between rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table rows
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in the first row, which fixes the header width.
    pub fn header_width(&self) -> usize {
        self.rows.first().map(Row::len).unwrap_or(0)
    }

    /// Plain text, one line per row with cells separated by tabs.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
