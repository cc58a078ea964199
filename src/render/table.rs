//! Pipe-table rendering.

use crate::model::{Row, Table};

use super::cleanup::OutputBuffer;

/// Append a table as a Markdown pipe table surrounded by blank lines.
///
/// The first row is the header. The separator takes the width of the first
/// row; later rows keep their own cell counts, ragged or not.
pub fn convert_table(table: &Table, out: &mut OutputBuffer) {
    out.push_blank();
    for (i, row) in table.rows.iter().enumerate() {
        out.push(render_row(row));
        if i == 0 {
            out.push(separator(row.len()));
        }
    }
    out.push_blank();
}

fn render_row(row: &Row) -> String {
    let cells: Vec<String> = row.cells.iter().map(|c| c.inline_text()).collect();
    format!("| {} |", cells.join(" | "))
}

fn separator(width: usize) -> String {
    format!("|{}", " --- |".repeat(width))
}
