//! Inline formatting of text runs.
//!
//! Bold and italic become Markdown emphasis, underline becomes a `<u>` HTML
//! span. Markdown-significant characters in the run text are passed through
//! unescaped, so existing output stays byte-for-byte stable.

use crate::model::{Paragraph, Run};

/// Render one run. Empty runs render to nothing.
///
/// Wrapping order is bold, then italic, then underline, so a bold italic
/// run renders as `***text***` (italic outside bold).
pub fn format_run(run: &Run) -> String {
    if run.text.is_empty() {
        return String::new();
    }

    let mut text = run.text.clone();
    if run.bold {
        text = format!("**{}**", text);
    }
    if run.italic {
        text = format!("*{}*", text);
    }
    if run.underline {
        text = format!("<u>{}</u>", text);
    }
    text
}

/// Render a sequence of runs into one inline string.
///
/// Adjacent underline spans are merged into one; no other tag merging is
/// performed.
pub fn format_runs(runs: &[Run]) -> String {
    let joined: String = runs.iter().map(format_run).collect();
    merge_adjacent_underlines(&joined)
}

/// Render a paragraph's inline content.
///
/// A non-empty `override_text` is returned as is; callers use it when the
/// text has already been rewritten (list items with their marker stripped).
pub fn format_paragraph(para: &Paragraph, override_text: Option<&str>) -> String {
    match override_text {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format_runs(&para.runs),
    }
}

fn merge_adjacent_underlines(text: &str) -> String {
    text.replace("</u><u>", "")
}
