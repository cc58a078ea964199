//! Output line buffer and final whitespace normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Ordered list of output lines built up during a conversion.
///
/// An entry may itself contain newlines (joined image references); the
/// empty string is a blank line.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn push_blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Whether the buffer is non-empty and its last entry is not blank.
    pub fn ends_with_content(&self) -> bool {
        self.lines.last().is_some_and(|l| !l.is_empty())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join and normalize into the final Markdown text.
    pub fn into_markdown(self) -> String {
        normalize_lines(&self.lines)
    }
}

/// Join lines with `\n`, collapse runs of three or more newlines to two,
/// trim the result and end it with exactly one newline.
pub fn normalize_lines(lines: &[String]) -> String {
    let joined = lines.join("\n");
    let collapsed = RE_EXCESS_NEWLINES.replace_all(&joined, "\n\n");
    let mut result = collapsed.trim().to_string();
    result.push('\n');
    result
}
