//! List detection and list-item rendering.
//!
//! A paragraph is a list item when it carries numbering properties, when its
//! style name mentions lists or bullets, or when its text starts with a
//! bullet glyph or a `1.` style number. Items are emitted at the tracker's
//! current level; nesting depth is not inferred from the document.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::Paragraph;

use super::formatter::format_paragraph;

lazy_static! {
    /// Leading `1.` or `1）` number followed by whitespace.
    static ref NUMBERED_MARKER: Regex = Regex::new(r"^\d+[.\x{FF09}]\s+").unwrap();
}

/// Bullet glyphs recognised at the start of paragraph text.
pub const BULLET_MARKERS: &[&str] = &["•", "◦", "▪", "▫", "‣", "-", "*", "+"];

/// Kind of list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Text after a leading bullet glyph, provided a space follows the glyph.
fn after_bullet(text: &str) -> Option<&str> {
    BULLET_MARKERS
        .iter()
        .find_map(|m| text.strip_prefix(m).filter(|rest| rest.starts_with(' ')))
}

fn starts_with_bullet(text: &str) -> bool {
    after_bullet(text).is_some()
}

fn starts_with_number(text: &str) -> bool {
    NUMBERED_MARKER.is_match(text)
}

fn is_list_style(style_key: &str) -> bool {
    style_key.contains("list") || style_key.contains("bullet")
}

/// Whether a paragraph should be rendered as a list item.
pub fn is_list_paragraph(para: &Paragraph) -> bool {
    if para.has_numbering() || is_list_style(&para.style_key()) {
        return true;
    }
    let text = para.text();
    let text = text.trim();
    starts_with_bullet(text) || starts_with_number(text)
}

/// Decide whether a list item is ordered or unordered.
///
/// Numbered text wins. A list-styled item without a textual marker is
/// ordered when its style name mentions numbering.
pub fn list_kind(text: &str, style_key: &str) -> ListKind {
    if starts_with_number(text) {
        return ListKind::Ordered;
    }
    if is_list_style(style_key) && !starts_with_bullet(text) {
        if style_key.contains("number") || style_key.contains("ordered") {
            return ListKind::Ordered;
        }
        return ListKind::Unordered;
    }
    ListKind::Unordered
}

/// Strip a leading number and then at most one leading bullet glyph.
///
/// A glyph only counts as a marker when a space follows it, so `-5` or
/// `*word*` keep their first character.
pub fn strip_list_marker(text: &str) -> String {
    let text = NUMBERED_MARKER.replace(text, "");
    after_bullet(&text).unwrap_or(&*text).trim().to_string()
}

/// List tracking state carried across paragraphs of one conversion.
///
/// Counters are kept per level and survive the end of a list; an ordered
/// list restarts at 1 only when a new list is opened.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    current_level: usize,
    in_list: bool,
    kind: Option<ListKind>,
    counters: HashMap<usize, u32>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_list(&self) -> bool {
        self.in_list
    }

    pub fn kind(&self) -> Option<ListKind> {
        self.kind
    }

    pub fn level(&self) -> usize {
        self.current_level
    }

    /// Set the nesting level used for subsequent items.
    pub fn set_level(&mut self, level: usize) {
        self.current_level = level;
    }

    /// Close the current list. Counters are left untouched.
    pub fn end_list(&mut self) {
        self.in_list = false;
        self.kind = None;
    }

    /// Indentation and marker for the next item of the given kind.
    pub fn next_marker(&mut self, kind: ListKind) -> String {
        if !self.in_list || self.kind != Some(kind) {
            self.in_list = true;
            self.kind = Some(kind);
            if kind == ListKind::Ordered {
                self.counters.insert(self.current_level, 1);
            }
        }

        let indent = "  ".repeat(self.current_level);
        match kind {
            ListKind::Ordered => {
                let counter = self.counters.entry(self.current_level).or_insert(1);
                let marker = format!("{}{}.", indent, counter);
                *counter += 1;
                marker
            }
            ListKind::Unordered => format!("{}-", indent),
        }
    }

    /// Render a list paragraph as one Markdown line.
    pub fn render_item(&mut self, para: &Paragraph) -> String {
        let text = para.text();
        let text = text.trim();
        let kind = list_kind(text, &para.style_key());
        let cleaned = strip_list_marker(text);
        let marker = self.next_marker(kind);
        format!("{} {}", marker, format_paragraph(para, Some(&cleaned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Numbering, Run};

    #[test]
    fn test_list_detection() {
        assert!(is_list_paragraph(&Paragraph::with_text("• apples")));
        assert!(is_list_paragraph(&Paragraph::with_text("  - apples")));
        assert!(is_list_paragraph(&Paragraph::with_text("12. twelve")));
        assert!(is_list_paragraph(&Paragraph::with_text("3\u{FF09} full width")));
        assert!(is_list_paragraph(&Paragraph::styled("List Paragraph", "x")));
        assert!(is_list_paragraph(&Paragraph::styled("Bullet Small", "x")));
        assert!(is_list_paragraph(
            &Paragraph::with_text("x").with_numbering(Numbering::default())
        ));

        assert!(!is_list_paragraph(&Paragraph::with_text("-no space")));
        assert!(!is_list_paragraph(&Paragraph::with_text("1.5 million")));
        assert!(!is_list_paragraph(&Paragraph::with_text("Plain text")));
    }

    #[test]
    fn test_list_kind() {
        assert_eq!(list_kind("1. a", ""), ListKind::Ordered);
        assert_eq!(list_kind("- a", "list number"), ListKind::Unordered);
        assert_eq!(list_kind("a", "list number"), ListKind::Ordered);
        assert_eq!(list_kind("a", "ordered list"), ListKind::Ordered);
        assert_eq!(list_kind("a", "list bullet"), ListKind::Unordered);
        assert_eq!(list_kind("• a", ""), ListKind::Unordered);
    }

    #[test]
    fn test_strip_list_marker() {
        assert_eq!(strip_list_marker("1. First"), "First");
        assert_eq!(strip_list_marker("• Second"), "Second");
        assert_eq!(strip_list_marker("- - nested"), "- nested");
        assert_eq!(strip_list_marker("plain"), "plain");
        assert_eq!(strip_list_marker("10\u{FF09} ten"), "ten");
        assert_eq!(strip_list_marker("1. -5 degrees"), "-5 degrees");
        assert_eq!(strip_list_marker("+1 for this idea"), "+1 for this idea");
        assert_eq!(strip_list_marker("*important* note"), "*important* note");
        assert_eq!(strip_list_marker("- *important* note"), "*important* note");
    }

    #[test]
    fn test_ordered_numbering_restarts() {
        let mut state = ListState::new();
        assert_eq!(state.next_marker(ListKind::Ordered), "1.");
        assert_eq!(state.next_marker(ListKind::Ordered), "2.");
        state.end_list();
        assert!(!state.in_list());
        assert_eq!(state.next_marker(ListKind::Ordered), "1.");
    }

    #[test]
    fn test_kind_switch_restarts_numbering() {
        let mut state = ListState::new();
        assert_eq!(state.next_marker(ListKind::Ordered), "1.");
        assert_eq!(state.next_marker(ListKind::Ordered), "2.");
        assert_eq!(state.next_marker(ListKind::Unordered), "-");
        assert_eq!(state.kind(), Some(ListKind::Unordered));
        assert_eq!(state.next_marker(ListKind::Ordered), "1.");
    }

    #[test]
    fn test_level_indentation() {
        let mut state = ListState::new();
        state.set_level(2);
        assert_eq!(state.next_marker(ListKind::Unordered), "    -");
        assert_eq!(state.next_marker(ListKind::Unordered), "    -");
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_render_item_uses_cleaned_text() {
        let mut state = ListState::new();
        let para = Paragraph::new().with_runs(vec![Run::plain("1. "), Run::bold("Bold")]);
        assert_eq!(state.render_item(&para), "1. Bold");

        // A lone glyph without a following space is content
        let para = Paragraph::new().with_runs(vec![Run::plain("• ")]);
        assert_eq!(state.render_item(&para), "- •");
    }

    #[test]
    fn test_render_item_keeps_glyph_without_space() {
        let mut state = ListState::new();
        let para = Paragraph::styled("List Paragraph", "+1 for this idea");
        assert_eq!(state.render_item(&para), "- +1 for this idea");

        let para = Paragraph::styled("List Number", "-5 degrees");
        assert_eq!(state.render_item(&para), "1. -5 degrees");
    }
}
