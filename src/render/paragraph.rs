//! Paragraph conversion.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::Paragraph;

use super::formatter::format_paragraph;
use super::images::paragraph_image_references;
use super::lists::is_list_paragraph;
use super::markdown::ConversionContext;

lazy_static! {
    static ref HEADING_NUMBER: Regex = Regex::new(r"heading\s*(\d+)").unwrap();
}

/// Deepest Markdown heading level.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Text shorter than this next to an image is treated as a caption-less
/// image paragraph.
const IMAGE_ONLY_TEXT_LEN: usize = 3;

/// Rendering category derived from a lower-cased style name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCategory {
    Title,
    /// Heading with its level taken from the style name, clamped to 1..=6.
    Heading(usize),
    List,
    Body,
}

impl StyleCategory {
    /// Classify a lower-cased style name. Checks are substring tests in the
    /// order title, heading, list.
    pub fn classify(style_key: &str) -> Self {
        if style_key.contains("title") {
            StyleCategory::Title
        } else if style_key.contains("heading") {
            StyleCategory::Heading(heading_level(style_key))
        } else if style_key.contains("list") || style_key.contains("bullet") {
            StyleCategory::List
        } else {
            StyleCategory::Body
        }
    }
}

/// Heading level named in a style, e.g. `heading 2` or `heading2`.
///
/// Missing numbers give level 1; numbers are clamped to 1..=6.
pub fn heading_level(style_key: &str) -> usize {
    let Some(caps) = HEADING_NUMBER.captures(style_key) else {
        return 1;
    };
    // All-digit captures that overflow are simply very deep headings.
    let level = caps[1].parse::<usize>().unwrap_or(MAX_HEADING_LEVEL);
    level.clamp(1, MAX_HEADING_LEVEL)
}

/// Markdown heading line at the given level.
pub fn heading_line(level: usize, text: &str) -> String {
    format!("{} {}", "#".repeat(level.clamp(1, MAX_HEADING_LEVEL)), text)
}

/// Convert one paragraph, appending its lines to the context's buffer.
pub fn convert_paragraph(para: &Paragraph, ctx: &mut ConversionContext<'_>) {
    let text = para.text();
    let trimmed = text.trim();
    let images = paragraph_image_references(para, ctx.images);

    if !images.is_empty() && trimmed.chars().count() < IMAGE_ONLY_TEXT_LEN {
        ctx.lines.push(images);
        ctx.lines.push_blank();
        return;
    }

    if trimmed.is_empty() {
        if ctx.lines.ends_with_content() {
            ctx.lines.push_blank();
        }
        return;
    }

    let category = StyleCategory::classify(&para.style_key());
    if category == StyleCategory::Title {
        return;
    }

    let is_list = is_list_paragraph(para);
    if ctx.list.in_list() && !is_list {
        ctx.lines.push_blank();
        ctx.list.end_list();
    }

    if let StyleCategory::Heading(level) = category {
        ctx.lines.push(heading_line(level + ctx.heading_offset, trimmed));
        ctx.lines.push_blank();
        return;
    }

    if is_list {
        let line = ctx.list.render_item(para);
        ctx.lines.push(line);
        return;
    }

    if !images.is_empty() {
        ctx.lines.push(images);
        ctx.lines.push_blank();
    }
    ctx.lines.push(format_paragraph(para, None));
    ctx.lines.push_blank();
}
