//! Markdown renderer implementation.
//!
//! One pass over the document's top-level elements. A document with a
//! non-empty title renders it as the only level-1 heading and shifts every
//! styled heading down one level. Without a title, the first `heading 1`
//! paragraph is promoted to the document heading and later headings keep
//! their own levels.

use crate::model::{Document, Element, Paragraph};

use super::cleanup::OutputBuffer;
use super::images::{ImageExtractor, ImageMap};
use super::lists::ListState;
use super::options::ConvertOptions;
use super::paragraph::{convert_paragraph, heading_line, StyleCategory};
use super::table::convert_table;

/// State shared by the element converters during one document pass.
#[derive(Debug)]
pub struct ConversionContext<'a> {
    /// Lines produced so far
    pub lines: OutputBuffer,
    /// Active list tracking
    pub list: ListState,
    /// Added to every styled heading level (1 when a title exists)
    pub heading_offset: usize,
    /// Extracted images for reference resolution
    pub images: &'a ImageMap,
}

impl<'a> ConversionContext<'a> {
    pub fn new(images: &'a ImageMap) -> Self {
        Self {
            lines: OutputBuffer::new(),
            list: ListState::new(),
            heading_offset: 0,
            images,
        }
    }
}

/// Result of converting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutput {
    /// Normalized Markdown text, ending in a single newline
    pub markdown: String,
    /// File names written to the assets directory, in extraction order
    pub images: Vec<String>,
}

fn is_title(para: &Paragraph) -> bool {
    StyleCategory::classify(&para.style_key()) == StyleCategory::Title
}

/// Whether any paragraph is a title with visible text.
pub fn has_title(doc: &Document) -> bool {
    doc.paragraphs()
        .any(|p| is_title(p) && !p.text().trim().is_empty())
}

/// Render a parsed document against an already-extracted image map.
pub fn render_markdown(doc: &Document, images: &ImageMap) -> String {
    let mut ctx = ConversionContext::new(images);
    let title_found = has_title(doc);
    if title_found {
        ctx.heading_offset = 1;
    }
    let mut first_heading_found = false;

    for element in &doc.elements {
        match element {
            Element::Paragraph(para) => {
                let text = para.text();
                let trimmed = text.trim();

                if is_title(para) && !trimmed.is_empty() {
                    ctx.lines.push(heading_line(1, trimmed));
                    ctx.lines.push_blank();
                    continue;
                }

                if !title_found
                    && !first_heading_found
                    && !trimmed.is_empty()
                    && para.style_key().contains("heading 1")
                {
                    ctx.lines.push(heading_line(1, trimmed));
                    ctx.lines.push_blank();
                    first_heading_found = true;
                    continue;
                }

                convert_paragraph(para, &mut ctx);
            }
            Element::Table(table) => convert_table(table, &mut ctx.lines),
        }
    }

    ctx.list.end_list();
    ctx.lines.into_markdown()
}

/// Convert a parsed document, extracting images first when configured.
///
/// Image extraction reads the package bytes kept on the document; a tree
/// built by hand has none and converts without images.
pub fn convert(doc: &Document, options: &ConvertOptions) -> ConversionOutput {
    let images = match (options.image_target(), doc.source.as_deref()) {
        (Some(dir), Some(package)) => ImageExtractor::new(Some(dir)).extract(package),
        (Some(_), None) => {
            log::debug!("Document has no package bytes, skipping image extraction");
            ImageMap::new()
        }
        _ => ImageMap::new(),
    };

    let markdown = render_markdown(doc, &images);
    log::info!(
        "Converted {} elements ({} images)",
        doc.elements.len(),
        images.filenames().len()
    );

    ConversionOutput {
        markdown,
        images: images.filenames().to_vec(),
    }
}
