//! # docmd
//!
//! Word document (`.docx`) to Markdown conversion with image extraction.
//!
//! The library parses a DOCX package into a small document tree (paragraphs
//! with styled runs and inline images, tables) and renders that tree as
//! Markdown. Embedded images are copied into an assets directory and
//! referenced as `./assets/image_NNN.ext`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmd::{parse_file, render::ConvertOptions};
//!
//! // Convert to Markdown, no images
//! let markdown = docmd::to_markdown("document.docx")?;
//! std::fs::write("output.md", markdown)?;
//!
//! // Convert with images written to out/assets
//! let doc = parse_file("document.docx")?;
//! let options = ConvertOptions::new().with_assets_dir("out/assets");
//! let output = docmd::convert(&doc, &options);
//! println!("{} images", output.images.len());
//! # Ok::<(), docmd::Error>(())
//! ```

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod model;
pub mod render;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use model::{Cell, Document, Element, InlineObject, Numbering, Paragraph, Row, Run, Table};
pub use render::{convert, ConversionOutput, ConvertOptions};

use std::path::Path;

/// Parse a document file and return a Document model.
///
/// Legacy binary `.doc` files are recognised but not parsed; convert them to
/// DOCX first.
///
/// # Example
///
/// ```no_run
/// use docmd::parse_file;
///
/// let doc = parse_file("document.docx")?;
/// println!("Elements: {}", doc.elements.len());
/// # Ok::<(), docmd::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    match detect_format_from_path(path)? {
        FormatType::Docx => docx::DocxParser::open(path)?.parse(),
        format @ FormatType::LegacyDoc => Err(Error::UnsupportedFormat(format.name().to_string())),
    }
}

/// Parse a document from bytes.
///
/// # Example
///
/// ```no_run
/// use docmd::parse_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let doc = parse_bytes(&data)?;
/// # Ok::<(), docmd::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    match detect_format_from_bytes(data)? {
        FormatType::Docx => docx::DocxParser::from_bytes(data.to_vec())?.parse(),
        format @ FormatType::LegacyDoc => Err(Error::UnsupportedFormat(format.name().to_string())),
    }
}

/// Extract plain text from a document.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(doc.plain_text())
}

/// Convert a document to Markdown without extracting images.
///
/// # Example
///
/// ```no_run
/// use docmd::to_markdown;
///
/// let markdown = to_markdown("document.docx")?;
/// std::fs::write("output.md", markdown)?;
/// # Ok::<(), docmd::Error>(())
/// ```
pub fn to_markdown(path: impl AsRef<Path>) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(convert(&doc, &ConvertOptions::default()).markdown)
}

/// Convert a document to Markdown with options.
///
/// # Example
///
/// ```no_run
/// use docmd::{to_markdown_with_options, render::ConvertOptions};
///
/// let options = ConvertOptions::new().with_assets_dir("out/assets");
/// let output = to_markdown_with_options("document.docx", &options)?;
/// std::fs::write("out/document.md", output.markdown)?;
/// # Ok::<(), docmd::Error>(())
/// ```
pub fn to_markdown_with_options(
    path: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConversionOutput> {
    let doc = parse_file(path)?;
    Ok(convert(&doc, options))
}

/// Convert an in-memory DOCX package.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<ConversionOutput> {
    let doc = parse_bytes(data)?;
    Ok(convert(&doc, options))
}
