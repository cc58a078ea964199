//! Markdown conversion of parsed documents.
//!
//! The converters share one [`ConversionContext`] per document: the output
//! line buffer, list state, heading offset and the extracted image map.
//!
//! # Example
//!
//! ```no_run
//! use docmd::{parse_file, render::*};
//!
//! let doc = parse_file("document.docx")?;
//!
//! let options = ConvertOptions::new().with_assets_dir("out/assets");
//! let output = convert(&doc, &options);
//! println!("{}", output.markdown);
//!
//! let json = to_json(&doc, JsonFormat::Pretty)?;
//! # Ok::<(), docmd::Error>(())
//! ```

mod cleanup;
mod formatter;
mod images;
mod json;
mod lists;
mod markdown;
mod options;
mod paragraph;
mod table;

pub use cleanup::{normalize_lines, OutputBuffer};
pub use formatter::{format_paragraph, format_run, format_runs};
pub use images::{
    image_link, paragraph_image_references, ImageExtractor, ImageMap, IMAGE_LINK_PREFIX,
};
pub use json::{to_json, JsonFormat};
pub use lists::{
    is_list_paragraph, list_kind, strip_list_marker, ListKind, ListState, BULLET_MARKERS,
};
pub use markdown::{convert, has_title, render_markdown, ConversionContext, ConversionOutput};
pub use options::ConvertOptions;
pub use paragraph::{convert_paragraph, heading_level, StyleCategory, MAX_HEADING_LEVEL};
pub use table::convert_table;
