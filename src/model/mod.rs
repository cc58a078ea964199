//! Parsed document tree consumed by the Markdown converter.
//!
//! The DOCX parser produces these structures; the renderer reads them and
//! never mutates them. Element order is document order.

mod document;
mod paragraph;
mod table;

pub use document::*;
pub use paragraph::*;
pub use table::*;
