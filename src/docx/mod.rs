//! DOCX (Word) document parser.
//!
//! Turns a `.docx` package into the [`Document`](crate::model::Document)
//! tree the Markdown converter walks.

mod parser;
pub mod styles;

pub use parser::DocxParser;
