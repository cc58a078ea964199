//! Document model structures.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A body element in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
}

impl Element {
    /// The paragraph, if this element is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Element::Paragraph(p) => Some(p),
            Element::Table(_) => None,
        }
    }
}

impl From<Paragraph> for Element {
    fn from(p: Paragraph) -> Self {
        Element::Paragraph(p)
    }
}

impl From<Table> for Element {
    fn from(t: Table) -> Self {
        Element::Table(t)
    }
}

/// A parsed Word document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Body elements in document order
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Raw package bytes, kept for image extraction
    #[serde(skip)]
    pub source: Option<Vec<u8>>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from elements, without package bytes.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            source: None,
        }
    }

    /// Add an element.
    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    /// Iterate over body paragraphs (tables skipped).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.elements.iter().filter_map(Element::as_paragraph)
    }

    /// Iterate over tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(|e| match e {
            Element::Table(t) => Some(t),
            Element::Paragraph(_) => None,
        })
    }

    /// Plain text of the whole document, one element per line.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| match e {
                Element::Paragraph(p) => p.text(),
                Element::Table(t) => t.plain_text(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
