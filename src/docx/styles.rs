//! DOCX styles parsing.
//!
//! Only what the converter consumes is kept: the display name of each
//! paragraph style and which style applies when a paragraph names none.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Style type (paragraph, character, table, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(StyleType::Paragraph),
            "character" => Some(StyleType::Character),
            "table" => Some(StyleType::Table),
            "numbering" => Some(StyleType::Numbering),
            _ => None,
        }
    }
}

/// A parsed style definition.
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Style name (e.g., "heading 1")
    pub name: String,
    /// Style type
    pub style_type: Option<StyleType>,
}

/// Collection of styles from styles.xml.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    /// Styles by ID
    pub styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

impl StyleMap {
    /// Parse styles from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut map = StyleMap::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut current: Option<Style> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:style" => {
                    current = Some(map.begin_style(e));
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:style" => {
                    let style = map.begin_style(e);
                    map.insert(style);
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:name" => {
                    if let Some(ref mut style) = current {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"w:val" {
                                style.name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_default();
                            }
                        }
                    }
                }
                Ok(Event::End(ref e)) if e.name().as_ref() == b"w:style" => {
                    if let Some(style) = current.take() {
                        map.insert(style);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
        }

        Ok(map)
    }

    fn begin_style(&mut self, e: &BytesStart<'_>) -> Style {
        let mut style = Style::default();
        let mut is_default = false;
        for attr in e.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            match attr.key.as_ref() {
                b"w:styleId" => style.id = value.into_owned(),
                b"w:type" => style.style_type = StyleType::from_attr(&value),
                b"w:default" => is_default = value == "1" || value == "true",
                _ => {}
            }
        }
        if is_default && style.style_type == Some(StyleType::Paragraph) {
            self.default_paragraph = Some(style.id.clone());
        }
        style
    }

    fn insert(&mut self, style: Style) {
        if !style.id.is_empty() {
            self.styles.insert(style.id.clone(), style);
        }
    }

    /// Resolve the display name for a paragraph's style reference.
    ///
    /// Unknown or absent references resolve to the default paragraph style,
    /// a known style without a name to its ID, and an empty string when
    /// nothing applies.
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> String {
        let style = style_id
            .and_then(|id| self.styles.get(id))
            .or_else(|| {
                self.default_paragraph
                    .as_deref()
                    .and_then(|id| self.styles.get(id))
            });

        match style {
            Some(s) if !s.name.is_empty() => s.name.clone(),
            Some(s) => s.id.clone(),
            None => style_id.unwrap_or_default().to_string(),
        }
    }
}
