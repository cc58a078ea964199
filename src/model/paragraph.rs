//! Paragraph, run and inline-object models.

use serde::{Deserialize, Serialize};

/// A run of text sharing one formatting state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Bold text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    /// Italic text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,

    /// Underlined text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,

    /// The run contains a drawing or legacy picture
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_inline_object: bool,
}

impl Run {
    /// Create a plain text run with no formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Default::default()
        }
    }

    /// Create an underlined run.
    pub fn underlined(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            underline: true,
            ..Default::default()
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An inline object embedded in a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InlineObject {
    /// A DrawingML object (`w:drawing`), with the relationship IDs of every
    /// embedded image descriptor found inside it.
    Drawing {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        embed_ids: Vec<String>,
    },
    /// A legacy VML picture (`w:pict`).
    Picture,
}

impl InlineObject {
    /// A drawing with the given embedded-image relationship IDs.
    pub fn drawing<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InlineObject::Drawing {
            embed_ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Structural list-numbering metadata (`w:numPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    /// Numbering definition ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_id: Option<String>,
    /// Nesting level (0 = top level)
    #[serde(default)]
    pub level: u8,
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Style display name as declared by the document, e.g. "Heading 1"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub style_name: String,

    /// Text runs in this paragraph
    #[serde(default)]
    pub runs: Vec<Run>,

    /// List numbering metadata, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbering: Option<Numbering>,

    /// Every drawing and picture found anywhere inside the paragraph
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_objects: Vec<InlineObject>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unstyled paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            ..Default::default()
        }
    }

    /// Create a paragraph with a style name and plain text.
    pub fn styled(style_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style_name: style_name.into(),
            runs: vec![Run::plain(text)],
            ..Default::default()
        }
    }

    /// Replace the runs of this paragraph.
    pub fn with_runs(mut self, runs: Vec<Run>) -> Self {
        self.runs = runs;
        self
    }

    /// Attach an inline object at paragraph level.
    pub fn with_inline_object(mut self, object: InlineObject) -> Self {
        self.inline_objects.push(object);
        self
    }

    /// Attach list-numbering metadata.
    pub fn with_numbering(mut self, numbering: Numbering) -> Self {
        self.numbering = Some(numbering);
        self
    }

    /// Add a text run to this paragraph.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Lower-cased style name, the form every style test is made against.
    pub fn style_key(&self) -> String {
        self.style_name.to_lowercase()
    }

    /// Check if this paragraph has no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// Whether the paragraph carries list numbering metadata.
    pub fn has_numbering(&self) -> bool {
        self.numbering.is_some()
    }

    /// Whether any run holds a drawing or picture.
    pub fn has_run_inline_objects(&self) -> bool {
        self.runs.iter().any(|r| r.has_inline_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text_concatenates_runs() {
        let para = Paragraph::new().with_runs(vec![
            Run::plain("Hello, "),
            Run::bold("World"),
            Run::plain("!"),
        ]);
        assert_eq!(para.text(), "Hello, World!");
        assert!(!para.is_empty());
        assert!(Paragraph::new().is_empty());
    }

    #[test]
    fn test_style_key_is_lowercase() {
        let para = Paragraph::styled("Heading 2", "Intro");
        assert_eq!(para.style_key(), "heading 2");
        assert_eq!(Paragraph::with_text("x").style_key(), "");
    }

    #[test]
    fn test_run_inline_object_flag() {
        let mut para = Paragraph::with_text("caption");
        assert!(!para.has_run_inline_objects());
        para.add_run(Run {
            has_inline_object: true,
            ..Default::default()
        });
        assert!(para.has_run_inline_objects());
    }

    #[test]
    fn test_paragraph_serialization_skips_defaults() {
        let para = Paragraph::with_text("Test");
        let json = serde_json::to_string(&para).unwrap();
        assert!(!json.contains("style_name"));
        assert!(!json.contains("bold"));
        assert!(!json.contains("numbering"));

        let para = Paragraph::new().with_inline_object(InlineObject::drawing(["rId4"]));
        let json = serde_json::to_string(&para).unwrap();
        assert!(json.contains(r#""kind":"drawing""#));
        assert!(json.contains("rId4"));
    }
}
