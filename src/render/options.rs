//! Conversion options.

use std::path::{Path, PathBuf};

/// Options for converting a document to Markdown.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory that extracted images are written to.
    pub assets_dir: Option<PathBuf>,

    /// Extract embedded images and emit references to them
    pub extract_images: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            assets_dir: None,
            extract_images: true,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assets directory for extracted images.
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Directory images will actually be written to, if any.
    pub fn image_target(&self) -> Option<&Path> {
        if self.extract_images {
            self.assets_dir.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert!(opts.assets_dir.is_none());
        assert!(opts.extract_images);
        assert_eq!(opts.image_target(), None);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = ConvertOptions::new().with_assets_dir("out/assets");
        assert_eq!(opts.assets_dir, Some(PathBuf::from("out/assets")));
        assert_eq!(opts.image_target(), Some(Path::new("out/assets")));
    }

    #[test]
    fn test_images_disabled() {
        let opts = ConvertOptions::new()
            .with_assets_dir("assets")
            .with_images(false);
        assert_eq!(opts.image_target(), None);
    }
}
