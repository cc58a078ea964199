//! Image extraction and paragraph image references.
//!
//! Images are copied out of the package into the assets directory as
//! `image_001.png`, `image_002.jpeg`, ... in relationship order, and each
//! relationship ID is mapped to its new file name.
//!
//! Resolution is deliberately lenient: an inline object whose relationship
//! ID is unknown, or which carries no ID at all, is pointed at the *first*
//! extracted image. In documents with several unmapped objects this can
//! attribute the wrong picture to a paragraph.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::container::{OoxmlContainer, Relationship, DOCUMENT_RELS};
use crate::error::{Error, Result};
use crate::model::{InlineObject, Paragraph};

/// Path prefix used in every emitted image link.
pub const IMAGE_LINK_PREFIX: &str = "./assets/";

/// Folder that relationship targets are relative to.
const PART_FOLDER: &str = "word/";

/// Folder holding embedded media.
const MEDIA_FOLDER: &str = "word/media/";

/// Extensions picked up when scanning the media folder directly.
const MEDIA_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "svg"];

/// Markdown reference for an extracted image file.
pub fn image_link(filename: &str) -> String {
    format!("![Image]({}{})", IMAGE_LINK_PREFIX, filename)
}

/// Images extracted for one document and their relationship mapping.
///
/// Built once per conversion and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    by_id: HashMap<String, String>,
    extracted: Vec<String>,
}

impl ImageMap {
    /// An empty map: no images, every lookup yields nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one image was extracted.
    pub fn has_images(&self) -> bool {
        !self.extracted.is_empty()
    }

    /// Extracted file names in extraction order.
    pub fn filenames(&self) -> &[String] {
        &self.extracted
    }

    /// File name mapped to a relationship ID.
    pub fn filename_for(&self, rel_id: &str) -> Option<&str> {
        self.by_id.get(rel_id).map(String::as_str)
    }

    /// Relationship IDs with their file names, sorted by file name.
    pub fn mappings(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .by_id
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)));
        pairs
    }

    /// Markdown image reference for a relationship ID.
    ///
    /// Unknown or absent IDs fall back to the first extracted image; with no
    /// images at all the result is empty.
    pub fn reference_for(&self, rel_id: Option<&str>) -> String {
        if let Some(name) = rel_id.and_then(|id| self.filename_for(id)) {
            return image_link(name);
        }
        match self.extracted.first() {
            Some(first) => image_link(first),
            None => String::new(),
        }
    }

    /// Record an extracted file, optionally under a relationship ID.
    pub fn record(&mut self, rel_id: Option<&str>, filename: impl Into<String>) {
        let filename = filename.into();
        if let Some(id) = rel_id {
            self.by_id.insert(id.to_string(), filename.clone());
        }
        self.extracted.push(filename);
    }
}

/// Copies embedded images out of a document package.
#[derive(Debug)]
pub struct ImageExtractor {
    assets_dir: Option<PathBuf>,
    counter: usize,
    map: ImageMap,
}

impl ImageExtractor {
    /// Create an extractor writing into `assets_dir`; `None` disables
    /// extraction.
    pub fn new(assets_dir: Option<impl Into<PathBuf>>) -> Self {
        Self {
            assets_dir: assets_dir.map(Into::into),
            counter: 0,
            map: ImageMap::new(),
        }
    }

    /// Extract images from raw package bytes.
    ///
    /// Never fails: an unreadable package or unwritable asset is logged and
    /// leaves the affected images out of the map.
    pub fn extract(mut self, package: &[u8]) -> ImageMap {
        let Some(dir) = self.assets_dir.clone() else {
            return self.map;
        };

        let container = match OoxmlContainer::from_bytes(package.to_vec()) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Error extracting images: {}", e);
                return self.map;
            }
        };

        if let Err(e) = fs::create_dir_all(&dir) {
            log::warn!("Cannot create assets directory {}: {}", dir.display(), e);
            return self.map;
        }

        match container.read_relationships(DOCUMENT_RELS) {
            Ok(rels) => {
                for rel in rels.iter().filter(|r| r.is_image()) {
                    self.extract_relationship(&container, &dir, rel);
                }
            }
            Err(e) => {
                log::warn!(
                    "Unable to parse image relationships, scanning media folder instead: {}",
                    e
                );
                self.extract_media_folder(&container, &dir);
            }
        }

        log::info!("Extracted {} images", self.map.filenames().len());
        self.map
    }

    fn extract_relationship(
        &mut self,
        container: &OoxmlContainer,
        dir: &Path,
        rel: &Relationship,
    ) {
        if rel.external {
            log::debug!("Skipping external image {} ({})", rel.target, rel.id);
            return;
        }
        let Some(part) = media_part_for(&rel.target) else {
            return;
        };
        if !container.exists(&part) {
            log::debug!("Image target {} ({}) not in package", part, rel.id);
            return;
        }
        if let Some(name) = self.copy_part(container, dir, &part) {
            log::info!("Extracted image: {} (ID: {})", name, rel.id);
            self.map.record(Some(&rel.id), name);
        }
    }

    fn extract_media_folder(&mut self, container: &OoxmlContainer, dir: &Path) {
        for part in container.list_files_with_prefix(MEDIA_FOLDER) {
            let is_image = extension_of(&part)
                .is_some_and(|ext| MEDIA_EXTENSIONS.contains(&ext.as_str()));
            if !is_image {
                continue;
            }
            if let Some(name) = self.copy_part(container, dir, &part) {
                log::info!("Extracted image: {}", name);
                self.map.record(None, name);
            }
        }
    }

    /// Copy one part under the next number. The number is taken before
    /// writing, so a failed image leaves a gap instead of blocking the name.
    fn copy_part(
        &mut self,
        container: &OoxmlContainer,
        dir: &Path,
        part: &str,
    ) -> Option<String> {
        self.counter += 1;
        let name = next_filename(self.counter, part);
        match write_part(container, part, &dir.join(&name)) {
            Ok(()) => Some(name),
            Err(e) => {
                log::warn!("Skipping image {}: {}", part, e);
                None
            }
        }
    }
}

fn write_part(container: &OoxmlContainer, part: &str, dest: &Path) -> Result<()> {
    let data = container.read_binary(part)?;
    fs::write(dest, data).map_err(|source| Error::AssetWrite {
        path: dest.to_path_buf(),
        source,
    })
}

/// Resolve a relationship target to a package path inside the media folder.
fn media_part_for(target: &str) -> Option<String> {
    let path = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}{}", PART_FOLDER, target),
    };
    path.starts_with(MEDIA_FOLDER).then_some(path)
}

fn extension_of(part: &str) -> Option<String> {
    Path::new(part)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn next_filename(counter: usize, part: &str) -> String {
    match extension_of(part) {
        Some(ext) => format!("image_{:03}.{}", counter, ext),
        None => format!("image_{:03}", counter),
    }
}

/// Image references for one paragraph, newline-joined.
///
/// Drawings resolve each embedded image by relationship ID; a drawing with
/// no ID, and every legacy picture, takes the generic reference. When
/// nothing resolved but a run still holds an inline object, one generic
/// reference is emitted.
pub fn paragraph_image_references(para: &Paragraph, images: &ImageMap) -> String {
    let mut found: Vec<String> = Vec::new();

    let drawings = para.inline_objects.iter().filter_map(|o| match o {
        InlineObject::Drawing { embed_ids } => Some(embed_ids),
        InlineObject::Picture => None,
    });
    for embed_ids in drawings {
        for id in embed_ids {
            let reference = images.reference_for(Some(id));
            if !reference.is_empty() {
                log::debug!("Image link for relationship {}", id);
                found.push(reference);
            }
        }
        if embed_ids.is_empty() && images.has_images() {
            log::debug!("Drawing without relationship ID, using fallback image link");
            found.push(images.reference_for(None));
        }
    }

    let pictures = para
        .inline_objects
        .iter()
        .filter(|o| matches!(o, InlineObject::Picture))
        .count();
    if images.has_images() {
        for _ in 0..pictures {
            found.push(images.reference_for(None));
        }
    }

    if found.is_empty() && images.has_images() && para.has_run_inline_objects() {
        found.push(images.reference_for(None));
    }

    found.join("\n")
}
