//! ZIP container abstraction for Word document packages.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Path of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Path of the main document's relationships descriptor.
pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the owning part's folder
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

impl Relationship {
    /// Whether this relationship points at an image resource.
    pub fn is_image(&self) -> bool {
        self.rel_type.to_lowercase().contains("image")
    }
}

/// Relationships parsed from a .rels file, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate relationships in the order they were declared.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.entries.push(rel);
    }

    /// Parse the contents of a .rels descriptor.
    ///
    /// Fails with [`Error::RelationshipParse`] when the XML is malformed or
    /// has no `Relationships` root.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut saw_root = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.name().local_name().as_ref() {
                        b"Relationships" => saw_root = true,
                        b"Relationship" if saw_root => {
                            let mut id = String::new();
                            let mut rel_type = String::new();
                            let mut target = String::new();
                            let mut external = false;

                            for attr in e.attributes().flatten() {
                                let value = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| {
                                        String::from_utf8_lossy(&attr.value).into_owned()
                                    });
                                match attr.key.as_ref() {
                                    b"Id" => id = value,
                                    b"Type" => rel_type = value,
                                    b"Target" => target = value,
                                    b"TargetMode" => {
                                        external = value.eq_ignore_ascii_case("external")
                                    }
                                    _ => {}
                                }
                            }

                            if !id.is_empty() {
                                rels.add(Relationship {
                                    id,
                                    rel_type,
                                    target,
                                    external,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::RelationshipParse(e.to_string())),
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::RelationshipParse(
                "missing <Relationships> root element".to_string(),
            ));
        }

        Ok(rels)
    }
}

/// Decode XML part bytes, honouring a UTF-8 or UTF-16 byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {}", e))),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    let text = char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("invalid UTF-16: {}", e)))?;

    // The declaration still names UTF-16 after transcoding.
    Ok(text
        .replacen("encoding=\"UTF-16\"", "encoding=\"UTF-8\"", 1)
        .replacen("encoding=\"utf-16\"", "encoding=\"UTF-8\"", 1))
}

/// Word document package backed by an in-memory ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docmd::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("document.docx")?;
    /// # Ok::<(), docmd::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path.as_ref())?);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::ArchiveRead(format!("{}: {}", path, e)))?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all entries in archive order.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        let files = archive.file_names().map(String::from).collect();
        files
    }

    /// List entries matching a prefix, in archive order.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.list_files()
            .into_iter()
            .filter(|n| n.starts_with(prefix))
            .collect()
    }

    /// Read and parse the relationships descriptor at `rels_path`.
    ///
    /// A missing descriptor is [`Error::MissingComponent`]; a malformed one is
    /// [`Error::RelationshipParse`].
    pub fn read_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let xml = self.read_xml(rels_path)?;
        Relationships::parse(&xml)
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}
