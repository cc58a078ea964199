//! Format detection for Word documents.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound file magic, used by legacy binary `.doc` files.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Detected Word document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Office Open XML word-processing document (.docx)
    Docx,
    /// Legacy binary Word document (.doc); needs pre-conversion
    LegacyDoc,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Docx => "docx",
            FormatType::LegacyDoc => "doc",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Docx => "Word Document",
            FormatType::LegacyDoc => "Legacy Word 97-2003 Document",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type from a file path.
///
/// # Example
///
/// ```no_run
/// use docmd::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.docx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), docmd::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut magic = [0u8; 8];
    let read = reader.read(&mut magic)?;
    if is_ole_file(&magic[..read]) {
        return Ok(FormatType::LegacyDoc);
    }
    if !is_zip_file(&magic[..read]) {
        return Err(Error::UnknownFormat);
    }
    reader.rewind()?;
    detect_format_from_reader(reader)
}

/// Detect the format type from a byte slice.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if is_ole_file(data) {
        return Ok(FormatType::LegacyDoc);
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_format_from_reader(std::io::Cursor::new(data))
}

/// Detect the format type from a ZIP reader.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    if content_types.is_some_and(|ct| ct.contains(DOCX_CONTENT_TYPE)) {
        return Ok(FormatType::Docx);
    }

    // Fallback: a word/ folder is enough
    if archive.file_names().any(|n| n.starts_with("word/")) {
        Ok(FormatType::Docx)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Check if data starts with OLE2 compound-file magic bytes.
pub fn is_ole_file(data: &[u8]) -> bool {
    data.len() >= 8 && data[..8] == OLE_MAGIC
}
