//! Error types for the docmd library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document package is corrupt or unreadable.
    #[error("Archive read error: {0}")]
    ArchiveRead(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The relationships descriptor exists but could not be parsed.
    #[error("Relationship parse error: {0}")]
    RelationshipParse(String),

    /// A required document part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// An extracted asset could not be written.
    #[error("Failed to write asset {}: {source}", path.display())]
    AssetWrite {
        /// Destination path of the asset
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: io::Error,
    },

    /// Error serializing the document tree.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveRead(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
