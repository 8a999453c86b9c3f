//! Error types for bookmark substitution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Container elements a bookmark may not sit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Hyperlink,
    SimpleField,
    SmartTag,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::Hyperlink => "hyperlink",
            Container::SimpleField => "simple field",
            Container::SmartTag => "smart tag",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while reading a template or substituting bookmarks.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Missing package part: {0}")]
    MissingPart(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Template contains no bookmarks")]
    NoBookmarks,

    #[error("Bookmark not found: {0}")]
    MarkerNotFound(String),

    #[error("Bookmark {0} is inside a math formula")]
    MathFormulaTarget(String),

    #[error("Document contains tracked revisions")]
    TrackedRevisionsPresent,

    #[error("Document contains content controls")]
    StructuredContentPresent,

    #[error("Bookmark {name} is inside a {container}")]
    UnsupportedContainer { name: String, container: Container },

    #[error("Bookmark {0} starts and ends at different levels")]
    CrossLevelMarker(String),

    #[error("Bookmark integrity error: {0}")]
    MarkerIntegrity(String),

    #[error("Working copy path is the template itself: {0}")]
    WorkingCopyIsTemplate(PathBuf),

    #[error("Relationship id already in use: {0}")]
    DuplicateRelationship(String),
}

pub type Result<T> = std::result::Result<T, Error>;
