// Error types for book assembly.
//
// A missing prerequisite (the cover, the single content PDF, or any per-key
// chart PDF) is fatal and names the path it expected, so the user knows
// which earlier step to rerun.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BookError>;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Missing {what}: {path}")]
    MissingInput { what: &'static str, path: PathBuf },

    /// A section PDF that loaded but has no pages to bookmark.
    #[error("{what} has no pages: {path}")]
    EmptyInput { what: &'static str, path: PathBuf },

    #[error("No key PDFs found in {0}")]
    NoKeyPdfs(PathBuf),

    #[error("Failed to read PDF {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to write PDF {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// A merged part has no pages to point a bookmark at.
    #[error("Bookmark {title:?} points at page {index} but the book has {pages} pages")]
    BookmarkOutOfRange {
        title: String,
        index: usize,
        pages: usize,
    },

    #[error("Table of contents page count did not settle after {0} passes")]
    TocDidNotSettle(usize),

    #[error("Failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BookError::Io {
            path: path.into(),
            source,
        }
    }
}
