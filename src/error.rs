//! Error types for the log tailer library.

use thiserror::Error;

/// The main error type for log tailer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The target file is missing or unreadable.
    ///
    /// Raised when a [`crate::Tailer`] is constructed and again at
    /// `start()` if the condition recurs. Fatal to that call; never
    /// retried internally.
    #[error("cannot access file {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors during a poll cycle's read pass.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding errors when reading file content.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Build a [`Error::FileAccess`] for the given path.
    pub(crate) fn file_access(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.display().to_string(),
            source,
        }
    }
}

/// A convenient Result type for log tailer operations.
pub type Result<T> = std::result::Result<T, Error>;
