//! Errors raised by the organize engine.
//!
//! The engine reports through [`OrganizeError`]; the CLI and the collaborators
//! (config, backup) use `anyhow` on top of it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Path is neither an existing file nor an existing directory.
    #[error("Invalid path selected.")]
    InvalidTarget { path: PathBuf },

    /// Single-file target without an extension.
    #[error("File has no extension, cannot be organized: {}", path.display())]
    UnsupportedFile { path: PathBuf },

    /// The move primitive failed for one file; the whole run stops here.
    #[error("Failed to move {file}: {source}")]
    MoveFailed {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("An error occurred: {0}")]
    Unexpected(String),
}

impl OrganizeError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
