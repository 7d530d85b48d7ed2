//! Error types for snapshot publication.

use std::path::PathBuf;

/// Errors that can occur while rendering or writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A template failed to compile or render.
    #[error("template error: {0}")]
    Template(String),

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The state record could not be serialized.
    #[error("failed to serialize state record: {0}")]
    Json(#[from] serde_json::Error),
}
