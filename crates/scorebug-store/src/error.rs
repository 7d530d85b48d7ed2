//! Error types for the file-backed collaborators.

use std::path::PathBuf;

use scorebug_core::session::PersistError;

/// Errors that can occur reading or writing store files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The persisted record is not valid JSON for its schema.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The team directory is not valid YAML for its schema.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yml::Error),
}

impl From<StoreError> for PersistError {
    fn from(e: StoreError) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}
