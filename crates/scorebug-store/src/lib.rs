//! File-backed collaborators for the Scorebug engine.
//!
//! - [`JsonFileStore`] persists the match record between runs.
//! - [`FileRoster`] is the team and player directory read from YAML.

pub mod error;
pub mod json_store;
pub mod roster_file;

pub use error::StoreError;
pub use json_store::JsonFileStore;
pub use roster_file::FileRoster;
