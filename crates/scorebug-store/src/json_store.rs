//! JSON file persistence for the match record.
//!
//! The state file is a flat JSON object. The engine owns the keys of
//! [`PersistedMatch`]; any other keys already in the file (layout or theme
//! settings edited by hand) are kept as they are on every save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use scorebug_core::atomic::atomic_write;
use scorebug_core::session::{PersistError, PersistenceStore};
use scorebug_types::PersistedMatch;

use crate::error::StoreError;

/// Persistence store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    retained: Map<String, Value>,
}

impl JsonFileStore {
    /// A store reading and writing `path`. Nothing is touched until
    /// [`PersistenceStore::load`] or [`PersistenceStore::save`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retained: Map::new(),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file. `Ok(None)` when it does not exist.
    pub fn read(&mut self) -> Result<Option<PersistedMatch>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let value: Value = serde_json::from_str(&raw)?;
        let record: PersistedMatch = serde_json::from_value(value.clone())?;
        if let Value::Object(fields) = value {
            self.retained = fields;
        }
        Ok(Some(record))
    }

    /// Merge `record` over the retained keys and replace the file.
    pub fn write(&mut self, record: &PersistedMatch) -> Result<(), StoreError> {
        let mut document = self.retained.clone();
        if let Value::Object(fields) = serde_json::to_value(record)? {
            document.extend(fields);
        }
        let bytes = serde_json::to_vec_pretty(&Value::Object(document.clone()))?;
        atomic_write(&self.path, &bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.retained = document;
        debug!(path = %self.path.display(), "Match state persisted");
        Ok(())
    }
}

impl PersistenceStore for JsonFileStore {
    /// Load the record. A missing file is created with the defaults so the
    /// operator has something to edit, and reported as `Ok(None)`.
    fn load(&mut self) -> Result<Option<PersistedMatch>, PersistError> {
        match self.read()? {
            Some(record) => Ok(Some(record)),
            None => {
                info!(path = %self.path.display(), "State file not found, writing defaults");
                self.write(&PersistedMatch::default())?;
                Ok(None)
            }
        }
    }

    fn save(&mut self, record: &PersistedMatch) -> Result<(), PersistError> {
        self.write(record).map_err(PersistError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scorebug-store-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = scratch("missing");
        let path = dir.join("config.json");
        let mut store = JsonFileStore::new(&path);

        assert!(matches!(store.load(), Ok(None)));
        assert!(path.exists());

        let reread = JsonFileStore::new(&path).read().ok().flatten();
        assert_eq!(reread, Some(PersistedMatch::default()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_an_error_and_left_alone() {
        let dir = scratch("malformed");
        let path = dir.join("config.json");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::write(&path, "{ not json");

        let mut store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(fs::read_to_string(&path).ok().as_deref(), Some("{ not json"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_keys_survive_a_save() {
        let dir = scratch("retained");
        let path = dir.join("config.json");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::write(
            &path,
            r#"{"font":"Arial","scoreHome":2,"teamHome":"Lions","running":false}"#,
        );

        let mut store = JsonFileStore::new(&path);
        let loaded = store.load().ok().flatten().unwrap_or_default();
        assert_eq!(loaded.score_home, 2);
        assert_eq!(loaded.team_home, "Lions");
        assert_eq!(loaded.team_away, "Team B");

        let updated = PersistedMatch {
            score_home: 3,
            ..loaded
        };
        assert!(store.save(&updated).is_ok());

        let raw = fs::read_to_string(&path).unwrap_or_default();
        let json: Value = serde_json::from_str(&raw).unwrap_or_default();
        assert_eq!(json.get("font").and_then(Value::as_str), Some("Arial"));
        assert_eq!(json.get("scoreHome").and_then(Value::as_u64), Some(3));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn clock_fields_round_trip_exactly() {
        let dir = scratch("clock");
        let path = dir.join("config.json");
        let record = PersistedMatch {
            running: true,
            start_epoch_ms: 1_700_000_123_456,
            elapsed_ms: 754_321,
            ..PersistedMatch::default()
        };

        assert!(JsonFileStore::new(&path).save(&record).is_ok());
        let loaded = JsonFileStore::new(&path).load().ok().flatten();
        assert_eq!(loaded, Some(record));

        let _ = fs::remove_dir_all(&dir);
    }
}
