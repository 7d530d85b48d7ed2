//! Atomic file replacement shared by the publisher and the store.
//!
//! Content is written to a sibling temp file, synced, then renamed over the
//! destination, so a polling reader sees either the old or the new file and
//! never a partial one. The temp name appends `.tmp` to the full file name
//! (`estado.json.tmp`) so two outputs in one directory never share it.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically replace `path` with `content`, creating parent directories.
///
/// # Errors
///
/// Returns the underlying I/O error; the temp file is removed on failure.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = write_and_rename(&temp_path, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_rename(temp_path: &Path, path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("output"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scorebug-atomic-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn write_creates_parents_and_replaces() {
        let dir = scratch_dir("replace");
        let path = dir.join("nested").join("estado.json");

        assert!(atomic_write(&path, b"{\"a\":1}").is_ok());
        assert!(atomic_write(&path, b"{\"a\":2}").is_ok());
        assert_eq!(fs::read_to_string(&path).ok().as_deref(), Some("{\"a\":2}"));
        assert!(!dir.join("nested").join("estado.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn temp_names_do_not_collide_across_extensions() {
        let html = temp_path_for(Path::new("TXT/salida.html"));
        let json = temp_path_for(Path::new("TXT/salida.json"));
        assert_ne!(html, json);
        assert_eq!(html, PathBuf::from("TXT/salida.html.tmp"));
    }
}
