//! Persistent key-value store backed by per-key JSON files.
//!
//! Every named value lives in its own file under the data directory, so one
//! corrupt key never invalidates the others. Loads never fail: missing or
//! corrupt data is logged and replaced by a caller-supplied default. Saves
//! go through a temporary file and an atomic rename to prevent data
//! corruption on interrupted writes.

use std::{fs, io::Write, path::{Path, PathBuf}};

use log::{debug, error, trace, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{Result, TidyError};

/// A process-wide store of independently persisted, named JSON values.
#[derive(Debug, Clone)]
pub struct JsonStore {
    /// Directory holding one `<key>.json` file per key
    dir: PathBuf,
}

impl JsonStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                TidyError::DataDirError {
                    path: dir.to_path_buf(),
                }
            })?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Loads the value stored under `key`, falling back to `default` on any
    /// failure.
    ///
    /// This method never surfaces an error to the caller: a missing file
    /// yields the default silently, and unreadable or corrupt data yields
    /// the default with a logged warning.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.key_path(key);

        if !path.exists() {
            debug!("No stored value for key '{}', using default", key);
            return default;
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Failed to read stored value for key '{}' from {}: {}; using default",
                    key,
                    path.display(),
                    e
                );
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                trace!("Loaded value for key '{}'", key);
                value
            }
            Err(e) => {
                warn!(
                    "Corrupt stored value for key '{}' ({}); using default",
                    key, e
                );
                default
            }
        }
    }

    /// Serializes `value` as JSON and writes it under `key` atomically.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        debug!("Saving key '{}' to {}", key, path.display());

        let json = serde_json::to_string_pretty(value).map_err(|e| {
            error!("Failed to serialize value for key '{}': {}", key, e);
            TidyError::Serialization(e)
        })?;

        // Write to a temporary file in the same directory, then move it into
        // place so readers never observe a partial write.
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            TidyError::Io(e)
        })?;

        temp_file.write_all(json.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            TidyError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            TidyError::Io(e)
        })?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            TidyError::Io(e.error)
        })?;

        trace!("Saved key '{}'", key);
        Ok(())
    }

    /// Helper method to get the file path for a key.
    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_default_when_key_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let value: Vec<String> = store.load("notes", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store.save("theme", &true).unwrap();
        assert!(store.load("theme", false));
    }

    #[test]
    fn load_returns_default_on_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        fs::write(dir.path().join("notes.json"), "{not valid json").unwrap();
        let value: Vec<i64> = store.load("notes", vec![1, 2, 3]);
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn keys_are_stored_independently() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store.save("theme", &true).unwrap();
        fs::write(dir.path().join("folders.json"), "garbage").unwrap();

        // The corrupt folders key must not disturb the theme key.
        assert!(store.load("theme", false));
        let folders: Vec<String> = store.load("folders", Vec::new());
        assert!(folders.is_empty());
    }
}
