//! Key-value persistence for settings and progression
//!
//! Values are JSON strings stored under a short key. The browser build would
//! back this with LocalStorage; native builds use one file per key.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Minimal string store keyed by name
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-memory store (tests, headless runs without a save directory)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on the first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Temp file first, then rename over the old value
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| PersistError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }
}

/// Read and decode a value; `Ok(None)` when the key is absent
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, PersistError> {
    match storage.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// Load a value, falling back to its default on absence or any error
pub fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match load_json(storage, key) {
        Ok(Some(value)) => {
            log::info!("Loaded {key}");
            value
        }
        Ok(None) => {
            log::info!("No saved {key}, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("Discarding saved {key}: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        level: u32,
        name: String,
    }

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        let sample = Sample {
            level: 7,
            name: "t-cell".into(),
        };
        save_json(&mut storage, "sample", &sample).unwrap();
        assert_eq!(storage.len(), 1);
        assert_eq!(load_json::<Sample>(&storage, "sample").unwrap(), Some(sample));

        storage.remove("sample").unwrap();
        assert!(storage.is_empty());
        assert_eq!(load_json::<Sample>(&storage, "sample").unwrap(), None);
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set("sample", "{ not json").unwrap();
        assert!(matches!(
            load_json::<Sample>(&storage, "sample"),
            Err(PersistError::Json(_))
        ));
        assert_eq!(load_or_default::<Sample>(&storage, "sample"), Sample::default());
    }

    #[test]
    fn test_file_storage() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("saves");
        let mut storage = FileStorage::new(&dir);
        assert_eq!(storage.dir(), dir.as_path());

        assert_eq!(storage.get("progress").unwrap(), None);
        storage.set("progress", "{\"level\":3,\"name\":\"b\"}").unwrap();
        assert!(dir.join("progress.json").exists());
        assert_eq!(
            load_json::<Sample>(&storage, "progress").unwrap(),
            Some(Sample {
                level: 3,
                name: "b".into()
            })
        );

        storage.remove("progress").unwrap();
        storage.remove("progress").unwrap();
        assert_eq!(storage.get("progress").unwrap(), None);
        assert!(!dir.join("progress.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_paths() {
        let tmp = tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path());
        assert!(matches!(
            storage.set("../escape", "{}"),
            Err(PersistError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(PersistError::InvalidKey(_))));
        assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
    }
}
