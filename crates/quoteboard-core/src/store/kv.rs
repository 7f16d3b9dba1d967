//! String-keyed storage backends.
//!
//! `FileStore` is the durable backend: one JSON file per key inside a data
//! directory, written with a write-to-temp-then-rename pattern so a crash
//! mid-write never leaves a truncated slot behind. `MemoryStore` backs the
//! session cache when no session directory is configured, and the tests.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::QuoteError;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteError>;
    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError>;
    fn remove(&self, key: &str) -> Result<(), QuoteError>;
}

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, QuoteError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| QuoteError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            // Missing slot is not an error
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuoteError::io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError> {
        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");

        fs::write(&temp, value).map_err(|e| QuoteError::io(&temp, e))?;
        fs::rename(&temp, &path).map_err(|e| QuoteError::io(&path, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), QuoteError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuoteError::io(path, e)),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteError> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError> {
        self.slots.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), QuoteError> {
        self.slots.write().remove(key);
        Ok(())
    }
}
