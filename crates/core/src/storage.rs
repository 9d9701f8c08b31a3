//! Keyed string storage.
//!
//! The gallery is persisted as one keyed entry. [`FileStorage`] keeps each key
//! in its own JSON file under the per-user data directory; [`MemoryStorage`]
//! keeps everything in memory and can be told to fail writes.

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A persistence medium holding string values under string keys.
pub trait Storage: Send {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores key `k` as `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', '\\'], "_");
        self.dir.join(format!("{}.json", safe_key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Writes through a temp file and renames it into place.
    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::write(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");

        if let Err(e) = fs::write(&temp, value) {
            cleanup_temp_file(&temp, &e);
            return Err(AppError::write(format!("{}: {}", temp.display(), e)));
        }

        if let Err(e) = fs::rename(&temp, &path) {
            cleanup_temp_file(&temp, &e);
            return Err(AppError::write(format!("{}: {}", path.display(), e)));
        }

        tracing::debug!(event = "core.storage.written", path = %path.display(), bytes = value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file)
        && cleanup_err.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(
            event = "core.storage.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err
        );
    }
}

/// In-memory storage, used in tests and when no data directory is wanted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }

    /// Makes every subsequent write fail, simulating a full or read-only medium.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::write("storage quota exceeded"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
