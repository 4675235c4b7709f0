//! Profile persistence with file locking.
//!
//! The engine itself never touches disk. This store is what the CLI uses to
//! remember a cycle profile and pregnancy setup between runs.

use crate::{CycleProfile, Error, PregnancySetup, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the store inside the data directory
pub const PROFILE_FILE: &str = "profiles.json";

/// Saved inputs for the projectors
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileStore {
    #[serde(default)]
    pub cycle: Option<CycleProfile>,
    #[serde(default)]
    pub pregnancy: Option<PregnancySetup>,
}

impl ProfileStore {
    /// Load the store from a file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No profile file found, starting empty");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open profile file {:?}: {}. Starting empty.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock profile file {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read profile file {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<ProfileStore>(&contents) {
            Ok(store) => {
                tracing::debug!("Loaded profiles from {:?}", path);
                Ok(store)
            }
            Err(e) => {
                tracing::warn!("Failed to parse profile file {:?}: {}. Starting empty.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the store while holding the exclusive writer lock
    pub fn save(&self, path: &Path) -> Result<()> {
        let _lock = WriterLock::acquire(path)?;
        self.write_atomic(path)
    }

    /// Load, modify and save back under one exclusive writer lock
    ///
    /// Concurrent updates to different fields are serialized, so neither
    /// change is lost.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut ProfileStore) -> Result<()>,
    {
        let _lock = WriterLock::acquire(path)?;
        let mut store = Self::load(path)?;
        f(&mut store)?;
        store.write_atomic(path)?;
        Ok(store)
    }

    /// Write to a temp file in the same directory, sync it, then rename it
    /// over the original. Callers must hold the [`WriterLock`].
    fn write_atomic(&self, path: &Path) -> Result<()> {
        let parent = store_dir(path)?;
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profiles to {:?}", path);
        Ok(())
    }
}

/// Exclusive lock on the `<store>.lock` sidecar, released on drop.
///
/// The store file itself is replaced by rename on every save, so it cannot
/// carry a lock that outlives one write.
struct WriterLock {
    file: File,
}

impl WriterLock {
    fn acquire(path: &Path) -> Result<Self> {
        store_dir(path)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Sidecar lock file next to the store
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

/// Parent directory of the store, created if missing
fn store_dir(path: &Path) -> Result<&Path> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "profile path missing parent")
    })?;
    std::fs::create_dir_all(parent)?;
    Ok(parent)
}
