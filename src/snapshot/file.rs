//! File-backed snapshot persistence
//!
//! Writes go to `<path>.tmp` first and are renamed over the real file,
//! so the snapshot on disk is always either the old or the new version.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{GroceryError, Result};

use super::{Persistence, Snapshot};

/// Snapshot stored as a JSON file
#[derive(Debug)]
pub struct FilePersistence {
    path: PathBuf,
    sync_strategy: SyncStrategy,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>, sync_strategy: SyncStrategy) -> Self {
        Self {
            path: path.into(),
            sync_strategy,
        }
    }

    /// Path of the live snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path used for the in-progress write
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> Result<Option<Snapshot>> {
        // Leftover from a persist interrupted before its rename
        let temp = self.temp_path();
        if temp.exists() {
            tracing::debug!(path = %temp.display(), "Removing stale snapshot temp file");
            if let Err(e) = fs::remove_file(&temp) {
                tracing::warn!(
                    path = %temp.display(),
                    error = %e,
                    "Failed to remove stale snapshot temp file"
                );
            }
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(GroceryError::Io(e)),
        };

        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| GroceryError::SnapshotCorrupt(e.to_string()))?;
        Ok(Some(snapshot))
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(&bytes)?;
            if self.sync_strategy == SyncStrategy::EveryWrite {
                file.sync_all()?;
            }
        }

        // Atomic replace (rename is atomic on POSIX)
        fs::rename(&temp, &self.path).map_err(|e| {
            GroceryError::Persistence(format!(
                "rename {} -> {}: {}",
                temp.display(),
                self.path.display(),
                e
            ))
        })?;

        // Make the rename itself durable
        if self.sync_strategy == SyncStrategy::EveryWrite {
            sync_dir(parent.unwrap_or_else(|| Path::new(".")))?;
        }

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

// Directories cannot be opened as files on other platforms
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
