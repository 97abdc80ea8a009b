//! Snapshot persistence
//!
//! The whole library is one JSON document holding both collections. Reads
//! are total: a missing or unreadable snapshot degrades to an empty library
//! so a corrupt file never takes the application down with it.

use crate::Library;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes the on-disk library snapshot
pub struct LibraryStore {
    path: PathBuf,
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, degrading to an empty library on any failure.
    ///
    /// Records written by older snapshot versions may lack a sort key;
    /// those are backfilled from the record name.
    pub fn load(&self) -> Library {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}, starting empty", self.path.display());
                return Library::default();
            }
            Err(err) => {
                tracing::warn!("Failed to read snapshot {}: {}", self.path.display(), err);
                return Library::default();
            }
        };

        let mut library: Library = match serde_json::from_str(&text) {
            Ok(library) => library,
            Err(err) => {
                tracing::warn!(
                    "Snapshot {} is not valid JSON ({}), starting empty",
                    self.path.display(),
                    err
                );
                return Library::default();
            }
        };

        for record in library.active.iter_mut().chain(library.completed.iter_mut()) {
            if record.sort_key.is_empty() {
                record.sort_key = record.name.clone();
            }
        }

        library
    }

    /// Serialize both collections to disk.
    ///
    /// Import and enrichment callers log a failure and keep going; the
    /// in-memory library stays authoritative for the running process.
    pub fn save(&self, library: &Library) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(library)?;
        fs::write(&self.path, contents)?;
        tracing::debug!(
            "Saved snapshot to {} ({} active, {} completed)",
            self.path.display(),
            library.active.len(),
            library.completed.len()
        );
        Ok(())
    }
}
