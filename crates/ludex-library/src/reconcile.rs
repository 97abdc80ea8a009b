//! Reconciliation engine
//!
//! Owns the in-memory library and is the only type that mutates it. Scanned
//! candidates are merged into existing records field by field; scanner data
//! is considered fresher and wins when present, with the one exception that
//! a re-scan which found no executable never clears a user-assigned one.

use crate::{GameCandidate, GameRecord, Library, LibraryError, Platform, synthetic_id};

/// Single serialized mutation surface over a [`Library`]
pub struct Reconciler {
    library: Library,
}

impl Reconciler {
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn into_library(self) -> Library {
        self.library
    }

    /// Merge a scanned candidate into the library.
    ///
    /// Returns `true` when a new record was created. New records always
    /// land in the active collection; completion state is a user decision
    /// and never set by a scan.
    pub fn upsert(&mut self, candidate: GameCandidate) -> bool {
        if let Some(existing) = self.find_mut(candidate.id) {
            if !candidate.name.is_empty() {
                existing.name = candidate.name.clone();
            }
            if candidate.cover.is_some() {
                existing.cover = candidate.cover;
            }
            if candidate.cover_url.is_some() {
                existing.cover_url = candidate.cover_url;
            }
            // A scan that found nothing must not clear a manual assignment.
            if candidate.executable.is_some() {
                existing.executable = candidate.executable;
            }
            if candidate.platform != Platform::None {
                existing.platform = candidate.platform;
            }
            if candidate.steam_app_id.is_some() {
                existing.steam_app_id = candidate.steam_app_id;
            }
            if candidate.epic_app_name.is_some() {
                existing.epic_app_name = candidate.epic_app_name;
            }
            if candidate.gog_game_id.is_some() {
                existing.gog_game_id = candidate.gog_game_id;
            }
            if candidate.install_dir.is_some() {
                existing.install_dir = candidate.install_dir;
            }
            existing.sort_key = match candidate.sort_key {
                Some(key) if !key.is_empty() => key,
                _ if !existing.sort_key.is_empty() => existing.sort_key.clone(),
                _ if !candidate.name.is_empty() => candidate.name,
                _ => existing.name.clone(),
            };
            return false;
        }

        let sort_key = candidate
            .sort_key
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| candidate.name.clone());
        self.library.active.push(GameRecord {
            id: candidate.id,
            name: candidate.name,
            cover: candidate.cover,
            cover_url: candidate.cover_url,
            executable: candidate.executable,
            platform: candidate.platform,
            steam_app_id: candidate.steam_app_id,
            epic_app_name: candidate.epic_app_name,
            gog_game_id: candidate.gog_game_id,
            install_dir: candidate.install_dir,
            sort_key,
            is_platinum: false,
        });
        true
    }

    /// Add a title the scanners cannot see, keyed off its executable path.
    pub fn add_manual(&mut self, name: &str, executable: Option<String>, platform: Platform) -> i64 {
        let key = executable.as_deref().unwrap_or(name);
        let id = synthetic_id(platform, key);
        self.upsert(GameCandidate {
            id,
            name: name.to_string(),
            executable,
            platform,
            ..GameCandidate::default()
        });
        id
    }

    /// Move a record from active to completed. No-op when already there.
    pub fn complete(&mut self, id: i64) -> Result<(), LibraryError> {
        if let Some(pos) = self.library.active.iter().position(|g| g.id == id) {
            let record = self.library.active.remove(pos);
            self.library.completed.push(record);
            return Ok(());
        }
        if self.library.completed.iter().any(|g| g.id == id) {
            return Ok(());
        }
        Err(LibraryError::GameNotFound(id))
    }

    /// Move a record back from completed to active. No-op when already there.
    pub fn restore(&mut self, id: i64) -> Result<(), LibraryError> {
        if let Some(pos) = self.library.completed.iter().position(|g| g.id == id) {
            let record = self.library.completed.remove(pos);
            self.library.active.push(record);
            return Ok(());
        }
        if self.library.active.iter().any(|g| g.id == id) {
            return Ok(());
        }
        Err(LibraryError::GameNotFound(id))
    }

    /// Remove a record from whichever collection holds it.
    pub fn remove(&mut self, id: i64) -> Result<(), LibraryError> {
        if let Some(pos) = self.library.active.iter().position(|g| g.id == id) {
            self.library.active.remove(pos);
            return Ok(());
        }
        if let Some(pos) = self.library.completed.iter().position(|g| g.id == id) {
            self.library.completed.remove(pos);
            return Ok(());
        }
        Err(LibraryError::GameNotFound(id))
    }

    /// Manual executable assignment; unlike a scan merge, this may clear.
    pub fn set_executable(
        &mut self,
        id: i64,
        executable: Option<String>,
    ) -> Result<(), LibraryError> {
        let record = self.find_mut(id).ok_or(LibraryError::GameNotFound(id))?;
        record.executable = executable;
        Ok(())
    }

    pub fn set_platinum(&mut self, id: i64, platinum: bool) -> Result<(), LibraryError> {
        let record = self.find_mut(id).ok_or(LibraryError::GameNotFound(id))?;
        record.is_platinum = platinum;
        Ok(())
    }

    /// An empty key falls back to the record name; sort keys are never null.
    pub fn set_sort_key(&mut self, id: i64, sort_key: String) -> Result<(), LibraryError> {
        let record = self.find_mut(id).ok_or(LibraryError::GameNotFound(id))?;
        record.sort_key = if sort_key.is_empty() {
            record.name.clone()
        } else {
            sort_key
        };
        Ok(())
    }

    /// Enrichment write path: attach artwork found by the cover matcher.
    pub fn set_cover(
        &mut self,
        id: i64,
        cover: String,
        cover_url: String,
    ) -> Result<(), LibraryError> {
        let record = self.find_mut(id).ok_or(LibraryError::GameNotFound(id))?;
        record.cover = Some(cover);
        record.cover_url = Some(cover_url);
        Ok(())
    }

    fn find_mut(&mut self, id: i64) -> Option<&mut GameRecord> {
        self.library
            .active
            .iter_mut()
            .chain(self.library.completed.iter_mut())
            .find(|g| g.id == id)
    }
}
