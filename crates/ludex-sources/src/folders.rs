//! GOG-style and unmanaged folder sources
//!
//! One immediate subdirectory of the configured root is one candidate
//! title, named after the directory. Neither variant has a platform id, so
//! identity is synthesized from the platform-prefixed path. The strict
//! unmanaged variant skips folders with no resolvable executable so random
//! non-game directories do not pollute the library.

use crate::executable::find_primary_executable;
use ludex_library::{GameCandidate, GameSource, Platform, SourceError, SourceScan, synthetic_id};
use std::fs;
use std::path::PathBuf;

/// Scans immediate subdirectories of a root as installed titles
pub struct FolderSource {
    name: &'static str,
    root: PathBuf,
    platform: Platform,
    require_executable: bool,
    scan_depth: usize,
}

impl FolderSource {
    /// GOG-style variant: imports every subdirectory.
    pub fn gog(root: impl Into<PathBuf>, scan_depth: usize) -> Self {
        Self {
            name: "gog",
            root: root.into(),
            platform: Platform::Gog,
            require_executable: false,
            scan_depth,
        }
    }

    /// Strict unmanaged variant: a subdirectory with no resolvable
    /// executable is skipped entirely.
    pub fn unmanaged(root: impl Into<PathBuf>, scan_depth: usize) -> Self {
        Self {
            name: "folders",
            root: root.into(),
            platform: Platform::None,
            require_executable: true,
            scan_depth,
        }
    }
}

impl GameSource for FolderSource {
    fn name(&self) -> &str {
        self.name
    }

    fn scan(&self) -> Result<SourceScan, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::MissingRoot(self.root.clone()));
        }

        let mut scan = SourceScan::default();
        for entry in fs::read_dir(&self.root)?.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            scan.found += 1;

            let executable = find_primary_executable(&path, self.scan_depth)
                .map(|p| p.to_string_lossy().into_owned());
            if self.require_executable && executable.is_none() {
                tracing::debug!("Skipping {} (no executable found)", path.display());
                continue;
            }

            let path_str = path.to_string_lossy().into_owned();
            scan.candidates.push(GameCandidate {
                id: synthetic_id(self.platform, &path_str),
                name,
                executable,
                platform: self.platform,
                install_dir: Some(path_str),
                ..GameCandidate::default()
            });
        }
        Ok(scan)
    }
}
