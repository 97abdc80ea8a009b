//! Import orchestration
//!
//! Runs every platform source strictly sequentially against the shared
//! snapshot. Each source is a fault boundary: its failure becomes an entry
//! in its own report and the remaining sources still run.

use crate::{GameCandidate, ImportReport, LibraryStore, Reconciler, SourceReport};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Platform root not found: {0}")]
    MissingRoot(PathBuf),

    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything one source learned in a single scan
#[derive(Debug, Default)]
pub struct SourceScan {
    /// Titles enumerated, including ones filtered out before import
    pub found: usize,
    pub candidates: Vec<GameCandidate>,
    /// Per-item failures that did not stop the enumeration
    pub errors: Vec<String>,
}

/// One platform source feeding the import pass
pub trait GameSource {
    fn name(&self) -> &str;

    /// Enumerate installed titles. Item-level failures go into
    /// [`SourceScan::errors`]; an `Err` means the whole source is
    /// unavailable (e.g. its root does not exist).
    fn scan(&self) -> Result<SourceScan, SourceError>;
}

/// Run a full import pass over `sources`, persisting after each one.
///
/// Sources never run concurrently: they share the snapshot through a
/// read-modify-write upsert that is only safe single-threaded.
pub fn run_import(store: &LibraryStore, sources: &[&dyn GameSource]) -> ImportReport {
    let mut reconciler = Reconciler::new(store.load());
    let mut report = ImportReport::default();

    for source in sources {
        let mut entry = SourceReport {
            source: source.name().to_string(),
            ..SourceReport::default()
        };

        match source.scan() {
            Ok(scan) => {
                entry.found = scan.found;
                entry.errors = scan.errors;
                for candidate in scan.candidates {
                    reconciler.upsert(candidate);
                    entry.imported += 1;
                }
                tracing::info!(
                    "{}: found {}, imported {}",
                    entry.source,
                    entry.found,
                    entry.imported
                );
            }
            Err(err) => {
                tracing::warn!("{} source unavailable: {}", entry.source, err);
                entry.errors.push(err.to_string());
            }
        }

        // In-memory state stays authoritative if the write fails.
        if let Err(err) = store.save(reconciler.library()) {
            tracing::warn!("Failed to persist snapshot after {}: {}", entry.source, err);
        }

        report.sources.push(entry);
    }

    report.games_count = reconciler.library().active.len();
    report.completed_count = reconciler.library().completed.len();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platform;
    use tempfile::TempDir;

    struct FixedSource {
        name: &'static str,
        candidates: Vec<GameCandidate>,
    }

    impl GameSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn scan(&self) -> Result<SourceScan, SourceError> {
            Ok(SourceScan {
                found: self.candidates.len(),
                candidates: self.candidates.clone(),
                errors: Vec::new(),
            })
        }
    }

    struct BrokenSource;

    impl GameSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        fn scan(&self) -> Result<SourceScan, SourceError> {
            Err(SourceError::MissingRoot(PathBuf::from("/nonexistent")))
        }
    }

    fn candidate(id: i64, name: &str) -> GameCandidate {
        GameCandidate {
            id,
            name: name.to_string(),
            platform: Platform::Steam,
            ..GameCandidate::default()
        }
    }

    #[test]
    fn test_import_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("library.json"));
        let source = FixedSource {
            name: "steam",
            candidates: vec![candidate(620, "Portal 2"), candidate(570, "Dota 2")],
        };

        let first = run_import(&store, &[&source]);
        let second = run_import(&store, &[&source]);

        assert_eq!(first.games_count, 2);
        assert_eq!(second.games_count, 2);
        assert_eq!(store.load().active.len(), 2);
    }

    #[test]
    fn test_broken_source_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("library.json"));
        let good = FixedSource {
            name: "steam",
            candidates: vec![candidate(620, "Portal 2")],
        };

        let report = run_import(&store, &[&BrokenSource, &good]);

        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.sources[0].imported, 0);
        assert!(!report.sources[0].errors.is_empty());
        assert_eq!(report.sources[1].imported, 1);
        assert_eq!(report.games_count, 1);
    }

    #[test]
    fn test_snapshot_written_after_each_source() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("library.json"));
        let source = FixedSource {
            name: "steam",
            candidates: vec![candidate(620, "Portal 2")],
        };

        run_import(&store, &[&source]);
        assert_eq!(store.load().active.len(), 1);
    }
}
