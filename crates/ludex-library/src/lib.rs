//! Game library management for Ludex
//!
//! Holds the unified record model, the persisted snapshot store, and the
//! reconciliation engine that merges freshly scanned platform data into the
//! library without discarding prior user edits.

mod identity;
mod import;
mod model;
mod reconcile;
mod store;

pub use identity::synthetic_id;
pub use import::{GameSource, SourceError, SourceScan, run_import};
pub use model::{GameCandidate, GameRecord, ImportReport, Library, Platform, SourceReport};
pub use reconcile::Reconciler;
pub use store::{LibraryStore, StoreError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Game not found: {0}")]
    GameNotFound(i64),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
