//! Cover artwork enrichment for Ludex
//!
//! Fills missing cover art on library records by fuzzy-matching their names
//! against an external store search index, one throttled request at a time.

mod enrich;
mod matcher;
mod search;

pub use enrich::{EnrichReport, Enricher};
pub use matcher::{normalize_name, pick_cover};
pub use search::{SearchHit, SearchProvider, StoreSearchClient};

use ludex_library::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search request failed with status {0}")]
    Status(u16),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
