//! Throttled enrichment pass over the library
//!
//! Reads the snapshot, searches the external index for every record that
//! still lacks a cover, and writes matches back through the reconciler.
//! External calls are strictly sequential with a fixed delay between them;
//! the store's rate limits leave no room for anything fancier.

use crate::{SearchProvider, matcher};
use ludex_library::{LibraryStore, Reconciler};
use serde::Serialize;
use std::time::Duration;

/// Outcome of one enrichment pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichReport {
    pub scanned: usize,
    pub updated: usize,
}

/// Fills missing covers on up to `limit` records per pass
pub struct Enricher<P> {
    provider: P,
    limit: usize,
    delay: Duration,
}

impl<P: SearchProvider> Enricher<P> {
    pub fn new(provider: P, limit: usize, delay: Duration) -> Self {
        Self {
            provider,
            limit,
            delay,
        }
    }

    /// Run one pass. The snapshot is persisted once at the end, and only
    /// if a record actually changed; a failed search leaves its target
    /// untouched and the pass continues.
    pub async fn run(&self, store: &LibraryStore) -> EnrichReport {
        let mut reconciler = Reconciler::new(store.load());
        let targets: Vec<(i64, String)> = reconciler
            .library()
            .iter_all()
            .filter(|g| g.cover.is_none() && !g.name.trim().is_empty())
            .take(self.limit)
            .map(|g| (g.id, g.name.clone()))
            .collect();

        let mut report = EnrichReport::default();
        for (index, (id, name)) in targets.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }
            report.scanned += 1;

            let query = matcher::normalize_name(&name);
            let hits = match self.provider.search(&query).await {
                Ok(hits) => hits,
                Err(err) => {
                    tracing::warn!("Search for {:?} failed: {}", name, err);
                    continue;
                }
            };

            if let Some(hit) = matcher::pick_cover(&name, &hits)
                && let Some(cover) = hit.cover.clone()
            {
                let url = self.provider.artwork_url(&cover);
                tracing::info!("Matched cover for {:?} via {:?}", name, hit.name);
                if reconciler.set_cover(id, cover, url).is_ok() {
                    report.updated += 1;
                }
            } else {
                tracing::debug!("No cover match for {:?}", name);
            }
        }

        if report.updated > 0
            && let Err(err) = store.save(reconciler.library())
        {
            tracing::warn!("Failed to persist enriched snapshot: {}", err);
        }
        report
    }
}
