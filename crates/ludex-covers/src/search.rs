//! External search collaborator
//!
//! The storefront search endpoint takes a free-text query and returns an
//! ordered candidate list; each candidate carries a name and, when the
//! store has artwork for it, a numeric id the cover URL derives from.

use crate::CoverError;
use serde::Deserialize;
use std::future::Future;

/// One candidate returned by the external search index
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub name: String,
    /// Opaque artwork identifier; absent when the index has no cover
    pub cover: Option<String>,
}

/// Free-text search against an external index
pub trait SearchProvider {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchHit>, CoverError>> + Send;

    /// Derive the artwork URL for a cover identifier.
    fn artwork_url(&self, cover: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<u64>,
    name: String,
    #[serde(default)]
    tiny_image: String,
}

/// Storefront search client
pub struct StoreSearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl StoreSearchClient {
    pub fn new() -> Self {
        Self::with_base_url("https://store.steampowered.com")
    }

    /// Override the endpoint, used by tests against a local server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(format!("Ludex/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for StoreSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchProvider for StoreSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CoverError> {
        let url = format!("{}/api/storesearch/", self.base_url);
        tracing::debug!("Searching store for {:?}", query);

        let response = self
            .client
            .get(&url)
            .query(&[("term", query), ("cc", "US"), ("l", "en")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CoverError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit {
                cover: item
                    .id
                    .filter(|_| !item.tiny_image.is_empty())
                    .map(|id| id.to_string()),
                name: item.name,
            })
            .collect())
    }

    fn artwork_url(&self, cover: &str) -> String {
        format!("https://steamcdn-a.akamaihd.net/steam/apps/{cover}/library_600x900_2x.jpg")
    }
}
