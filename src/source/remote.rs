//! Loading schemas from a GitHub repository directory listing
//!
//! The listing is fetched once, narrowed to `.json` files, and every raw file
//! is then fetched concurrently. The batch is all-or-nothing: one failed
//! request fails the whole load, and callers keep whatever they had before.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::entry::SchemaEntry;
use crate::error::FetchError;

/// One item of the directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingItem {
    pub name: String,
    /// Absent for directories and submodules
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ListingItem {
    pub fn is_schema_file(&self) -> bool {
        self.name.ends_with(".json")
    }
}

/// Access to a schema listing and the raw files it points at
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    async fn listing(&self) -> Result<Vec<ListingItem>, FetchError>;

    async fn raw(&self, item: &ListingItem) -> Result<Value, FetchError>;
}

/// Fetcher backed by the GitHub contents API
pub struct GithubFetcher {
    client: reqwest::Client,
    listing_url: String,
    token: Option<String>,
}

impl GithubFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent().to_string())
            .build()?;
        Ok(Self {
            client,
            listing_url: config.listing_url().to_string(),
            token: config.github_token.clone(),
        })
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let mut request = self.client.get(url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SchemaFetcher for GithubFetcher {
    async fn listing(&self) -> Result<Vec<ListingItem>, FetchError> {
        debug!(url = %self.listing_url, "fetching listing");
        self.get_json(&self.listing_url).await
    }

    async fn raw(&self, item: &ListingItem) -> Result<Value, FetchError> {
        let url = item
            .download_url
            .as_deref()
            .ok_or_else(|| FetchError::MissingDownloadUrl(item.name.clone()))?;
        debug!(name = %item.name, url, "fetching raw schema");
        self.get_json(url).await
    }
}

/// Fetch every `.json` file of the listing, in listing order
pub async fn fetch_entries(fetcher: &dyn SchemaFetcher) -> Result<Vec<SchemaEntry>, FetchError> {
    let listing = fetcher.listing().await?;
    let wanted: Vec<ListingItem> = listing.into_iter().filter(ListingItem::is_schema_file).collect();
    debug!(count = wanted.len(), "schema files in listing");

    let requests = wanted.iter().map(|item| async move {
        let schema = fetcher.raw(item).await?;
        Ok::<_, FetchError>(SchemaEntry::new(item.name.clone(), schema))
    });

    let entries = try_join_all(requests).await?;
    info!(count = entries.len(), "fetched remote schemas");
    Ok(entries)
}

/// Run [`fetch_entries`] to completion from synchronous code
pub fn fetch_entries_blocking(fetcher: &dyn SchemaFetcher) -> Result<Vec<SchemaEntry>, FetchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(FetchError::Runtime)?;
    runtime.block_on(fetch_entries(fetcher))
}
