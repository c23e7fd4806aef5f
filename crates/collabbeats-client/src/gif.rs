//! External GIF search.
//!
//! One keyed HTTP endpoint returning a list of media URLs. No timeout or
//! retry is applied; a hung request leaves the picker in its loading state.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GifConfig;
use crate::error::{ClientError, Result};

/// One search hit: the full-size URL to send, and a smaller preview for
/// the picker grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifItem {
    pub url: String,
    pub preview: String,
}

/// GIF search capability.
#[async_trait]
pub trait GifSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<GifItem>>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Client for the hosted GIF search API.
pub struct GiphyClient {
    http: reqwest::Client,
    config: GifConfig,
}

impl GiphyClient {
    pub fn new(config: GifConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<GifRecord>,
}

#[derive(Deserialize)]
struct GifRecord {
    #[serde(default)]
    images: GifImages,
}

#[derive(Deserialize, Default)]
struct GifImages {
    original: Option<ImageRef>,
    fixed_height_small: Option<ImageRef>,
    preview_gif: Option<ImageRef>,
}

#[derive(Deserialize)]
struct ImageRef {
    url: String,
}

#[async_trait]
impl GifSearch for GiphyClient {
    async fn search(&self, query: &str) -> Result<Vec<GifItem>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.config.page_limit.to_string();
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("q", query),
                ("limit", limit.as_str()),
                ("rating", self.config.rating.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ClientError::Gif(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Gif(e.to_string()))?;

        Ok(items_from(body))
    }
}

fn items_from(response: SearchResponse) -> Vec<GifItem> {
    response
        .data
        .into_iter()
        .filter_map(|record| {
            let url = record.images.original?.url;
            let preview = record
                .images
                .fixed_height_small
                .or(record.images.preview_gif)
                .map(|i| i.url)
                .unwrap_or_else(|| url.clone());
            Some(GifItem { url, preview })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Static stand-in
// ---------------------------------------------------------------------------

/// Fixed result set for tests and offline development.
#[derive(Default)]
pub struct StaticGifSearch {
    pub items: Vec<GifItem>,
}

impl StaticGifSearch {
    pub fn with_items(items: Vec<GifItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl GifSearch for StaticGifSearch {
    async fn search(&self, query: &str) -> Result<Vec<GifItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.items.clone())
    }
}
