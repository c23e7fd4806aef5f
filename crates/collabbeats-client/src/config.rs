//! Application configuration, injected at [`crate::App`] construction.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub gif: GifConfig,
}

/// Settings for the external GIF search API.
#[derive(Debug, Clone, Deserialize)]
pub struct GifConfig {
    /// API key; empty disables search.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_rating")]
    pub rating: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

fn default_endpoint() -> String {
    "https://api.giphy.com/v1/gifs/search".to_string()
}

fn default_rating() -> String {
    "pg".to_string()
}

fn default_page_limit() -> usize {
    12
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            rating: default_rating(),
            page_limit: default_page_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"gif":{"api_key":"k"}}"#).unwrap();
        assert_eq!(config.gif.api_key, "k");
        assert_eq!(config.gif.rating, "pg");
        assert_eq!(config.gif.page_limit, 12);
        assert!(config.gif.endpoint.starts_with("https://"));
    }
}
