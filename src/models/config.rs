//! Client configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::models::media::MediaType;
use crate::utils::Endpoints;

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data source selection
    #[serde(default)]
    pub service: ServiceConfig,

    /// Upstream URLs
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub client: ClientConfig,

    /// Search defaults and exclusions
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(ArchiveError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(ArchiveError::validation("client.timeout_secs must be > 0"));
        }
        if self.client.max_concurrent == 0 {
            return Err(ArchiveError::validation("client.max_concurrent must be > 0"));
        }
        if self.search.default_rows == 0 {
            return Err(ArchiveError::validation("search.default_rows must be > 0"));
        }
        if self.search.top_collection_rows == 0 {
            return Err(ArchiveError::validation(
                "search.top_collection_rows must be > 0",
            ));
        }
        Endpoints::from_config(&self.endpoints)
            .map_err(|e| ArchiveError::validation(e.to_string()))?;
        Ok(())
    }
}

/// Live network calls or embedded canned payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    #[default]
    Live,
    Mock,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub mode: ServiceMode,
}

/// Upstream base URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Metadata base; the identifier is appended as a path segment
    #[serde(default = "defaults::metadata")]
    pub metadata: String,

    /// advancedsearch endpoint (POST form)
    #[serde(default = "defaults::search")]
    pub search: String,

    /// Page production search endpoint (GET query)
    #[serde(default = "defaults::alternate_search")]
    pub alternate_search: String,

    #[serde(default = "defaults::download")]
    pub download: String,

    /// Icon service base
    #[serde(default = "defaults::icon")]
    pub icon: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            metadata: defaults::metadata(),
            search: defaults::search(),
            alternate_search: defaults::alternate_search(),
            download: defaults::download(),
            icon: defaults::icon(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent collection sub-fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Collections excluded from every search
    #[serde(default = "defaults::excluded_collections")]
    pub excluded_collections: Vec<String>,

    #[serde(default = "defaults::rows")]
    pub default_rows: u32,

    #[serde(default = "defaults::media_types")]
    pub default_media_types: Vec<MediaType>,

    /// Rows requested when listing top collections
    #[serde(default = "defaults::top_collection_rows")]
    pub top_collection_rows: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            excluded_collections: defaults::excluded_collections(),
            default_rows: defaults::rows(),
            default_media_types: defaults::media_types(),
            top_collection_rows: defaults::top_collection_rows(),
        }
    }
}

mod defaults {
    use crate::models::media::MediaType;

    // Endpoint defaults
    pub fn metadata() -> String {
        "https://archive.org/metadata/".into()
    }
    pub fn search() -> String {
        "https://archive.org/advancedsearch.php".into()
    }
    pub fn alternate_search() -> String {
        "https://archive.org/services/search/beta/page_production/".into()
    }
    pub fn download() -> String {
        "https://archive.org/download/".into()
    }
    pub fn icon() -> String {
        "https://archive.org/services/img/".into()
    }

    // Client defaults
    pub fn user_agent() -> String {
        concat!("iarchive/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        8
    }

    // Search defaults
    pub fn excluded_collections() -> Vec<String> {
        ["podcasts_mirror", "web", "webwidecrawl", "samples_only"]
            .into_iter()
            .map(String::from)
            .collect()
    }
    pub fn rows() -> u32 {
        50
    }
    pub fn media_types() -> Vec<MediaType> {
        vec![MediaType::Audio, MediaType::Etree]
    }
    pub fn top_collection_rows() -> u32 {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.service.mode, ServiceMode::Live);
        assert_eq!(config.search.default_rows, 50);
        assert_eq!(
            config.search.excluded_collections,
            vec!["podcasts_mirror", "web", "webwidecrawl", "samples_only"]
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [service]
            mode = "mock"

            [client]
            max_concurrent = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.service.mode, ServiceMode::Mock);
        assert_eq!(config.client.max_concurrent, 2);
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.endpoints.metadata, "https://archive.org/metadata/");
        assert_eq!(
            config.search.default_media_types,
            vec![MediaType::Audio, MediaType::Etree]
        );
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.client.max_concurrent = 0;
        assert!(matches!(
            config.validate(),
            Err(ArchiveError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.endpoints.icon = "not a url".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoints.icon"));

        config.endpoints.icon = "mailto:someone@example.org".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_user_agent() {
        let mut config = Config::default();
        config.client.user_agent = "  ".into();
        assert!(config.validate().is_err());
    }
}
