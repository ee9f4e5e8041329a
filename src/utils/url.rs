// src/utils/url.rs

//! URL construction for metadata, download and icon targets.

use url::Url;

use crate::error::{ArchiveError, Result};
use crate::models::EndpointsConfig;

/// Parsed upstream base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub metadata: Url,
    pub search: Url,
    pub alternate_search: Url,
    pub download: Url,
    pub icon: Url,
}

impl Endpoints {
    /// Parse every configured base URL.
    pub fn from_config(config: &EndpointsConfig) -> Result<Self> {
        Ok(Self {
            metadata: parse_base("metadata", &config.metadata)?,
            search: parse_base("search", &config.search)?,
            alternate_search: parse_base("alternate_search", &config.alternate_search)?,
            download: parse_base("download", &config.download)?,
            icon: parse_base("icon", &config.icon)?,
        })
    }

    /// `<metadata-base>/<identifier>`
    pub fn metadata_url(&self, identifier: &str) -> Result<Url> {
        let identifier = validate_identifier(identifier)?;
        Ok(with_segments(&self.metadata, [identifier]))
    }

    /// `<download-base>/<identifier>/<file name>`, with the file name
    /// percent-encoded per path segment.
    ///
    /// A name containing `.` or `..` segments is kept as a single segment
    /// (`/` encoded), since dot segments would be resolved away.
    pub fn download_url(&self, identifier: &str, file_name: &str) -> Url {
        if file_name.split('/').any(is_dot_segment) {
            return with_segments(&self.download, [identifier, file_name]);
        }
        let segments = std::iter::once(identifier).chain(file_name.split('/'));
        with_segments(&self.download, segments)
    }

    /// `<icon-base>/<identifier>`
    pub fn icon_url(&self, identifier: &str) -> Url {
        with_segments(&self.icon, [identifier])
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&EndpointsConfig::default()).expect("default endpoints are valid URLs")
    }
}

fn parse_base(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ArchiveError::config(format!("endpoints.{name} '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ArchiveError::config(format!(
            "endpoints.{name} '{raw}' cannot be used as a base URL"
        )));
    }
    Ok(url)
}

/// Append path segments to a base, ignoring a trailing slash on the base.
fn with_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    // Only fails for cannot-be-a-base URLs, which parse_base rejects.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Check that an identifier can stand as a single path segment.
///
/// Returns the trimmed identifier.
pub fn validate_identifier(identifier: &str) -> Result<&str> {
    let trimmed = identifier.trim();
    if trimmed.is_empty()
        || trimmed.contains(char::is_whitespace)
        || trimmed.contains('/')
        || is_dot_segment(trimmed)
    {
        return Err(ArchiveError::bad_identifier(identifier));
    }
    Ok(trimmed)
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_url() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.metadata_url("goodidentifier").unwrap().as_str(),
            "https://archive.org/metadata/goodidentifier"
        );
    }

    #[test]
    fn test_metadata_url_rejects_bad_identifiers() {
        let endpoints = Endpoints::default();
        for bad in ["", "   ", "two words", "a/b", ".", "..", " .. "] {
            assert!(
                matches!(
                    endpoints.metadata_url(bad),
                    Err(ArchiveError::BadIdentifier(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_download_url_encodes_name() {
        let endpoints = Endpoints::default();
        let url = endpoints.download_url("album", "01 - Opening #1.mp3");
        assert_eq!(
            url.as_str(),
            "https://archive.org/download/album/01%20-%20Opening%20%231.mp3"
        );
    }

    #[test]
    fn test_download_url_keeps_subdirectories() {
        let endpoints = Endpoints::default();
        let url = endpoints.download_url("album", "disc 1/track.mp3");
        assert_eq!(
            url.as_str(),
            "https://archive.org/download/album/disc%201/track.mp3"
        );
    }

    #[test]
    fn test_download_url_does_not_resolve_dot_segments() {
        let endpoints = Endpoints::default();
        let url = endpoints.download_url("album", "../x.mp3");
        assert_eq!(url.as_str(), "https://archive.org/download/album/..%2Fx.mp3");

        let url = endpoints.download_url("album", "disc 1/./x.mp3");
        assert!(url.as_str().starts_with("https://archive.org/download/album/"));
        assert_ne!(url.as_str(), "https://archive.org/download/album/disc%201/x.mp3");
    }

    #[test]
    fn test_icon_url_without_trailing_slash_base() {
        let config = EndpointsConfig {
            icon: "http://localhost:8080/services/img".into(),
            ..EndpointsConfig::default()
        };
        let endpoints = Endpoints::from_config(&config).unwrap();
        assert_eq!(
            endpoints.icon_url("etree").as_str(),
            "http://localhost:8080/services/img/etree"
        );
    }

    #[test]
    fn test_from_config_rejects_non_base_url() {
        let config = EndpointsConfig {
            download: "data:text/plain,hello".into(),
            ..EndpointsConfig::default()
        };
        assert!(matches!(
            Endpoints::from_config(&config),
            Err(ArchiveError::Config(_))
        ));
    }
}
