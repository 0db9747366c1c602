//! Configuration constants and client settings.

use std::time::Duration;

use url::Url;

use crate::error::{GreenButtonError, Result};

/// Path prefix shared by every ESPI resource.
pub const API_PREFIX: &str = "/espi/1_1/resource";

/// Public Green Button sandbox data custodian.
pub const DEFAULT_BASE_URL: &str = "https://services.greenbuttondata.org:443/DataCustodian";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default maximum HTTP response size in bytes (100 MB).
///
/// Interval block feeds for a full year of 15-minute readings run to tens
/// of megabytes; anything far beyond that is not a feed we want in memory.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 100 * 1024 * 1024;

/// Environment variable holding the data custodian base URL.
pub const ENV_BASE_URL: &str = "GREENBUTTON_BASE_URL";

/// Environment variable holding the OAuth2 bearer token.
pub const ENV_ACCESS_TOKEN: &str = "GREENBUTTON_ACCESS_TOKEN";

/// Environment variable overriding the HTTP timeout.
pub const ENV_TIMEOUT_SECS: &str = "GREENBUTTON_TIMEOUT_SECS";

/// Settings for talking to one data custodian.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: String,
    pub timeout: Duration,
    pub max_response_size: u64,
}

impl ClientConfig {
    /// Create a config with default timeout and size limit.
    ///
    /// The base URL is validated and normalized (no trailing slash).
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            access_token: access_token.into(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        })
    }

    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var(ENV_ACCESS_TOKEN)
            .map_err(|_| GreenButtonError::Config(format!("{ENV_ACCESS_TOKEN} not set")))?;

        let base_url =
            std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(HTTP_TIMEOUT_SECS);

        Ok(Self::new(&base_url, access_token)?.with_timeout(Duration::from_secs(timeout_secs)))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_response_size(mut self, max_response_size: u64) -> Self {
        self.max_response_size = max_response_size;
        self
    }
}

/// Validate a data custodian base URL.
///
/// Accepts absolute `http`/`https` URLs and strips trailing slashes so that
/// resource paths (which start with `/`) can be appended directly.
///
/// # Examples
/// ```
/// use greenbutton::config::validate_base_url;
///
/// assert_eq!(
///     validate_base_url("https://example.com/DataCustodian/").unwrap(),
///     "https://example.com/DataCustodian"
/// );
/// assert!(validate_base_url("not a url").is_err());
/// assert!(validate_base_url("ftp://example.com").is_err());
/// ```
pub fn validate_base_url(base_url: &str) -> Result<String> {
    let parsed = Url::parse(base_url)
        .map_err(|e| GreenButtonError::Config(format!("invalid base URL '{base_url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GreenButtonError::Config(format!(
            "base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

/// Join a resource path onto a base URL.
pub fn resource_url(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url_valid() {
        assert_eq!(
            validate_base_url(DEFAULT_BASE_URL).unwrap(),
            "https://services.greenbuttondata.org:443/DataCustodian"
        );
        assert_eq!(
            validate_base_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_validate_base_url_invalid() {
        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("/espi/1_1/resource").is_err());
        assert!(validate_base_url("file:///tmp/feed.xml").is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("https://example.com/", "token").unwrap();
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.timeout, Duration::from_secs(HTTP_TIMEOUT_SECS));
        assert_eq!(config.max_response_size, DEFAULT_MAX_RESPONSE_SIZE);
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::new("https://example.com", "token")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_max_response_size(1024);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_response_size, 1024);
    }

    #[test]
    fn test_resource_url() {
        assert_eq!(
            resource_url("https://example.com/DataCustodian", "/espi/1_1/resource/UsagePoint"),
            "https://example.com/DataCustodian/espi/1_1/resource/UsagePoint"
        );
    }
}
