//! # API Configuration
//!
//! Where the event API lives and how request URLs are built from it.
//!
//! ## Endpoint Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Endpoint Priority                                    │
//! │                                                                         │
//! │  1. Runtime value passed to ApiConfig::new                             │
//! │     (terminal flag / env var / terminal.toml)                          │
//! │                                                                         │
//! │  2. Build-time EVENTPOS_API_ENDPOINT                                   │
//! │     baked in with option_env! when the binary was compiled             │
//! │                                                                         │
//! │  3. http://localhost:8000 (development)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## URL Building
//! Base paths are kept: with `https://api.example.com/event/` the product
//! URL is `https://api.example.com/event/products/{code}`. The code is
//! always one percent-encoded path segment, so `A/B` can never walk into a
//! different route.

use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Endpoint baked in at compile time, if any.
pub const BUILD_API_ENDPOINT: Option<&str> = option_env!("EVENTPOS_API_ENDPOINT");

/// Fallback for development builds without `EVENTPOS_API_ENDPOINT`.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000";

/// Event API connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    endpoint: Url,
}

impl ApiConfig {
    /// Parses and checks an endpoint.
    ///
    /// Only `http` and `https` are accepted.
    pub fn new(endpoint: &str) -> ClientResult<Self> {
        let endpoint = Url::parse(endpoint.trim())?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint(format!(
                "API endpoint must start with http:// or https://, got: {}",
                endpoint
            )));
        }
        if endpoint.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(endpoint.to_string()));
        }

        debug!(endpoint = %endpoint, "API endpoint configured");
        Ok(ApiConfig { endpoint })
    }

    /// The build-time endpoint, or the development fallback.
    pub fn from_build_env() -> ClientResult<Self> {
        Self::new(Self::build_endpoint())
    }

    /// The endpoint string used when nothing overrides it at runtime.
    pub fn build_endpoint() -> &'static str {
        BUILD_API_ENDPOINT.unwrap_or(DEFAULT_API_ENDPOINT)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{endpoint}/products/{code}`
    pub fn product_url(&self, code: &str) -> ClientResult<Url> {
        self.join(&["products", code])
    }

    /// `{endpoint}/purchase/` (the trailing slash is part of the route).
    pub fn purchase_url(&self) -> ClientResult<Url> {
        self.join(&["purchase", ""])
    }

    fn join(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url() {
        let config = ApiConfig::new("http://localhost:8000").unwrap();
        assert_eq!(
            config.product_url("4901234567894").unwrap().as_str(),
            "http://localhost:8000/products/4901234567894"
        );
    }

    #[test]
    fn test_code_is_single_segment() {
        let config = ApiConfig::new("http://localhost:8000").unwrap();
        assert_eq!(
            config.product_url("A/B?x").unwrap().as_str(),
            "http://localhost:8000/products/A%2FB%3Fx"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let with_slash = ApiConfig::new("https://api.example.com/event/").unwrap();
        let without = ApiConfig::new("https://api.example.com/event").unwrap();

        for config in [with_slash, without] {
            assert_eq!(
                config.purchase_url().unwrap().as_str(),
                "https://api.example.com/event/purchase/"
            );
            assert_eq!(
                config.product_url("1").unwrap().as_str(),
                "https://api.example.com/event/products/1"
            );
        }
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        assert!(ApiConfig::new("not a url").is_err());
        assert!(ApiConfig::new("ftp://example.com").is_err());
        assert!(ApiConfig::new("mailto:pos@example.com").is_err());
    }

    #[test]
    fn test_build_endpoint_parses() {
        assert!(ApiConfig::from_build_env().is_ok());
    }
}
