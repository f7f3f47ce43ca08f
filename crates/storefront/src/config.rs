//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Base URL of the catalog REST backend
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CACHE_TTL_SECS` - Read cache lifetime (default: 300)
//! - `WHATSAPP_PHONE` - Number used for product inquiries (default: 50626431333)
//! - `CONTACT_EMAIL` - Contact address on the About page
//! - `CONTACT_PHONE` - Contact phone on the About page
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog backend base URL (no trailing slash)
    pub api_url: String,
    /// How long categories, tags, products and site content stay cached
    pub cache_ttl: Duration,
    /// Public contact details
    pub contact: ContactConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Contact details shown on public pages.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// WhatsApp number in international format without `+`
    pub whatsapp_phone: String,
    /// Contact email address
    pub email: String,
    /// Contact phone as displayed
    pub phone: String,
}

impl ContactConfig {
    /// Link of the floating WhatsApp button.
    #[must_use]
    pub fn chat_url(&self) -> String {
        catalogo_core::format::whatsapp_chat_link(&self.whatsapp_phone)
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            whatsapp_phone: "50626431333".to_string(),
            email: "pisoskermy@gmail.com".to_string(),
            phone: "+506 2643-1333".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let api_url = parse_base_url("CATALOG_API_URL", &get_required_env("CATALOG_API_URL")?)?;
        let cache_ttl = get_env_or_default("STOREFRONT_CACHE_TTL_SECS", "300")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        let defaults = ContactConfig::default();
        let contact = ContactConfig {
            whatsapp_phone: get_optional_env("WHATSAPP_PHONE").unwrap_or(defaults.whatsapp_phone),
            email: get_optional_env("CONTACT_EMAIL").unwrap_or(defaults.email),
            phone: get_optional_env("CONTACT_PHONE").unwrap_or(defaults.phone),
        };

        Ok(Self {
            host,
            port,
            api_url,
            cache_ttl,
            contact,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Configuration for tests and local tooling, pointing at `api_url`.
    #[must_use]
    pub fn for_api(api_url: &str) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache_ttl: Duration::from_secs(300),
            contact: ContactConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate an absolute http(s) URL and strip the trailing slash.
fn parse_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_strips_trailing_slash() {
        assert_eq!(
            parse_base_url("X", "http://localhost:5000/").unwrap(),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("X", "ftp://example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_base_url("X", "not a url").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::for_api("http://localhost:5000/");
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert_eq!(config.api_url, "http://localhost:5000");
    }

    #[test]
    fn test_default_contact_details() {
        let contact = ContactConfig::default();
        assert_eq!(contact.whatsapp_phone, "50626431333");
        assert_eq!(contact.email, "pisoskermy@gmail.com");
    }
}
