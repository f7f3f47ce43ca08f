//! Client for the authenticated catalog backend API.
//!
//! Every admin call carries the bearer token obtained at login. A `401` from
//! any endpoint surfaces as [`BackendError::Unauthorized`], which the panel
//! treats as an expired session.
//!
//! # API Reference
//!
//! - Auth: `/api/auth/login`, `/api/auth/me`, `/api/auth/admins`, `/api/auth/audit`
//! - Catalog: `/api/admin/products`, `/api/admin/categories`, `/api/admin/tags`,
//!   `/api/admin/providers`, `/api/admin/site-content/{key}`

mod auth;
mod catalog;
mod client;

pub use auth::{AUDIT_PER_PAGE, AdminList, AdminResponse, LoginResponse};
pub use catalog::AdminProductQuery;
pub use client::AdminApiClient;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur when calling the catalog backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Token missing, expired or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Could not build a request URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    /// Whether the session should be treated as expired.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message for the user: the backend's own `{error}` text when it sent
    /// one, otherwise `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Bearer token issued by `/api/auth/login`.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Raw token value for the `Authorization` header or the session store.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_backend_text() {
        let err = BackendError::Api {
            status: 400,
            message: "La categoría ya existe".to_string(),
        };
        assert_eq!(err.message_or("Error al guardar"), "La categoría ya existe");

        let err = BackendError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.message_or("Error al guardar"), "Error al guardar");
        assert_eq!(
            BackendError::Unauthorized.message_or("Error al guardar"),
            "Error al guardar"
        );
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("eyJhbGciOi");
        assert_eq!(format!("{token:?}"), "AuthToken([REDACTED])");
        assert_eq!(token.expose(), "eyJhbGciOi");
    }
}
