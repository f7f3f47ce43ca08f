//! Client for the public endpoints of the catalog backend.
//!
//! # Architecture
//!
//! - The REST backend is the source of truth - no local storage
//! - Plain JSON over `reqwest`
//! - In-memory caching via `moka` for slow-changing reads (categories, tags,
//!   product detail, site content); product listings are always fetched
//!
//! # Endpoints
//!
//! ```text
//! GET /api/products?page&category_id&tag_id&search
//! GET /api/products/{id}
//! GET /api/categories
//! GET /api/tags
//! GET /api/site-content/{key}
//! ```

mod cache;
mod client;

pub use client::{CatalogClient, ProductQuery};

use thiserror::Error;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    /// Whether the error means the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
