//! Catalog backend client implementation.

use std::sync::Arc;
use std::time::Duration;

use catalogo_core::{Category, CategoryId, Product, ProductId, ProductPage, SiteContent, Tag, TagId};
use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::BackendError;
use super::cache::{CacheKey, CacheValue};

/// Timeout for a single backend request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Filters for the public product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// Query string pairs in the order the backend documents them.
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.max(1).to_string())];
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.tag_id {
            pairs.push(("tag_id", id.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        pairs
    }
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the public catalog endpoints.
///
/// Cheap to clone. Categories, tags, product detail and site content are
/// cached for the configured TTL.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, cache_ttl: Duration) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Backend base URL, used to resolve relative image paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of products. Never cached: filters make the key space
    /// large and listings should reflect admin changes immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, BackendError> {
        let mut url = self.url("/api/products")?;
        url.query_pairs_mut().extend_pairs(query.pairs());
        self.get(url).await
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for an unknown id, or another error
    /// if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, BackendError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(self.url(&format!("/api/products/{id}"))?).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    // =========================================================================
    // Taxonomy Methods
    // =========================================================================

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get(self.url("/api/categories")?).await?;
        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Get all tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn tags(&self) -> Result<Vec<Tag>, BackendError> {
        if let Some(CacheValue::Tags(tags)) = self.inner.cache.get(&CacheKey::Tags).await {
            debug!("Cache hit for tags");
            return Ok(tags);
        }

        let tags: Vec<Tag> = self.get(self.url("/api/tags")?).await?;
        self.inner
            .cache
            .insert(CacheKey::Tags, CacheValue::Tags(tags.clone()))
            .await;
        Ok(tags)
    }

    // =========================================================================
    // Site Content
    // =========================================================================

    /// Get an editable content block by key.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the key has never been saved.
    #[instrument(skip(self))]
    pub async fn site_content(&self, key: &str) -> Result<SiteContent, BackendError> {
        let cache_key = CacheKey::SiteContent(key.to_string());
        if let Some(CacheValue::SiteContent(content)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for site content");
            return Ok(content);
        }

        let encoded = urlencoding::encode(key);
        let content: SiteContent = self
            .get(self.url(&format!("/api/site-content/{encoded}"))?)
            .await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::SiteContent(content.clone()))
            .await;
        Ok(content)
    }

    /// Check the backend answers, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let _: Vec<Category> = self.get(self.url("/api/categories")?).await?;
        Ok(())
    }

    // =========================================================================
    // HTTP helpers
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        handle_response(response).await
    }
}

/// Decode a success body, or turn the failure into a [`BackendError`].
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        return serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %String::from_utf8_lossy(&body).chars().take(500).collect::<String>(),
                "Failed to parse catalog backend response"
            );
            BackendError::Parse(e.to_string())
        });
    }

    Err(parse_error(response).await)
}

/// Map an error response, reading the backend's `{error}` message if present.
async fn parse_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let path = response.url().path().to_string();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| text.chars().take(200).collect());

    if status == 404 {
        return BackendError::NotFound(path);
    }

    BackendError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_empty_filters() {
        let query = ProductQuery {
            page: 0,
            category_id: Some(CategoryId::new(3)),
            tag_id: None,
            search: Some("   ".to_string()),
        };
        assert_eq!(
            query.pairs(),
            vec![("page", "1".to_string()), ("category_id", "3".to_string())]
        );
    }

    #[test]
    fn test_query_pairs_trim_search() {
        let query = ProductQuery {
            page: 2,
            search: Some(" porcelanato ".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("page", "2".to_string()),
                ("search", "porcelanato".to_string())
            ]
        );
    }
}
