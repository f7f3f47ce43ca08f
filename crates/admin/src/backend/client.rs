//! HTTP plumbing shared by every admin endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{AuthToken, BackendError};

/// Timeout for a single backend request. Product saves carry up to ten images.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Catalog backend client for the admin panel.
///
/// Holds no credentials itself; each call takes the caller's [`AuthToken`].
#[derive(Clone)]
pub struct AdminApiClient {
    inner: Arc<AdminApiClientInner>,
}

struct AdminApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminApiClient {
    /// Create a new client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Backend base URL, used to resolve relative image paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    /// Start a request, attaching the bearer token when given.
    pub(crate) fn request(
        &self,
        method: Method,
        url: Url,
        token: Option<&AuthToken>,
    ) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    /// Execute a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        token: &AuthToken,
        url: Url,
    ) -> Result<T, BackendError> {
        send(self.request(Method::GET, url, Some(token))).await
    }

    /// Execute a request with a JSON body and decode the JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        method: Method,
        token: Option<&AuthToken>,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        send(self.request(method, self.url(path)?, token).json(body)).await
    }

    /// Execute a request whose response body is not needed.
    pub(crate) async fn send_empty(
        &self,
        method: Method,
        token: &AuthToken,
        path: &str,
    ) -> Result<(), BackendError> {
        execute(self.request(method, self.url(path)?, Some(token))).await
    }
}

impl std::fmt::Debug for AdminApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Send a request and decode the JSON body of a success response.
pub(crate) async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let response = request.send().await?;
    handle_response(response).await
}

/// Send a request, discarding the body of a success response.
pub(crate) async fn execute(request: RequestBuilder) -> Result<(), BackendError> {
    let response = request.send().await?;

    if response.status().is_success() {
        return Ok(());
    }

    Err(parse_error(response).await)
}

/// Handle API response and parse JSON.
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

/// Parse error response from the backend.
async fn parse_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let path = response.url().path().to_string();

    if status == 401 {
        return BackendError::Unauthorized;
    }

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
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let client = AdminApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url("/api/admin/tags").unwrap().as_str(),
            "http://localhost:5000/api/admin/tags"
        );
    }
}
