//! Request ids for catalog page views.
//!
//! Every response carries `x-request-id`. An id sent by the reverse proxy in
//! front of the storefront is reused when it looks sane; anything else gets
//! a fresh UUID v4. The id is recorded on the tracing span and tagged in
//! Sentry so a visitor's error report can be matched to the backend calls
//! made for that page.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id that is reused.
const MAX_UPSTREAM_LEN: usize = 128;

/// Upstream id if it is short printable ASCII.
fn upstream_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let valid = !value.is_empty()
        && value.len() <= MAX_UPSTREAM_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    valid.then(|| value.to_owned())
}

/// Tag the request with an id and echo it in the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/catalogo", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn response_id(upstream: Option<&str>) -> String {
        let mut request = Request::builder().uri("/catalogo");
        if let Some(id) = upstream {
            request = request.header(REQUEST_ID_HEADER, id);
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn test_upstream_id_is_reused() {
        assert_eq!(response_id(Some("cf-8a1b2c")).await, "cf-8a1b2c");
    }

    #[tokio::test]
    async fn test_missing_or_odd_ids_are_replaced() {
        let fresh = response_id(None).await;
        assert!(Uuid::parse_str(&fresh).is_ok());

        let spaced = response_id(Some("id with spaces")).await;
        assert!(Uuid::parse_str(&spaced).is_ok());

        let long = "a".repeat(MAX_UPSTREAM_LEN + 1);
        assert_ne!(response_id(Some(&long)).await, long);
    }
}
