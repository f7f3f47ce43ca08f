//! Session middleware configuration for admin.
//!
//! Sessions live in memory: they only hold the backend token, the admin's
//! identity and a pending flash message, and a restart just means logging
//! in again.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::AdminConfig;
use crate::error::SessionExpired;
use crate::middleware::auth::clear_admin_session;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "catalogo_admin_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Clear the session when a handler reports the backend rejected its token.
///
/// Handlers signal this through [`AppError`](crate::error::AppError), which
/// marks its redirect response with [`SessionExpired`].
pub async fn session_expiry_middleware(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.extensions().get::<SessionExpired>().is_some() {
        tracing::info!("Backend rejected the session token, logging out");
        if let Err(e) = clear_admin_session(&session).await {
            tracing::warn!(error = %e, "Failed to clear expired session");
        }
        crate::error::clear_sentry_user();
    }

    response
}
