//! One-shot messages carried across a redirect in the session.

use tower_sessions::Session;

use crate::models::{Flash, session_keys};

/// Queue a message for the next page.
pub async fn push(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Take the queued message, if any.
pub async fn take(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}
