//! Authentication extractor and session helpers for admin.
//!
//! The backend issues the bearer token; the panel only keeps it in the
//! server-side session next to the admin's identity.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::backend::AuthToken;
use crate::models::{CurrentAdmin, session_keys};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/admin/login";

/// The logged-in admin and the token to call the backend with.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: AuthToken,
    pub admin: CurrentAdmin,
}

/// Extractor that requires admin authentication.
///
/// Redirects to the login page when the session has no token.
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(auth): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", auth.admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminSession);

/// Error returned when admin authentication is required but the user is not logged in.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Session layer missing.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        current_session(session)
            .await
            .map(Self)
            .ok_or(AdminAuthRejection::RedirectToLogin)
    }
}

/// Read the admin session, if both keys are present.
pub async fn current_session(session: &Session) -> Option<AdminSession> {
    let token: String = session
        .get(session_keys::AUTH_TOKEN)
        .await
        .ok()
        .flatten()?;
    let admin: CurrentAdmin = session
        .get(session_keys::ADMIN_DATA)
        .await
        .ok()
        .flatten()?;

    Some(AdminSession {
        token: AuthToken::new(token),
        admin,
    })
}

/// Store a fresh login, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin_session(
    session: &Session,
    token: &AuthToken,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::AUTH_TOKEN, token.expose())
        .await?;
    session.insert(session_keys::ADMIN_DATA, admin).await
}

/// Drop the token and identity (logout or expired token).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
