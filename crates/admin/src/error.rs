//! Unified error handling for admin.
//!
//! Handlers return [`Result`]; a backend `401` anywhere becomes a redirect to
//! the login page and the session is dropped by
//! [`session_expiry_middleware`](crate::middleware::session_expiry_middleware).
//! Failures the user can act on are rendered inline by the handlers instead,
//! via [`load_failure`] and [`save_failure`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::middleware::auth::LOGIN_PATH;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog backend request failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Response marker asking the session layer to log the admin out.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Backend(BackendError::Unauthorized)) {
            let mut response = Redirect::to(LOGIN_PATH).into_response();
            response.extensions_mut().insert(SessionExpired);
            return response;
        }

        let status = match &self {
            Self::Backend(BackendError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match status {
            StatusCode::NOT_FOUND => "No encontrado".to_string(),
            StatusCode::BAD_GATEWAY => "Error al conectar con el servidor.".to_string(),
            StatusCode::BAD_REQUEST => self.to_string(),
            _ => "Error interno del servidor".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Turn a failed read into the fixed inline message for the page.
///
/// # Errors
///
/// An expired token is not rendered inline; it is returned so the handler
/// redirects to the login page.
pub fn load_failure(err: BackendError, message: &str) -> Result<String> {
    if err.is_unauthorized() {
        return Err(err.into());
    }
    tracing::warn!(error = %err, "{message}");
    Ok(message.to_string())
}

/// Turn a failed write into the inline message: the backend's own text when
/// it sent one, otherwise `fallback`.
///
/// # Errors
///
/// An expired token is returned instead, as in [`load_failure`].
pub fn save_failure(err: BackendError, fallback: &str) -> Result<String> {
    if err.is_unauthorized() {
        return Err(err.into());
    }
    tracing::warn!(error = %err, "{fallback}");
    Ok(err.message_or(fallback))
}

/// Set the Sentry user context from the logged-in admin.
pub fn set_sentry_user(admin_id: i64, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("producto 12".to_string());
        assert_eq!(err.to_string(), "Not found: producto 12");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Backend(BackendError::Api {
                status: 500,
                message: "boom".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_redirects_and_marks_session() {
        let response = AppError::Backend(BackendError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), LOGIN_PATH);
        assert!(response.extensions().get::<SessionExpired>().is_some());
    }

    #[test]
    fn test_inline_failures() {
        let err = BackendError::Api {
            status: 409,
            message: "El nombre ya existe".to_string(),
        };
        assert_eq!(
            save_failure(err, "Error al guardar").unwrap(),
            "El nombre ya existe"
        );

        let err = BackendError::Api {
            status: 500,
            message: "db down".to_string(),
        };
        assert_eq!(
            load_failure(err, "Error al cargar categorias").unwrap(),
            "Error al cargar categorias"
        );

        assert!(load_failure(BackendError::Unauthorized, "x").is_err());
        assert!(save_failure(BackendError::Unauthorized, "x").is_err());
    }
}
