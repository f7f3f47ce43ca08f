//! Login and logout.
//!
//! Credentials are checked by the backend; the panel keeps the returned
//! token and admin identity in the session.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{AuthToken, BackendError, LoginResponse};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::{clear_admin_session, current_session, set_admin_session};
use crate::models::CurrentAdmin;
use crate::routes::render;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Credenciales inválidas o no tiene permisos de administrador.";
const CONNECTION_ERROR: &str = "Error al conectar con el servidor.";

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

/// Login form fields.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Message shown when the backend refuses a login.
fn login_error_message(err: &BackendError) -> String {
    match err {
        BackendError::Http(_) => CONNECTION_ERROR.to_string(),
        other => other.message_or(INVALID_CREDENTIALS),
    }
}

/// Display the login page, or skip it when already logged in.
#[instrument(skip(session))]
pub async fn login_page(session: Session) -> Response {
    if current_session(&session).await.is_some() {
        return Redirect::to("/admin/dashboard").into_response();
    }

    render(&LoginTemplate {
        email: String::new(),
        error: None,
    })
    .into_response()
}

/// Log in with email and password.
#[instrument(skip(state, session, form), fields(email = %form.email.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim();

    if email.is_empty() || form.password.is_empty() {
        return Ok(render(&LoginTemplate {
            email: email.to_string(),
            error: Some("Ingresa tu correo y contraseña.".to_string()),
        })
        .into_response());
    }

    match state.api().login(email, &form.password).await {
        Ok(LoginResponse { token, admin }) => {
            let current = CurrentAdmin::from(&admin);
            set_admin_session(&session, &AuthToken::new(token), &current).await?;
            set_sentry_user(admin.id.as_i64(), Some(&admin.email));
            tracing::info!(admin_id = %admin.id, "Admin logged in");
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Ok(render(&LoginTemplate {
                email: email.to_string(),
                error: Some(login_error_message(&e)),
            })
            .into_response())
        }
    }
}

/// Log out and return to the login page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_admin_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/admin/login"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        assert_eq!(
            login_error_message(&BackendError::Unauthorized),
            INVALID_CREDENTIALS
        );
        assert_eq!(
            login_error_message(&BackendError::Api {
                status: 403,
                message: "Cuenta desactivada".to_string()
            }),
            "Cuenta desactivada"
        );
        assert_eq!(
            login_error_message(&BackendError::Parse("eof".to_string())),
            INVALID_CREDENTIALS
        );
    }
}
