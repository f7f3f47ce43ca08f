//! Authentication, admin accounts and the audit log.

use catalogo_core::validation::{AdminUpdatePayload, NewAdminPayload, PasswordPayload};
use catalogo_core::{Admin, AdminId, AuditPage};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::client::{execute, send};
use super::{AdminApiClient, AuthToken, BackendError};

/// Audit entries requested per page.
pub const AUDIT_PER_PAGE: u32 = 50;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: Admin,
}

/// `GET /api/auth/admins` envelope.
#[derive(Debug, Deserialize)]
pub struct AdminList {
    #[serde(default)]
    pub admins: Vec<Admin>,
}

/// Envelope returned by admin mutations.
#[derive(Debug, Deserialize)]
pub struct AdminResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub admin: Admin,
}

impl AdminApiClient {
    // =========================================================================
    // Session
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] for rejected credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError> {
        self.send_json(
            Method::POST,
            None,
            "/api/auth/login",
            &LoginRequest { email, password },
        )
        .await
    }

    /// The admin the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] for an expired token.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &AuthToken) -> Result<Admin, BackendError> {
        self.get(token, self.url("/api/auth/me")?).await
    }

    // =========================================================================
    // Admin accounts
    // =========================================================================

    /// List every admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn admins(&self, token: &AuthToken) -> Result<Vec<Admin>, BackendError> {
        let list: AdminList = self.get(token, self.url("/api/auth/admins")?).await?;
        Ok(list.admins)
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the email is taken.
    #[instrument(skip(self, token, payload), fields(email = %payload.email))]
    pub async fn create_admin(
        &self,
        token: &AuthToken,
        payload: &NewAdminPayload,
    ) -> Result<Admin, BackendError> {
        let response: AdminResponse = self
            .send_json(Method::POST, Some(token), "/api/auth/admins", payload)
            .await?;
        Ok(response.admin)
    }

    /// Update an admin's email and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn update_admin(
        &self,
        token: &AuthToken,
        id: AdminId,
        payload: &AdminUpdatePayload,
    ) -> Result<Admin, BackendError> {
        let response: AdminResponse = self
            .send_json(
                Method::PUT,
                Some(token),
                &format!("/api/auth/admins/{id}"),
                payload,
            )
            .await?;
        Ok(response.admin)
    }

    /// Replace an admin's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn change_admin_password(
        &self,
        token: &AuthToken,
        id: AdminId,
        payload: &PasswordPayload,
    ) -> Result<(), BackendError> {
        execute(
            self.request(
                Method::PUT,
                self.url(&format!("/api/auth/admins/{id}/password"))?,
                Some(token),
            )
            .json(payload),
        )
        .await
    }

    /// Flip an admin's active flag and return the updated account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn toggle_admin(&self, token: &AuthToken, id: AdminId) -> Result<Admin, BackendError> {
        let response: AdminResponse = send(self.request(
            Method::PUT,
            self.url(&format!("/api/auth/admins/{id}/toggle"))?,
            Some(token),
        ))
        .await?;
        Ok(response.admin)
    }

    // =========================================================================
    // Audit log
    // =========================================================================

    /// One page of the audit log, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn audit(&self, token: &AuthToken, page: u32) -> Result<AuditPage, BackendError> {
        let mut url = self.url("/api/auth/audit")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .append_pair("per_page", &AUDIT_PER_PAGE.to_string());
        self.get(token, url).await
    }
}
