//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use catalogo_core::{Admin, AdminId};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's backend ID.
    pub id: AdminId,
    /// Admin's email address.
    pub email: String,
    /// Admin's display name.
    pub name: String,
}

impl From<&Admin> for CurrentAdmin {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}

/// Kind of a one-shot message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// A message shown once on the page a redirect lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Whether this is an error message.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == FlashKind::Error
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the backend bearer token.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Key for the logged-in admin's identity.
    pub const ADMIN_DATA: &str = "admin_data";

    /// Key for the pending one-shot message.
    pub const FLASH: &str = "flash";
}
