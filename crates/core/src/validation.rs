//! Form validation for the admin panel.
//!
//! Every admin form is validated here before any request goes out, and each
//! `validate` returns the trimmed payload the backend expects. Messages are
//! user facing.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Email, Price, PriceError, ProviderId, TagId};

/// Minimum admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static PHONE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\+?506)?[-\s]?[2-8]\d{3}[-\s]?\d{4}$").ok());

/// Validation failures shown next to a form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("El nombre es obligatorio")]
    NameRequired,
    #[error("El email es obligatorio")]
    EmailRequired,
    #[error("El email no es válido")]
    InvalidEmail,
    #[error("La contraseña es obligatoria")]
    PasswordRequired,
    #[error("La contraseña debe tener al menos {min} caracteres")]
    PasswordTooShort { min: usize },
    #[error("El teléfono no es válido")]
    InvalidPhone,
    #[error("El precio es obligatorio")]
    PriceRequired,
    #[error("El precio debe ser un número mayor que cero")]
    InvalidPrice,
}

/// Whether the value has any non-whitespace content.
#[must_use]
pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Whether the value is a well-formed email address.
#[must_use]
pub fn validate_email(value: &str) -> bool {
    Email::parse(value.trim()).is_ok()
}

/// Whether the value is a Costa Rican phone number
/// (`88888888`, `2222-2222`, `+506 8888-8888`, ...).
#[must_use]
pub fn validate_phone(value: &str) -> bool {
    PHONE_RE
        .as_ref()
        .is_some_and(|re| re.is_match(value.trim()))
}

/// Whether the amount is strictly positive.
#[must_use]
pub fn validate_positive_number(value: Decimal) -> bool {
    value > Decimal::ZERO
}

/// Check an admin password.
///
/// # Errors
///
/// Returns an error when the password is empty or shorter than
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), FormError> {
    if password.is_empty() {
        return Err(FormError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FormError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// A name-only form (categories and tags).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

impl NameForm {
    /// Trimmed payload.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NameRequired`] for a blank name.
    pub fn validate(&self) -> Result<Self, FormError> {
        let name = non_empty(&self.name).ok_or(FormError::NameRequired)?;
        Ok(Self { name })
    }
}

/// The provider form as posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub description: String,
}

/// Provider body sent to the backend. Blank optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProviderForm {
    /// Trimmed payload.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name or a phone that is present but not a
    /// Costa Rican number.
    pub fn validate(&self) -> Result<ProviderPayload, FormError> {
        let name = non_empty(&self.name).ok_or(FormError::NameRequired)?;
        let phone = non_empty(&self.phone);
        if phone.as_deref().is_some_and(|p| !validate_phone(p)) {
            return Err(FormError::InvalidPhone);
        }
        Ok(ProviderPayload {
            name,
            contact: non_empty(&self.contact),
            phone,
            description: non_empty(&self.description),
        })
    }
}

/// The admin account form as posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdminForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// Body for creating an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAdminPayload {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Body for editing an admin's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUpdatePayload {
    pub email: String,
    pub name: String,
}

/// Body for changing an admin's password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordPayload {
    pub password: String,
}

impl AdminForm {
    /// Payload for a new account.
    ///
    /// # Errors
    ///
    /// Fails on a blank or malformed email, a blank name, or a short password.
    pub fn validate_create(&self) -> Result<NewAdminPayload, FormError> {
        let AdminUpdatePayload { email, name } = self.validate_edit()?;
        validate_password(&self.password)?;
        Ok(NewAdminPayload {
            email,
            name,
            password: self.password.clone(),
        })
    }

    /// Payload for a profile edit (password untouched).
    ///
    /// # Errors
    ///
    /// Fails on a blank or malformed email or a blank name.
    pub fn validate_edit(&self) -> Result<AdminUpdatePayload, FormError> {
        let email = non_empty(&self.email).ok_or(FormError::EmailRequired)?;
        if !validate_email(&email) {
            return Err(FormError::InvalidEmail);
        }
        let name = non_empty(&self.name).ok_or(FormError::NameRequired)?;
        Ok(AdminUpdatePayload { email, name })
    }

    /// Payload for a password change.
    ///
    /// # Errors
    ///
    /// Fails on a blank or short password.
    pub fn validate_password_change(&self) -> Result<PasswordPayload, FormError> {
        validate_password(&self.password)?;
        Ok(PasswordPayload {
            password: self.password.clone(),
        })
    }
}

/// Product fields of the product form (everything except images).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category_ids: Vec<CategoryId>,
    pub tag_ids: Vec<TagId>,
    pub provider_ids: Vec<ProviderId>,
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category_ids: Vec<CategoryId>,
    pub tag_ids: Vec<TagId>,
    pub provider_ids: Vec<ProviderId>,
}

impl ProductFields {
    /// Trimmed payload.
    ///
    /// # Errors
    ///
    /// Fails on a blank name or a price that is missing or not positive.
    pub fn validate(&self) -> Result<ProductPayload, FormError> {
        let name = non_empty(&self.name).ok_or(FormError::NameRequired)?;
        let price = Price::parse(&self.price).map_err(|e| match e {
            PriceError::Empty => FormError::PriceRequired,
            _ => FormError::InvalidPrice,
        })?;
        Ok(ProductPayload {
            name,
            description: self.description.trim().to_owned(),
            price,
            category_ids: self.category_ids.clone(),
            tag_ids: self.tag_ids.clone(),
            provider_ids: self.provider_ids.clone(),
        })
    }
}
