//! Catalog entities as the backend serves them.
//!
//! These are plain serde models of the REST payloads. Optional fields are
//! `#[serde(default)]` because the public and admin endpoints return slightly
//! different shapes of the same entity.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    AdminId, AuditAction, AuditEntryId, CategoryId, Email, ImageId, Price, ProductId, ProviderId,
    TagId,
};

/// Site content key of the About block.
pub const ABOUT_US_KEY: &str = "about_us";

/// One image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product tag ("característica").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A provider as embedded in a product (id and name only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub id: ProviderId,
    pub name: String,
}

/// A provider with its contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A catalog product.
///
/// `price` is only present on admin endpoints; the public site never shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Legacy single-image field, kept in sync with the primary image by the backend.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub providers: Vec<ProviderRef>,
    #[serde(default)]
    pub price: Option<Price>,
}

impl Product {
    /// Images sorted by their display order.
    #[must_use]
    pub fn ordered_images(&self) -> Vec<&ProductImage> {
        let mut images: Vec<&ProductImage> = self.images.iter().collect();
        images.sort_by_key(|image| image.display_order);
        images
    }

    /// Path of the cover image: the flagged primary, else the first image by
    /// display order, else the legacy `image_url`.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.iter().min_by_key(|image| image.display_order))
            .map(|image| image.image_url.as_str())
            .or(self.image_url.as_deref())
    }

    /// Image paths for the product gallery, primary first.
    #[must_use]
    pub fn gallery(&self) -> Vec<&str> {
        let mut ordered = self.ordered_images();
        if let Some(pos) = ordered.iter().position(|image| image.is_primary) {
            let primary = ordered.remove(pos);
            ordered.insert(0, primary);
        }

        let paths: Vec<&str> = ordered.iter().map(|image| image.image_url.as_str()).collect();
        if paths.is_empty() {
            self.image_url.as_deref().into_iter().collect()
        } else {
            paths
        }
    }

    /// Name of the first category, used as the card eyebrow.
    #[must_use]
    pub fn first_category_name(&self) -> Option<&str> {
        self.categories.first().map(|category| category.name.as_str())
    }
}

/// One page of products.
///
/// The public endpoint reports `pages`; the admin endpoint has used both
/// `pages` and `total_pages` over time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl ProductPage {
    /// Number of pages, whichever field the backend filled in.
    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.pages.or(self.total_pages).unwrap_or(1).max(1)
    }
}

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Admin {
    /// Accounts without an explicit flag are active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Parsed email, if the stored address is well formed.
    #[must_use]
    pub fn email(&self) -> Option<Email> {
        Email::parse(&self.email).ok()
    }

    /// Creation time parsed from the backend's ISO-8601 timestamp.
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// One audit log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub admin_id: Option<AdminId>,
    #[serde(default)]
    pub admin_email: Option<String>,
    pub action: AuditAction,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AuditEntry {
    /// Label of the affected entity; logins have no entity of their own.
    #[must_use]
    pub fn entity_label(&self) -> String {
        if self.action == AuditAction::Login {
            return "Iniciar sesión".to_owned();
        }
        match (&self.entity, self.entity_id) {
            (Some(entity), Some(id)) => format!("{entity} #{id}"),
            (Some(entity), None) => entity.clone(),
            (None, _) => "—".to_owned(),
        }
    }

    /// Details as shown in the log: strings verbatim, anything else as compact JSON.
    #[must_use]
    pub fn details_label(&self) -> String {
        if self.action == AuditAction::Login {
            return "Iniciar sesión".to_owned();
        }
        match &self.details {
            serde_json::Value::Null => "—".to_owned(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Timestamp of the entry.
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// One page of the audit log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditPage {
    #[serde(default)]
    pub logs: Vec<AuditEntry>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

/// An editable block of site text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

/// Parse the timestamps the backend emits: RFC 3339, or naive ISO-8601 with
/// or without fractional seconds.
///
/// Naive timestamps are Costa Rica wall-clock time, so they render unchanged.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    naive
        .and_local_timezone(crate::format::costa_rica_offset()?)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json() -> serde_json::Value {
        json!({
            "id": 3,
            "name": "Porcelanato Gris",
            "description": null,
            "image_url": "/uploads/legacy.png",
            "images": [
                {"id": 10, "image_url": "/uploads/b.png", "is_primary": false, "display_order": 1},
                {"id": 11, "image_url": "/uploads/a.png", "is_primary": true, "display_order": 0},
                {"id": 12, "image_url": "/uploads/c.png", "is_primary": false, "display_order": 2}
            ],
            "categories": [{"id": 1, "name": "Pisos"}],
            "tags": [],
            "providers": [{"id": 4, "name": "Cerámica Sol"}]
        })
    }

    #[test]
    fn test_public_product_has_no_price() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert!(product.price.is_none());
        assert_eq!(product.description, "");
        assert_eq!(product.first_category_name(), Some("Pisos"));
    }

    #[test]
    fn test_primary_image_prefers_flag() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.primary_image(), Some("/uploads/a.png"));
        assert_eq!(
            product.gallery(),
            vec!["/uploads/a.png", "/uploads/b.png", "/uploads/c.png"]
        );
    }

    #[test]
    fn test_primary_image_falls_back_to_legacy_field() {
        let mut value = product_json();
        value["images"] = json!([]);
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.primary_image(), Some("/uploads/legacy.png"));
        assert_eq!(product.gallery(), vec!["/uploads/legacy.png"]);
    }

    #[test]
    fn test_page_count_reads_either_field() {
        let public: ProductPage =
            serde_json::from_value(json!({"products": [], "total": 0, "pages": 3})).unwrap();
        let admin: ProductPage = serde_json::from_value(
            json!({"products": [], "total": 0, "page": 1, "per_page": 15, "total_pages": 4}),
        )
        .unwrap();
        assert_eq!(public.page_count(), 3);
        assert_eq!(admin.page_count(), 4);
        assert_eq!(ProductPage::default().page_count(), 1);
    }

    #[test]
    fn test_audit_labels() {
        let login: AuditEntry = serde_json::from_value(json!({
            "id": 1, "admin_id": 2, "admin_email": "a@b.co", "action": "LOGIN",
            "entity": "admin", "entity_id": 2, "details": {"ip": "1.1.1.1"},
            "ip_address": "1.1.1.1", "created_at": "2026-10-18T14:05:00"
        }))
        .unwrap();
        assert_eq!(login.entity_label(), "Iniciar sesión");
        assert_eq!(login.details_label(), "Iniciar sesión");

        let update: AuditEntry = serde_json::from_value(json!({
            "id": 2, "admin_id": 2, "action": "UPDATE", "entity": "product",
            "entity_id": 9, "details": {"name": "Nuevo"}
        }))
        .unwrap();
        assert_eq!(update.entity_label(), "product #9");
        assert_eq!(update.details_label(), r#"{"name":"Nuevo"}"#);

        let text: AuditEntry = serde_json::from_value(json!({
            "id": 3, "admin_id": null, "action": "DELETE", "details": "Borrado manual"
        }))
        .unwrap();
        assert_eq!(text.details_label(), "Borrado manual");
        assert_eq!(text.entity_label(), "—");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-10-18T14:05:00Z").is_some());
        assert!(parse_timestamp("2026-10-18T14:05:00.123456").is_some());
        assert!(parse_timestamp("2026-10-18 14:05:00").is_some());
        assert!(parse_timestamp("ayer").is_none());
    }

    #[test]
    fn test_naive_timestamps_keep_wall_clock_time() {
        let naive = parse_timestamp("2026-03-02T16:30:00").unwrap();
        assert_eq!(crate::format::format_datetime_short(naive), "02/03/2026 16:30");

        let utc = parse_timestamp("2026-03-02T16:30:00Z").unwrap();
        assert_eq!(crate::format::format_datetime_short(utc), "02/03/2026 10:30");
    }

    #[test]
    fn test_admin_defaults_to_active() {
        let admin: Admin =
            serde_json::from_value(json!({"id": 1, "email": "a@b.co", "name": "Ana"})).unwrap();
        assert!(admin.is_active());
        assert!(admin.email().is_some());
    }
}
