//! Display helpers: dates, text, image paths and contact links.
//!
//! Dates are shown in Costa Rica time (UTC-6, no daylight saving).

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

/// Image shown for products without one.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder-product.svg";

const COSTA_RICA_OFFSET_SECS: i32 = -6 * 3600;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Costa Rica's offset from UTC.
#[must_use]
pub fn costa_rica_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(COSTA_RICA_OFFSET_SECS)
}

fn local(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    costa_rica_offset().map_or_else(|| dt.fixed_offset(), |offset| dt.with_timezone(&offset))
}

/// Long form: `18 de octubre de 2026, 14:05`.
#[must_use]
pub fn format_date(dt: DateTime<Utc>) -> String {
    let dt = local(dt);
    let month = MONTHS
        .get(dt.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!(
        "{} de {} de {}, {:02}:{:02}",
        dt.day(),
        month,
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

/// Short form: `18/10/2026`.
#[must_use]
pub fn format_date_short(dt: DateTime<Utc>) -> String {
    local(dt).format("%d/%m/%Y").to_string()
}

/// Short form with time: `18/10/2026 14:05`.
#[must_use]
pub fn format_datetime_short(dt: DateTime<Utc>) -> String {
    local(dt).format("%d/%m/%Y %H:%M").to_string()
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", text.get(..byte_idx).unwrap_or(text)),
        None => text.to_owned(),
    }
}

/// Absolute URL for an image path returned by the backend.
///
/// Absolute `http(s)` URLs pass through, relative paths are joined to the
/// API base, and a missing path yields the placeholder.
#[must_use]
pub fn resolve_image_url(api_base: &str, path: Option<&str>) -> String {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_owned();
    };
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }

    let base = api_base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Prefilled message of the site-wide WhatsApp button.
pub const WHATSAPP_GREETING: &str = "Hola, me gustaría obtener más información sobre sus productos";

/// WhatsApp chat link with the general greeting.
#[must_use]
pub fn whatsapp_chat_link(phone: &str) -> String {
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(WHATSAPP_GREETING))
}

/// WhatsApp chat link asking about a product.
#[must_use]
pub fn whatsapp_link(phone: &str, product_name: &str) -> String {
    let message = format!("Hola, me interesa el producto: {product_name}");
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(&message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_format_date_uses_costa_rica_time() {
        let dt = at("2026-10-18T20:05:00Z");
        assert_eq!(format_date(dt), "18 de octubre de 2026, 14:05");
        assert_eq!(format_date_short(dt), "18/10/2026");
        assert_eq!(format_datetime_short(dt), "18/10/2026 14:05");
    }

    #[test]
    fn test_format_date_crosses_midnight() {
        let dt = at("2026-01-01T03:00:00Z");
        assert_eq!(format_date_short(dt), "31/12/2025");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("corto", 10), "corto");
        assert_eq!(truncate_text("cerámica", 5), "cerám...");
        assert_eq!(truncate_text("exacto", 6), "exacto");
    }

    #[test]
    fn test_resolve_image_url() {
        let base = "http://localhost:5000/";
        assert_eq!(resolve_image_url(base, None), PLACEHOLDER_IMAGE);
        assert_eq!(resolve_image_url(base, Some("")), PLACEHOLDER_IMAGE);
        assert_eq!(
            resolve_image_url(base, Some("/uploads/a.png")),
            "http://localhost:5000/uploads/a.png"
        );
        assert_eq!(
            resolve_image_url(base, Some("uploads/a.png")),
            "http://localhost:5000/uploads/a.png"
        );
        assert_eq!(
            resolve_image_url(base, Some("https://cdn.example.com/a.png")),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        assert_eq!(
            whatsapp_link("50626431333", "Piso & Pared"),
            "https://wa.me/50626431333?text=Hola%2C%20me%20interesa%20el%20producto%3A%20Piso%20%26%20Pared"
        );
    }

    #[test]
    fn test_whatsapp_chat_link_carries_greeting() {
        let link = whatsapp_chat_link("50626431333");
        assert!(link.starts_with("https://wa.me/50626431333?text=Hola%2C%20me%20gustar%C3%ADa"));
        assert!(link.ends_with("sus%20productos"));
    }
}
