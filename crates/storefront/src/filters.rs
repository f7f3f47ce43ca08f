//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Shortens text for product cards.
///
/// Usage in templates: `{{ product.description|excerpt(90) }}`
#[askama::filter_fn]
pub fn excerpt(
    value: impl Display,
    _env: &dyn askama::Values,
    max_chars: usize,
) -> askama::Result<String> {
    Ok(catalogo_core::format::truncate_text(
        &value.to_string(),
        max_chars,
    ))
}
