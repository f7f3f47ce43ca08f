//! About page with the editable `about_us` content.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use catalogo_core::ABOUT_US_KEY;
use comrak::{Options, markdown_to_html};
use tracing::instrument;

use crate::config::ContactConfig;
use crate::filters;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    /// Rendered HTML of the editable block, if one has been saved.
    pub content_html: Option<String>,
    pub contact: ContactConfig,
    pub whatsapp_chat: String,
}

/// Render admin-authored Markdown. Raw HTML in the source is dropped.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    markdown_to_html(content, &options)
}

/// Display the about page.
///
/// A missing or unreachable content block leaves only the fixed sections.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    let content_html = match state.catalog().site_content(ABOUT_US_KEY).await {
        Ok(block) if !block.content.trim().is_empty() => Some(render_markdown(&block.content)),
        Ok(_) => None,
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load about content");
            None
        }
    };

    let contact = state.config().contact.clone();
    AboutTemplate {
        content_html,
        whatsapp_chat: contact.chat_url(),
        contact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_paragraphs() {
        let html = render_markdown("Somos **Pisos Kermy**.\n\nDesde 1998.");
        assert!(html.contains("<strong>Pisos Kermy</strong>"));
        assert!(html.contains("<p>Desde 1998.</p>"));
    }

    #[test]
    fn test_render_markdown_drops_raw_html() {
        let html = render_markdown("<script>alert(1)</script>\n\nTexto");
        assert!(!html.contains("<script>"));
        assert!(html.contains("<p>Texto</p>"));
    }
}
