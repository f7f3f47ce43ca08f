//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::backend::ProductQuery;
use crate::filters;
use crate::routes::ProductCardView;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductCardView>,
    pub error: Option<String>,
    pub whatsapp_chat: String,
}

/// Display the home page.
///
/// A backend failure only hides the featured grid; the rest of the page renders.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let query = ProductQuery {
        page: 1,
        ..ProductQuery::default()
    };
    let whatsapp_chat = state.config().contact.chat_url();

    match state.catalog().products(&query).await {
        Ok(page) => HomeTemplate {
            featured: page
                .products
                .iter()
                .take(FEATURED_COUNT)
                .map(|p| ProductCardView::new(p, state.catalog().base_url()))
                .collect(),
            error: None,
            whatsapp_chat,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load featured products");
            HomeTemplate {
                featured: Vec::new(),
                error: Some("Error al cargar los productos destacados".to_string()),
                whatsapp_chat,
            }
        }
    }
}
