//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use catalogo_core::ProductPage;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{AdminProductQuery, BackendError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::{Layout, render};
use crate::state::AppState;

/// Shown on a card whose count could not be loaded.
const UNAVAILABLE: &str = "—";

/// One count card.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub href: &'static str,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub stats: Vec<StatCard>,
}

/// Count for a card; a failed fetch shows a dash for that card only.
fn stat_value<T>(result: std::result::Result<T, BackendError>, count: impl Fn(&T) -> u64) -> Result<String> {
    match result {
        Ok(value) => Ok(count(&value).to_string()),
        Err(BackendError::Unauthorized) => Err(AppError::Backend(BackendError::Unauthorized)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load dashboard count");
            Ok(UNAVAILABLE.to_string())
        }
    }
}

/// Dashboard page handler.
///
/// The four counts are fetched concurrently.
#[instrument(skip(auth, state, session))]
pub async fn index(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>> {
    let api = state.api();
    let token = &auth.token;
    let first_page = AdminProductQuery {
        page: 1,
        ..AdminProductQuery::default()
    };

    let (products, categories, tags, providers) = tokio::join!(
        api.products(token, &first_page),
        api.categories(token),
        api.tags(token),
        api.providers(token),
    );

    let stats = vec![
        StatCard {
            label: "Productos",
            value: stat_value(products, |page: &ProductPage| page.total)?,
            href: "/admin/productos",
        },
        StatCard {
            label: "Categorías",
            value: stat_value(categories, |list| list.len() as u64)?,
            href: "/admin/categorias",
        },
        StatCard {
            label: "Etiquetas",
            value: stat_value(tags, |list| list.len() as u64)?,
            href: "/admin/etiquetas",
        },
        StatCard {
            label: "Proveedores",
            value: stat_value(providers, |list| list.len() as u64)?,
            href: "/admin/proveedores",
        },
    ];

    let template = DashboardTemplate {
        layout: Layout::new(&auth, &session, "/admin/dashboard").await,
        stats,
    };

    Ok(render(&template))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_count_shows_dash() {
        let failed: std::result::Result<Vec<u8>, _> = Err(BackendError::Api {
            status: 500,
            message: String::new(),
        });
        assert_eq!(stat_value(failed, |v| v.len() as u64).unwrap(), UNAVAILABLE);

        let ok: std::result::Result<Vec<u8>, BackendError> = Ok(vec![1, 2, 3]);
        assert_eq!(stat_value(ok, |v| v.len() as u64).unwrap(), "3");
    }

    #[test]
    fn test_expired_token_is_not_hidden() {
        let expired: std::result::Result<Vec<u8>, _> = Err(BackendError::Unauthorized);
        assert!(stat_value(expired, |v| v.len() as u64).is_err());
    }
}
