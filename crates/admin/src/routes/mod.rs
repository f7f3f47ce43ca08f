//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /admin/login                         - Login page
//! POST /admin/login                         - Log in against the backend
//! POST /admin/logout                        - Logout
//! GET  /admin/dashboard                     - Counts overview
//!
//! # Products
//! GET  /admin/productos                     - Listing with filters
//! GET  /admin/productos/nuevo               - Open a draft for a new product
//! GET  /admin/productos/{id}/editar         - Open a draft for a stored product
//! POST /admin/productos/{id}/eliminar       - Delete
//! GET  /admin/productos/borrador/{draft}    - Product form
//! POST /admin/productos/borrador/{draft}    - Form action (upload, primary, remove, move, save)
//! GET  /admin/productos/borrador/{draft}/imagen/{key} - Preview of a pending upload
//!
//! # Taxonomy and providers
//! GET  /admin/{categorias|etiquetas|proveedores}       - List (?editar={id})
//! POST /admin/{categorias|etiquetas|proveedores}       - Create
//! POST /admin/{...}/{id}                               - Update
//! POST /admin/{...}/{id}/eliminar                      - Delete
//!
//! # Admins
//! GET  /admin/admins                        - List (?editar={id}, ?password={id})
//! POST /admin/admins                        - Create
//! POST /admin/admins/{id}                   - Edit profile
//! POST /admin/admins/{id}/password          - Change password
//! POST /admin/admins/{id}/toggle            - Activate / deactivate
//!
//! # Content and audit
//! GET  /admin/contenido, POST /admin/contenido - About block
//! GET  /admin/bitacora                      - Audit log (?page)
//! ```

pub mod admins;
pub mod audit;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod products;
pub mod providers;
pub mod taxonomy;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{Html, Redirect},
    routing::{get, post},
};
use catalogo_core::{PageItem, Pager};
use tower_sessions::Session;

use crate::flash;
use crate::middleware::AdminSession;
use crate::models::{CurrentAdmin, Flash};
use crate::state::AppState;

/// Largest product form body: ten 5 MiB images plus the text fields.
const PRODUCT_FORM_LIMIT: usize = 60 * 1024 * 1024;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone(),
        }
    }
}

/// What the shared layout needs: who is logged in, which nav entry is
/// active and the pending flash message.
#[derive(Debug, Clone)]
pub struct Layout {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub flash: Option<Flash>,
}

impl Layout {
    /// Build the layout, consuming any queued flash message.
    pub async fn new(auth: &AdminSession, session: &Session, current_path: &'static str) -> Self {
        Self {
            admin: AdminUserView::from(&auth.admin),
            current_path,
            flash: flash::take(session).await,
        }
    }

    /// Whether the nav entry for `path` is the active one.
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path
    }
}

/// Render a template, logging failures.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// One entry in the page list: a numbered link or a gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: Option<u32>,
    pub href: String,
    pub is_current: bool,
}

/// Pagination controls for admin listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationView {
    pub visible: bool,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLink>,
}

impl PaginationView {
    /// Build links for `pager`, using `href` to render each page's URL.
    pub fn new(pager: &Pager, href: impl Fn(u32) -> String) -> Self {
        Self {
            visible: pager.is_visible(),
            prev: pager.prev().map(&href),
            next: pager.next().map(&href),
            links: pager
                .items
                .iter()
                .map(|item| match *item {
                    PageItem::Page(n) => PageLink {
                        number: Some(n),
                        href: href(n),
                        is_current: n == pager.current,
                    },
                    PageItem::Ellipsis => PageLink {
                        number: None,
                        href: String::new(),
                        is_current: false,
                    },
                })
                .collect(),
        }
    }
}

/// Parse an optional numeric query value; blank or malformed means absent.
pub(crate) fn parse_param<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|s| s.trim().parse().ok())
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin/dashboard") }))
        .route("/admin", get(|| async { Redirect::to("/admin/dashboard") }))
        // Auth
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        // Dashboard
        .route("/admin/dashboard", get(dashboard::index))
        // Products
        .route("/admin/productos", get(products::index))
        .route("/admin/productos/nuevo", get(products::new_product))
        .route("/admin/productos/{id}/editar", get(products::edit))
        .route("/admin/productos/{id}/eliminar", post(products::delete))
        .route(
            "/admin/productos/borrador/{draft}",
            get(products::form)
                .post(products::form_action)
                .layer(DefaultBodyLimit::max(PRODUCT_FORM_LIMIT)),
        )
        .route(
            "/admin/productos/borrador/{draft}/imagen/{key}",
            get(products::preview),
        )
        // Categories and tags
        .route(
            "/admin/categorias",
            get(taxonomy::categories).post(taxonomy::create_category),
        )
        .route("/admin/categorias/{id}", post(taxonomy::update_category))
        .route(
            "/admin/categorias/{id}/eliminar",
            post(taxonomy::delete_category),
        )
        .route(
            "/admin/etiquetas",
            get(taxonomy::tags).post(taxonomy::create_tag),
        )
        .route("/admin/etiquetas/{id}", post(taxonomy::update_tag))
        .route("/admin/etiquetas/{id}/eliminar", post(taxonomy::delete_tag))
        // Providers
        .route(
            "/admin/proveedores",
            get(providers::index).post(providers::create),
        )
        .route("/admin/proveedores/{id}", post(providers::update))
        .route("/admin/proveedores/{id}/eliminar", post(providers::delete))
        // Admins
        .route("/admin/admins", get(admins::index).post(admins::create))
        .route("/admin/admins/{id}", post(admins::update))
        .route("/admin/admins/{id}/password", post(admins::change_password))
        .route("/admin/admins/{id}/toggle", post(admins::toggle))
        // Content and audit
        .route("/admin/contenido", get(content::edit).post(content::save))
        .route("/admin/bitacora", get(audit::index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_links_keep_href_builder() {
        let view = PaginationView::new(&Pager::new(2, 3), |n| format!("/admin/bitacora?page={n}"));
        assert!(view.visible);
        assert_eq!(view.prev.as_deref(), Some("/admin/bitacora?page=1"));
        assert_eq!(view.next.as_deref(), Some("/admin/bitacora?page=3"));
        assert_eq!(view.links.len(), 3);
    }

    #[test]
    fn test_parse_param_ignores_blank_values() {
        assert_eq!(parse_param::<u32>(Some(" 4 ")), Some(4));
        assert_eq!(parse_param::<u32>(Some("")), None);
        assert_eq!(parse_param::<u32>(Some("x")), None);
        assert_eq!(parse_param::<u32>(None), None);
    }
}
