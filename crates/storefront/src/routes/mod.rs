//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products)
//! GET  /catalogo               - Catalog with category, tag and search filters
//! GET  /producto/{id}          - Product detail with image gallery
//! GET  /nosotros               - About page with editable content
//! ```
//!
//! Health checks and static files are mounted in `app()`.

pub mod about;
pub mod catalog;
pub mod home;
pub mod products;

use axum::{Router, routing::get};
use catalogo_core::{PageItem, Pager, Product, ProductId, format};

use crate::state::AppState;

/// Card shown in product grids.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub has_image: bool,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl ProductCardView {
    /// Build a card, resolving the cover image against the backend URL.
    #[must_use]
    pub fn new(product: &Product, api_base: &str) -> Self {
        let cover = product.primary_image();
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: format::resolve_image_url(api_base, cover),
            has_image: cover.is_some(),
            categories: product.categories.iter().map(|c| c.name.clone()).collect(),
            tags: product.tags.iter().map(|t| t.name.clone()).collect(),
        }
    }
}

/// One entry in the page list: a numbered link or a gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: Option<u32>,
    pub href: String,
    pub is_current: bool,
}

/// Rendered pagination controls.
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
        let links = pager
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
            .collect();

        Self {
            visible: pager.is_visible(),
            prev: pager.prev().map(&href),
            next: pager.next().map(&href),
            links,
        }
    }
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/catalogo", get(catalog::index))
        .route("/producto/{id}", get(products::show))
        .route("/nosotros", get(about::about))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_view_marks_current_and_gaps() {
        let pager = Pager::new(5, 10);
        let view = PaginationView::new(&pager, |n| format!("/catalogo?page={n}"));

        assert!(view.visible);
        assert_eq!(view.prev.as_deref(), Some("/catalogo?page=4"));
        assert_eq!(view.next.as_deref(), Some("/catalogo?page=6"));
        assert!(view.links.iter().any(|l| l.number.is_none()));
        let current: Vec<_> = view.links.iter().filter(|l| l.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].number, Some(5));
    }

    #[test]
    fn test_single_page_is_hidden() {
        let view = PaginationView::new(&Pager::new(1, 1), |n| n.to_string());
        assert!(!view.visible);
        assert!(view.prev.is_none());
        assert!(view.next.is_none());
    }
}
