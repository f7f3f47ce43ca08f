//! Catalog listing with filters, search and pagination.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use catalogo_core::{Category, CategoryId, Pager, Tag, TagId};
use serde::Deserialize;
use tracing::instrument;
use url::form_urlencoded;

use crate::backend::ProductQuery;
use crate::filters;
use crate::routes::{PaginationView, ProductCardView};
use crate::state::AppState;

/// Raw query parameters.
///
/// Everything arrives as text so that an empty `<select>` value (`category_id=`)
/// means "no filter" instead of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub page: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub search: Option<String>,
}

/// Filters the visitor has applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
    pub search: String,
}

impl CatalogFilters {
    /// Parse filters, ignoring values that are empty or malformed.
    #[must_use]
    pub fn from_params(params: &CatalogParams) -> Self {
        Self {
            category_id: params.category_id.as_deref().and_then(|s| s.parse().ok()),
            tag_id: params.tag_id.as_deref().and_then(|s| s.parse().ok()),
            search: params.search.as_deref().unwrap_or_default().trim().to_string(),
        }
    }

    /// Whether any filter is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category_id.is_some() || self.tag_id.is_some() || !self.search.is_empty()
    }

    /// Catalog URL for `page` keeping the current filters.
    #[must_use]
    pub fn href(&self, page: u32) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if page > 1 {
            query.append_pair("page", &page.to_string());
        }
        if let Some(id) = self.category_id {
            query.append_pair("category_id", &id.to_string());
        }
        if let Some(id) = self.tag_id {
            query.append_pair("tag_id", &id.to_string());
        }
        if !self.search.is_empty() {
            query.append_pair("search", &self.search);
        }

        let query = query.finish();
        if query.is_empty() {
            "/catalogo".to_string()
        } else {
            format!("/catalogo?{query}")
        }
    }

    /// Names of the active filters joined with ` · `.
    #[must_use]
    pub fn summary(&self, categories: &[Category], tags: &[Tag]) -> String {
        let category = self
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone());
        let tag = self
            .tag_id
            .and_then(|id| tags.iter().find(|t| t.id == id))
            .map(|t| t.name.clone());
        let search = (!self.search.is_empty()).then(|| format!("\"{}\"", self.search));

        [category, tag, search]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// An entry in a filter `<select>`.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Result count label.
#[must_use]
pub fn count_label(total: u64) -> String {
    if total == 1 {
        "1 producto encontrado".to_string()
    } else {
        format!("{total} productos encontrados")
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductCardView>,
    pub count_label: String,
    pub categories: Vec<FilterOption>,
    pub tags: Vec<FilterOption>,
    pub search: String,
    pub has_filters: bool,
    pub summary: String,
    pub pagination: PaginationView,
    pub error: Option<String>,
    pub whatsapp_chat: String,
}

/// Display the catalog.
///
/// Filter lists and the product page are fetched concurrently. A failure
/// loading the filter lists leaves them empty; a failure loading products
/// shows an inline error.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let filters = CatalogFilters::from_params(&params);
    let page = params
        .page
        .as_deref()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);

    let query = ProductQuery {
        page,
        category_id: filters.category_id,
        tag_id: filters.tag_id,
        search: Some(filters.search.clone()).filter(|s| !s.is_empty()),
    };

    let catalog = state.catalog();
    let (categories, tags, products) =
        tokio::join!(catalog.categories(), catalog.tags(), catalog.products(&query));

    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories for filters");
        Vec::new()
    });
    let tags = tags.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load tags for filters");
        Vec::new()
    });

    let (cards, total, pagination, error) = match products {
        Ok(result) => {
            let pager = Pager::new(page, result.page_count());
            let cards = result
                .products
                .iter()
                .map(|p| ProductCardView::new(p, catalog.base_url()))
                .collect();
            let pagination = PaginationView::new(&pager, |n| filters.href(n));
            (cards, result.total, pagination, None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            (
                Vec::new(),
                0,
                PaginationView::default(),
                Some("Error al cargar los productos. Intenta de nuevo.".to_string()),
            )
        }
    };

    CatalogTemplate {
        products: cards,
        count_label: count_label(total),
        categories: categories
            .iter()
            .map(|c| FilterOption {
                id: c.id.to_string(),
                name: c.name.clone(),
                selected: filters.category_id == Some(c.id),
            })
            .collect(),
        tags: tags
            .iter()
            .map(|t| FilterOption {
                id: t.id.to_string(),
                name: t.name.clone(),
                selected: filters.tag_id == Some(t.id),
            })
            .collect(),
        search: filters.search.clone(),
        has_filters: filters.is_active(),
        summary: filters.summary(&categories, &tags),
        pagination,
        error,
        whatsapp_chat: state.config().contact.chat_url(),
    }
}
