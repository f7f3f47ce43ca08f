//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use catalogo_core::{Product, ProductId, format};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Query parameters for the detail page.
#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    /// Selected gallery image index.
    pub img: Option<String>,
}

/// Gallery thumbnail.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub url: String,
    pub href: String,
    pub selected: bool,
}

/// Image gallery state for one render.
#[derive(Debug, Clone)]
pub struct GalleryView {
    pub current_url: String,
    pub has_images: bool,
    /// `N / total`, only meaningful with more than one image.
    pub counter: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
}

impl GalleryView {
    /// Build the gallery with `selected` wrapped into range.
    #[must_use]
    pub fn new(product: &Product, api_base: &str, selected: i64) -> Self {
        let paths = product.gallery();
        let urls: Vec<String> = paths
            .iter()
            .map(|p| format::resolve_image_url(api_base, Some(p)))
            .collect();

        let Ok(len) = i64::try_from(urls.len()) else {
            return Self::empty();
        };
        if len == 0 {
            return Self::empty();
        }

        let index = selected.rem_euclid(len);
        let href = |i: i64| format!("/producto/{}?img={}", product.id, i.rem_euclid(len));
        let multiple = len > 1;

        Self {
            current_url: urls
                .get(usize::try_from(index).unwrap_or_default())
                .cloned()
                .unwrap_or_else(|| format::PLACEHOLDER_IMAGE.to_string()),
            has_images: true,
            counter: format!("{} / {len}", index + 1),
            prev_href: multiple.then(|| href(index - 1)),
            next_href: multiple.then(|| href(index + 1)),
            thumbnails: if multiple {
                urls.into_iter()
                    .zip(0_i64..)
                    .map(|(url, i)| Thumbnail {
                        url,
                        href: href(i),
                        selected: i == index,
                    })
                    .collect()
            } else {
                Vec::new()
            },
        }
    }

    fn empty() -> Self {
        Self {
            current_url: format::PLACEHOLDER_IMAGE.to_string(),
            has_images: false,
            counter: String::new(),
            prev_href: None,
            next_href: None,
            thumbnails: Vec::new(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub gallery: GalleryView,
    pub whatsapp_url: String,
    pub whatsapp_chat: String,
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
) -> Result<ProductTemplate> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("product {id}")))?;

    let product = state.catalog().product(id).await?;
    add_breadcrumb("product", &product.name, Some(&[("id", &id.to_string())]));

    let selected = params
        .img
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(0);

    Ok(ProductTemplate {
        gallery: GalleryView::new(&product, state.catalog().base_url(), selected),
        whatsapp_url: format::whatsapp_link(&state.config().contact.whatsapp_phone, &product.name),
        whatsapp_chat: state.config().contact.chat_url(),
        categories: product.categories.iter().map(|c| c.name.clone()).collect(),
        tags: product.tags.iter().map(|t| t.name.clone()).collect(),
        description: product.description,
        name: product.name,
    })
}

#[cfg(test)]
mod tests {
    use catalogo_core::{ImageId, ProductImage};

    use super::*;

    fn product(images: &[(i64, &str, bool)]) -> Product {
        Product {
            id: ProductId::new(7),
            name: "Porcelanato Roma".to_string(),
            description: String::new(),
            image_url: None,
            images: images
                .iter()
                .zip(0..)
                .map(|(&(id, url, is_primary), order)| ProductImage {
                    id: ImageId::new(id),
                    image_url: url.to_string(),
                    is_primary,
                    display_order: order,
                })
                .collect(),
            categories: Vec::new(),
            tags: Vec::new(),
            providers: Vec::new(),
            price: None,
        }
    }

    #[test]
    fn test_gallery_wraps_selection() {
        let p = product(&[(1, "/uploads/a.jpg", true), (2, "/uploads/b.jpg", false)]);

        let gallery = GalleryView::new(&p, "http://api", 2);
        assert_eq!(gallery.current_url, "http://api/uploads/a.jpg");
        assert_eq!(gallery.counter, "1 / 2");

        let gallery = GalleryView::new(&p, "http://api", -1);
        assert_eq!(gallery.current_url, "http://api/uploads/b.jpg");
        assert_eq!(gallery.counter, "2 / 2");
        assert_eq!(gallery.next_href.as_deref(), Some("/producto/7?img=0"));
        assert_eq!(gallery.prev_href.as_deref(), Some("/producto/7?img=0"));
        assert!(gallery.thumbnails[1].selected);
    }

    #[test]
    fn test_gallery_single_image_has_no_controls() {
        let p = product(&[(1, "https://cdn.example.com/a.jpg", true)]);
        let gallery = GalleryView::new(&p, "http://api", 0);
        assert!(gallery.has_images);
        assert_eq!(gallery.current_url, "https://cdn.example.com/a.jpg");
        assert!(gallery.prev_href.is_none());
        assert!(gallery.thumbnails.is_empty());
    }

    #[test]
    fn test_gallery_without_images_uses_placeholder() {
        let gallery = GalleryView::new(&product(&[]), "http://api", 3);
        assert!(!gallery.has_images);
        assert_eq!(gallery.current_url, format::PLACEHOLDER_IMAGE);
    }
}
