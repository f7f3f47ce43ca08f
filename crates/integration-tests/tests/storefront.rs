//! Storefront pages rendered against the mock catalog backend.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use catalogo_integration_tests::{MockBackend, spawn_storefront};

#[tokio::test]
async fn test_home_lists_categories_and_products() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    let (status, body) = app.page("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Porcelanato"));
    assert!(body.contains("Porcelanato Gris Mate 60x60"));
}

#[tokio::test]
async fn test_catalog_forwards_filters_to_backend() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    let (status, _) = app.page("/catalogo?search=gris&category_id=2&page=1").await;
    assert_eq!(status, StatusCode::OK);

    let listing = backend.requests_to(&Method::GET, "/api/products");
    let query = listing.last().unwrap().query.clone().unwrap_or_default();
    assert!(query.contains("category_id=2"), "query was {query}");
    assert!(query.contains("search=gris"), "query was {query}");
}

#[tokio::test]
async fn test_catalog_ignores_malformed_filters() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    let (status, _) = app.page("/catalogo?category_id=abc&page=-3").await;
    assert_eq!(status, StatusCode::OK);

    let listing = backend.requests_to(&Method::GET, "/api/products");
    let query = listing.last().unwrap().query.clone().unwrap_or_default();
    assert!(!query.contains("category_id"), "query was {query}");
}

#[tokio::test]
async fn test_product_page_offers_whatsapp_contact() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    let (status, body) = app.page("/producto/10").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Porcelanato Gris Mate 60x60"));
    assert!(body.contains("Consultar por WhatsApp"));
    assert!(body.contains("/uploads/gris-2.jpg"));
    assert!(!body.contains("18500"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    let (status, body) = app.page("/producto/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Página no encontrada"));
}

#[tokio::test]
async fn test_about_page_shows_saved_content() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    let (status, body) = app.page("/nosotros").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Somos una empresa familiar en Jacó."));
}

#[tokio::test]
async fn test_every_page_has_the_whatsapp_button() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    for path in ["/", "/catalogo", "/producto/10", "/nosotros"] {
        let (status, body) = app.page(path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(body.contains("class=\"whatsapp-float\""), "{path}");
        assert!(
            body.contains("50626431333?text=Hola%2C%20me%20gustar%C3%ADa"),
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let backend = MockBackend::start().await;
    let app = spawn_storefront(&backend).await;

    assert_eq!(app.page("/health").await.0, StatusCode::OK);
    assert_eq!(app.page("/health/ready").await.0, StatusCode::OK);
}
