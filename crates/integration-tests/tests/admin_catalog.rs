//! Admin catalog management: taxonomy, providers, products and site content.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use catalogo_integration_tests::{MockBackend, TEST_PASSWORD, TestApp, location, spawn_admin};
use regex::Regex;
use reqwest::multipart::{Form, Part};

async fn logged_in() -> (MockBackend, TestApp) {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;
    app.login().await;
    (backend, app)
}

fn png(name: &str) -> Part {
    Part::bytes(vec![0x89, b'P', b'N', b'G', 1, 2, 3])
        .file_name(name.to_owned())
        .mime_str("image/png")
        .unwrap()
}

fn product_fields(action: &str) -> Form {
    Form::new()
        .text("name", "Cerámica Blanca 30x30")
        .text("description", "Brillante, para baños.")
        .text("price", "12500")
        .text("category_ids", "1")
        .text("tag_ids", "1")
        .text("action", action.to_owned())
}

#[tokio::test]
async fn test_empty_category_name_is_rejected_without_a_call() {
    let (backend, app) = logged_in().await;

    let response = app
        .post_form("/admin/categorias", &[("name", "   ")])
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("El nombre es obligatorio"));
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn test_create_category_trims_and_flashes() {
    let (backend, app) = logged_in().await;

    let response = app
        .post_form("/admin/categorias", &[("name", "  Madera  ")])
        .await;
    assert_eq!(location(&response), "/admin/categorias");

    let created = backend.requests_to(&Method::POST, "/api/admin/categories");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].json()["name"], "Madera");

    let (_, body) = app.page("/admin/categorias").await;
    assert!(body.contains("Madera"));
}

#[tokio::test]
async fn test_rename_and_delete_tag() {
    let (backend, app) = logged_in().await;

    let (_, body) = app.page("/admin/etiquetas?editar=1").await;
    assert!(body.contains("action=\"/admin/etiquetas/1\""));

    app.post_form("/admin/etiquetas/1", &[("name", "Exterior")])
        .await;
    app.post_form("/admin/etiquetas/1/eliminar", &[]).await;

    let renamed = backend.requests_to(&Method::PUT, "/api/admin/tags/1");
    assert_eq!(renamed[0].json()["name"], "Exterior");
    assert_eq!(
        backend.requests_to(&Method::DELETE, "/api/admin/tags/1").len(),
        1
    );
}

#[tokio::test]
async fn test_provider_requires_a_name() {
    let (backend, app) = logged_in().await;

    let response = app
        .post_form(
            "/admin/proveedores",
            &[("name", ""), ("contact", "Marta"), ("phone", "8888-1111")],
        )
        .await;

    let body = response.text().await.unwrap();
    assert!(body.contains("El nombre es obligatorio"));
    // What was typed stays in the form
    assert!(body.contains("Marta"));
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn test_product_listing_forwards_filters() {
    let (backend, app) = logged_in().await;

    let (status, body) = app
        .page("/admin/productos?provider_id=1&search=gris")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Porcelanato Gris Mate 60x60"));
    assert!(body.contains("1 producto encontrado"));

    let listing = backend.requests_to(&Method::GET, "/api/admin/products");
    let query = listing.last().unwrap().query.clone().unwrap_or_default();
    assert!(query.contains("provider_id=1"), "query was {query}");
    assert!(query.contains("search=gris"), "query was {query}");
}

#[tokio::test]
async fn test_new_product_with_chosen_primary_image() {
    let (backend, app) = logged_in().await;

    let response = app.get("/admin/productos/nuevo").await;
    let draft = location(&response);
    assert!(draft.starts_with("/admin/productos/borrador/"));

    let upload = product_fields("upload")
        .part("images", png("blanca-1.png"))
        .part("images", png("blanca-2.png"));
    let response = app.post_multipart(&draft, upload).await;
    assert_eq!(location(&response), draft);

    // The first upload starts as primary, so only the second offers the button
    let (_, form) = app.page(&draft).await;
    let primary = Regex::new(r#"value="primary:(n-\d+)""#).unwrap();
    let keys: Vec<String> = primary
        .captures_iter(&form)
        .map(|c| c[1].to_owned())
        .collect();
    assert_eq!(keys, vec!["n-1".to_owned()]);

    let response = app
        .post_multipart(&draft, product_fields("primary:n-1"))
        .await;
    assert_eq!(location(&response), draft);
    assert!(backend.mutations().is_empty());

    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), "/admin/productos");

    let created = backend.requests_to(&Method::POST, "/api/admin/products");
    assert_eq!(created.len(), 1);
    let request = &created[0];
    assert_eq!(request.image_parts(), 2);
    assert_eq!(request.multipart_field("primary_image_index").as_deref(), Some("1"));
    assert_eq!(request.multipart_field("price").as_deref(), Some("12500"));
    assert_eq!(request.multipart_field("category_ids").as_deref(), Some("[1]"));

    let (_, listing) = app.page("/admin/productos").await;
    assert!(listing.contains("Producto creado"));
}

#[tokio::test]
async fn test_new_product_without_images_is_not_sent() {
    let (backend, app) = logged_in().await;

    let draft = location(&app.get("/admin/productos/nuevo").await);
    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), draft);

    let (_, form) = app.page(&draft).await;
    assert!(form.contains("Debes agregar al menos una imagen"));
    // Fields survive the round trip
    assert!(form.contains("Cerámica Blanca 30x30"));
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn test_edit_product_switches_primary_and_removes_image() {
    let (backend, app) = logged_in().await;

    let draft = location(&app.get("/admin/productos/10/editar").await);
    assert!(draft.starts_with("/admin/productos/borrador/"));

    let (_, form) = app.page(&draft).await;
    assert!(form.contains("Porcelanato Gris Mate 60x60"));
    assert!(form.contains("Editar Producto"));

    app.post_multipart(&draft, product_fields("primary:e-51"))
        .await;
    app.post_multipart(&draft, product_fields("remove:e-50"))
        .await;
    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), "/admin/productos");

    assert_eq!(
        backend
            .requests_to(&Method::PUT, "/api/admin/products/10")
            .len(),
        1
    );
    assert_eq!(
        backend
            .requests_to(&Method::DELETE, "/api/admin/products/10/images/50")
            .len(),
        1
    );
    assert_eq!(
        backend
            .requests_to(&Method::PUT, "/api/admin/products/10/images/51/set-primary")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_retry_after_failed_fetch_does_not_upload_again() {
    let (backend, app) = logged_in().await;
    backend.omit_images_on_write();

    let draft = location(&app.get("/admin/productos/10/editar").await);
    let upload = product_fields("upload").part("images", png("gris-3.png"));
    app.post_multipart(&draft, upload).await;

    // The update is stored but the image list cannot be read back
    backend.fail_once(Method::GET, "/api/admin/products/10");
    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), draft);
    let (_, form) = app.page(&draft).await;
    assert!(form.contains("Error interno del servidor"));

    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), "/admin/productos");

    let updates = backend.requests_to(&Method::PUT, "/api/admin/products/10");
    let image_parts: Vec<usize> = updates.iter().map(|r| r.image_parts()).collect();
    assert_eq!(image_parts, vec![1], "the upload went out more than once");
    assert_eq!(backend.product_image_ids(10).len(), 3);
    assert_eq!(backend.product_primary_id(10), Some(50));
}

#[tokio::test]
async fn test_retry_after_failed_deletion_repeats_only_that_deletion() {
    let (backend, app) = logged_in().await;

    let draft = location(&app.get("/admin/productos/10/editar").await);
    let upload = product_fields("upload").part("images", png("gris-3.png"));
    app.post_multipart(&draft, upload).await;
    app.post_multipart(&draft, product_fields("remove:e-50")).await;
    app.post_multipart(&draft, product_fields("remove:e-51")).await;

    backend.fail_once(Method::DELETE, "/api/admin/products/10/images/51");
    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), draft);

    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), "/admin/productos");

    assert_eq!(
        backend.requests_to(&Method::PUT, "/api/admin/products/10").len(),
        1
    );
    assert_eq!(
        backend
            .requests_to(&Method::DELETE, "/api/admin/products/10/images/50")
            .len(),
        1
    );
    assert_eq!(
        backend
            .requests_to(&Method::DELETE, "/api/admin/products/10/images/51")
            .len(),
        2
    );

    let remaining = backend.product_image_ids(10);
    assert_eq!(remaining.len(), 1);
    assert_eq!(backend.product_primary_id(10), remaining.first().copied());
}

#[tokio::test]
async fn test_retry_after_create_keeps_the_created_product() {
    let (backend, app) = logged_in().await;
    backend.omit_images_on_write();

    let draft = location(&app.get("/admin/productos/nuevo").await);

    // First id the mock hands out
    backend.fail_once(Method::GET, "/api/admin/products/101");
    let save = product_fields("save").part("images", png("blanca-1.png"));
    let response = app.post_multipart(&draft, save).await;
    assert_eq!(location(&response), draft);

    let response = app.post_multipart(&draft, product_fields("save")).await;
    assert_eq!(location(&response), "/admin/productos");

    assert_eq!(
        backend.requests_to(&Method::POST, "/api/admin/products").len(),
        1
    );
    assert!(
        backend
            .requests_to(&Method::PUT, "/api/admin/products/101")
            .is_empty()
    );
    assert_eq!(backend.product_image_ids(101).len(), 1);

    let (_, listing) = app.page("/admin/productos").await;
    assert!(listing.contains("Producto creado"));
}

#[tokio::test]
async fn test_drafts_belong_to_their_admin() {
    let backend = MockBackend::start().await;
    let ana = spawn_admin(&backend).await;
    ana.login().await;
    let draft = location(&ana.get("/admin/productos/nuevo").await);

    // Second browser on the same panel, logged in as another admin
    let jorge = TestApp {
        url: ana.url.clone(),
        client: reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap(),
    };
    let response = jorge
        .post_form(
            "/admin/login",
            &[("email", "jorge@pisoskermy.com"), ("password", TEST_PASSWORD)],
        )
        .await;
    assert_eq!(location(&response), "/admin/dashboard");

    let response = jorge.get(&draft).await;
    assert_eq!(location(&response), "/admin/productos");
    let (_, listing) = jorge.page("/admin/productos").await;
    assert!(listing.contains("El formulario expiró"));

    // The owner still has it
    let (status, _) = ana.page(&draft).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_product() {
    let (backend, app) = logged_in().await;

    let response = app.post_form("/admin/productos/10/eliminar", &[]).await;
    assert_eq!(location(&response), "/admin/productos");
    assert_eq!(
        backend
            .requests_to(&Method::DELETE, "/api/admin/products/10")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_save_about_content() {
    let (backend, app) = logged_in().await;

    let (_, page) = app.page("/admin/contenido").await;
    assert!(page.contains("Somos una empresa familiar en Jacó."));

    let response = app
        .post_form("/admin/contenido", &[("content", "Desde 1998 en Jacó y Quepos.")])
        .await;
    assert_eq!(location(&response), "/admin/contenido");

    let saved = backend.requests_to(&Method::PUT, "/api/admin/site-content/about_us");
    assert_eq!(saved[0].json()["content"], "Desde 1998 en Jacó y Quepos.");

    let (_, page) = app.page("/admin/contenido").await;
    assert!(page.contains("Contenido guardado"));
}
