//! Admin login, logout and session expiry.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use catalogo_integration_tests::{MockBackend, TEST_EMAIL, location, spawn_admin};

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;

    for path in ["/admin/dashboard", "/admin/productos", "/admin/bitacora"] {
        let response = app.get(path).await;
        assert!(response.status().is_redirection(), "{path}");
        assert_eq!(location(&response), "/admin/login", "{path}");
    }
    assert!(backend.state().requests.is_empty());
}

#[tokio::test]
async fn test_rejected_login_shows_backend_message() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;

    let response = app
        .post_form(
            "/admin/login",
            &[("email", TEST_EMAIL), ("password", "incorrecta")],
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Credenciales inválidas"));
    assert!(body.contains(TEST_EMAIL));
}

#[tokio::test]
async fn test_blank_login_makes_no_backend_call() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;

    let response = app
        .post_form("/admin/login", &[("email", " "), ("password", "")])
        .await;

    let body = response.text().await.unwrap();
    assert!(body.contains("Ingresa tu correo y contraseña."));
    assert!(backend.requests_to(&Method::POST, "/api/auth/login").is_empty());
}

#[tokio::test]
async fn test_login_then_dashboard_shows_counts() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;
    app.login().await;

    let (status, body) = app.page("/admin/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Bienvenido, Ana"));
    assert!(body.contains("Ver bitácora de auditoría"));

    // Already logged in: the login page sends us back
    let response = app.get("/admin/login").await;
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;
    app.login().await;

    let response = app.post_form("/admin/logout", &[]).await;
    assert_eq!(location(&response), "/admin/login");

    let response = app.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_backend_401_clears_the_session() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;
    app.login().await;

    backend.expire_tokens();
    let response = app.get("/admin/categorias").await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/admin/login");

    // The token works again, but the panel already forgot it
    backend.restore_tokens();
    let before = backend.state().requests.len();
    let response = app.get("/admin/categorias").await;
    assert_eq!(location(&response), "/admin/login");
    assert_eq!(backend.state().requests.len(), before);
}

#[tokio::test]
async fn test_admin_responses_are_not_cached() {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;

    let response = app.get("/admin/login").await;

    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "no-store"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().contains_key("x-request-id"));
}
