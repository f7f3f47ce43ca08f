//! Admin accounts and the audit log.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use catalogo_integration_tests::{MockBackend, TestApp, location, spawn_admin};

async fn logged_in() -> (MockBackend, TestApp) {
    let backend = MockBackend::start().await;
    let app = spawn_admin(&backend).await;
    app.login().await;
    (backend, app)
}

#[tokio::test]
async fn test_admin_list_marks_current_account() {
    let (_backend, app) = logged_in().await;

    let (status, body) = app.page("/admin/admins").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("(tú)"));
    assert!(body.contains("jorge@pisoskermy.com"));
    // No toggle button for yourself
    assert!(!body.contains("/admin/admins/1/toggle"));
    assert!(body.contains("/admin/admins/2/toggle"));
}

#[tokio::test]
async fn test_toggling_yourself_is_refused_locally() {
    let (backend, app) = logged_in().await;

    let response = app.post_form("/admin/admins/1/toggle", &[]).await;
    assert_eq!(location(&response), "/admin/admins");
    assert!(backend.mutations().is_empty());

    let (_, body) = app.page("/admin/admins").await;
    assert!(body.contains("No puedes desactivarte a ti mismo"));
}

#[tokio::test]
async fn test_toggle_updates_only_that_admin() {
    let (backend, app) = logged_in().await;

    app.post_form("/admin/admins/2/toggle", &[]).await;

    let toggles: Vec<_> = backend
        .mutations()
        .into_iter()
        .filter(|r| r.path.ends_with("/toggle"))
        .collect();
    assert_eq!(toggles.len(), 1);
    assert_eq!(toggles[0].path, "/api/auth/admins/2/toggle");

    let state = backend.state();
    assert_eq!(state.admins[0]["is_active"], true);
    assert_eq!(state.admins[1]["is_active"], false);
    drop(state);

    let (_, body) = app.page("/admin/admins").await;
    assert!(body.contains("Jorge fue desactivado"));
}

#[tokio::test]
async fn test_create_admin_validates_password_length() {
    let (backend, app) = logged_in().await;

    let response = app
        .post_form(
            "/admin/admins",
            &[("name", "Luis"), ("email", "luis@pisoskermy.com"), ("password", "corta")],
        )
        .await;

    let body = response.text().await.unwrap();
    assert!(body.contains("La contraseña debe tener al menos"));
    assert!(body.contains("luis@pisoskermy.com"));
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn test_create_admin() {
    let (backend, app) = logged_in().await;

    let response = app
        .post_form(
            "/admin/admins",
            &[
                ("name", "Luis"),
                ("email", "luis@pisoskermy.com"),
                ("password", "segura-123"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/admin/admins");

    let created = backend.requests_to(&Method::POST, "/api/auth/admins");
    assert_eq!(created[0].json()["email"], "luis@pisoskermy.com");
    assert_eq!(created[0].json()["password"], "segura-123");
}

#[tokio::test]
async fn test_change_password() {
    let (backend, app) = logged_in().await;

    let (_, body) = app.page("/admin/admins?password=2").await;
    assert!(body.contains("Nueva Contraseña"));

    let response = app
        .post_form("/admin/admins/2/password", &[("password", "otra-clave-9")])
        .await;
    assert_eq!(location(&response), "/admin/admins");

    let changed = backend.requests_to(&Method::PUT, "/api/auth/admins/2/password");
    assert_eq!(changed[0].json()["password"], "otra-clave-9");
}

#[tokio::test]
async fn test_audit_log_page() {
    let (backend, app) = logged_in().await;

    let (status, body) = app.page("/admin/bitacora?page=1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Bitácora de auditoría"));
    assert!(body.contains("badge-success"));
    assert!(body.contains("10.0.0.7"));
    // Backend timestamps carry no offset and show as stored
    assert!(body.contains("17/10/2026 15:20"));

    let audit = backend.requests_to(&Method::GET, "/api/auth/audit");
    let query = audit[0].query.clone().unwrap_or_default();
    assert!(query.contains("per_page=50"), "query was {query}");
}
