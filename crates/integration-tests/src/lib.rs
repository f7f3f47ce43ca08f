//! Integration tests for the Pisos Kermy catalog.
//!
//! Both web apps run in-process on ephemeral ports against [`MockBackend`],
//! an axum stand-in for the catalog REST API that records every request it
//! receives. Tests drive the apps with a cookie-keeping `reqwest` client and
//! then assert on what reached the backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalogo-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Token handed out by the mock login.
pub const TEST_TOKEN: &str = "test-token";
/// Password the mock accepts for every account.
pub const TEST_PASSWORD: &str = "kermy-2026";
/// Email of the account tests log in as (admin id 1).
pub const TEST_EMAIL: &str = "ana@pisoskermy.com";

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body as text; binary file parts come out lossy.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// Value of a text field in a multipart body.
    #[must_use]
    pub fn multipart_field(&self, name: &str) -> Option<String> {
        let text = self.body_text();
        let marker = format!("name=\"{name}\"\r\n\r\n");
        let start = text.find(&marker)? + marker.len();
        let rest = text.get(start..)?;
        let end = rest.find("\r\n")?;
        rest.get(..end).map(str::to_owned)
    }

    /// Number of file parts named `images` in a multipart body.
    #[must_use]
    pub fn image_parts(&self) -> usize {
        self.body_text().matches("name=\"images\"").count()
    }
}

/// Backend data and the request log.
#[derive(Debug)]
pub struct MockState {
    pub requests: Vec<RecordedRequest>,
    pub tokens_valid: bool,
    pub categories: Vec<Value>,
    pub tags: Vec<Value>,
    pub providers: Vec<Value>,
    pub products: Vec<Value>,
    pub admins: Vec<Value>,
    pub content: HashMap<String, String>,
    /// Requests to answer with a 500 once each, as `(method, path)`.
    pub failures: Vec<(Method, String)>,
    /// Answer product writes without the `images` list.
    pub omit_images_on_write: bool,
    next_id: i64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            tokens_valid: true,
            categories: vec![
                json!({"id": 1, "name": "Cerámica"}),
                json!({"id": 2, "name": "Porcelanato"}),
            ],
            tags: vec![json!({"id": 1, "name": "Antideslizante"})],
            providers: vec![json!({
                "id": 1, "name": "Cerámicas del Valle", "contact": "Luis Mora",
                "phone": "2222-3333", "description": null
            })],
            products: vec![json!({
                "id": 10,
                "name": "Porcelanato Gris Mate 60x60",
                "description": "Ideal para interiores.",
                "image_url": "/uploads/gris.jpg",
                "images": [
                    {"id": 50, "image_url": "/uploads/gris.jpg", "is_primary": true, "display_order": 0},
                    {"id": 51, "image_url": "/uploads/gris-2.jpg", "is_primary": false, "display_order": 1}
                ],
                "categories": [{"id": 2, "name": "Porcelanato"}],
                "tags": [{"id": 1, "name": "Antideslizante"}],
                "providers": [{"id": 1, "name": "Cerámicas del Valle"}],
                "price": "18500.00"
            })],
            admins: vec![
                json!({"id": 1, "email": TEST_EMAIL, "name": "Ana", "is_active": true,
                       "created_at": "2026-01-15T10:00:00"}),
                json!({"id": 2, "email": "jorge@pisoskermy.com", "name": "Jorge", "is_active": true,
                       "created_at": "2026-03-02T16:30:00"}),
            ],
            content: HashMap::from([(
                "about_us".to_owned(),
                "Somos una empresa familiar en Jacó.".to_owned(),
            )]),
            failures: Vec::new(),
            omit_images_on_write: false,
            next_id: 100,
        }
    }
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the catalog REST API.
#[derive(Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let router = Router::new().fallback(handle).with_state(state.clone());
        let addr = serve(router).await;
        Self { addr, state }
    }

    /// Base URL to configure the apps with.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Lock the backend state for inspection or setup.
    #[must_use]
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Requests received so far with this method and path.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == *method && r.path == path)
            .cloned()
            .collect()
    }

    /// Requests received so far that changed something.
    #[must_use]
    pub fn mutations(&self) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method != Method::GET && r.path != "/api/auth/login")
            .cloned()
            .collect()
    }

    /// Reject every token from now on, as an expired session would.
    pub fn expire_tokens(&self) {
        self.state().tokens_valid = false;
    }

    /// Accept tokens again.
    pub fn restore_tokens(&self) {
        self.state().tokens_valid = true;
    }

    /// Answer the next request with this method and path with a 500.
    pub fn fail_once(&self, method: Method, path: &str) {
        self.state().failures.push((method, path.to_owned()));
    }

    /// Answer product create and update without the stored image list.
    pub fn omit_images_on_write(&self) {
        self.state().omit_images_on_write = true;
    }

    /// Stored image ids of a product, in display order.
    #[must_use]
    pub fn product_image_ids(&self, product_id: i64) -> Vec<i64> {
        let st = self.state();
        let Some(i) = find(&st.products, product_id) else {
            return Vec::new();
        };
        let mut images = st.products[i]["images"].as_array().cloned().unwrap_or_default();
        images.sort_by_key(|image| image["display_order"].as_i64());
        images.iter().filter_map(|image| image["id"].as_i64()).collect()
    }

    /// Id of the primary image of a product.
    #[must_use]
    pub fn product_primary_id(&self, product_id: i64) -> Option<i64> {
        let st = self.state();
        let i = find(&st.products, product_id)?;
        st.products[i]["images"]
            .as_array()?
            .iter()
            .find(|image| image["is_primary"] == true)
            .and_then(|image| image["id"].as_i64())
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn find(items: &[Value], id: i64) -> Option<usize> {
    items.iter().position(|item| item["id"] == id)
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let mut st = state.lock().unwrap();
    st.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: body.to_vec(),
    });
    let request = st.requests.last().cloned().unwrap();

    let needs_token = (path.starts_with("/api/admin") || path.starts_with("/api/auth"))
        && path != "/api/auth/login";
    if needs_token {
        let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if !st.tokens_valid || bearer != Some(&format!("Bearer {TEST_TOKEN}")) {
            return error(StatusCode::UNAUTHORIZED, "Token inválido o expirado");
        }
    }

    if let Some(i) = st
        .failures
        .iter()
        .position(|(m, p)| *m == method && *p == path)
    {
        st.failures.remove(i);
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor");
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let id = |i: usize| segments.get(i).and_then(|s| s.parse::<i64>().ok()).unwrap_or(0);

    match (method.as_str(), segments.as_slice()) {
        // Auth
        ("POST", ["api", "auth", "login"]) => {
            let body = request.json();
            let admin = st
                .admins
                .iter()
                .find(|a| a["email"] == body["email"])
                .cloned();
            match admin {
                Some(admin) if body["password"] == TEST_PASSWORD => {
                    Json(json!({ "token": TEST_TOKEN, "admin": admin })).into_response()
                }
                _ => error(StatusCode::UNAUTHORIZED, "Credenciales inválidas"),
            }
        }
        ("GET", ["api", "auth", "me"]) => Json(st.admins[0].clone()).into_response(),
        ("GET", ["api", "auth", "admins"]) => {
            Json(json!({ "admins": st.admins.clone() })).into_response()
        }
        ("POST", ["api", "auth", "admins"]) => {
            let body = request.json();
            let admin = json!({
                "id": st.next_id(), "email": body["email"], "name": body["name"],
                "is_active": true, "created_at": "2026-10-18T09:00:00"
            });
            st.admins.push(admin.clone());
            (StatusCode::CREATED, Json(json!({ "message": "ok", "admin": admin }))).into_response()
        }
        ("PUT", ["api", "auth", "admins", _, "toggle"]) => match find(&st.admins, id(3)) {
            Some(i) => {
                let active = st.admins[i]["is_active"].as_bool().unwrap_or(true);
                st.admins[i]["is_active"] = json!(!active);
                Json(json!({ "message": "ok", "admin": st.admins[i].clone() })).into_response()
            }
            None => error(StatusCode::NOT_FOUND, "Admin no encontrado"),
        },
        ("PUT", ["api", "auth", "admins", _, "password"]) => {
            Json(json!({ "message": "Contraseña actualizada" })).into_response()
        }
        ("PUT", ["api", "auth", "admins", _]) => match find(&st.admins, id(3)) {
            Some(i) => {
                let body = request.json();
                st.admins[i]["email"] = body["email"].clone();
                st.admins[i]["name"] = body["name"].clone();
                Json(json!({ "message": "ok", "admin": st.admins[i].clone() })).into_response()
            }
            None => error(StatusCode::NOT_FOUND, "Admin no encontrado"),
        },
        ("GET", ["api", "auth", "audit"]) => Json(json!({
            "logs": [{
                "id": 1, "admin_id": 1, "admin_email": TEST_EMAIL, "action": "CREATE",
                "entity": "product", "entity_id": 10, "details": {"name": "Porcelanato Gris Mate 60x60"},
                "ip_address": "10.0.0.7", "created_at": "2026-10-17T15:20:00"
            }],
            "total": 1, "pages": 1, "current_page": 1
        }))
        .into_response(),

        // Taxonomy and providers
        ("GET", ["api", "categories"] | ["api", "admin", "categories"]) => {
            Json(st.categories.clone()).into_response()
        }
        ("GET", ["api", "tags"] | ["api", "admin", "tags"]) => Json(st.tags.clone()).into_response(),
        ("GET", ["api", "admin", "providers"]) => Json(st.providers.clone()).into_response(),
        ("POST", ["api", "admin", kind @ ("categories" | "tags" | "providers")]) => {
            let mut item = request.json();
            item["id"] = json!(st.next_id());
            collection(&mut st, kind).push(item.clone());
            (StatusCode::CREATED, Json(item)).into_response()
        }
        ("PUT", ["api", "admin", kind @ ("categories" | "tags" | "providers"), _]) => {
            let target = id(3);
            let items = collection(&mut st, kind);
            match find(items, target) {
                Some(i) => {
                    let mut item = request.json();
                    item["id"] = json!(target);
                    items[i] = item.clone();
                    Json(item).into_response()
                }
                None => error(StatusCode::NOT_FOUND, "No encontrado"),
            }
        }
        ("DELETE", ["api", "admin", kind @ ("categories" | "tags" | "providers"), _]) => {
            let target = id(3);
            collection(&mut st, kind).retain(|item| item["id"] != target);
            Json(json!({ "message": "Eliminado" })).into_response()
        }

        // Products
        ("GET", ["api", "products"]) => {
            let products: Vec<Value> = st.products.iter().map(public_product).collect();
            let total = products.len();
            Json(json!({ "products": products, "total": total, "pages": 1 })).into_response()
        }
        ("GET", ["api", "admin", "products"]) => {
            let total = st.products.len();
            Json(json!({
                "products": st.products.clone(), "total": total,
                "page": 1, "per_page": 15, "total_pages": 1
            }))
            .into_response()
        }
        ("GET", ["api", "products", _]) => match find(&st.products, id(2)) {
            Some(i) => Json(public_product(&st.products[i])).into_response(),
            None => error(StatusCode::NOT_FOUND, "Producto no encontrado"),
        },
        ("GET", ["api", "admin", "products", _]) => match find(&st.products, id(3)) {
            Some(i) => Json(st.products[i].clone()).into_response(),
            None => error(StatusCode::NOT_FOUND, "Producto no encontrado"),
        },
        ("POST", ["api", "admin", "products"]) => {
            let product_id = st.next_id();
            let mut product = json!({
                "id": product_id,
                "name": request.multipart_field("name").unwrap_or_default(),
                "description": request.multipart_field("description").unwrap_or_default(),
                "price": request.multipart_field("price").unwrap_or_default(),
                "images": [],
            });
            add_images(&mut st, &mut product, &request);
            st.products.push(product.clone());
            (StatusCode::CREATED, Json(written(&st, product))).into_response()
        }
        ("PUT", ["api", "admin", "products", _]) => match find(&st.products, id(3)) {
            Some(i) => {
                let mut product = st.products[i].clone();
                for field in ["name", "description", "price"] {
                    if let Some(value) = request.multipart_field(field) {
                        product[field] = json!(value);
                    }
                }
                add_images(&mut st, &mut product, &request);
                st.products[i] = product.clone();
                Json(written(&st, product)).into_response()
            }
            None => error(StatusCode::NOT_FOUND, "Producto no encontrado"),
        },
        ("DELETE", ["api", "admin", "products", _]) => {
            let target = id(3);
            st.products.retain(|p| p["id"] != target);
            Json(json!({ "message": "Producto eliminado" })).into_response()
        }
        ("DELETE", ["api", "admin", "products", _, "images", _]) => {
            let image_id = id(5);
            if let Some(images) = product_images(&mut st, id(3)) {
                images.retain(|image| image["id"] != image_id);
            }
            Json(json!({ "message": "Imagen eliminada" })).into_response()
        }
        ("PUT", ["api", "admin", "products", _, "images", _, "set-primary"]) => {
            let image_id = id(5);
            if let Some(images) = product_images(&mut st, id(3)) {
                for image in images {
                    image["is_primary"] = json!(image["id"] == image_id);
                }
            }
            Json(json!({ "message": "Imagen principal actualizada" })).into_response()
        }

        // Site content
        ("GET", ["api", "site-content", key]) => match st.content.get(*key) {
            Some(content) => Json(json!({ "key": key, "content": content })).into_response(),
            None => error(StatusCode::NOT_FOUND, "Contenido no encontrado"),
        },
        ("PUT", ["api", "admin", "site-content", key]) => {
            let content = request.json()["content"].as_str().unwrap_or_default().to_owned();
            st.content.insert((*key).to_owned(), content.clone());
            Json(json!({ "key": key, "content": content })).into_response()
        }

        _ => error(StatusCode::NOT_FOUND, "Ruta no encontrada"),
    }
}

fn collection<'a>(st: &'a mut MockState, kind: &str) -> &'a mut Vec<Value> {
    match kind {
        "categories" => &mut st.categories,
        "tags" => &mut st.tags,
        _ => &mut st.providers,
    }
}

/// Store the request's image parts on `product`, after its current images.
///
/// `primary_image_index` picks one of the new files as primary.
fn add_images(st: &mut MockState, product: &mut Value, request: &RecordedRequest) {
    let primary = request
        .multipart_field("primary_image_index")
        .and_then(|v| v.parse::<usize>().ok());
    let mut images = product["images"].as_array().cloned().unwrap_or_default();
    let start = images.len();
    for i in 0..request.image_parts() {
        let image_id = st.next_id();
        let is_primary = primary == Some(i) || (primary.is_none() && start == 0 && i == 0);
        if is_primary {
            for image in &mut images {
                image["is_primary"] = json!(false);
            }
        }
        images.push(json!({
            "id": image_id,
            "image_url": format!("/uploads/{image_id}.png"),
            "is_primary": is_primary,
            "display_order": start + i
        }));
    }
    product["images"] = json!(images);
}

/// Body of a product write response.
fn written(st: &MockState, mut product: Value) -> Value {
    if st.omit_images_on_write {
        if let Some(map) = product.as_object_mut() {
            map.remove("images");
        }
    }
    product
}

fn product_images(st: &mut MockState, product_id: i64) -> Option<&mut Vec<Value>> {
    let i = find(&st.products, product_id)?;
    st.products[i]["images"].as_array_mut()
}

/// The public API never exposes prices or providers.
fn public_product(product: &Value) -> Value {
    let mut product = product.clone();
    if let Some(map) = product.as_object_mut() {
        map.remove("price");
        map.remove("providers");
    }
    product
}

// =============================================================================
// App helpers
// =============================================================================

/// A running app and a client that keeps its cookies and does not follow
/// redirects.
pub struct TestApp {
    pub url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    fn new(addr: SocketAddr) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        Self {
            url: format!("http://{addr}"),
            client,
        }
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.url))
            .send()
            .await
            .unwrap()
    }

    /// GET a path and return the status and body.
    pub async fn page(&self, path: &str) -> (StatusCode, String) {
        let response = self.get(path).await;
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.text().await.unwrap())
    }

    /// POST a urlencoded form.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.url))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// POST a multipart form.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.url))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    /// Log in as [`TEST_EMAIL`].
    pub async fn login(&self) {
        let response = self
            .post_form(
                "/admin/login",
                &[("email", TEST_EMAIL), ("password", TEST_PASSWORD)],
            )
            .await;
        assert_eq!(location(&response), "/admin/dashboard");
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

/// Start the admin panel against `backend`.
pub async fn spawn_admin(backend: &MockBackend) -> TestApp {
    let config = catalogo_admin::config::AdminConfig::for_api(&backend.url());
    let state = catalogo_admin::state::AppState::new(config).unwrap();
    TestApp::new(serve(catalogo_admin::app(state)).await)
}

/// Start the storefront against `backend`.
pub async fn spawn_storefront(backend: &MockBackend) -> TestApp {
    let config = catalogo_storefront::config::StorefrontConfig::for_api(&backend.url());
    let state = catalogo_storefront::state::AppState::new(config).unwrap();
    TestApp::new(serve(catalogo_storefront::app(state)).await)
}
