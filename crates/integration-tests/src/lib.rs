//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Each test starts a [`MockBackend`]: an axum router on an ephemeral
//! localhost port that speaks the product API (`GET /products/{id}`,
//! `GET /categories`, `POST /products`). Nothing external is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shopfront_storefront::config::ApiConfig;
use shopfront_storefront::products::ApiClient;
use url::Url;

/// Bearer token the mock accepts for product creation.
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// A product creation the mock received, as multipart text fields.
pub type CreatedProduct = HashMap<String, String>;

#[derive(Default)]
struct Catalog {
    products: HashMap<String, Value>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    categories: Vec<Value>,
    fetches: HashMap<String, usize>,
    created: Vec<CreatedProduct>,
    reject_creates: bool,
}

type Shared = Arc<Mutex<Catalog>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Catalog> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process product backend.
///
/// The server task lives as long as the tokio runtime of the test.
pub struct MockBackend {
    addr: SocketAddr,
    catalog: Shared,
}

impl MockBackend {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let catalog = Shared::default();

        let api = Router::new()
            .route("/products", post(create_product))
            .route("/products/{id}", get(get_product))
            .route("/categories", get(list_categories));
        let app = Router::new()
            .nest("/api", api)
            .with_state(Arc::clone(&catalog));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self { addr, catalog }
    }

    /// Base URL of the mock API.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("mock base url")
    }

    /// Product client pointed at the mock.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: self.base_url(),
            timeout: Duration::from_secs(5),
        })
        .expect("api client")
    }

    /// Serve a product in the backend's wire shape.
    pub fn add_product(&self, id: &str, name: &str, price: Decimal, stock: u32) {
        let doc = json!({
            "_id": id,
            "name": name,
            "description": format!("{name} description"),
            "price": price.to_string(),
            "stock": stock,
            "imageUrls": [],
            "category": { "_id": "cat-1", "name": "General" },
        });
        lock(&self.catalog).products.insert(id.to_string(), doc);
    }

    /// Answer fetches for `id` with a server error.
    pub fn fail_product(&self, id: &str) {
        lock(&self.catalog).failing.insert(id.to_string());
    }

    /// Hold responses for `id` before answering.
    pub fn delay_product(&self, id: &str, delay: Duration) {
        lock(&self.catalog).delays.insert(id.to_string(), delay);
    }

    pub fn add_category(&self, id: &str, name: &str) {
        lock(&self.catalog)
            .categories
            .push(json!({ "_id": id, "name": name }));
    }

    /// Answer product creation with a server error.
    pub fn reject_creates(&self) {
        lock(&self.catalog).reject_creates = true;
    }

    /// How many times `id` was fetched.
    #[must_use]
    pub fn fetches(&self, id: &str) -> usize {
        lock(&self.catalog).fetches.get(id).copied().unwrap_or(0)
    }

    /// Products created so far.
    #[must_use]
    pub fn created(&self) -> Vec<CreatedProduct> {
        lock(&self.catalog).created.clone()
    }
}

async fn get_product(State(catalog): State<Shared>, Path(id): Path<String>) -> Response {
    let delay = {
        let mut catalog = lock(&catalog);
        *catalog.fetches.entry(id.clone()).or_default() += 1;
        catalog.delays.get(&id).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let catalog = lock(&catalog);
    if catalog.failing.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response();
    }
    match catalog.products.get(&id) {
        Some(doc) => Json(doc.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" })))
            .into_response(),
    }
}

async fn list_categories(State(catalog): State<Shared>) -> Json<Vec<Value>> {
    Json(lock(&catalog).categories.clone())
}

async fn create_product(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut fields = CreatedProduct::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                match field.text().await {
                    Ok(text) => {
                        fields.insert(name, text);
                    }
                    Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
                }
            }
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    }

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ADMIN_TOKEN}"));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing or bad token").into_response();
    }

    let mut catalog = lock(&catalog);
    if catalog.reject_creates {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    catalog.created.push(fields);
    (StatusCode::CREATED, Json(json!({ "message": "Product created" }))).into_response()
}
