//! REST client for the product backend.
//!
//! Endpoints:
//! - `GET {base}/products/{id}` - a single product
//! - `GET {base}/categories` - all categories
//! - `POST {base}/products` - create a product (bearer token, multipart form)

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shopfront_core::{Category, CategoryId, Price, Product, ProductId};
use tracing::instrument;
use url::Url;

use super::{ApiError, ProductSource};
use crate::config::ApiConfig;

/// Maximum number of body characters kept in logs and error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// A validated product ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub category: CategoryId,
    /// Already-hosted image URLs to attach.
    pub image_urls: Vec<String>,
}

/// Client for the product backend.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON body.
    ///
    /// `what` names the resource in `NotFound` errors.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %preview(&body),
                "Product API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: preview(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&body),
                "Failed to parse product API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        let request = self.inner.client.get(url);
        self.send_json(request, &format!("product {id}")).await
    }

    /// Create a product.
    ///
    /// Sent as a multipart form; `imageUrls` carries the already-hosted image
    /// URLs as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, token, product), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        product: &NewProduct,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["products"])?;
        let image_urls = serde_json::to_string(&product.image_urls)
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let form = Form::new()
            .text("name", product.name.clone())
            .text("description", product.description.clone())
            .text("price", product.price.amount().to_string())
            .text("stock", product.stock.to_string())
            .text("category", product.category.to_string())
            .text("imageUrls", image_urls);

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %preview(&message), "Product creation rejected");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: preview(&message),
            });
        }

        tracing::info!("Product created");
        Ok(())
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint(&["categories"])?;
        let request = self.inner.client.get(url);
        self.send_json(request, "categories").await
    }
}

impl ProductSource for ApiClient {
    fn fetch(&self, id: &ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        self.get_product(id)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
