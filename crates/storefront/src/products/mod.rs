//! Product backend access.
//!
//! # Architecture
//!
//! - The backend is the source of truth; products are fetched fresh on every
//!   cart reconciliation and never cached here
//! - [`ProductSource`] is the seam the cart engine depends on, so tests can
//!   swap the HTTP client for an in-memory catalog
//! - [`ApiClient`] implements it over REST with `reqwest`
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::products::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let product = client.get_product(&ProductId::new("665f1c")).await?;
//! ```

mod client;

use std::future::Future;

use shopfront_core::{Product, ProductId};
use thiserror::Error;

pub use client::{ApiClient, NewProduct};

/// Errors that can occur when talking to the product backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Could not build a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the id did not resolve, as opposed to a transport failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Something that can resolve a product id to its live record.
pub trait ProductSource {
    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the id does not resolve, or another
    /// variant if the backend is unreachable or misbehaves.
    fn fetch(&self, id: &ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

impl<T: ProductSource + Sync> ProductSource for &T {
    fn fetch(&self, id: &ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).fetch(id)
    }
}

impl<T: ProductSource + Send + Sync> ProductSource for std::sync::Arc<T> {
    fn fetch(&self, id: &ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).fetch(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product p1".to_string());
        assert_eq!(err.to_string(), "Not found: product p1");
        assert!(err.is_not_found());

        let err = ApiError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
        assert!(!err.is_not_found());
    }
}
