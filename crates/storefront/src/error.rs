//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for storefront operations. Callers at
//! the edge (the CLI) call [`AppError::report`] so internal failures reach
//! Sentry before being shown to the user.

use shopfront_core::MissingCapability;
use thiserror::Error;

use crate::admin::FormErrors;
use crate::cart::CartError;
use crate::config::ConfigError;
use crate::products::ApiError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client-local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product backend request failed.
    #[error("Product API error: {0}")]
    Api(#[from] ApiError),

    /// Cart mutation was refused or could not be saved.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Submitted form has invalid fields.
    #[error("Invalid form: {0}")]
    Form(#[from] FormErrors),

    /// Viewer lacks the capability for the operation.
    #[error("Forbidden: {0}")]
    Forbidden(#[from] MissingCapability),
}

impl AppError {
    /// Whether this error is an internal failure rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::Api(_) => true,
            Self::Cart(err) => matches!(err, CartError::Storage(_)),
            Self::Form(_) | Self::Forbidden(_) => false,
        }
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        } else {
            tracing::warn!(error = %self, "Operation rejected");
        }
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Removed cart line", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
