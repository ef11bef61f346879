//! Client-side cart synchronization.
//!
//! # Architecture
//!
//! - [`LocalCartStore`] persists the cart under the `"cart"` key and is the
//!   only component that touches that key
//! - [`reconcile`] joins stored entries with live product records, fetched
//!   concurrently, and drops entries whose product does not resolve
//! - [`CartView`] re-runs reconciliation on every cart change and keeps only
//!   the result of the most recently issued run
//! - [`QuantityController`] applies bounded quantity changes and writes the
//!   whole cart back
//! - [`total`] sums `quantity × price` over the enriched line items

mod controller;
mod reconcile;
mod store;
mod total;

use shopfront_core::ProductId;
use thiserror::Error;

use crate::storage::StorageError;

pub use controller::{Adjustment, QuantityController};
pub use reconcile::{CartView, Refresh, reconcile};
pub use store::{CART_KEY, LocalCartStore};
pub use total::{item_count, total};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product has no stock to add.
    #[error("Product is out of stock: {0}")]
    OutOfStock(ProductId),

    /// Adding zero units is meaningless.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}
