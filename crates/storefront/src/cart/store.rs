//! Durable cart document.

use shopfront_core::Cart;
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the persisted cart document.
pub const CART_KEY: &str = "cart";

/// Reads and writes the cart as one JSON document.
///
/// The document is a bare array of `{ "id", "quantity" }` entries with no
/// schema version.
#[derive(Debug, Clone)]
pub struct LocalCartStore<S> {
    store: S,
}

impl<S: KeyValueStore> LocalCartStore<S> {
    /// Wrap a key-value backend.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the cart, failing soft.
    ///
    /// A missing, unreadable, or malformed document yields an empty cart. The
    /// failure is logged and never surfaced.
    #[must_use]
    pub fn load(&self) -> Cart {
        self.try_load().unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable cart document");
            Cart::new()
        })
    }

    /// Load the cart, reporting why a document could not be used.
    ///
    /// A missing document or a JSON `null` is an empty cart, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Parse`] for a malformed document, or the
    /// backend's error if it cannot be read.
    pub fn try_load(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.store.get(CART_KEY)? else {
            return Ok(Cart::new());
        };

        serde_json::from_str::<Option<Cart>>(&raw)
            .map(Option::unwrap_or_default)
            .map_err(|source| StorageError::Parse {
                key: CART_KEY.to_string(),
                source,
            })
    }

    /// Replace the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or written.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        self.store.set(CART_KEY, &json)
    }
}
