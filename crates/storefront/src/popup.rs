//! Popup messages carried across a navigation boundary.
//!
//! A result is stashed in session storage under [`POPUP_KEY`] before
//! navigating away; the next view takes it, displays it once, and the key is
//! gone.

use shopfront_core::PopupMessage;
use tracing::warn;

use crate::cart::{Adjustment, CartError};
use crate::storage::{KeyValueStore, StorageError};

/// Session storage key of the pending popup.
pub const POPUP_KEY: &str = "popupData";

/// Take-once store for a single pending popup.
#[derive(Debug, Clone)]
pub struct PopupStore<S> {
    store: S,
}

impl<S: KeyValueStore> PopupStore<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Stash a popup for the next view, replacing any pending one.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be written.
    pub fn stash(&self, message: &PopupMessage) -> Result<(), StorageError> {
        let json = serde_json::to_string(message)?;
        self.store.set(POPUP_KEY, &json)
    }

    /// Take the pending popup, clearing it.
    ///
    /// A malformed or unreadable entry is cleared and yields `None`.
    #[must_use]
    pub fn take(&self) -> Option<PopupMessage> {
        let raw = match self.store.get(POPUP_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Could not read pending popup");
                return None;
            }
        };

        if let Err(e) = self.store.remove(POPUP_KEY) {
            warn!(error = %e, "Could not clear pending popup");
        }

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "Discarding malformed popup"))
            .ok()
    }
}

/// Popup shown after an add-to-cart attempt.
#[must_use]
pub fn add_to_cart_popup(outcome: &Result<Adjustment, CartError>) -> PopupMessage {
    match outcome {
        Ok(Adjustment::Unchanged { quantity }) => PopupMessage::failure(
            "Could not add to cart",
            format!("Only {quantity} in stock, all already in your cart"),
        ),
        Ok(_) => PopupMessage::success("Success", "Product added to cart"),
        Err(e) => PopupMessage::failure("Could not add to cart", e.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_take_is_once() {
        let popups = PopupStore::new(MemoryStore::new());
        let message = PopupMessage::success("Success", "Product created");

        popups.stash(&message).unwrap();
        assert_eq!(popups.take(), Some(message));
        assert_eq!(popups.take(), None);
    }

    #[test]
    fn test_stash_replaces_pending() {
        let popups = PopupStore::new(MemoryStore::new());
        popups.stash(&PopupMessage::success("a", "b")).unwrap();
        popups.stash(&PopupMessage::failure("c", "d")).unwrap();

        let taken = popups.take().unwrap();
        assert_eq!(taken.header, "c");
        assert!(taken.is_failure());
    }

    #[test]
    fn test_malformed_entry_is_cleared() {
        let backend = MemoryStore::new();
        backend.set(POPUP_KEY, "{broken").unwrap();
        let popups = PopupStore::new(backend.clone());

        assert_eq!(popups.take(), None);
        assert_eq!(backend.get(POPUP_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_to_cart_popup() {
        let ok = add_to_cart_popup(&Ok(Adjustment::Updated { quantity: 2 }));
        assert!(!ok.is_failure());
        assert!(!ok.show_close_button);

        let full = add_to_cart_popup(&Ok(Adjustment::Unchanged { quantity: 4 }));
        assert!(full.is_failure());
        assert!(full.content.contains('4'));

        let sold_out = add_to_cart_popup(&Err(CartError::OutOfStock(ProductId::new("A"))));
        assert!(sold_out.is_failure());
        assert_eq!(sold_out.content, "Product is out of stock: A");
    }
}
