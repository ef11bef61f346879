//! Quantity changes against the persisted cart.
//!
//! Every operation reads the whole cart, computes the new one, and writes it
//! back in one `save`. There is no partial-entry persistence.

use shopfront_core::{Cart, EnrichedLineItem, Product, ProductId};
use tracing::{debug, instrument};

use super::CartError;
use super::store::LocalCartStore;
use crate::error::add_breadcrumb;
use crate::storage::KeyValueStore;

/// What a quantity operation did to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The new quantity was persisted.
    Updated { quantity: u32 },
    /// The requested change had no effect; nothing was written.
    Unchanged { quantity: u32 },
    /// The change would take the line to zero. Nothing was written; the caller
    /// should confirm and then call [`QuantityController::remove`].
    ConfirmRemoval,
    /// The line was deleted.
    Removed,
    /// The product is not in the cart.
    NotInCart,
}

impl Adjustment {
    /// The line's quantity after the operation, if it still exists.
    #[must_use]
    pub const fn quantity(self) -> Option<u32> {
        match self {
            Self::Updated { quantity } | Self::Unchanged { quantity } => Some(quantity),
            Self::ConfirmRemoval | Self::Removed | Self::NotInCart => None,
        }
    }
}

/// Applies bounded quantity changes and re-persists the cart.
#[derive(Debug, Clone)]
pub struct QuantityController<S> {
    store: LocalCartStore<S>,
}

impl<S: KeyValueStore> QuantityController<S> {
    #[must_use]
    pub const fn new(store: LocalCartStore<S>) -> Self {
        Self { store }
    }

    /// The underlying cart store.
    #[must_use]
    pub const fn store(&self) -> &LocalCartStore<S> {
        &self.store
    }

    /// Current cart as persisted.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    // =========================================================================
    // Id-based operations
    // =========================================================================

    /// Raise a line's quantity by one.
    ///
    /// No stock ceiling applies here; use [`increment_line`](Self::increment_line)
    /// when the live product is at hand. A line already at `u32::MAX` is
    /// reported [`Adjustment::Unchanged`], so only an increment that actually
    /// applied is undone by [`decrement`](Self::decrement).
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn increment(&self, id: &ProductId) -> Result<Adjustment, CartError> {
        self.update(id, |current| current.checked_add(1).unwrap_or(current))
    }

    /// Lower a line's quantity by one, never below 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn decrement(&self, id: &ProductId) -> Result<Adjustment, CartError> {
        self.update(id, |current| current.saturating_sub(1).max(1))
    }

    /// Set a line's quantity directly.
    ///
    /// Zero is never persisted: it yields [`Adjustment::ConfirmRemoval`] and
    /// leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn set_quantity(&self, id: &ProductId, quantity: u32) -> Result<Adjustment, CartError> {
        if quantity == 0 {
            return Ok(self.confirm_removal(id));
        }
        self.update(id, |_| quantity)
    }

    /// Delete a line outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove(&self, id: &ProductId) -> Result<Adjustment, CartError> {
        let mut cart = self.store.load();
        if cart.remove(id).is_none() {
            return Ok(Adjustment::NotInCart);
        }
        self.store.save(&cart)?;
        add_breadcrumb("cart", "Removed cart line", Some(&[("product_id", id.as_str())]));
        Ok(Adjustment::Removed)
    }

    // =========================================================================
    // Stock-aware operations
    // =========================================================================

    /// Raise a line's quantity by one, up to the product's stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self, item), fields(product_id = %item.product_id()))]
    pub fn increment_line(&self, item: &EnrichedLineItem) -> Result<Adjustment, CartError> {
        let stock = item.product.stock;
        self.update(item.product_id(), |current| {
            if current >= stock {
                current
            } else {
                current + 1
            }
        })
    }

    /// Set a line's quantity, clamped to the product's stock.
    ///
    /// A request that clamps to zero (the product sold out) asks for removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self, item), fields(product_id = %item.product_id()))]
    pub fn set_line_quantity(
        &self,
        item: &EnrichedLineItem,
        quantity: u32,
    ) -> Result<Adjustment, CartError> {
        self.set_quantity(item.product_id(), quantity.min(item.product.stock))
    }

    /// Add units of a product, merging with an existing line and capping the
    /// result at stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the product has no stock,
    /// [`CartError::ZeroQuantity`] for a zero request, or a storage error.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&self, product: &Product, quantity: u32) -> Result<Adjustment, CartError> {
        if !product.is_available() {
            return Err(CartError::OutOfStock(product.id.clone()));
        }
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut cart = self.store.load();
        let existing = cart.quantity_of(&product.id).unwrap_or(0);
        let target = existing.saturating_add(quantity).min(product.stock);
        if target == existing {
            return Ok(Adjustment::Unchanged { quantity: existing });
        }

        cart.add(product.id.clone(), target - existing);
        self.store.save(&cart)?;

        let quantity = target.to_string();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product.id.as_str()), ("quantity", quantity.as_str())]),
        );
        Ok(Adjustment::Updated { quantity: target })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn update(
        &self,
        id: &ProductId,
        next: impl FnOnce(u32) -> u32,
    ) -> Result<Adjustment, CartError> {
        let mut cart = self.store.load();
        let Some(current) = cart.quantity_of(id) else {
            return Ok(Adjustment::NotInCart);
        };

        let quantity = next(current);
        if quantity == current {
            debug!(quantity, "Quantity unchanged");
            return Ok(Adjustment::Unchanged { quantity });
        }

        cart.set_quantity(id, quantity);
        self.store.save(&cart)?;

        let value = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Changed cart quantity",
            Some(&[("product_id", id.as_str()), ("quantity", value.as_str())]),
        );
        Ok(Adjustment::Updated { quantity })
    }

    fn confirm_removal(&self, id: &ProductId) -> Adjustment {
        if self.store.load().contains(id) {
            Adjustment::ConfirmRemoval
        } else {
            Adjustment::NotInCart
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::CartEntry;

    use super::*;
    use crate::cart::CART_KEY;
    use crate::cart::reconcile::tests::product;
    use crate::storage::MemoryStore;

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn controller_with(entries: &[(&str, u32)]) -> (QuantityController<MemoryStore>, MemoryStore) {
        let backend = MemoryStore::new();
        let store = LocalCartStore::new(backend.clone());
        store
            .save(&Cart::from_entries(
                entries.iter().map(|(p, q)| CartEntry::new(id(p), *q)),
            ))
            .unwrap();
        (QuantityController::new(store), backend)
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let (controller, _) = controller_with(&[("A", 1)]);
        assert_eq!(
            controller.decrement(&id("A")).unwrap(),
            Adjustment::Unchanged { quantity: 1 }
        );
        assert_eq!(controller.cart().quantity_of(&id("A")), Some(1));
    }

    #[test]
    fn test_increment_then_decrement_round_trips() {
        for start in [1, 2, 7] {
            let (controller, _) = controller_with(&[("A", start)]);
            controller.increment(&id("A")).unwrap();
            controller.decrement(&id("A")).unwrap();
            assert_eq!(controller.cart().quantity_of(&id("A")), Some(start));
        }
    }

    #[test]
    fn test_increment_at_ceiling_is_unchanged() {
        let (controller, backend) = controller_with(&[("A", u32::MAX)]);
        let before = backend.get(CART_KEY).unwrap();

        assert_eq!(
            controller.increment(&id("A")).unwrap(),
            Adjustment::Unchanged { quantity: u32::MAX }
        );
        assert_eq!(backend.get(CART_KEY).unwrap(), before);

        let (controller, _) = controller_with(&[("A", u32::MAX - 1)]);
        controller.increment(&id("A")).unwrap();
        controller.decrement(&id("A")).unwrap();
        assert_eq!(controller.cart().quantity_of(&id("A")), Some(u32::MAX - 1));
    }

    #[test]
    fn test_increment_is_not_stock_bound() {
        let (controller, _) = controller_with(&[("A", 5)]);
        assert_eq!(
            controller.increment(&id("A")).unwrap(),
            Adjustment::Updated { quantity: 6 }
        );
    }

    #[test]
    fn test_set_zero_asks_for_confirmation() {
        let (controller, backend) = controller_with(&[("A", 2)]);
        let before = backend.get(CART_KEY).unwrap();

        assert_eq!(
            controller.set_quantity(&id("A"), 0).unwrap(),
            Adjustment::ConfirmRemoval
        );
        assert_eq!(backend.get(CART_KEY).unwrap(), before);
        assert_eq!(controller.cart().quantity_of(&id("A")), Some(2));
    }

    #[test]
    fn test_remove_deletes_entry_and_keeps_order() {
        let (controller, _) = controller_with(&[("A", 1), ("B", 2), ("C", 3)]);
        assert_eq!(controller.remove(&id("B")).unwrap(), Adjustment::Removed);

        let cart = controller.cart();
        let ids: Vec<_> = cart.product_ids().map(ProductId::as_str).collect();
        assert_eq!(ids, ["A", "C"]);
        assert_eq!(controller.remove(&id("B")).unwrap(), Adjustment::NotInCart);
    }

    #[test]
    fn test_unknown_product_is_not_in_cart() {
        let (controller, _) = controller_with(&[("A", 1)]);
        assert_eq!(controller.increment(&id("Z")).unwrap(), Adjustment::NotInCart);
        assert_eq!(controller.set_quantity(&id("Z"), 0).unwrap(), Adjustment::NotInCart);
        assert_eq!(controller.cart().len(), 1);
    }

    #[test]
    fn test_line_operations_cap_at_stock() {
        let (controller, _) = controller_with(&[("A", 3)]);
        let item = EnrichedLineItem::new(product("A", Decimal::ONE, 3), 3);

        assert_eq!(
            controller.increment_line(&item).unwrap(),
            Adjustment::Unchanged { quantity: 3 }
        );
        assert_eq!(
            controller.set_line_quantity(&item, 10).unwrap(),
            Adjustment::Unchanged { quantity: 3 }
        );

        let sold_out = EnrichedLineItem::new(product("A", Decimal::ONE, 0), 3);
        assert_eq!(
            controller.set_line_quantity(&sold_out, 2).unwrap(),
            Adjustment::ConfirmRemoval
        );
    }

    #[test]
    fn test_add_merges_and_caps() {
        let (controller, _) = controller_with(&[("A", 2)]);
        let a = product("A", Decimal::ONE, 4);

        assert_eq!(controller.add(&a, 1).unwrap(), Adjustment::Updated { quantity: 3 });
        assert_eq!(controller.add(&a, 10).unwrap(), Adjustment::Updated { quantity: 4 });
        assert_eq!(controller.add(&a, 1).unwrap(), Adjustment::Unchanged { quantity: 4 });

        let b = product("B", Decimal::ONE, 9);
        controller.add(&b, 2).unwrap();
        let cart = controller.cart();
        let ids: Vec<_> = cart.product_ids().map(ProductId::as_str).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn test_add_refuses_out_of_stock_and_zero() {
        let (controller, _) = controller_with(&[]);
        assert!(matches!(
            controller.add(&product("A", Decimal::ONE, 0), 1),
            Err(CartError::OutOfStock(ref p)) if p.as_str() == "A"
        ));
        assert!(matches!(
            controller.add(&product("A", Decimal::ONE, 5), 0),
            Err(CartError::ZeroQuantity)
        ));
        assert!(controller.cart().is_empty());
    }
}
