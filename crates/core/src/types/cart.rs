//! Client-local cart and its enriched line items.
//!
//! A [`Cart`] is an ordered list of `{ id, quantity }` entries, kept in the
//! order products were first added. Entries are unique per product and always
//! carry a positive quantity; [`Cart::from_entries`] enforces both when a cart
//! is rebuilt from untrusted storage.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product's pending quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartEntry {
    /// Create a new cart entry.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// An ordered, duplicate-free list of cart entries.
///
/// Serializes as a bare JSON array: `[{"id":"...","quantity":2}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries.
    ///
    /// Zero-quantity entries are dropped and repeated product ids are merged
    /// into the first occurrence (quantities summed), so the result always
    /// satisfies the cart invariants.
    #[must_use]
    pub fn from_entries(raw: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in raw {
            if entry.quantity > 0 {
                cart.add(entry.product_id, entry.quantity);
            }
        }
        cart
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product_id == product_id)
    }

    /// Quantity for a product, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.get(product_id).map(|e| e.quantity)
    }

    /// Whether the cart holds an entry for a product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Distinct product ids in cart order.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .map(|e| &e.product_id)
            .filter(move |id| seen.insert(*id))
    }

    /// Add units of a product, merging into an existing entry or appending a
    /// new one. Returns the resulting quantity.
    ///
    /// Adding zero units to a product not yet in the cart is a no-op.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.product_id == product_id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return entry.quantity;
        }
        if quantity > 0 {
            self.entries.push(CartEntry::new(product_id, quantity));
        }
        quantity
    }

    /// Set a product's quantity in place, keeping its position.
    ///
    /// A quantity of zero removes the entry. Returns `false` if the product is
    /// not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }
        match self.entries.iter_mut().find(|e| &e.product_id == product_id) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a product's entry, returning it.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.product_id == product_id)?;
        Some(self.entries.remove(index))
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl FromIterator<CartEntry> for Cart {
    fn from_iter<I: IntoIterator<Item = CartEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

/// A cart entry joined with its live product record.
///
/// Serializes as the product's fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl EnrichedLineItem {
    /// Join a product with a quantity.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product id.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// `quantity × price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }

    /// Whether the quantity is above what the product has in stock.
    #[must_use]
    pub const fn exceeds_stock(&self) -> bool {
        self.quantity > self.product.stock
    }
}
