//! Product records as served by the backend.
//!
//! The backend speaks document-store JSON: ids are keyed `_id`, images are
//! `imageUrls`, and `category` is either a bare id or a populated object.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Image shown when a product has no images of its own.
pub const NO_IMAGE_URL: &str = "/images/No_Image_Available.jpg";

/// Products with fewer units than this are shown as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 20;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    pub name: String,
}

/// Category reference on a product: an id, or the populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(CategoryId),
    Expanded(Category),
}

impl CategoryRef {
    /// The referenced category id.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Id(id) => id,
            Self::Expanded(category) => &category.id,
        }
    }
}

/// A product's canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    /// Image URLs relative to the storefront origin, in display order.
    #[serde(default, rename = "imageUrls", alias = "images")]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Product {
    /// Stock badge for this product.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock_status().is_available()
    }

    /// First image, or the placeholder when there are none.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(NO_IMAGE_URL, String::as_str)
    }
}

/// Stock level as presented to shoppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    OutOfStock,
    /// Fewer than [`LOW_STOCK_THRESHOLD`] units left.
    LowStock(u32),
    InStock(u32),
}

impl StockStatus {
    /// Classify a raw stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => Self::LowStock(n),
            n => Self::InStock(n),
        }
    }

    /// Whether any units are available.
    #[must_use]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_deserialize_backend_document() {
        let json = r#"{
            "_id": "p1",
            "name": "Mug",
            "description": "Ceramic",
            "price": 9.99,
            "stock": 5,
            "imageUrls": ["/uploads/mug.jpg"],
            "category": "c1",
            "__v": 0
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.price.amount(), Decimal::new(999, 2));
        assert_eq!(product.stock, 5);
        assert_eq!(product.primary_image(), "/uploads/mug.jpg");
        assert_eq!(product.category.unwrap().id(), &CategoryId::new("c1"));
    }

    #[test]
    fn test_deserialize_populated_category_and_missing_images() {
        let json = r#"{
            "_id": "p2",
            "name": "Plate",
            "price": "4.50",
            "stock": 0,
            "category": { "_id": "c2", "name": "Kitchen" }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.images.is_empty());
        assert_eq!(product.primary_image(), NO_IMAGE_URL);
        assert!(matches!(
            product.category,
            Some(CategoryRef::Expanded(Category { ref name, .. })) if name == "Kitchen"
        ));
        assert!(!product.is_available());
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock(1));
        assert_eq!(StockStatus::from_stock(19), StockStatus::LowStock(19));
        assert_eq!(StockStatus::from_stock(20), StockStatus::InStock(20));
        assert!(!StockStatus::OutOfStock.is_available());
        assert!(StockStatus::LowStock(3).is_available());
    }
}
