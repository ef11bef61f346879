//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod capability;
pub mod cart;
pub mod id;
pub mod popup;
pub mod price;
pub mod product;

pub use capability::{Capabilities, Capability, CapabilityError, MissingCapability};
pub use cart::{Cart, CartEntry, EnrichedLineItem};
pub use id::*;
pub use popup::PopupMessage;
pub use price::{Price, PriceError, format_amount};
pub use product::{
    Category, CategoryRef, LOW_STOCK_THRESHOLD, NO_IMAGE_URL, Product, StockStatus,
};
