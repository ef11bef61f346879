//! CLI command implementations.

pub mod cart;
pub mod popup;
pub mod product;
