//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used across Shopfront components:
//! - `storefront` - Cart persistence, reconciliation, and product API access
//! - `cli` - Command-line driver for the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, carts, line items, capabilities, and popups

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
