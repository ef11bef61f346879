//! Shopfront storefront library.
//!
//! Client-side cart synchronization against a remote product catalog: the
//! durable cart document, concurrent reconciliation with live product
//! records, bounded quantity changes, totals, one-shot popup messages, and
//! the admin product form.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod popup;
pub mod products;
pub mod state;
pub mod storage;
