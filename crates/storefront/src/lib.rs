//! Corner Shop storefront library.
//!
//! Catalog browsing, a persisted cart and checkout, order pricing, checkout
//! validation, and mock order tracking. Front ends (the `corner-shop` CLI,
//! tests) own an [`state::AppState`] and drive it directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filter;
pub mod orders;
pub mod pricing;
pub mod state;
pub mod storage;
pub mod store;
