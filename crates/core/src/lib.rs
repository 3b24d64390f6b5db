//! Corner Shop Core - Shared domain types.
//!
//! This crate provides the types shared by every Corner Shop component:
//! - `storefront` - Catalog, cart, checkout, pricing, and order tracking
//! - `cli` - Command-line front end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no clocks.
//! State transitions and persistence live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, emails, addresses, products, and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
