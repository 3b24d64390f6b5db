//! Core types for Corner Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use address::Address;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{CartLineItem, Order};
pub use price::{CurrencyCode, Price};
pub use product::{Category, Product};
pub use status::*;
