//! Cart line items and orders.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::id::OrderId;
use super::product::Product;
use super::status::OrderStatus;

/// One product's entry in a cart, paired with a quantity.
///
/// Stored quantities are always at least 1; a line reduced to zero is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a new line item.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// `price * quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// A placed order, as shown on the tracking and account pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartLineItem>,
    pub status: OrderStatus,
    /// Date the order was placed.
    pub date: NaiveDate,
    pub total: Decimal,
    pub shipping_address: Address,
}

impl Order {
    /// Sum of quantities across the order's items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
