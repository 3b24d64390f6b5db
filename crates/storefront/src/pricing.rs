//! Order summary pricing.
//!
//! Derived on demand from the cart's current contents; nothing here is
//! cached or rounded. Use [`OrderSummary::display`] to get the two-digit
//! strings shown to shoppers.

use corner_shop_core::{Price, ShippingMethod};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartState;

/// Flat shipping charged on any non-empty cart.
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Flat sales tax rate (7%).
pub const TAX_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

/// Express surcharge advertised on the checkout page.
pub const EXPRESS_SHIPPING_QUOTE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// Subtotal, shipping, tax, and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// Number of distinct lines in the cart.
    pub line_count: usize,
}

impl OrderSummary {
    /// Price a cart.
    ///
    /// Shipping is the flat rate whenever the subtotal is positive, whatever
    /// shipping method the shopper selected.
    #[must_use]
    pub fn for_cart(cart: &CartState) -> Self {
        let mut summary = Self::from_subtotal(cart.subtotal());
        summary.line_count = cart.line_count();
        summary
    }

    /// Price a bare subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let shipping = if subtotal > Decimal::ZERO {
            FLAT_SHIPPING
        } else {
            Decimal::ZERO
        };
        let tax = subtotal * TAX_RATE;

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            line_count: 0,
        }
    }

    /// Presentation strings, rounded to two fractional digits.
    #[must_use]
    pub fn display(&self) -> OrderSummaryView {
        OrderSummaryView {
            subtotal: Price::usd(self.subtotal).display(),
            shipping: (self.subtotal > Decimal::ZERO).then(|| Price::usd(self.shipping).display()),
            tax: Price::usd(self.tax).display(),
            total: Price::usd(self.total).display(),
            line_count: self.line_count,
        }
    }
}

/// Display data for the order summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummaryView {
    pub subtotal: String,
    /// `None` renders as a placeholder dash for an empty cart.
    pub shipping: Option<String>,
    pub tax: String,
    pub total: String,
    pub line_count: usize,
}

/// Informational price quoted next to a shipping method.
///
/// This quote is never added to [`OrderSummary::shipping`].
#[must_use]
pub const fn shipping_method_quote(method: ShippingMethod) -> Option<Decimal> {
    match method {
        ShippingMethod::Standard => None,
        ShippingMethod::Express => Some(EXPRESS_SHIPPING_QUOTE),
    }
}

/// Quote label for a shipping method (e.g., "Free", "$9.99").
#[must_use]
pub fn shipping_method_quote_label(method: ShippingMethod) -> String {
    shipping_method_quote(method).map_or_else(|| "Free".to_string(), |q| Price::usd(q).display())
}
