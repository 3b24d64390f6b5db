//! Catalog product and category types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product from the static catalog.
///
/// Products are immutable once loaded; the storefront only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in dollars.
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    pub category: CategoryId,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Average rating, conventionally 0-5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
}

impl Product {
    /// Rating at or above which a product is promoted on the home page.
    pub const FEATURED_RATING: Decimal = Decimal::from_parts(45, 0, 0, false, 1);

    /// Unit price with currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Whether the product is flagged featured or rated highly enough.
    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
            || self
                .rating
                .is_some_and(|rating| rating >= Self::FEATURED_RATING)
    }
}

/// A browsable category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display name (e.g., "Home & Living").
    pub name: String,
}
