//! Product list filtering.

use corner_shop_core::{CategoryId, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound of the price slider.
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Filter criteria for the product list.
///
/// Field names follow the product page's query string (`category`, `search`,
/// `minPrice`, `maxPrice`, `inStock`); missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Exact category to keep, or `"all"`.
    pub category: CategoryId,
    /// Case-insensitive substring of name or description.
    pub search: String,
    #[serde(rename = "minPrice")]
    pub min_price: Decimal,
    #[serde(rename = "maxPrice")]
    pub max_price: Decimal,
    #[serde(rename = "inStock")]
    pub in_stock_only: bool,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: CategoryId::default(),
            search: String::new(),
            min_price: Decimal::ZERO,
            max_price: DEFAULT_MAX_PRICE,
            in_stock_only: false,
        }
    }
}

impl ProductFilter {
    /// Whether `product` passes every criterion.
    ///
    /// Criteria are checked category, search, price, stock, stopping at the
    /// first failure.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_lowered(product, &self.search.to_lowercase())
    }

    /// Products passing the filter, in fixture order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search.to_lowercase();
        products
            .iter()
            .filter(|product| self.matches_lowered(product, &needle))
            .cloned()
            .collect()
    }

    /// A blank category means no category was chosen.
    fn matches_category(&self, product: &Product) -> bool {
        self.category.is_all()
            || self.category.as_str().is_empty()
            || product.category == self.category
    }

    fn matches_lowered(&self, product: &Product, needle: &str) -> bool {
        self.matches_category(product)
            && contains_ignore_case(product, needle)
            && (self.min_price..=self.max_price).contains(&product.price)
            && (!self.in_stock_only || product.in_stock)
    }
}

fn contains_ignore_case(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}
