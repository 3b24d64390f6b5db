//! Read-only product catalog.
//!
//! The catalog holds every product, the browsable categories, and the sample
//! orders used by order tracking. It is loaded once from JSON and shared
//! cheaply by cloning.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "products":   [{ "id": "1", "name": "...", "price": "49.99", ... }],
//!   "categories": [{ "id": "all", "name": "All Products" }],
//!   "orders":     [{ "id": "ORD-1234", "items": [{ "productId": "1", "quantity": 1 }], ... }]
//! }
//! ```
//!
//! Order items reference products by id and are resolved at load time.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use corner_shop_core::{
    Address, CartLineItem, Category, CategoryId, Order, OrderId, OrderStatus, Product, ProductId,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Maximum number of products shown in the featured strip.
pub const FEATURED_LIMIT: usize = 4;

/// Maximum number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 4;

const SAMPLE_JSON: &str = include_str!("../data/catalog.json");

static SAMPLE: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::from_json(SAMPLE_JSON).expect("Invalid bundled catalog"));

#[derive(Deserialize)]
struct RawCatalog {
    products: Vec<Product>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    orders: Vec<RawOrder>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrder {
    id: OrderId,
    items: Vec<RawOrderItem>,
    status: OrderStatus,
    date: NaiveDate,
    total: Decimal,
    shipping_address: Address,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderItem {
    product_id: ProductId,
    quantity: u32,
}

/// Catalog that holds all products, categories, and sample orders in memory.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    categories: Arc<Vec<Category>>,
    orders: Arc<Vec<Order>>,
}

impl Catalog {
    /// The bundled demo catalog.
    #[must_use]
    pub fn sample() -> Self {
        SAMPLE.clone()
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a product id repeats, or an
    /// order references an unknown product.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut seen = HashSet::new();
        for product in &raw.products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        let orders = raw
            .orders
            .into_iter()
            .map(|order| resolve_order(order, &raw.products))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            products: Arc::new(raw.products),
            categories: Arc::new(raw.categories),
            orders: Arc::new(orders),
        })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Browsable categories, including the "all" pseudo-category.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Sample orders available to order tracking.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Look up a sample order by id.
    #[must_use]
    pub fn find_order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Display name for a category id.
    #[must_use]
    pub fn category_name(&self, id: &CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| &category.id == id)
            .map(|category| category.name.as_str())
    }

    /// Products flagged featured or rated at least 4.5, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(|product| product.is_featured())
            .take(FEATURED_LIMIT)
    }

    /// Other products in the same category as `product`.
    pub fn related<'a>(&'a self, product: &'a Product) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |other| other.category == product.category && other.id != product.id)
            .take(RELATED_LIMIT)
    }
}

fn resolve_order(raw: RawOrder, products: &[Product]) -> Result<Order, CatalogError> {
    let items = raw
        .items
        .into_iter()
        .map(|item| {
            products
                .iter()
                .find(|product| product.id == item.product_id)
                .map(|product| CartLineItem::new(product.clone(), item.quantity))
                .ok_or_else(|| CatalogError::UnknownProduct {
                    order: raw.id.clone(),
                    product: item.product_id,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Order {
        id: raw.id,
        items,
        status: raw.status,
        date: raw.date,
        total: raw.total,
        shipping_address: raw.shipping_address,
    })
}

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),
    #[error("order {order} references unknown product {product}")]
    UnknownProduct { order: OrderId, product: ProductId },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<&'a str> {
        products.map(|product| product.id.as_str()).collect()
    }

    #[test]
    fn test_sample_loads() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.products().len(), 8);
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog.orders().len(), 2);
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::sample();
        let mug = catalog.find(&ProductId::new("4")).unwrap();
        assert_eq!(mug.name, "Ceramic Coffee Mug");
        assert_eq!(mug.price, Decimal::new(1899, 2));
        assert!(catalog.find(&ProductId::new("99")).is_none());
    }

    #[test]
    fn test_featured() {
        let catalog = Catalog::sample();
        // Lamp and blanket are flagged; earbuds and watch are rated >= 4.5.
        assert_eq!(ids(catalog.featured()), ["1", "2", "5", "6"]);
    }

    #[test]
    fn test_related_excludes_self() {
        let catalog = Catalog::sample();
        let lamp = catalog.find(&ProductId::new("1")).unwrap();
        assert_eq!(ids(catalog.related(lamp)), ["4", "6", "8"]);

        let notebook = catalog.find(&ProductId::new("3")).unwrap();
        assert_eq!(catalog.related(notebook).count(), 0);
    }

    #[test]
    fn test_category_name() {
        let catalog = Catalog::sample();
        assert_eq!(
            catalog.category_name(&CategoryId::new("home")),
            Some("Home & Living")
        );
        assert_eq!(catalog.category_name(&CategoryId::ALL.into()), Some("All Products"));
        assert_eq!(catalog.category_name(&CategoryId::new("toys")), None);
    }

    #[test]
    fn test_sample_orders_resolve_products() {
        let catalog = Catalog::sample();
        let order = catalog.find_order(&OrderId::new("ORD-1234")).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.items[1].product.name, "Leather Notebook");
        assert_eq!(order.total, Decimal::new(9997, 2));
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let raw = r#"{"products":[
            {"id":"1","name":"a","description":"","price":"1","image":"","category":"home","inStock":true},
            {"id":"1","name":"b","description":"","price":"2","image":"","category":"home","inStock":true}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(raw).unwrap_err(),
            CatalogError::DuplicateProduct(_)
        ));
    }

    #[test]
    fn test_unknown_order_product_rejected() {
        let raw = r#"{"products":[],"orders":[{
            "id":"ORD-1","items":[{"productId":"7","quantity":1}],"status":"pending",
            "date":"2024-01-01","total":"0",
            "shippingAddress":{"fullName":"A","streetAddress":"B","city":"C","state":"D","postalCode":"12345","country":"E"}
        }]}"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "order ORD-1 references unknown product 7"
        );
    }

    #[test]
    fn test_from_file_missing() {
        let err = Catalog::from_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
