//! Shopping cart state.
//!
//! The cart is an ordered list of line items, at most one per product. Line
//! order is insertion order and only matters for display.

use corner_shop_core::{CartLineItem, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::store::{PersistedStore, StoreState};

/// Persisted cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
}

/// Cart transitions.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add `quantity` units, merging into an existing line for the product.
    AddItem { product: Product, quantity: u32 },
    /// Drop the line for a product, if present.
    RemoveItem(ProductId),
    /// Replace a line's quantity; zero or below removes the line.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Empty the cart.
    Clear,
}

impl CartState {
    /// Line for `product_id`, if present.
    #[must_use]
    pub fn find(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Sum of `price * quantity` over every line, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|item| &item.product.id != product_id);
    }
}

impl StoreState for CartState {
    const STORAGE_KEY: &'static str = "cart-storage";
    const VERSION: u32 = 0;
    type Action = CartAction;

    /// Drops persisted lines with a zero quantity.
    fn normalize(&mut self) {
        let before = self.items.len();
        self.items.retain(|item| item.quantity > 0);
        if self.items.len() != before {
            tracing::warn!(
                dropped = before - self.items.len(),
                "Discarding persisted cart lines with zero quantity"
            );
        }
    }

    fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem { quantity: 0, .. } => {}
            CartAction::AddItem { product, quantity } => {
                match self
                    .items
                    .iter_mut()
                    .find(|item| item.product.id == product.id)
                {
                    Some(item) => item.quantity = item.quantity.saturating_add(quantity),
                    None => self.items.push(CartLineItem::new(product, quantity)),
                }
            }
            CartAction::RemoveItem(product_id) => self.remove(&product_id),
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => {
                if quantity <= 0 {
                    self.remove(&product_id);
                } else if let Some(item) = self
                    .items
                    .iter_mut()
                    .find(|item| item.product.id == product_id)
                {
                    item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::Clear => self.items.clear(),
        }
    }
}

/// The persisted cart.
pub type CartStore = PersistedStore<CartState>;

impl PersistedStore<CartState> {
    /// Add `quantity` units of `product`.
    ///
    /// A quantity of zero is ignored, so stored lines never drop below one.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            tracing::debug!("Ignoring add of zero units");
            return;
        }
        add_breadcrumb(
            "cart",
            "Added item to cart",
            Some(&[("product_id", product.id.as_str())]),
        );
        self.dispatch(CartAction::AddItem { product, quantity });
    }

    /// Remove the line for `product_id`. No-op if absent.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.dispatch(CartAction::RemoveItem(product_id.clone()));
    }

    /// Set the quantity for `product_id`; `quantity <= 0` removes the line.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.clone(),
            quantity,
        });
    }

    /// Remove every line.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state().items
    }

    /// Sum of `price * quantity`, recomputed on every call.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.state().subtotal()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Arc;

    use corner_shop_core::CategoryId;

    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::store::decode;

    pub(crate) fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::new(cents, 2),
            image: String::new(),
            category: CategoryId::new("home"),
            in_stock: true,
            featured: None,
            rating: None,
        }
    }

    fn add(state: &mut CartState, product: &Product, quantity: u32) {
        state.apply(CartAction::AddItem {
            product: product.clone(),
            quantity,
        });
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let mut state = CartState::default();
        let lamp = product("1", 4999);
        add(&mut state, &lamp, 1);
        add(&mut state, &lamp, 3);
        add(&mut state, &lamp, 2);

        assert_eq!(state.line_count(), 1);
        assert_eq!(state.find(&lamp.id).unwrap().quantity, 6);
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut state = CartState::default();
        add(&mut state, &product("2", 100), 1);
        add(&mut state, &product("1", 100), 1);
        add(&mut state, &product("2", 100), 1);

        let ids: Vec<_> = state.items.iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_add_zero_is_ignored() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 100), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 100), 1);
        let before = state.clone();

        state.apply(CartAction::RemoveItem(ProductId::new("9")));
        assert_eq!(state, before);
    }

    #[test]
    fn test_update_non_positive_equals_remove() {
        let mut base = CartState::default();
        add(&mut base, &product("1", 100), 2);
        add(&mut base, &product("2", 100), 1);

        for id in ["1", "2", "absent"] {
            for quantity in [0, -1, -50, i64::MIN] {
                let mut updated = base.clone();
                updated.apply(CartAction::UpdateQuantity {
                    product_id: ProductId::new(id),
                    quantity,
                });

                let mut removed = base.clone();
                removed.apply(CartAction::RemoveItem(ProductId::new(id)));

                assert_eq!(updated, removed, "id={id} quantity={quantity}");
            }
        }
    }

    #[test]
    fn test_update_replaces_quantity() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 100), 2);
        state.apply(CartAction::UpdateQuantity {
            product_id: ProductId::new("1"),
            quantity: 5,
        });
        assert_eq!(state.find(&ProductId::new("1")).unwrap().quantity, 5);
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut state = CartState::default();
        state.apply(CartAction::UpdateQuantity {
            product_id: ProductId::new("1"),
            quantity: 5,
        });
        assert!(state.is_empty());
    }

    #[test]
    fn test_update_saturates_huge_quantity() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 100), 1);
        state.apply(CartAction::UpdateQuantity {
            product_id: ProductId::new("1"),
            quantity: i64::MAX,
        });
        assert_eq!(state.find(&ProductId::new("1")).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_subtotal() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 1000), 2);
        add(&mut state, &product("2", 500), 1);
        assert_eq!(state.subtotal(), Decimal::new(2500, 2));
        assert_eq!(state.subtotal(), state.subtotal());

        state.items.reverse();
        assert_eq!(state.subtotal(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_item_count() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 1000), 2);
        add(&mut state, &product("2", 500), 3);
        assert_eq!(state.item_count(), 5);
        assert_eq!(state.line_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut state = CartState::default();
        add(&mut state, &product("1", 1000), 2);
        state.apply(CartAction::Clear);
        assert!(state.is_empty());
        assert_eq!(state.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_store_persists_each_mutation() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::new(storage.clone());

        cart.add_item(product("1", 1000), 2);
        let persisted: CartState =
            decode(&storage.get("cart-storage").unwrap().unwrap()).unwrap();
        assert_eq!(persisted.item_count(), 2);

        cart.clear_cart();
        let persisted: CartState =
            decode(&storage.get("cart-storage").unwrap().unwrap()).unwrap();
        assert!(persisted.is_empty());
    }

    #[test]
    fn test_store_roundtrip_preserves_order() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::new(storage.clone());
        cart.add_item(product("2", 500), 1);
        cart.add_item(product("1", 1000), 2);

        let restored = CartStore::rehydrate(storage);
        assert_eq!(restored.state(), cart.state());
        assert_eq!(restored.items()[0].product.id.as_str(), "2");
        assert_eq!(restored.items()[1].quantity, 2);
    }

    #[test]
    fn test_rehydrate_drops_zero_quantity_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::new(storage.clone());
        cart.add_item(product("1", 1000), 1);
        cart.add_item(product("2", 500), 3);

        let raw = storage.get("cart-storage").unwrap().unwrap();
        storage
            .set("cart-storage", &raw.replacen("\"quantity\":1", "\"quantity\":0", 1))
            .unwrap();

        let restored = CartStore::rehydrate(storage);
        let quantities: Vec<_> = restored.items().iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, [3]);
        assert_eq!(restored.items()[0].product.id.as_str(), "2");
    }

    #[test]
    fn test_store_add_zero_does_not_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::new(storage.clone());
        cart.add_item(product("1", 1000), 0);
        assert_eq!(storage.get("cart-storage").unwrap(), None);
    }

    #[test]
    fn test_store_update_and_remove() {
        let mut cart = CartStore::new(Arc::new(MemoryStorage::new()));
        cart.add_item(product("1", 1000), 2);
        cart.update_quantity(&ProductId::new("1"), 4);
        assert_eq!(cart.subtotal(), Decimal::new(4000, 2));

        cart.update_quantity(&ProductId::new("1"), 0);
        assert!(cart.items().is_empty());

        cart.add_item(product("1", 1000), 1);
        cart.remove_item(&ProductId::new("1"));
        assert!(cart.items().is_empty());
    }
}
