//! Application state owned by the front end.

use std::sync::Arc;

use corner_shop_core::{Order, ProductId};
use tracing::instrument;

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::checkout::{CheckoutForm, CheckoutStore};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::orders::{self, OrderConfirmation, OrderTracker};
use crate::pricing::OrderSummary;
use crate::storage::{FileStorage, KeyValueStorage};

/// Root composition of the storefront.
///
/// Owns the catalog and exactly one cart and one checkout store. Front ends
/// hold one `AppState` per session and pass it by reference; tests build a
/// fresh one each time.
#[derive(Debug)]
pub struct AppState {
    config: StorefrontConfig,
    catalog: Catalog,
    tracker: OrderTracker,
    cart: CartStore,
    checkout: CheckoutStore,
}

impl AppState {
    /// Create state backed by `storage`, rehydrating both stores.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be loaded.
    pub fn new(config: StorefrontConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::sample(),
        };
        let tracker = OrderTracker::new(catalog.clone(), config.lookup_delay);

        Ok(Self {
            cart: CartStore::rehydrate(storage.clone()),
            checkout: CheckoutStore::rehydrate(storage),
            config,
            catalog,
            tracker,
        })
    }

    /// Create state persisted under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::new(config, storage)
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutStore {
        &self.checkout
    }

    pub const fn checkout_mut(&mut self) -> &mut CheckoutStore {
        &mut self.checkout
    }

    /// Pricing for the cart as it stands now.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::for_cart(self.cart.state())
    }

    /// Shipping form pre-filled from the saved address.
    #[must_use]
    pub fn checkout_form(&self) -> CheckoutForm {
        CheckoutForm::prefilled(self.checkout.state())
    }

    /// Add a catalog product to the cart by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `OutOfStock` for a product
    /// that cannot currently be bought.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: u32) -> Result<()> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
        if !product.in_stock {
            return Err(AppError::OutOfStock(product_id.clone()));
        }

        self.cart.add_item(product.clone(), quantity);
        Ok(())
    }

    /// Validate `form` and place the order after the configured delay.
    ///
    /// # Errors
    ///
    /// Returns a checkout error if the cart is empty or the form is invalid.
    pub async fn place_order(&mut self, form: &CheckoutForm) -> Result<OrderConfirmation> {
        let confirmation = orders::place_order(
            &mut self.cart,
            &mut self.checkout,
            form,
            self.config.submit_delay,
        )
        .await?;
        Ok(confirmation)
    }

    /// Look up an order after the configured delay.
    pub async fn track_order(&self, id: &str) -> Option<Order> {
        self.tracker.fetch(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_shop_core::ShippingMethod;
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStorage;

    fn state() -> AppState {
        AppState::new(
            StorefrontConfig::default().without_delays(),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_add_to_cart_by_id() {
        let mut state = state();
        state.add_to_cart(&ProductId::new("3"), 3).unwrap();

        let summary = state.summary();
        assert_eq!(summary.subtotal, Decimal::new(7497, 2));
        assert_eq!(summary.line_count, 1);
    }

    #[test]
    fn test_add_unknown_product() {
        let mut state = state();
        let err = state.add_to_cart(&ProductId::new("99"), 1).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_add_out_of_stock_product() {
        let mut state = state();
        let err = state.add_to_cart(&ProductId::new("5"), 1).unwrap_err();
        assert!(matches!(err, AppError::OutOfStock(_)));
        assert!(state.cart().items().is_empty());
    }

    #[test]
    fn test_stores_share_storage() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut first = AppState::new(StorefrontConfig::default(), storage.clone()).unwrap();
        first.add_to_cart(&ProductId::new("1"), 2).unwrap();
        first.checkout_mut().set_shipping_method(ShippingMethod::Express);

        let second = AppState::new(StorefrontConfig::default(), storage).unwrap();
        assert_eq!(second.cart().state(), first.cart().state());
        assert_eq!(second.checkout().state().shipping_method, ShippingMethod::Express);
    }

    #[test]
    fn test_checkout_form_prefill() {
        let mut state = state();
        assert_eq!(state.checkout_form(), CheckoutForm::default());

        let address = corner_shop_core::Address {
            full_name: "Jane Roe".to_string(),
            street_address: "1 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "USA".to_string(),
        };
        state.checkout_mut().set_shipping_address(address);
        assert_eq!(state.checkout_form().city, "Springfield");
        assert_eq!(state.checkout_form().email, "");
    }

    #[tokio::test]
    async fn test_place_and_track() {
        let mut state = state();
        state.add_to_cart(&ProductId::new("1"), 1).unwrap();
        let form = CheckoutForm {
            full_name: "Jane Roe".to_string(),
            street_address: "1 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "USA".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0100".to_string(),
        };

        let confirmation = state.place_order(&form).await.unwrap();
        assert!(state.cart().items().is_empty());

        let order = state.track_order(confirmation.order_id.as_str()).await.unwrap();
        assert_eq!(order.id, confirmation.order_id);
    }

    #[tokio::test]
    async fn test_place_order_empty_cart_is_user_error() {
        let mut state = state();
        let err = state.place_order(&CheckoutForm::default()).await.unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = StorefrontConfig {
            catalog_path: Some("/nonexistent/catalog.json".into()),
            ..StorefrontConfig::default()
        };
        let err = AppState::new(config, Arc::new(MemoryStorage::new())).unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }
}
