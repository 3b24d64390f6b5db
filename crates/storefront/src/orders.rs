//! Order placement and tracking.
//!
//! Neither operation talks to a backend. Placement validates the shipping
//! form, waits out a simulated latency, mints a display-only order id, and
//! resets the cart and checkout. Tracking resolves ids against the catalog's
//! sample orders and falls back to a placeholder order for unknown ids.

use std::time::Duration;

use chrono::Local;
use corner_shop_core::{Address, CartLineItem, Order, OrderId, OrderStatus};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::checkout::{CheckoutError, CheckoutForm, CheckoutStore};
use crate::error::add_breadcrumb;
use crate::pricing::OrderSummary;

/// Order ids are `ORD-` followed by a number below this bound.
const ORDER_NUMBER_BOUND: u32 = 10_000;

// =============================================================================
// Placement
// =============================================================================

/// Mint a display-only order id such as `ORD-4821`.
///
/// Ids are random and may repeat; nothing is persisted under them.
#[must_use]
pub fn generate_order_id() -> OrderId {
    let number = rand::rng().random_range(0..ORDER_NUMBER_BOUND);
    OrderId::new(format!("ORD-{number}"))
}

/// Everything shown on the order confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub items: Vec<CartLineItem>,
    pub summary: OrderSummary,
    pub shipping_address: Address,
    pub email: String,
}

/// Validate the form and place the order.
///
/// On success the validated address is saved to the checkout store, then,
/// after `delay`, the cart is cleared and the checkout reset. The returned
/// confirmation captures the cart as it was before clearing.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines and
/// [`CheckoutError::Invalid`] with field messages if validation fails.
/// Neither store is touched on error.
#[instrument(skip_all)]
pub async fn place_order(
    cart: &mut CartStore,
    checkout: &mut CheckoutStore,
    form: &CheckoutForm,
    delay: Duration,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.state().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let validated = form.validate().map_err(|errors| {
        tracing::info!(fields = errors.len(), "Checkout form rejected");
        CheckoutError::Invalid(errors)
    })?;

    checkout.set_shipping_address(validated.address.clone());
    let items = cart.items().to_vec();
    let summary = OrderSummary::for_cart(cart.state());

    tokio::time::sleep(delay).await;

    let order_id = generate_order_id();
    cart.clear_cart();
    checkout.reset();

    add_breadcrumb(
        "checkout",
        "Placed order",
        Some(&[("order_id", order_id.as_str())]),
    );
    tracing::info!(order_id = %order_id, total = %summary.total, "Order placed");

    Ok(OrderConfirmation {
        order_id,
        items,
        summary,
        shipping_address: validated.address,
        email: validated.email.into_inner(),
    })
}

// =============================================================================
// Tracking
// =============================================================================

/// Resolves order ids for the tracking page.
#[derive(Debug, Clone)]
pub struct OrderTracker {
    catalog: Catalog,
    delay: Duration,
}

impl OrderTracker {
    #[must_use]
    pub const fn new(catalog: Catalog, delay: Duration) -> Self {
        Self { catalog, delay }
    }

    /// Find an order without delay.
    ///
    /// Known sample ids return the sample order. Any other non-empty id,
    /// whitespace included, returns a placeholder order in `processing`; an
    /// empty id returns `None`. Ids are matched exactly as given.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<Order> {
        if id.is_empty() {
            return None;
        }

        let order_id = OrderId::new(id);
        Some(
            self.catalog
                .find_order(&order_id)
                .cloned()
                .unwrap_or_else(|| placeholder_order(order_id)),
        )
    }

    /// [`Self::lookup`] after the simulated lookup latency.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: &str) -> Option<Order> {
        tokio::time::sleep(self.delay).await;
        let order = self.lookup(id);
        if order.is_none() {
            tracing::debug!("Empty order id");
        }
        order
    }
}

fn placeholder_order(id: OrderId) -> Order {
    tracing::debug!(order_id = %id, "Unknown order id, using placeholder");
    Order {
        id,
        items: Vec::new(),
        status: OrderStatus::Processing,
        date: Local::now().date_naive(),
        total: Decimal::ZERO,
        shipping_address: Address {
            full_name: "John Doe".to_string(),
            street_address: "123 Main St".to_string(),
            city: "Anytown".to_string(),
            state: "CA".to_string(),
            postal_code: "12345".to_string(),
            country: "USA".to_string(),
        },
    }
}

/// Progress of one tracking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// One entry of the tracking timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub label: &'static str,
    pub status: StepStatus,
}

/// The four-step timeline for an order in `status`.
#[must_use]
pub fn timeline(status: OrderStatus) -> [TrackingStep; 4] {
    use OrderStatus::{Delivered, Pending, Processing, Shipped};
    use StepStatus::{Completed, Current, Upcoming};

    let processing = if status == Pending { Current } else { Completed };
    let shipped = match status {
        Processing => Current,
        Shipped | Delivered => Completed,
        Pending => Upcoming,
    };
    let delivered = match status {
        Shipped => Current,
        Delivered => Completed,
        Pending | Processing => Upcoming,
    };

    [
        TrackingStep {
            label: "Order Placed",
            status: Completed,
        },
        TrackingStep {
            label: "Processing",
            status: processing,
        },
        TrackingStep {
            label: "Shipped",
            status: shipped,
        },
        TrackingStep {
            label: "Delivered",
            status: delivered,
        },
    ]
}

/// Percentage for the progress bar.
///
/// Counts up to and including the current step, or every completed step if
/// none is current.
#[must_use]
pub fn progress_percentage(steps: &[TrackingStep]) -> u32 {
    let Ok(total) = u32::try_from(steps.len()) else {
        return 100;
    };
    if total == 0 {
        return 0;
    }

    let reached = steps
        .iter()
        .position(|step| step.status == StepStatus::Current)
        .map_or_else(
            || {
                steps
                    .iter()
                    .filter(|step| step.status == StepStatus::Completed)
                    .count()
            },
            |index| index + 1,
        );

    u32::try_from(reached).map_or(100, |reached| reached * 100 / total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use corner_shop_core::ShippingMethod;

    use super::*;
    use crate::cart::tests::product;
    use crate::checkout::{CheckoutField, CheckoutState};
    use crate::storage::MemoryStorage;

    fn stores() -> (CartStore, CheckoutStore) {
        let storage = Arc::new(MemoryStorage::new());
        (CartStore::new(storage.clone()), CheckoutStore::new(storage))
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Jane Roe".to_string(),
            street_address: "1 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701-1234".to_string(),
            country: "USA".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
        }
    }

    fn statuses(status: OrderStatus) -> Vec<StepStatus> {
        timeline(status).iter().map(|step| step.status).collect()
    }

    #[test]
    fn test_generate_order_id_shape() {
        for _ in 0..100 {
            let id = generate_order_id();
            let number: u32 = id.as_str().strip_prefix("ORD-").unwrap().parse().unwrap();
            assert!(number < ORDER_NUMBER_BOUND);
        }
    }

    #[tokio::test]
    async fn test_place_order_resets_stores() {
        let (mut cart, mut checkout) = stores();
        cart.add_item(product("1", 10000), 1);
        checkout.set_order_notes("Leave at door");
        checkout.set_shipping_method(ShippingMethod::Express);

        let confirmation = place_order(&mut cart, &mut checkout, &form(), Duration::ZERO)
            .await
            .unwrap();

        assert!(confirmation.order_id.as_str().starts_with("ORD-"));
        assert_eq!(confirmation.items.len(), 1);
        assert_eq!(confirmation.summary.total, Decimal::new(11299, 2));
        assert_eq!(confirmation.shipping_address.postal_code, "62701-1234");
        assert_eq!(confirmation.email, "jane@example.com");

        assert!(cart.items().is_empty());
        assert_eq!(checkout.state(), &CheckoutState::default());
    }

    #[tokio::test]
    async fn test_place_order_invalid_form_mutates_nothing() {
        let (mut cart, mut checkout) = stores();
        cart.add_item(product("1", 1000), 2);
        checkout.set_order_notes("notes");
        let cart_before = cart.state().clone();
        let checkout_before = checkout.state().clone();

        let bad = CheckoutForm {
            postal_code: "ABCDE".to_string(),
            ..form()
        };
        let err = place_order(&mut cart, &mut checkout, &bad, Duration::ZERO)
            .await
            .unwrap_err();

        let CheckoutError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors.get(CheckoutField::PostalCode),
            Some("Please enter a valid postal code")
        );
        assert_eq!(cart.state(), &cart_before);
        assert_eq!(checkout.state(), &checkout_before);
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let (mut cart, mut checkout) = stores();
        let err = place_order(&mut cart, &mut checkout, &form(), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert_eq!(checkout.state().shipping_address, None);
    }

    #[test]
    fn test_lookup_sample_order() {
        let tracker = OrderTracker::new(Catalog::sample(), Duration::ZERO);
        let order = tracker.lookup("ORD-5678").unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.items[0].product.name, "Smart Watch");
    }

    #[test]
    fn test_lookup_unknown_is_placeholder() {
        let tracker = OrderTracker::new(Catalog::sample(), Duration::ZERO);
        let order = tracker.lookup("ORD-42").unwrap();
        assert_eq!(order.id.as_str(), "ORD-42");
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(order.items.is_empty());
        assert_eq!(order.total, Decimal::ZERO);
        assert_eq!(order.shipping_address.full_name, "John Doe");
    }

    #[tokio::test]
    async fn test_fetch_empty_id() {
        let tracker = OrderTracker::new(Catalog::sample(), Duration::ZERO);
        assert!(tracker.fetch("").await.is_none());
        assert!(tracker.fetch("ORD-1234").await.is_some());
    }

    #[test]
    fn test_lookup_matches_id_as_given() {
        let tracker = OrderTracker::new(Catalog::sample(), Duration::ZERO);

        let spaces = tracker.lookup("   ").unwrap();
        assert_eq!(spaces.status, OrderStatus::Processing);
        assert!(spaces.items.is_empty());

        let padded = tracker.lookup(" ORD-1234 ").unwrap();
        assert_eq!(padded.id.as_str(), " ORD-1234 ");
        assert_eq!(padded.status, OrderStatus::Processing);
        assert_eq!(padded.total, Decimal::ZERO);
    }

    #[test]
    fn test_timeline() {
        use StepStatus::{Completed, Current, Upcoming};

        assert_eq!(
            statuses(OrderStatus::Pending),
            [Completed, Current, Upcoming, Upcoming]
        );
        assert_eq!(
            statuses(OrderStatus::Processing),
            [Completed, Completed, Current, Upcoming]
        );
        assert_eq!(
            statuses(OrderStatus::Shipped),
            [Completed, Completed, Completed, Current]
        );
        assert_eq!(
            statuses(OrderStatus::Delivered),
            [Completed, Completed, Completed, Completed]
        );
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress_percentage(&timeline(OrderStatus::Pending)), 50);
        assert_eq!(progress_percentage(&timeline(OrderStatus::Processing)), 75);
        assert_eq!(progress_percentage(&timeline(OrderStatus::Shipped)), 100);
        assert_eq!(progress_percentage(&timeline(OrderStatus::Delivered)), 100);
        assert_eq!(progress_percentage(&[]), 0);
    }
}
