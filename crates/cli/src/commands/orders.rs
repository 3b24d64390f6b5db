//! Order tracking commands.

use corner_shop_core::Price;
use corner_shop_storefront::error::AppError;
use corner_shop_storefront::orders::{StepStatus, progress_percentage, timeline};
use corner_shop_storefront::state::AppState;

/// List the sample orders.
pub fn list(state: &AppState) {
    for order in state.catalog().orders() {
        tracing::info!(
            "{}  {}  {:<10}  {}",
            order.id,
            order.date,
            order.status.label(),
            Price::usd(order.total)
        );
    }
}

/// Look up an order and show its tracking timeline.
///
/// # Errors
///
/// Returns `NotFound` for a blank order id.
pub async fn track(state: &AppState, id: &str) -> Result<(), AppError> {
    tracing::info!("Looking up {id}...");
    let order = state
        .track_order(id)
        .await
        .ok_or_else(|| AppError::NotFound("order id is required".to_string()))?;

    tracing::info!("Order {} placed {}", order.id, order.date);
    tracing::info!("Status: {}", order.status.label());

    let steps = timeline(order.status);
    for step in &steps {
        let marker = match step.status {
            StepStatus::Completed => "[x]",
            StepStatus::Current => "[>]",
            StepStatus::Upcoming => "[ ]",
        };
        tracing::info!("  {marker} {}", step.label);
    }
    tracing::info!("Progress: {}%", progress_percentage(&steps));

    if !order.items.is_empty() {
        tracing::info!("Items ({}):", order.item_count());
        for item in &order.items {
            tracing::info!(
                "  {} x{}  {}",
                item.product.name,
                item.quantity,
                Price::usd(item.line_total())
            );
        }
    }
    tracing::info!("Total: {}", Price::usd(order.total));

    tracing::info!("Ship to:");
    for line in order.shipping_address.lines() {
        tracing::info!("  {line}");
    }
    Ok(())
}
