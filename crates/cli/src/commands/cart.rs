//! Cart commands.

use corner_shop_core::{Price, ProductId};
use corner_shop_storefront::error::AppError;
use corner_shop_storefront::state::AppState;

/// Show cart lines and the order summary.
pub fn show(state: &AppState) {
    let items = state.cart().items();
    if items.is_empty() {
        tracing::info!("Your cart is empty");
        return;
    }

    tracing::info!("Your cart:");
    for item in items {
        tracing::info!(
            "  [{}] {} x{}  {}",
            item.product.id,
            item.product.name,
            item.quantity,
            Price::usd(item.line_total())
        );
    }

    let view = state.summary().display();
    tracing::info!("Subtotal ({} items): {}", view.line_count, view.subtotal);
    tracing::info!(
        "Shipping: {}",
        view.shipping.as_deref().unwrap_or("--")
    );
    tracing::info!("Tax: {}", view.tax);
    tracing::info!("Total: {}", view.total);
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the product does not exist or is out of stock.
pub fn add(state: &mut AppState, id: &str, quantity: u32) -> Result<(), AppError> {
    let product_id = ProductId::new(id);
    state.add_to_cart(&product_id, quantity)?;

    if let Some(line) = state.cart().state().find(&product_id) {
        tracing::info!(
            "Added {} to cart ({} in cart)",
            line.product.name,
            line.quantity
        );
    }
    Ok(())
}

/// Remove a product's line from the cart.
pub fn remove(state: &mut AppState, id: &str) {
    state.cart_mut().remove_item(&ProductId::new(id));
    tracing::info!("Removed {id} from cart");
}

/// Set a line's quantity.
pub fn update(state: &mut AppState, id: &str, quantity: i64) {
    let product_id = ProductId::new(id);
    state.cart_mut().update_quantity(&product_id, quantity);

    match state.cart().state().find(&product_id) {
        Some(line) => tracing::info!("{} quantity is now {}", line.product.name, line.quantity),
        None => tracing::info!("{id} is not in the cart"),
    }
}

/// Empty the cart.
pub fn clear(state: &mut AppState) {
    state.cart_mut().clear_cart();
    tracing::info!("Cart cleared");
}
