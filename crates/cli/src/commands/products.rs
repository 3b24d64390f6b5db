//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! corner-shop products list --search lamp --max-price 60
//! corner-shop products show 1
//! corner-shop products featured
//! ```

use corner_shop_core::{Product, ProductId};
use corner_shop_storefront::error::AppError;
use corner_shop_storefront::filter::ProductFilter;
use corner_shop_storefront::state::AppState;

/// List products passing `filter`.
pub fn list(state: &AppState, filter: &ProductFilter) {
    let products = filter.apply(state.catalog().products());
    if products.is_empty() {
        tracing::info!("No products found. Try adjusting your filters.");
        return;
    }

    tracing::info!("Showing {} products", products.len());
    for product in &products {
        log_product(product);
    }
}

/// Show a product's details and up to four related products.
///
/// # Errors
///
/// Returns `NotFound` if no product has this id.
pub fn show(state: &AppState, id: &str) -> Result<(), AppError> {
    let catalog = state.catalog();
    let product = catalog
        .find(&ProductId::new(id))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let category = catalog
        .category_name(&product.category)
        .unwrap_or_else(|| product.category.as_str());

    tracing::info!("{} ({category})", product.name);
    tracing::info!("  Price:  {}", product.unit_price());
    if let Some(rating) = product.rating {
        tracing::info!("  Rating: {rating}");
    }
    tracing::info!(
        "  Stock:  {}",
        if product.in_stock {
            "In stock"
        } else {
            "Out of stock"
        }
    );
    tracing::info!("  {}", product.description);

    let related: Vec<_> = catalog.related(product).collect();
    if !related.is_empty() {
        tracing::info!("You might also like:");
        for product in related {
            log_product(product);
        }
    }
    Ok(())
}

/// List featured products.
pub fn featured(state: &AppState) {
    tracing::info!("Featured products:");
    for product in state.catalog().featured() {
        log_product(product);
    }
}

/// List browsable categories.
pub fn categories(state: &AppState) {
    for category in state.catalog().categories() {
        tracing::info!("{:<12} {}", category.id.as_str(), category.name);
    }
}

fn log_product(product: &Product) {
    let stock = if product.in_stock { "" } else { " (out of stock)" };
    tracing::info!(
        "  [{}] {} - {}{stock}",
        product.id,
        product.name,
        product.unit_price()
    );
}
