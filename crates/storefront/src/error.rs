//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends driving the storefront.
//! Shopper mistakes (validation, unknown ids) are returned as data and never
//! reported; infrastructure failures are captured to Sentry via
//! [`AppError::report`].

use corner_shop_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog fixture could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Product cannot be added to the cart.
    #[error("Out of stock: {0}")]
    OutOfStock(ProductId),
}

impl AppError {
    /// Whether the error is the shopper's to fix rather than an operator's.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Checkout(_) | Self::NotFound(_) | Self::OutOfStock(_)
        )
    }

    /// Log the error and, for infrastructure failures, capture it to Sentry.
    pub fn report(&self) {
        if self.is_user_error() {
            tracing::info!(error = %self, "Request rejected");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust
/// corner_shop_storefront::error::add_breadcrumb(
///     "cart",
///     "Added item to cart",
///     Some(&[("product_id", "1")]),
/// );
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
