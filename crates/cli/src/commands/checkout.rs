//! Checkout commands.
//!
//! `place` starts from the saved shipping address and overrides whichever
//! fields are passed on the command line.

use clap::Args;
use corner_shop_core::ShippingMethod;
use corner_shop_storefront::checkout::CheckoutError;
use corner_shop_storefront::error::AppError;
use corner_shop_storefront::pricing::shipping_method_quote_label;
use corner_shop_storefront::state::AppState;

/// Shipping form fields for `checkout place`.
#[derive(Debug, Args)]
pub struct PlaceArgs {
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    street_address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

/// Show saved address, notes, and shipping method.
pub fn show(state: &AppState) {
    let checkout = state.checkout().state();

    match &checkout.shipping_address {
        Some(address) => {
            tracing::info!("Ship to:");
            for line in address.lines() {
                tracing::info!("  {line}");
            }
        }
        None => tracing::info!("No shipping address saved"),
    }

    if !checkout.order_notes.is_empty() {
        tracing::info!("Notes: {}", checkout.order_notes);
    }

    for method in [ShippingMethod::Standard, ShippingMethod::Express] {
        let marker = if method == checkout.shipping_method { "*" } else { " " };
        tracing::info!(
            "{marker} {} ({}) - {}",
            method.label(),
            shipping_method_quote_label(method),
            method.delivery_window()
        );
    }
}

pub fn notes(state: &mut AppState, notes: String) {
    state.checkout_mut().set_order_notes(notes);
    tracing::info!("Order notes saved");
}

pub fn method(state: &mut AppState, method: ShippingMethod) {
    state.checkout_mut().set_shipping_method(method);
    tracing::info!("Shipping method set to {}", method.label());
}

pub fn reset(state: &mut AppState) {
    state.checkout_mut().reset();
    tracing::info!("Checkout details cleared");
}

/// Validate the shipping form and place the order.
///
/// # Errors
///
/// Returns a checkout error if the cart is empty or any field is invalid.
pub async fn place(state: &mut AppState, args: PlaceArgs) -> Result<(), AppError> {
    let mut form = state.checkout_form();
    let overrides = [
        (&mut form.full_name, args.full_name),
        (&mut form.street_address, args.street_address),
        (&mut form.city, args.city),
        (&mut form.state, args.state),
        (&mut form.postal_code, args.postal_code),
        (&mut form.country, args.country),
        (&mut form.email, args.email),
        (&mut form.phone, args.phone),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }

    tracing::info!("Placing order...");
    let confirmation = match state.place_order(&form).await {
        Ok(confirmation) => confirmation,
        Err(AppError::Checkout(CheckoutError::Invalid(errors))) => {
            for (field, message) in errors.iter() {
                tracing::info!("  {field}: {message}");
            }
            return Err(CheckoutError::Invalid(errors).into());
        }
        Err(e) => return Err(e),
    };

    let view = confirmation.summary.display();
    tracing::info!("Thank you for your order!");
    tracing::info!("Order number: {}", confirmation.order_id);
    tracing::info!("Total: {}", view.total);
    tracing::info!("A confirmation email will be sent to {}", confirmation.email);
    tracing::info!("Ship to:");
    for line in confirmation.shipping_address.lines() {
        tracing::info!("  {line}");
    }
    Ok(())
}
