//! Cart and checkout state surviving across sessions.

#![allow(clippy::unwrap_used)]

use corner_shop_core::{ProductId, ShippingMethod};
use corner_shop_integration_tests::TestContext;
use corner_shop_storefront::cart::CartState;
use corner_shop_storefront::store::{StoreState, decode};
use rust_decimal::Decimal;

#[test]
fn cart_survives_restart_in_order() {
    let ctx = TestContext::new();

    let mut first = ctx.session();
    first.add_to_cart(&ProductId::new("4"), 1).unwrap();
    first.add_to_cart(&ProductId::new("1"), 2).unwrap();
    let expected = first.cart().state().clone();
    drop(first);

    let second = ctx.session();
    assert_eq!(second.cart().state(), &expected);

    let ids: Vec<_> = second
        .cart()
        .items()
        .iter()
        .map(|item| (item.product.id.as_str(), item.quantity))
        .collect();
    assert_eq!(ids, [("4", 1), ("1", 2)]);
}

#[test]
fn persisted_layout_is_versioned_envelope() {
    let ctx = TestContext::new();
    let mut session = ctx.session();
    session.add_to_cart(&ProductId::new("3"), 2).unwrap();

    let raw = std::fs::read_to_string(ctx.data_dir().join("cart-storage.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 0);
    assert_eq!(json["state"]["items"][0]["quantity"], 2);
    assert_eq!(json["state"]["items"][0]["product"]["id"], "3");

    let state: CartState = decode(&raw).unwrap();
    assert_eq!(state.subtotal(), Decimal::new(4998, 2));
}

#[test]
fn corrupt_cart_resets_to_empty() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.data_dir().join(format!("{}.json", CartState::STORAGE_KEY)),
        "{ not json",
    )
    .unwrap();

    let mut session = ctx.session();
    assert!(session.cart().items().is_empty());

    session.add_to_cart(&ProductId::new("1"), 1).unwrap();
    assert_eq!(ctx.session().cart().items().len(), 1);
}

#[test]
fn foreign_version_resets_to_empty() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.data_dir().join("cart-storage.json"),
        r#"{"state":{"items":[]},"version":3}"#,
    )
    .unwrap();

    assert!(ctx.session().cart().items().is_empty());
}

#[test]
fn checkout_details_survive_restart() {
    let ctx = TestContext::new();

    let mut first = ctx.session();
    first.checkout_mut().set_order_notes("Ring twice");
    first
        .checkout_mut()
        .set_shipping_method(ShippingMethod::Express);
    drop(first);

    let second = ctx.session();
    let checkout = second.checkout().state();
    assert_eq!(checkout.order_notes, "Ring twice");
    assert_eq!(checkout.shipping_method, ShippingMethod::Express);
    assert!(ctx.data_dir().join("checkout-storage.json").exists());
}
