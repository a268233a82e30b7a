//! Cache-tag correctness: invalidating a tag marks exactly the entries that
//! provide it, subscribed entries refetch eagerly in invalidation order, and
//! unrelated tags are untouched.

#![allow(clippy::unwrap_used)]

use superlian_client::{ApiRequest, EndpointId, QueryStatus};
use superlian_core::{CartItemAction, CartItemId, ProfilePayload};

use superlian_integration_tests::{
    TestStore, cart, cart_item, order, product, profile, to_value, user,
};

async fn seeded() -> TestStore {
    let ctx = TestStore::new();
    ctx.transport.respond(
        EndpointId::GetCart,
        to_value(&cart(1, vec![cart_item(1, 1, "iPhone 15", 2, "1998.00")])),
    );
    ctx.transport.respond(
        EndpointId::GetProducts,
        to_value(&vec![product(1, "iPhone 15", "Apple", "Flagship Phones", "999.00")]),
    );
    ctx.transport.respond(
        EndpointId::GetOrders,
        to_value(&vec![order(1, 1, vec![cart_item(1, 1, "iPhone 15", 1, "999.00")])]),
    );
    ctx.transport
        .respond(EndpointId::GetUserProfile, to_value(&profile(1)));
    ctx.sign_in(&user(1, "ada")).await;
    ctx
}

#[tokio::test]
async fn cart_mutations_touch_only_cart_entries() {
    let ctx = seeded().await;
    ctx.store.load_cart().await.unwrap();
    ctx.store.load_products().await.unwrap();
    ctx.store.load_orders().await.unwrap();

    ctx.store
        .update_cart_item(CartItemId::new(1), CartItemAction::Increment)
        .await
        .unwrap();

    // The cart was refetched (update_cart_item refreshes the snapshot);
    // products and orders were not
    assert_eq!(ctx.transport.calls(EndpointId::GetCart), 2);
    assert_eq!(ctx.transport.calls(EndpointId::GetProducts), 1);
    assert_eq!(ctx.transport.calls(EndpointId::GetOrders), 1);

    assert!(!ctx.store.cache().entry(&ApiRequest::GetProducts).unwrap().stale);
    assert!(!ctx.store.cache().entry(&ApiRequest::GetOrders).unwrap().stale);
}

#[tokio::test]
async fn placing_an_order_invalidates_the_order_history() {
    let ctx = seeded().await;
    ctx.store.load_orders().await.unwrap();
    ctx.store.load_cart().await.unwrap();
    ctx.store.fetch_profile().await.unwrap();

    ctx.transport.respond(
        EndpointId::CreateOrder,
        to_value(&order(2, 1, vec![cart_item(1, 1, "iPhone 15", 2, "1998.00")])),
    );
    let form = superlian_client::CheckoutForm {
        card: Some(superlian_client::CardDetails {
            card_number: "4242424242424242".to_owned(),
            expiry: "02/27".to_owned(),
            cvv: "123".to_owned(),
        }),
        ..Default::default()
    };
    ctx.store.place_order(&form).await.unwrap();

    let orders_entry = ctx.store.cache().entry(&ApiRequest::GetOrders).unwrap();
    assert!(orders_entry.stale, "order history must be marked stale");

    // The next read refetches
    ctx.store.load_orders().await.unwrap();
    assert_eq!(ctx.transport.calls(EndpointId::GetOrders), 2);
}

#[tokio::test]
async fn subscribed_cart_refetches_eagerly_in_invalidation_order() {
    let ctx = seeded().await;
    let _watch = ctx.store.watch_cart();
    ctx.store.load_cart().await.unwrap();

    // Two mutations, each with a different backend snapshot queued
    ctx.transport.respond_once(
        EndpointId::GetCart,
        to_value(&cart(1, vec![cart_item(1, 1, "iPhone 15", 3, "2997.00")])),
    );
    ctx.transport.respond_once(
        EndpointId::GetCart,
        to_value(&cart(1, vec![cart_item(1, 1, "iPhone 15", 4, "3996.00")])),
    );

    ctx.store
        .update_cart_item(CartItemId::new(1), CartItemAction::Increment)
        .await
        .unwrap();
    let entry = ctx.store.cache().entry(&ApiRequest::GetCart).unwrap();
    assert_eq!(entry.status, QueryStatus::Success);
    assert!(!entry.stale);

    let after_second = ctx
        .store
        .update_cart_item(CartItemId::new(1), CartItemAction::Increment)
        .await
        .unwrap();

    // Refetches settled in invalidation order: the last snapshot wins
    assert_eq!(after_second.items[0].quantity, 4);
    assert_eq!(
        ctx.store.catalog().cart().unwrap().items[0].quantity,
        4
    );
}

#[tokio::test]
async fn profile_mutations_invalidate_the_profile_entry() {
    let ctx = seeded().await;
    ctx.store.fetch_profile().await.unwrap();
    assert_eq!(ctx.transport.calls(EndpointId::GetUserProfile), 1);

    let mut updated = profile(1);
    updated.phone_number = "5551234567".to_owned();
    ctx.transport
        .respond(EndpointId::PatchUserProfile, to_value(&updated));

    ctx.store
        .update_profile(ProfilePayload {
            phone_number: "5551234567".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap();

    let entry = ctx.store.cache().entry(&ApiRequest::GetUserProfile).unwrap();
    assert!(entry.stale);
    // The session store already holds the backend's response
    assert_eq!(ctx.store.session().profile().unwrap().phone_number, "5551234567");
}

#[tokio::test]
async fn per_argument_entries_are_independent() {
    let ctx = seeded().await;
    ctx.transport.respond(
        EndpointId::GetProduct,
        to_value(&product(1, "iPhone 15", "Apple", "Flagship Phones", "999.00")),
    );

    ctx.store
        .fetch_product(superlian_core::ProductId::new(1))
        .await
        .unwrap();
    ctx.store
        .fetch_product(superlian_core::ProductId::new(1))
        .await
        .unwrap();
    assert_eq!(ctx.transport.calls(EndpointId::GetProduct), 1);

    // A different argument is a different key
    ctx.store
        .fetch_product(superlian_core::ProductId::new(2))
        .await
        .unwrap();
    assert_eq!(ctx.transport.calls(EndpointId::GetProduct), 2);
}
