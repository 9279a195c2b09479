//! End-to-end checkout tests over a file-backed store.

#![allow(clippy::unwrap_used)]

use grooveo_core::{LoyaltyTransactionKind, OrderStatus, ProductId};
use grooveo_integration_tests::{TestContext, shipping_address};
use grooveo_storefront::AppError;
use grooveo_storefront::services::{CheckoutSession, PaymentMethod};

fn fill_cart(ctx: &TestContext) {
    let cart = ctx.state.cart();
    cart.add(&ProductId::new("eco-box-1"), 2).unwrap();
    cart.add(&ProductId::new("eco-tissue-1"), 1).unwrap();
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_checkout_with_promo_and_points() {
    let ctx = TestContext::new().unwrap();
    let state = &ctx.state;
    state.loyalty().earn(200, "Welcome bonus").unwrap();
    fill_cart(&ctx);

    let checkout = state.checkout();
    let mut session = CheckoutSession::new();
    checkout.apply_promo(&mut session, "save10").unwrap();

    let quote = checkout.quote(&session).unwrap();
    assert_eq!(quote.subtotal.minor_units(), 4728);
    assert_eq!(quote.promo_discount.minor_units(), 473);
    assert!(quote.free_shipping());
    assert_eq!(quote.tax.minor_units(), 766);
    assert_eq!(quote.total.minor_units(), 5021);

    let quote = checkout.apply_loyalty(&mut session, 100).unwrap();
    assert_eq!(quote.total.minor_units(), 3841);
    assert_eq!(state.loyalty().balance().unwrap(), 100);

    let payment = PaymentMethod::Card {
        number: "4111111111111111".to_owned(),
        expiry: "09/29".to_owned(),
        cvv: "123".to_owned(),
        holder: "Meera Iyer".to_owned(),
    };
    let confirmation = checkout
        .place_order(&mut session, shipping_address(), &payment)
        .await
        .unwrap();

    let order = &confirmation.order;
    assert_eq!(order.total().minor_units(), 3841);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.item_count(), 3);
    assert_eq!(confirmation.points_earned, 3);

    // Every service sees the result.
    assert!(state.cart().cart().unwrap().is_empty());
    assert_eq!(state.orders().list().unwrap().len(), 4);
    assert_eq!(state.orders().get(order.id()).unwrap(), *order);

    let account = state.loyalty().account().unwrap();
    assert_eq!(account.balance(), 103);
    assert!(account.is_consistent());
    let kinds: Vec<_> = account.transactions().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LoyaltyTransactionKind::Earned,
            LoyaltyTransactionKind::Redeemed,
            LoyaltyTransactionKind::Earned,
        ]
    );
    assert_eq!(
        account.recent().next().map(|t| t.description.clone()),
        Some(format!("Order #{}", order.id()))
    );

    let feed = state.notifications().feed().unwrap();
    let newest = feed.items().first().unwrap();
    assert_eq!(newest.title, "Order Placed");
    assert_eq!(newest.order_id.as_ref(), Some(order.id()));
    assert!(!newest.read);
}

#[tokio::test]
async fn test_placed_order_can_be_tracked_to_delivery() {
    let ctx = TestContext::new().unwrap();
    fill_cart(&ctx);
    let mut session = CheckoutSession::new();
    let order = ctx
        .state
        .checkout()
        .place_order(&mut session, shipping_address(), &PaymentMethod::Wallet)
        .await
        .unwrap()
        .order;

    let orders = ctx.state.orders();
    for next in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        orders.advance(order.id(), next).unwrap();
    }
    let delivered = orders.get(order.id()).unwrap();
    assert_eq!(delivered.status(), OrderStatus::Delivered);
    assert_eq!(delivered.status_updates().len(), 5);

    assert!(matches!(
        orders.advance(order.id(), OrderStatus::Processing),
        Err(AppError::Transition(_))
    ));
    assert_eq!(ctx.state.notifications().unread_count().unwrap(), 6);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_enforced_promo_constraints() {
    let ctx = TestContext::with_env(&[("GROOVEO_ENFORCE_PROMO_CONSTRAINTS", "true")]).unwrap();
    let checkout = ctx.state.checkout();

    ctx.state
        .cart()
        .add(&ProductId::new("eco-tissue-1"), 1)
        .unwrap();
    let mut session = CheckoutSession::new();
    checkout.apply_promo(&mut session, "BULK20").unwrap();
    let quote = checkout.quote(&session).unwrap();
    assert!(quote.promo_lines.iter().all(|line| !line.eligible));
    assert!(quote.promo_discount.is_zero());

    ctx.state.cart().update_quantity(&ProductId::new("eco-tissue-1"), 0).unwrap();
    ctx.state.cart().add(&ProductId::new("eco-box-1"), 3).unwrap();
    let mut session = CheckoutSession::new();
    checkout.apply_promo(&mut session, "SAVE10").unwrap();
    assert_eq!(
        checkout.quote(&session).unwrap().promo_discount.minor_units(),
        500
    );
}

#[tokio::test]
async fn test_simulated_payment_failure() {
    let ctx = TestContext::with_env(&[("GROOVEO_SIMULATED_FAILURE_RATE", "1.0")]).unwrap();
    ctx.state.loyalty().earn(300, "Welcome bonus").unwrap();
    fill_cart(&ctx);

    let checkout = ctx.state.checkout();
    let mut session = CheckoutSession::new();
    checkout.apply_loyalty(&mut session, 150).unwrap();
    let err = checkout
        .place_order(&mut session, shipping_address(), &PaymentMethod::CashOnDelivery)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
    assert_eq!(ctx.state.cart().cart().unwrap().item_count(), 3);
    assert_eq!(ctx.state.orders().list().unwrap().len(), 3);

    checkout.abandon(&mut session).unwrap();
    assert_eq!(ctx.state.loyalty().balance().unwrap(), 300);
}
