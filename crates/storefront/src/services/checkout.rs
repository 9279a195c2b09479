//! Checkout flow.
//!
//! A [`CheckoutSession`] holds what the shopper has applied to the current
//! cart (promo codes and loyalty points). [`CheckoutService`] prices the
//! session and turns it into an order.
//!
//! Loyalty points are redeemed when they are applied, not when the order is
//! placed. Removing them from the session credits them back.
//!
//! Payment is simulated: [`SimulationConfig`] controls an artificial delay
//! and a failure probability.

use std::sync::Arc;

use chrono::Utc;
use grooveo_core::carbon::{self, CarbonImpact};
use grooveo_core::catalog::Catalog;
use grooveo_core::loyalty::{self, LoyaltyError};
use grooveo_core::notification::order_placed_notification;
use grooveo_core::order::{Order, ShippingAddress};
use grooveo_core::pricing::{self, PricingPolicy, Quote};
use grooveo_core::promo::{PromoCode, PromoError, PromoTable, normalize_code};
use grooveo_core::{Money, OrderId};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::SimulationConfig;
use crate::error::{AppError, Result};
use crate::services::cart::CartService;
use crate::services::loyalty::LoyaltyService;
use crate::services::notifications::NotificationService;
use crate::services::orders::OrderService;

/// Attempts at drawing an unused order number before giving up.
const ORDER_ID_ATTEMPTS: usize = 32;

/// Payment details rejected before the order is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("enter a UPI ID or choose a UPI app")]
    MissingUpiTarget,
}

/// How the shopper pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card {
        number: String,
        expiry: String,
        cvv: String,
        holder: String,
    },
    /// Either a UPI ID or the name of a UPI app.
    Upi {
        id: Option<String>,
        app: Option<String>,
    },
    Wallet,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> std::result::Result<(), PaymentError> {
        match self {
            Self::Card {
                number,
                expiry,
                cvv,
                holder,
            } => {
                let fields = [
                    ("card number", number),
                    ("expiry date", expiry),
                    ("CVV", cvv),
                    ("cardholder name", holder),
                ];
                match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
                    Some((field, _)) => Err(PaymentError::MissingField(field)),
                    None => Ok(()),
                }
            }
            Self::Upi { id, app } => {
                let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
                if filled(id) || filled(app) {
                    Ok(())
                } else {
                    Err(PaymentError::MissingUpiTarget)
                }
            }
            Self::Wallet | Self::CashOnDelivery => Ok(()),
        }
    }

    /// Short label for logs and receipts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::Upi { .. } => "upi",
            Self::Wallet => "wallet",
            Self::CashOnDelivery => "cash_on_delivery",
        }
    }
}

/// Promos and loyalty points applied to the current cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSession {
    promos: Vec<PromoCode>,
    loyalty_points: u64,
}

impl CheckoutSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applied promos, in the order they were applied.
    #[must_use]
    pub fn promos(&self) -> &[PromoCode] {
        &self.promos
    }

    #[must_use]
    pub const fn loyalty_points(&self) -> u64 {
        self.loyalty_points
    }

    #[must_use]
    pub fn loyalty_discount(&self) -> Money {
        loyalty::points_value(self.loyalty_points)
    }

    /// Returns `true` if the code was applied and has been removed.
    pub fn remove_promo(&mut self, code: &str) -> bool {
        let key = normalize_code(code);
        let before = self.promos.len();
        self.promos.retain(|p| p.code != key);
        self.promos.len() != before
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order: Order,
    pub quote: Quote,
    pub impact: CarbonImpact,
    pub points_earned: u64,
    /// One of the impact facts, picked at random.
    pub impact_fact: Option<String>,
}

/// Prices sessions and places orders.
#[derive(Clone)]
pub struct CheckoutService {
    cart: CartService,
    loyalty: LoyaltyService,
    orders: OrderService,
    notifications: NotificationService,
    catalog: Arc<Catalog>,
    promos: Arc<PromoTable>,
    pricing: PricingPolicy,
    simulation: SimulationConfig,
}

impl CheckoutService {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cart: CartService,
        loyalty: LoyaltyService,
        orders: OrderService,
        notifications: NotificationService,
        catalog: Arc<Catalog>,
        promos: Arc<PromoTable>,
        pricing: PricingPolicy,
        simulation: SimulationConfig,
    ) -> Self {
        Self {
            cart,
            loyalty,
            orders,
            notifications,
            catalog,
            promos,
            pricing,
            simulation,
        }
    }

    /// Add a promo code to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Promo` if the code is blank, already applied, or
    /// unknown, inactive or expired.
    #[instrument(skip(self, session))]
    pub fn apply_promo(&self, session: &mut CheckoutSession, code: &str) -> Result<PromoCode> {
        let key = normalize_code(code);
        if key.is_empty() {
            return Err(PromoError::Empty.into());
        }
        if session.promos.iter().any(|p| p.code == key) {
            return Err(PromoError::AlreadyApplied(key).into());
        }
        let promo = self.promos.validate(&key, Utc::now())?.clone();
        session.promos.push(promo.clone());
        tracing::info!(code = %promo.code, "Promo applied");
        Ok(promo)
    }

    /// Price the cart as if `points` were applied, without redeeming them.
    ///
    /// The maximum is taken against the total before any loyalty discount.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the cart is empty and
    /// `AppError::Loyalty` if the amount is below the minimum, above the
    /// balance or above the order maximum.
    pub fn preview_loyalty(&self, session: &CheckoutSession, points: u64) -> Result<Quote> {
        let cart = self.cart.cart()?;
        if cart.is_empty() {
            return Err(AppError::BadRequest("your cart is empty".to_string()));
        }
        let before = pricing::quote(cart.subtotal(), &session.promos, Money::ZERO, &self.pricing);
        self.loyalty
            .account()?
            .check_redemption(points, before.total)?;
        Ok(pricing::quote(
            cart.subtotal(),
            &session.promos,
            loyalty::points_value(points),
            &self.pricing,
        ))
    }

    /// Redeem `points` against the current cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if points are already applied, plus
    /// everything [`preview_loyalty`](Self::preview_loyalty) returns.
    #[instrument(skip(self, session))]
    pub fn apply_loyalty(&self, session: &mut CheckoutSession, points: u64) -> Result<Quote> {
        if session.loyalty_points > 0 {
            return Err(AppError::BadRequest(
                "loyalty points are already applied to this order".to_string(),
            ));
        }
        let quote = self.preview_loyalty(session, points)?;
        self.loyalty.redeem(points, "Redeemed for order discount")?;
        session.loyalty_points = points;
        Ok(quote)
    }

    /// Drop the loyalty discount and credit the points back. Returns the
    /// number of points refunded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the ledger cannot be written.
    pub fn remove_loyalty(&self, session: &mut CheckoutSession) -> Result<u64> {
        let points = session.loyalty_points;
        if points == 0 {
            return Ok(0);
        }
        self.loyalty.earn(points, "Refund: loyalty discount removed")?;
        session.loyalty_points = 0;
        Ok(points)
    }

    /// Give up on the session: refund any applied points and drop the promos.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the ledger cannot be written.
    pub fn abandon(&self, session: &mut CheckoutSession) -> Result<()> {
        self.remove_loyalty(session)?;
        session.promos.clear();
        Ok(())
    }

    /// Price the current cart with the session applied.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the cart cannot be read and
    /// `AppError::Loyalty` if the applied points exceed what the cart allows
    /// now.
    pub fn quote(&self, session: &CheckoutSession) -> Result<Quote> {
        let cart = self.cart.cart()?;
        self.check_applied_loyalty(cart.subtotal(), session)?;
        Ok(pricing::quote(
            cart.subtotal(),
            &session.promos,
            session.loyalty_discount(),
            &self.pricing,
        ))
    }

    /// Points applied earlier stay within the order maximum only while the
    /// cart does not shrink, so the cap is checked again before pricing.
    fn check_applied_loyalty(&self, subtotal: Money, session: &CheckoutSession) -> Result<()> {
        let requested = session.loyalty_points;
        if requested == 0 {
            return Ok(());
        }
        let before = pricing::quote(subtotal, &session.promos, Money::ZERO, &self.pricing);
        let maximum = loyalty::max_redeemable(requested, before.total);
        if maximum < requested {
            return Err(LoyaltyError::AboveMaximum { requested, maximum }.into());
        }
        Ok(())
    }

    /// Place the order for the current cart.
    ///
    /// On success the cart is emptied, loyalty points for the order are
    /// credited, an order-placed notification is added and the session is
    /// reset. On error nothing is recorded and the session is left as it
    /// was, so the shopper can retry or [`abandon`](Self::abandon) it.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` if the cart is empty
    /// - `AppError::Address` / `AppError::Payment` for incomplete details
    /// - `AppError::Loyalty` if the applied points exceed the order maximum
    ///   for the cart as it is now
    /// - `AppError::Unavailable` if the simulated payment fails
    #[instrument(skip_all, fields(payment = payment.label()))]
    pub async fn place_order(
        &self,
        session: &mut CheckoutSession,
        address: ShippingAddress,
        payment: &PaymentMethod,
    ) -> Result<OrderConfirmation> {
        let cart = self.cart.cart()?;
        if cart.is_empty() {
            return Err(AppError::BadRequest("your cart is empty".to_string()));
        }
        address.validate()?;
        payment.validate()?;
        self.check_applied_loyalty(cart.subtotal(), session)?;

        if !self.simulation.latency.is_zero() {
            tokio::time::sleep(self.simulation.latency).await;
        }
        if rand::rng().random_bool(self.simulation.failure_probability()) {
            tracing::warn!("Simulated payment failure");
            return Err(AppError::Unavailable(
                "Payment could not be processed. Please try again.".to_string(),
            ));
        }

        let quote = pricing::quote(
            cart.subtotal(),
            &session.promos,
            session.loyalty_discount(),
            &self.pricing,
        );
        let items = cart.to_order_items();
        let impact = carbon::calculate(&items, &self.catalog);

        let id = self.next_order_id()?;
        let order = Order::place(id.clone(), items, address, quote.total, Utc::now());
        self.orders.insert(order.clone())?;

        let points_earned = loyalty::points_earned(quote.total);
        if points_earned > 0 {
            self.loyalty.earn(points_earned, &format!("Order #{id}"))?;
        }

        self.cart.clear()?;
        self.notifications.add(order_placed_notification(&id))?;
        *session = CheckoutSession::default();

        let impact_fact = carbon::impact_facts(&impact)
            .choose(&mut rand::rng())
            .cloned();

        tracing::info!(
            order_id = %id,
            total = %quote.total,
            points_earned,
            carbon_saved = impact.carbon_saved,
            "Order placed"
        );

        Ok(OrderConfirmation {
            order,
            quote,
            impact,
            points_earned,
            impact_fact,
        })
    }

    /// Draw an `ORD-nnnnn` number not used by any existing order.
    fn next_order_id(&self) -> Result<OrderId> {
        for _ in 0..ORDER_ID_ATTEMPTS {
            let candidate = OrderId::new(format!("ORD-{}", rand::rng().random_range(10_000..100_000)));
            if !self.orders.exists(&candidate)? {
                return Ok(candidate);
            }
        }
        Err(AppError::Unavailable(
            "Could not allocate an order number. Please try again.".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use grooveo_core::{Email, OrderStatus, ProductId};

    use super::*;
    use crate::seed;
    use crate::store::{KeyValueStore, MemoryStore};

    struct Fixture {
        checkout: CheckoutService,
        cart: CartService,
        loyalty: LoyaltyService,
        orders: OrderService,
        notifications: NotificationService,
    }

    fn fixture(simulation: SimulationConfig) -> Fixture {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let catalog = Arc::new(seed::catalog());
        let notifications =
            NotificationService::new(Arc::clone(&store), Email::parse("user@example.com").unwrap());
        let cart = CartService::new(Arc::clone(&store), Arc::clone(&catalog));
        let loyalty = LoyaltyService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store), notifications.clone());
        let checkout = CheckoutService::new(
            cart.clone(),
            loyalty.clone(),
            orders.clone(),
            notifications.clone(),
            catalog,
            Arc::new(PromoTable::default()),
            PricingPolicy::default(),
            simulation,
        );
        Fixture {
            checkout,
            cart,
            loyalty,
            orders,
            notifications,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Asha Rao".to_owned(),
            street: "12 MG Road".to_owned(),
            city: "Bengaluru".to_owned(),
            state: "KA".to_owned(),
            postal_code: "560001".to_owned(),
            country: "India".to_owned(),
        }
    }

    #[test]
    fn test_payment_validation() {
        let card = PaymentMethod::Card {
            number: "4111111111111111".to_owned(),
            expiry: "12/28".to_owned(),
            cvv: String::new(),
            holder: "Asha Rao".to_owned(),
        };
        assert_eq!(card.validate(), Err(PaymentError::MissingField("CVV")));

        let upi_app = PaymentMethod::Upi {
            id: None,
            app: Some("PhonePe".to_owned()),
        };
        assert_eq!(upi_app.validate(), Ok(()));

        let upi_blank = PaymentMethod::Upi {
            id: Some("  ".to_owned()),
            app: None,
        };
        assert_eq!(upi_blank.validate(), Err(PaymentError::MissingUpiTarget));
        assert_eq!(PaymentMethod::CashOnDelivery.validate(), Ok(()));
    }

    #[test]
    fn test_apply_promo_rejections() {
        let f = fixture(SimulationConfig::default());
        let mut session = CheckoutSession::new();

        assert!(matches!(
            f.checkout.apply_promo(&mut session, "  "),
            Err(AppError::Promo(PromoError::Empty))
        ));
        f.checkout.apply_promo(&mut session, "freeship").unwrap();
        assert!(matches!(
            f.checkout.apply_promo(&mut session, "FREESHIP"),
            Err(AppError::Promo(PromoError::AlreadyApplied(_)))
        ));
        assert!(matches!(
            f.checkout.apply_promo(&mut session, "BOGUS"),
            Err(AppError::Promo(PromoError::NotFound(_)))
        ));
        assert_eq!(session.promos().len(), 1);

        assert!(session.remove_promo("FreeShip"));
        assert!(!session.remove_promo("FREESHIP"));
    }

    #[test]
    fn test_quote_with_shipping_promo() {
        let f = fixture(SimulationConfig::default());
        f.cart.add(&ProductId::new("eco-mailer-1"), 2).unwrap();
        let mut session = CheckoutSession::new();

        let q = f.checkout.quote(&session).unwrap();
        assert_eq!(q.subtotal.minor_units(), 2156);
        assert_eq!(q.shipping.minor_units(), 497);
        assert_eq!(q.tax.minor_units(), 388);
        assert_eq!(q.total.minor_units(), 3041);

        f.checkout.apply_promo(&mut session, "FREESHIP").unwrap();
        let q = f.checkout.quote(&session).unwrap();
        assert_eq!(q.shipping, Money::ZERO);
        assert_eq!(q.total.minor_units(), 2544);
    }

    #[test]
    fn test_apply_and_remove_loyalty() {
        let f = fixture(SimulationConfig::default());
        f.loyalty.earn(1000, "Welcome bonus").unwrap();
        f.cart.add(&ProductId::new("eco-box-1"), 3).unwrap();
        let mut session = CheckoutSession::new();

        assert!(matches!(
            f.checkout.apply_loyalty(&mut session, 50),
            Err(AppError::Loyalty(LoyaltyError::BelowMinimum { .. }))
        ));
        assert!(matches!(
            f.checkout.apply_loyalty(&mut session, 400),
            Err(AppError::Loyalty(LoyaltyError::AboveMaximum { maximum: 367, .. }))
        ));
        assert_eq!(f.loyalty.balance().unwrap(), 1000);

        let preview = f.checkout.preview_loyalty(&session, 200).unwrap();
        assert_eq!(f.loyalty.balance().unwrap(), 1000);

        let q = f.checkout.apply_loyalty(&mut session, 200).unwrap();
        assert_eq!(q, preview);
        assert_eq!(q.loyalty_discount.minor_units(), 2000);
        assert_eq!(q.total.minor_units(), 4982);
        assert_eq!(f.loyalty.balance().unwrap(), 800);

        assert_eq!(f.checkout.remove_loyalty(&mut session).unwrap(), 200);
        assert_eq!(session.loyalty_points(), 0);
        assert_eq!(f.loyalty.balance().unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_place_order() {
        let f = fixture(SimulationConfig::default());
        f.cart.add(&ProductId::new("eco-mailer-1"), 2).unwrap();
        let mut session = CheckoutSession::new();
        f.checkout.apply_promo(&mut session, "FREESHIP").unwrap();

        let confirmation = f
            .checkout
            .place_order(&mut session, address(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();

        let order = &confirmation.order;
        assert!(order.id().as_str().starts_with("ORD-"));
        assert_eq!(order.id().as_str().len(), 9);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.total().minor_units(), 2544);
        assert_eq!(confirmation.points_earned, 2);
        assert!(confirmation.impact.carbon_saved > 0.0);
        assert!(confirmation.impact_fact.is_some());

        assert!(f.cart.cart().unwrap().is_empty());
        assert_eq!(session, CheckoutSession::default());
        assert_eq!(f.loyalty.balance().unwrap(), 2);
        assert_eq!(f.orders.list().unwrap().first().map(Order::id), Some(order.id()));
        let feed = f.notifications.feed().unwrap();
        assert_eq!(
            feed.items().first().and_then(|n| n.order_id.as_ref()),
            Some(order.id())
        );
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart_and_bad_details() {
        let f = fixture(SimulationConfig::default());
        let mut session = CheckoutSession::new();
        assert!(matches!(
            f.checkout
                .place_order(&mut session, address(), &PaymentMethod::Wallet)
                .await,
            Err(AppError::BadRequest(_))
        ));

        f.cart.add(&ProductId::new("eco-tissue-1"), 1).unwrap();
        let mut incomplete = address();
        incomplete.postal_code.clear();
        assert!(matches!(
            f.checkout
                .place_order(&mut session, incomplete, &PaymentMethod::Wallet)
                .await,
            Err(AppError::Address(_))
        ));

        let upi = PaymentMethod::Upi { id: None, app: None };
        assert!(matches!(
            f.checkout.place_order(&mut session, address(), &upi).await,
            Err(AppError::Payment(PaymentError::MissingUpiTarget))
        ));
        assert_eq!(f.cart.cart().unwrap().item_count(), 1);
    }

    #[tokio::test]
    async fn test_simulated_failure_keeps_session() {
        let f = fixture(SimulationConfig {
            latency: Duration::from_millis(5),
            failure_rate: 1.0,
        });
        f.loyalty.earn(500, "Welcome bonus").unwrap();
        f.cart.add(&ProductId::new("eco-box-1"), 3).unwrap();
        let mut session = CheckoutSession::new();
        f.checkout.apply_loyalty(&mut session, 100).unwrap();

        let result = f
            .checkout
            .place_order(&mut session, address(), &PaymentMethod::Wallet)
            .await;
        assert!(matches!(result, Err(AppError::Unavailable(_))));
        assert_eq!(session.loyalty_points(), 100);
        assert_eq!(f.cart.cart().unwrap().item_count(), 3);
        assert_eq!(f.orders.list().unwrap().len(), 3);

        f.checkout.abandon(&mut session).unwrap();
        assert_eq!(f.loyalty.balance().unwrap(), 500);
    }

    #[tokio::test]
    async fn test_shrinking_cart_rechecks_loyalty_maximum() {
        let f = fixture(SimulationConfig::default());
        f.loyalty.earn(5000, "Welcome bonus").unwrap();
        let box_id = ProductId::new("eco-box-1");
        f.cart.add(&box_id, 3).unwrap();
        let mut session = CheckoutSession::new();
        f.checkout.apply_loyalty(&mut session, 300).unwrap();

        // ₹20.74 + ₹4.97 shipping + ₹3.73 tax = ₹29.44, half is 147 points.
        f.cart.update_quantity(&box_id, 1).unwrap();
        assert!(matches!(
            f.checkout.quote(&session),
            Err(AppError::Loyalty(LoyaltyError::AboveMaximum {
                requested: 300,
                maximum: 147
            }))
        ));
        let result = f
            .checkout
            .place_order(&mut session, address(), &PaymentMethod::Wallet)
            .await;
        assert!(matches!(
            result,
            Err(AppError::Loyalty(LoyaltyError::AboveMaximum { maximum: 147, .. }))
        ));
        assert_eq!(session.loyalty_points(), 300);
        assert_eq!(f.cart.cart().unwrap().item_count(), 1);
        assert_eq!(f.orders.list().unwrap().len(), 3);

        f.checkout.abandon(&mut session).unwrap();
        assert_eq!(f.loyalty.balance().unwrap(), 5000);
        let q = f.checkout.quote(&session).unwrap();
        assert_eq!(q.total.minor_units(), 2944);
    }

    #[tokio::test]
    async fn test_out_of_range_failure_rate_is_clamped() {
        let always = fixture(SimulationConfig {
            latency: Duration::ZERO,
            failure_rate: 5.0,
        });
        always.cart.add(&ProductId::new("eco-tissue-1"), 1).unwrap();
        let mut session = CheckoutSession::new();
        assert!(matches!(
            always
                .checkout
                .place_order(&mut session, address(), &PaymentMethod::Wallet)
                .await,
            Err(AppError::Unavailable(_))
        ));

        let never = fixture(SimulationConfig {
            latency: Duration::ZERO,
            failure_rate: -1.0,
        });
        never.cart.add(&ProductId::new("eco-tissue-1"), 1).unwrap();
        assert!(
            never
                .checkout
                .place_order(&mut session, address(), &PaymentMethod::Wallet)
                .await
                .is_ok()
        );
    }
}
