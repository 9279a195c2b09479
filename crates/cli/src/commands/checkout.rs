//! Checkout commands.
//!
//! Each invocation builds a fresh checkout session from `--promo` and
//! `--points`. `place` redeems the points, and refunds them if the order
//! cannot be placed.
//!
//! # Usage
//!
//! ```bash
//! grooveo checkout quote --promo SAVE10 --points 150
//! grooveo checkout place --promo SAVE10 --name "Asha Rao" --street "12 MG Road" \
//!     --city Bengaluru --state KA --postal-code 560001 \
//!     --payment upi --upi-app PhonePe
//! ```

use clap::{Args, Subcommand, ValueEnum};
use grooveo_core::order::ShippingAddress;
use grooveo_core::pricing::Quote;
use grooveo_storefront::services::{CheckoutSession, OrderConfirmation, PaymentMethod};
use grooveo_storefront::{AppState, Result};

use super::{cart, report};

#[derive(Subcommand)]
pub enum CheckoutAction {
    /// Price the cart
    Quote {
        #[command(flatten)]
        discounts: Discounts,
    },
    /// Place the order
    Place {
        #[command(flatten)]
        discounts: Discounts,
        #[command(flatten)]
        address: AddressArgs,
        #[command(flatten)]
        payment: PaymentArgs,
    },
}

#[derive(Args)]
pub struct Discounts {
    /// Promo code to apply (repeatable)
    #[arg(long = "promo")]
    promos: Vec<String>,

    /// Loyalty points to redeem
    #[arg(long)]
    points: Option<u64>,
}

#[derive(Args)]
pub struct AddressArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long, default_value = "India")]
    country: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaymentKind {
    Card,
    Upi,
    Wallet,
    Cod,
}

#[derive(Args)]
pub struct PaymentArgs {
    /// Payment method
    #[arg(long, value_enum, default_value = "cod")]
    payment: PaymentKind,

    #[arg(long, default_value = "")]
    card_number: String,
    #[arg(long, default_value = "")]
    expiry: String,
    #[arg(long, default_value = "")]
    cvv: String,
    #[arg(long, default_value = "")]
    holder: String,

    #[arg(long)]
    upi_id: Option<String>,
    #[arg(long)]
    upi_app: Option<String>,
}

impl From<AddressArgs> for ShippingAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            name: args.name,
            street: args.street,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

impl From<PaymentArgs> for PaymentMethod {
    fn from(args: PaymentArgs) -> Self {
        match args.payment {
            PaymentKind::Card => Self::Card {
                number: args.card_number,
                expiry: args.expiry,
                cvv: args.cvv,
                holder: args.holder,
            },
            PaymentKind::Upi => Self::Upi {
                id: args.upi_id,
                app: args.upi_app,
            },
            PaymentKind::Wallet => Self::Wallet,
            PaymentKind::Cod => Self::CashOnDelivery,
        }
    }
}

pub async fn run(state: &AppState, action: CheckoutAction) -> Result<()> {
    let checkout = state.checkout();
    match action {
        CheckoutAction::Quote { discounts } => {
            cart::show(&state.cart().cart()?);
            let session = promo_session(state, &discounts.promos)?;
            let quote = match discounts.points {
                Some(points) => checkout.preview_loyalty(&session, points).map_err(report)?,
                None => checkout.quote(&session)?,
            };
            summary(&quote);
        }
        CheckoutAction::Place {
            discounts,
            address,
            payment,
        } => {
            let mut session = promo_session(state, &discounts.promos)?;
            if let Some(points) = discounts.points {
                checkout
                    .apply_loyalty(&mut session, points)
                    .map_err(report)?;
            }
            let confirmation =
                place_or_refund(state, &mut session, address.into(), &payment.into()).await?;
            confirmed(&confirmation);
        }
    }
    Ok(())
}

/// Place the order, refunding applied points if it fails. The placement
/// error is what the caller sees even when the refund fails too.
async fn place_or_refund(
    state: &AppState,
    session: &mut CheckoutSession,
    address: ShippingAddress,
    payment: &PaymentMethod,
) -> Result<OrderConfirmation> {
    let checkout = state.checkout();
    match checkout.place_order(session, address, payment).await {
        Ok(confirmation) => Ok(confirmation),
        Err(e) => {
            let err = report(e);
            if let Err(refund) = checkout.abandon(session) {
                tracing::error!(error = %refund, "Could not refund loyalty points");
            }
            Err(err)
        }
    }
}

fn promo_session(state: &AppState, codes: &[String]) -> Result<CheckoutSession> {
    let mut session = CheckoutSession::new();
    for code in codes {
        state
            .checkout()
            .apply_promo(&mut session, code)
            .map_err(report)?;
    }
    Ok(session)
}

fn summary(quote: &Quote) {
    tracing::info!("Subtotal:        {:>10}", quote.subtotal.to_string());
    for line in &quote.promo_lines {
        if line.eligible {
            tracing::info!("  {:<14} -{:>10}", line.code, line.discount.to_string());
        } else {
            tracing::info!("  {:<14} (minimum order not met)", line.code);
        }
    }
    if !quote.loyalty_discount.is_zero() {
        tracing::info!("Loyalty points:  -{:>9}", quote.loyalty_discount.to_string());
    }
    if quote.free_shipping() {
        tracing::info!("Shipping:        {:>10}", "FREE");
    } else {
        tracing::info!("Shipping:        {:>10}", quote.shipping.to_string());
    }
    tracing::info!("Tax:             {:>10}", quote.tax.to_string());
    tracing::info!("Total:           {:>10}", quote.total.to_string());
    let savings = quote.savings();
    if !savings.is_zero() {
        tracing::info!("You save {savings}");
    }
}

fn confirmed(confirmation: &OrderConfirmation) {
    let order = &confirmation.order;
    tracing::info!("Order #{} placed", order.id());
    summary(&confirmation.quote);
    if confirmation.points_earned > 0 {
        tracing::info!("You earned {} loyalty points", confirmation.points_earned);
    }
    if !confirmation.impact.is_zero() {
        tracing::info!(
            "This order saves {:.2} kg of CO2",
            confirmation.impact.carbon_saved
        );
    }
    if let Some(fact) = &confirmation.impact_fact {
        tracing::info!("{fact}");
    }
}
