//! Promo code commands.

use chrono::Utc;
use clap::Subcommand;
use grooveo_storefront::services::CheckoutSession;
use grooveo_storefront::{AppState, Result};

use super::report;

#[derive(Subcommand)]
pub enum PromoAction {
    /// List codes that can be used right now
    List,
    /// Validate a code and show what it would save on the current cart
    Check { code: String },
}

pub fn run(state: &AppState, action: PromoAction) -> Result<()> {
    match action {
        PromoAction::List => {
            for promo in state.promos().available(Utc::now()) {
                tracing::info!("  {:<10} {}", promo.code, promo.description);
            }
        }
        PromoAction::Check { code } => {
            let mut session = CheckoutSession::new();
            let promo = state
                .checkout()
                .apply_promo(&mut session, &code)
                .map_err(report)?;
            tracing::info!("{} is valid: {}", promo.code, promo.benefit());

            let quote = state.checkout().quote(&session)?;
            if !quote.subtotal.is_zero() {
                tracing::info!(
                    "On your cart of {} this saves {}",
                    quote.subtotal,
                    quote.savings()
                );
            }
            if quote.promo_lines.iter().any(|line| !line.eligible) {
                tracing::info!("Your cart does not yet meet this code's minimum order value");
            }
        }
    }
    Ok(())
}
