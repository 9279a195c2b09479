//! Loyalty point commands.

use clap::Subcommand;
use grooveo_core::LoyaltyTransactionKind;
use grooveo_storefront::{AppState, Result};

#[derive(Subcommand)]
pub enum LoyaltyAction {
    /// Show the balance and recent activity
    Show {
        /// Number of transactions to list
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Credit points manually
    Earn {
        points: u64,
        #[arg(short, long, default_value = "Manual adjustment")]
        description: String,
    },
}

pub fn run(state: &AppState, action: LoyaltyAction) -> Result<()> {
    match action {
        LoyaltyAction::Show { limit } => {
            let account = state.loyalty().account()?;
            tracing::info!(
                "{} points (worth {})",
                account.balance(),
                account.balance_value()
            );
            for tx in account.recent().take(limit) {
                let sign = match tx.kind {
                    LoyaltyTransactionKind::Earned => '+',
                    LoyaltyTransactionKind::Redeemed => '-',
                };
                tracing::info!(
                    "  {}  {sign}{:<6} {}",
                    tx.created_at.format("%Y-%m-%d %H:%M"),
                    tx.points,
                    tx.description
                );
            }
        }
        LoyaltyAction::Earn {
            points,
            description,
        } => {
            state.loyalty().earn(points, &description)?;
            tracing::info!("Balance: {} points", state.loyalty().balance()?);
        }
    }
    Ok(())
}
