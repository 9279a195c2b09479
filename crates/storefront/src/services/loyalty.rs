//! Loyalty service.

use std::sync::Arc;

use chrono::Utc;
use grooveo_core::loyalty::{self, LoyaltyAccount, LoyaltyTransaction};
use grooveo_core::Money;
use tracing::instrument;

use crate::error::Result;
use crate::store::{self, KeyValueStore, Slot};

/// Reads and writes the `loyalty` slot.
#[derive(Clone)]
pub struct LoyaltyService {
    store: Arc<dyn KeyValueStore>,
}

impl LoyaltyService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The shopper's account; a fresh account has no points.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn account(&self) -> Result<LoyaltyAccount> {
        Ok(store::load(self.store.as_ref(), Slot::Loyalty)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn balance(&self) -> Result<u64> {
        Ok(self.account()?.balance())
    }

    /// Credit points.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    #[instrument(skip(self, description))]
    pub fn earn(&self, points: u64, description: &str) -> Result<LoyaltyTransaction> {
        let mut account = self.account()?;
        let entry = account.earn(points, description, Utc::now());
        self.save(&account)?;
        tracing::info!(balance = account.balance(), "Points earned");
        Ok(entry)
    }

    /// Debit points. Fails without changing anything if the balance is too
    /// low.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Loyalty` with the shortfall if `points` exceeds the
    /// balance.
    #[instrument(skip(self, description))]
    pub fn redeem(&self, points: u64, description: &str) -> Result<LoyaltyTransaction> {
        let mut account = self.account()?;
        let entry = account.redeem(points, description, Utc::now())?;
        self.save(&account)?;
        tracing::info!(balance = account.balance(), "Points redeemed");
        Ok(entry)
    }

    /// Discount value of `points`.
    #[must_use]
    pub fn points_value(points: u64) -> Money {
        loyalty::points_value(points)
    }

    fn save(&self, account: &LoyaltyAccount) -> Result<()> {
        store::save(self.store.as_ref(), Slot::Loyalty, account)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use grooveo_core::loyalty::LoyaltyError;

    use super::*;
    use crate::error::AppError;
    use crate::store::MemoryStore;

    #[test]
    fn test_ledger_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let loyalty = LoyaltyService::new(Arc::clone(&store));
        loyalty.earn(300, "Order #ORD-10001").unwrap();
        loyalty.redeem(120, "Redeemed for order discount").unwrap();

        let reopened = LoyaltyService::new(store);
        let account = reopened.account().unwrap();
        assert_eq!(account.balance(), 180);
        assert_eq!(account.transactions().len(), 2);
        assert!(account.is_consistent());
    }

    #[test]
    fn test_redeem_reports_shortfall() {
        let loyalty = LoyaltyService::new(Arc::new(MemoryStore::new()));
        loyalty.earn(50, "Welcome bonus").unwrap();
        let err = loyalty.redeem(200, "Too many").unwrap_err();
        assert!(matches!(
            err,
            AppError::Loyalty(LoyaltyError::InsufficientPoints { shortfall: 150, .. })
        ));
        assert_eq!(loyalty.balance().unwrap(), 50);
    }

    #[test]
    fn test_points_value() {
        assert_eq!(LoyaltyService::points_value(100).to_string(), "₹10.00");
    }
}
