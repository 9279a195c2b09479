//! Loyalty points ledger.
//!
//! Points are earned on purchases and redeemed for an order discount at a
//! fixed rate of 100 points = ₹10 (one point is worth 10 paise). The account
//! keeps an append-only transaction log whose earned-minus-redeemed sum
//! always equals the balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{LoyaltyTransactionKind, Money, TransactionId};

/// Value of a single point.
pub const POINT_VALUE: Money = Money::from_minor(10);

/// Smallest redemption accepted at checkout.
pub const MIN_REDEMPTION_POINTS: u64 = 100;

/// Spend that earns one point (₹10).
pub const EARN_UNIT: Money = Money::from_minor(1000);

/// Largest share of the order total, in percent, payable with points.
pub const MAX_REDEMPTION_PERCENT: i64 = 50;

/// Errors from ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoyaltyError {
    /// Not enough points in the account.
    #[error("not enough points: requested {requested}, available {available} ({shortfall} short)")]
    InsufficientPoints {
        requested: u64,
        available: u64,
        shortfall: u64,
    },
    /// Below [`MIN_REDEMPTION_POINTS`].
    #[error("you need at least {minimum} points to redeem (requested {requested})")]
    BelowMinimum { requested: u64, minimum: u64 },
    /// More than this order allows.
    #[error("at most {maximum} points can be redeemed on this order (requested {requested})")]
    AboveMaximum { requested: u64, maximum: u64 },
}

/// Discount value of `points`.
#[must_use]
pub fn points_value(points: u64) -> Money {
    let points = i64::try_from(points).unwrap_or(i64::MAX);
    Money::from_minor(points.saturating_mul(POINT_VALUE.minor_units()))
}

/// Points earned on an order total: one per full [`EARN_UNIT`].
#[must_use]
pub fn points_earned(order_total: Money) -> u64 {
    u64::try_from(order_total.minor_units() / EARN_UNIT.minor_units()).unwrap_or(0)
}

/// Most points redeemable against `order_total` with `balance` available.
#[must_use]
pub fn max_redeemable(balance: u64, order_total: Money) -> u64 {
    let cap_value = order_total.minor_units().max(0) * MAX_REDEMPTION_PERCENT / 100;
    let cap_points = u64::try_from(cap_value / POINT_VALUE.minor_units()).unwrap_or(0);
    balance.min(cap_points)
}

/// A ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyTransaction {
    pub id: TransactionId,
    pub kind: LoyaltyTransactionKind,
    pub points: u64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A shopper's points balance and history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    balance: u64,
    /// Oldest first.
    transactions: Vec<LoyaltyTransaction>,
}

impl LoyaltyAccount {
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Discount value of the whole balance.
    #[must_use]
    pub fn balance_value(&self) -> Money {
        points_value(self.balance)
    }

    /// Transactions, oldest first.
    #[must_use]
    pub fn transactions(&self) -> &[LoyaltyTransaction] {
        &self.transactions
    }

    /// Transactions, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &LoyaltyTransaction> {
        self.transactions.iter().rev()
    }

    /// Credit points unconditionally.
    pub fn earn(
        &mut self,
        points: u64,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> LoyaltyTransaction {
        self.balance = self.balance.saturating_add(points);
        self.push(LoyaltyTransactionKind::Earned, "earn", points, description, now)
    }

    /// Debit points.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::InsufficientPoints`] if `points` exceeds the
    /// balance; the account is left unchanged.
    pub fn redeem(
        &mut self,
        points: u64,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<LoyaltyTransaction, LoyaltyError> {
        if points > self.balance {
            return Err(LoyaltyError::InsufficientPoints {
                requested: points,
                available: self.balance,
                shortfall: points - self.balance,
            });
        }
        self.balance -= points;
        Ok(self.push(
            LoyaltyTransactionKind::Redeemed,
            "redeem",
            points,
            description,
            now,
        ))
    }

    /// Check a checkout redemption against the minimum, the per-order maximum
    /// and the balance, without changing the account.
    ///
    /// # Errors
    ///
    /// Returns the first rule the request breaks.
    pub fn check_redemption(&self, points: u64, order_total: Money) -> Result<(), LoyaltyError> {
        if points < MIN_REDEMPTION_POINTS {
            return Err(LoyaltyError::BelowMinimum {
                requested: points,
                minimum: MIN_REDEMPTION_POINTS,
            });
        }
        if points > self.balance {
            return Err(LoyaltyError::InsufficientPoints {
                requested: points,
                available: self.balance,
                shortfall: points - self.balance,
            });
        }
        let maximum = max_redeemable(self.balance, order_total);
        if points > maximum {
            return Err(LoyaltyError::AboveMaximum {
                requested: points,
                maximum,
            });
        }
        Ok(())
    }

    /// Returns `true` if the balance equals earned minus redeemed.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let (earned, redeemed) =
            self.transactions
                .iter()
                .fold((0_u64, 0_u64), |(e, r), t| match t.kind {
                    LoyaltyTransactionKind::Earned => (e.saturating_add(t.points), r),
                    LoyaltyTransactionKind::Redeemed => (e, r.saturating_add(t.points)),
                });
        earned.checked_sub(redeemed) == Some(self.balance)
    }

    fn push(
        &mut self,
        kind: LoyaltyTransactionKind,
        prefix: &str,
        points: u64,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> LoyaltyTransaction {
        let entry = LoyaltyTransaction {
            id: TransactionId::generate(prefix),
            kind,
            points,
            description: description.into(),
            created_at: now,
        };
        self.transactions.push(entry.clone());
        entry
    }
}
