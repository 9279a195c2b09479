//! Promo codes.
//!
//! Validation is a pure function of the code string and the validation time:
//! the code is trimmed and uppercased, then looked up in a static table. A
//! code is rejected if it is unknown, inactive or past its expiry.
//!
//! Validation does not check `min_order_value` or `max_discount`; those are
//! applied (or not) by [`crate::pricing`] according to its
//! [`PromoConstraintMode`](crate::pricing::PromoConstraintMode).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Money;

/// Errors returned when looking up or applying a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    /// No code was entered.
    #[error("enter a promo code")]
    Empty,
    /// Unknown, inactive or expired.
    #[error("promo code {0} is invalid or has expired")]
    NotFound(String),
    /// The code is already on the order.
    #[error("promo code {0} is already applied")]
    AlreadyApplied(String),
}

/// How a promo discounts the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    /// `discount` is a whole percentage of the subtotal.
    Percentage,
    /// `discount` is an amount in minor units.
    Fixed,
    /// Waives the shipping fee; `discount` is unused.
    Shipping,
}

/// A promo code record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// Uppercase code.
    pub code: String,
    pub discount: u32,
    pub kind: PromoKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl PromoCode {
    /// Returns `true` if the code has an expiry strictly before `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry < now)
    }

    /// Active and not expired at `now`.
    #[must_use]
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now)
    }

    /// Short benefit text: `10% off`, `Free shipping`, `₹0.50 off`.
    #[must_use]
    pub fn benefit(&self) -> String {
        match self.kind {
            PromoKind::Percentage => format!("{}% off", self.discount),
            PromoKind::Fixed => format!("{} off", Money::from_minor(i64::from(self.discount))),
            PromoKind::Shipping => "Free shipping".to_owned(),
        }
    }
}

/// Normalize user input to the table's key form.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// The static promo table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoTable {
    codes: Vec<PromoCode>,
}

impl PromoTable {
    /// Build a table from records. Codes are normalized to uppercase.
    #[must_use]
    pub fn new(codes: Vec<PromoCode>) -> Self {
        let codes = codes
            .into_iter()
            .map(|mut promo| {
                promo.code = normalize_code(&promo.code);
                promo
            })
            .collect();
        Self { codes }
    }

    /// Validate a user-entered code at time `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::Empty`] for blank input and
    /// [`PromoError::NotFound`] if the code is unknown, inactive or expired.
    pub fn validate(&self, code: &str, now: DateTime<Utc>) -> Result<&PromoCode, PromoError> {
        let key = normalize_code(code);
        if key.is_empty() {
            return Err(PromoError::Empty);
        }
        self.codes
            .iter()
            .find(|p| p.code == key && p.is_available(now))
            .ok_or(PromoError::NotFound(key))
    }

    /// Codes a shopper can currently use.
    #[must_use]
    pub fn available(&self, now: DateTime<Utc>) -> Vec<&PromoCode> {
        self.codes.iter().filter(|p| p.is_available(now)).collect()
    }

    /// Every record, including inactive ones.
    #[must_use]
    pub fn all(&self) -> &[PromoCode] {
        &self.codes
    }
}

impl Default for PromoTable {
    /// The storefront's launch promotions.
    fn default() -> Self {
        let promo = |code: &str, discount, kind, description: &str| PromoCode {
            code: code.to_owned(),
            discount,
            kind,
            description: description.to_owned(),
            min_order_value: None,
            max_discount: None,
            expires_at: None,
            active: true,
        };

        Self::new(vec![
            PromoCode {
                max_discount: Some(Money::from_minor(500)),
                ..promo("SAVE10", 10, PromoKind::Percentage, "10% off on all orders")
            },
            PromoCode {
                min_order_value: Some(Money::from_minor(500)),
                ..promo("FLAT50", 50, PromoKind::Fixed, "₹50 off on orders above ₹500")
            },
            promo("FREESHIP", 0, PromoKind::Shipping, "Free shipping on all orders"),
            PromoCode {
                max_discount: Some(Money::from_minor(750)),
                ..promo("NEWUSER", 15, PromoKind::Percentage, "15% off for new users")
            },
            PromoCode {
                min_order_value: Some(Money::from_minor(1000)),
                max_discount: Some(Money::from_minor(1000)),
                ..promo(
                    "BULK20",
                    20,
                    PromoKind::Percentage,
                    "20% off on orders above ₹1000",
                )
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 8, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        let table = PromoTable::default();
        let lower = table.validate("save10", now()).map(|p| p.code.clone());
        let upper = table.validate("SAVE10", now()).map(|p| p.code.clone());
        assert_eq!(lower, Ok("SAVE10".to_owned()));
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let table = PromoTable::default();
        let first = table.validate(" flat50 ", now()).cloned();
        let second = table.validate(" flat50 ", now()).cloned();
        assert_eq!(first, second);
        assert!(first.is_ok());
    }

    #[test]
    fn test_unknown_and_empty_codes() {
        let table = PromoTable::default();
        assert_eq!(
            table.validate("BOGUS", now()),
            Err(PromoError::NotFound("BOGUS".to_owned()))
        );
        assert_eq!(table.validate("   ", now()), Err(PromoError::Empty));
    }

    #[test]
    fn test_inactive_code_is_not_found() {
        let mut retired = PromoTable::default().all().to_vec();
        if let Some(first) = retired.first_mut() {
            first.active = false;
        }
        let table = PromoTable::new(retired);
        assert!(table.validate("SAVE10", now()).is_err());
        assert_eq!(table.available(now()).len(), 4);
    }

    #[test]
    fn test_expired_code_is_not_found() {
        let table = PromoTable::new(vec![PromoCode {
            code: "summer".to_owned(),
            discount: 5,
            kind: PromoKind::Percentage,
            description: "Summer sale".to_owned(),
            min_order_value: None,
            max_discount: None,
            expires_at: Some(now() - Duration::days(1)),
            active: true,
        }]);
        assert!(table.validate("SUMMER", now()).is_err());
        assert!(table.validate("SUMMER", now() - Duration::days(2)).is_ok());
    }

    #[test]
    fn test_validation_ignores_min_order_value() {
        let table = PromoTable::default();
        let bulk = table.validate("bulk20", now());
        assert_eq!(
            bulk.map(|p| p.min_order_value),
            Ok(Some(Money::from_minor(1000)))
        );
    }

    #[test]
    fn test_benefit_text() {
        let table = PromoTable::default();
        let benefits: Vec<_> = table.all().iter().map(PromoCode::benefit).collect();
        assert_eq!(
            benefits,
            vec!["10% off", "₹0.50 off", "Free shipping", "15% off", "20% off"]
        );
    }
}
