//! Checkout pricing.
//!
//! [`quote`] turns a cart subtotal, the applied promo codes and an already
//! resolved loyalty discount into the figures shown on the order summary:
//!
//! 1. Shipping is free when the subtotal reaches the free-shipping threshold
//!    or any applied promo is a [`PromoKind::Shipping`] promo; otherwise the
//!    flat fee applies.
//! 2. Each percentage promo discounts `subtotal × rate / 100`. Percentages
//!    are always taken off the pre-discount subtotal, so stacked promos do
//!    not compound. Fixed promos discount their amount.
//! 3. Promo and loyalty discounts are summed and taken off the subtotal,
//!    floored at zero.
//! 4. Tax is charged on the discounted subtotal; shipping is not taxed.
//! 5. Total = discounted subtotal + shipping + tax.
//!
//! Fractional amounts are rounded to whole minor units, midpoint away from
//! zero, once per promo line and once for tax.
//!
//! ```
//! use grooveo_core::Money;
//! use grooveo_core::pricing::{PricingPolicy, quote};
//! use grooveo_core::promo::PromoTable;
//! # use chrono::Utc;
//!
//! let table = PromoTable::default();
//! let flat50 = table.validate("FLAT50", Utc::now()).cloned().into_iter().collect::<Vec<_>>();
//!
//! let q = quote(Money::from_minor(10_000), &flat50, Money::ZERO, &PricingPolicy::default());
//! assert_eq!(q.shipping, Money::ZERO);
//! assert_eq!(q.discounted_subtotal.minor_units(), 9950);
//! assert_eq!(q.tax.minor_units(), 1791);
//! assert_eq!(q.total.minor_units(), 11_741);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::promo::{PromoCode, PromoKind};
use crate::types::Money;

/// Whether promo `min_order_value` / `max_discount` constraints are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoConstraintMode {
    /// Constraints are informational only.
    #[default]
    Ignore,
    /// A promo below its minimum order value contributes nothing and discounts
    /// are capped at `max_discount`.
    Enforce,
}

/// Store-wide pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Money,
    /// Flat shipping fee below the threshold.
    pub shipping_fee: Money,
    /// Tax rate as a fraction (0.18 for 18% GST).
    pub tax_rate: Decimal,
    pub promo_constraints: PromoConstraintMode,
}

impl PricingPolicy {
    /// Default free-shipping threshold (₹41.50).
    pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_minor(4150);
    /// Default flat shipping fee (₹4.97).
    pub const DEFAULT_SHIPPING_FEE: Money = Money::from_minor(497);

    /// Default GST rate (18%).
    #[must_use]
    pub fn default_tax_rate() -> Decimal {
        Decimal::new(18, 2)
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Self::DEFAULT_FREE_SHIPPING_THRESHOLD,
            shipping_fee: Self::DEFAULT_SHIPPING_FEE,
            tax_rate: Self::default_tax_rate(),
            promo_constraints: PromoConstraintMode::default(),
        }
    }
}

/// One applied promo's contribution to the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoLine {
    pub code: String,
    pub kind: PromoKind,
    /// Discount off the subtotal (zero for shipping promos).
    pub discount: Money,
    /// `false` when constraints are enforced and the minimum order value was
    /// not met.
    pub eligible: bool,
}

/// Every figure on the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Money,
    pub promo_lines: Vec<PromoLine>,
    pub promo_discount: Money,
    pub loyalty_discount: Money,
    /// Promo + loyalty discount before flooring.
    pub total_discount: Money,
    pub discounted_subtotal: Money,
    pub shipping: Money,
    /// The fee that would have been charged without a waiver.
    pub shipping_fee: Money,
    /// Whether the subtotal reached the free-shipping threshold.
    pub threshold_met: bool,
    pub tax: Money,
    pub total: Money,
}

impl Quote {
    /// Returns `true` if no shipping fee is charged.
    #[must_use]
    pub const fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Discount actually taken off the subtotal, plus the shipping fee when
    /// the threshold waived it. A shipping promo alone does not count.
    #[must_use]
    pub fn savings(&self) -> Money {
        let discount = self.subtotal.saturating_sub_floor(self.discounted_subtotal);
        let waived = if self.threshold_met {
            self.shipping_fee
        } else {
            Money::ZERO
        };
        discount + waived
    }
}

/// Discount one promo would give on `subtotal`, ignoring constraints.
#[must_use]
pub fn promo_discount(promo: &PromoCode, subtotal: Money) -> Money {
    match promo.kind {
        PromoKind::Percentage => Money::from_decimal(
            subtotal.to_decimal() * Decimal::from(promo.discount) / Decimal::ONE_HUNDRED,
        ),
        PromoKind::Fixed => Money::from_minor(i64::from(promo.discount)),
        PromoKind::Shipping => Money::ZERO,
    }
}

fn promo_line(promo: &PromoCode, subtotal: Money, mode: PromoConstraintMode) -> PromoLine {
    let mut discount = promo_discount(promo, subtotal);
    let mut eligible = true;

    if mode == PromoConstraintMode::Enforce {
        if promo.min_order_value.is_some_and(|min| subtotal < min) {
            eligible = false;
            discount = Money::ZERO;
        }
        if let Some(cap) = promo.max_discount {
            discount = discount.min(cap);
        }
    }

    PromoLine {
        code: promo.code.clone(),
        kind: promo.kind,
        discount,
        eligible,
    }
}

/// Price an order. Pure: identical inputs always yield an identical quote.
#[must_use]
pub fn quote(
    subtotal: Money,
    promos: &[PromoCode],
    loyalty_discount: Money,
    policy: &PricingPolicy,
) -> Quote {
    let promo_lines: Vec<PromoLine> = promos
        .iter()
        .map(|p| promo_line(p, subtotal, policy.promo_constraints))
        .collect();

    let shipping_waived = promo_lines
        .iter()
        .any(|line| line.eligible && line.kind == PromoKind::Shipping);
    let threshold_met = subtotal >= policy.free_shipping_threshold;
    let shipping = if threshold_met || shipping_waived {
        Money::ZERO
    } else {
        policy.shipping_fee
    };

    let promo_discount: Money = promo_lines.iter().map(|line| line.discount).sum();
    let total_discount = promo_discount + loyalty_discount;
    let discounted_subtotal = subtotal.saturating_sub_floor(total_discount);
    let tax = Money::from_decimal(discounted_subtotal.to_decimal() * policy.tax_rate);
    let total = discounted_subtotal + shipping + tax;

    Quote {
        subtotal,
        promo_lines,
        promo_discount,
        loyalty_discount,
        total_discount,
        discounted_subtotal,
        shipping,
        shipping_fee: policy.shipping_fee,
        threshold_met,
        tax,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promo::PromoTable;

    fn promo(code: &str) -> PromoCode {
        PromoTable::default()
            .all()
            .iter()
            .find(|p| p.code == code)
            .cloned()
            .unwrap_or_else(|| PromoCode {
                code: code.to_owned(),
                discount: 0,
                kind: PromoKind::Fixed,
                description: String::new(),
                min_order_value: None,
                max_discount: None,
                expires_at: None,
                active: true,
            })
    }

    fn policy() -> PricingPolicy {
        PricingPolicy::default()
    }

    #[test]
    fn test_reference_example() {
        let q = quote(
            Money::from_minor(10_000),
            &[promo("FLAT50")],
            Money::ZERO,
            &policy(),
        );
        assert_eq!(q.shipping, Money::ZERO);
        assert_eq!(q.discounted_subtotal.minor_units(), 9950);
        assert_eq!(q.tax.minor_units(), 1791);
        assert_eq!(q.total.minor_units(), 11_741);
    }

    #[test]
    fn test_shipping_charged_below_threshold() {
        let q = quote(Money::from_minor(4149), &[], Money::ZERO, &policy());
        assert_eq!(q.shipping.minor_units(), 497);
        assert!(!q.free_shipping());
    }

    #[test]
    fn test_shipping_free_at_threshold() {
        let q = quote(Money::from_minor(4150), &[], Money::ZERO, &policy());
        assert_eq!(q.shipping, Money::ZERO);
    }

    #[test]
    fn test_shipping_free_with_shipping_promo() {
        let q = quote(
            Money::from_minor(1000),
            &[promo("FREESHIP")],
            Money::ZERO,
            &policy(),
        );
        assert_eq!(q.shipping, Money::ZERO);
        assert_eq!(q.promo_discount, Money::ZERO);
        assert!(!q.threshold_met);
        assert_eq!(q.savings(), Money::ZERO);
    }

    #[test]
    fn test_savings_count_fee_waived_by_threshold() {
        let q = quote(
            Money::from_minor(5000),
            &[promo("FREESHIP")],
            Money::ZERO,
            &policy(),
        );
        assert!(q.threshold_met);
        assert_eq!(q.savings().minor_units(), 497);

        let q = quote(Money::from_minor(4149), &[], Money::ZERO, &policy());
        assert_eq!(q.savings(), Money::ZERO);
    }

    #[test]
    fn test_shipping_rule_over_many_subtotals() {
        for subtotal in (0..10_000).step_by(83) {
            for promos in [vec![], vec![promo("FREESHIP")]] {
                let q = quote(Money::from_minor(subtotal), &promos, Money::ZERO, &policy());
                let expect_free = subtotal >= 4150 || !promos.is_empty();
                assert_eq!(q.free_shipping(), expect_free, "subtotal {subtotal}");
            }
        }
    }

    #[test]
    fn test_percentage_discount_is_rate_of_subtotal() {
        for subtotal in [0_i64, 100, 2500, 10_000, 123_400] {
            let q = quote(
                Money::from_minor(subtotal),
                &[promo("NEWUSER")],
                Money::ZERO,
                &policy(),
            );
            assert_eq!(q.promo_discount.minor_units(), subtotal * 15 / 100);
        }
    }

    #[test]
    fn test_percentages_do_not_compound() {
        let q = quote(
            Money::from_minor(10_000),
            &[promo("SAVE10"), promo("BULK20")],
            Money::ZERO,
            &policy(),
        );
        // 10% + 20% of the original subtotal, not 20% of 90%.
        assert_eq!(q.promo_discount.minor_units(), 3000);
        assert_eq!(q.discounted_subtotal.minor_units(), 7000);
    }

    #[test]
    fn test_discount_never_drives_subtotal_negative() {
        let q = quote(
            Money::from_minor(40),
            &[promo("FLAT50")],
            Money::from_minor(500),
            &policy(),
        );
        assert_eq!(q.total_discount.minor_units(), 550);
        assert_eq!(q.discounted_subtotal, Money::ZERO);
        assert_eq!(q.tax, Money::ZERO);
        assert_eq!(q.total.minor_units(), 497);
        assert_eq!(q.savings().minor_units(), 40);
    }

    #[test]
    fn test_loyalty_discount_applied_before_tax() {
        let q = quote(
            Money::from_minor(5000),
            &[],
            Money::from_minor(1000),
            &policy(),
        );
        assert_eq!(q.discounted_subtotal.minor_units(), 4000);
        assert_eq!(q.tax.minor_units(), 720);
        assert_eq!(q.total.minor_units(), 4720);
    }

    #[test]
    fn test_tax_rounds_to_nearest_paisa() {
        // 18% of 1003 = 180.54
        let q = quote(Money::from_minor(1003), &[], Money::ZERO, &policy());
        assert_eq!(q.tax.minor_units(), 181);
    }

    #[test]
    fn test_quote_is_idempotent() {
        let promos = [promo("SAVE10"), promo("FREESHIP")];
        let a = quote(Money::from_minor(3333), &promos, Money::from_minor(70), &policy());
        let b = quote(Money::from_minor(3333), &promos, Money::from_minor(70), &policy());
        assert_eq!(a, b);
    }

    #[test]
    fn test_enforced_constraints() {
        let enforce = PricingPolicy {
            promo_constraints: PromoConstraintMode::Enforce,
            ..policy()
        };

        // BULK20 needs a 1000 minimum.
        let q = quote(Money::from_minor(900), &[promo("BULK20")], Money::ZERO, &enforce);
        assert_eq!(q.promo_discount, Money::ZERO);
        assert!(q.promo_lines.iter().all(|l| !l.eligible));

        // SAVE10 caps at 500.
        let q = quote(Money::from_minor(10_000), &[promo("SAVE10")], Money::ZERO, &enforce);
        assert_eq!(q.promo_discount.minor_units(), 500);

        // Ignored by default.
        let q = quote(Money::from_minor(10_000), &[promo("SAVE10")], Money::ZERO, &policy());
        assert_eq!(q.promo_discount.minor_units(), 1000);
    }
}
