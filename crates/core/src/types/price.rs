//! Type-safe money representation.
//!
//! Every amount in the storefront is an integer count of minor currency
//! units (paise for INR). Fractional intermediate values (percentage
//! discounts, tax) are computed with [`rust_decimal::Decimal`] and rounded
//! back to whole minor units with [`Money::from_decimal`].

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of money in minor currency units (paise).
///
/// ```
/// use grooveo_core::Money;
///
/// let price = Money::from_minor(1078);
/// assert_eq!(price.to_string(), "₹10.78");
/// assert_eq!((price * 2).minor_units(), 2156);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero paise.
    pub const ZERO: Self = Self(0);

    /// Create an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create an amount from whole major units (rupees).
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(100))
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// The amount in minor units as a decimal, for fractional arithmetic.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Round a decimal amount of minor units to the nearest whole minor unit
    /// (midpoint away from zero). Saturates at the `i64` range.
    #[must_use]
    pub fn from_decimal(minor: Decimal) -> Self {
        let rounded = minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    /// Returns `true` if the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtract, flooring the result at zero.
    #[must_use]
    pub const fn saturating_sub_floor(self, rhs: Self) -> Self {
        let diff = self.0.saturating_sub(rhs.0);
        if diff < 0 { Self::ZERO } else { Self(diff) }
    }

    /// The currency this amount is denominated in.
    #[must_use]
    pub const fn currency(self) -> CurrencyCode {
        CurrencyCode::INR
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}{}.{:02}",
            self.currency().symbol(),
            abs / 100,
            abs % 100
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
        }
    }

    /// ISO code string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_rupees_and_paise() {
        assert_eq!(Money::from_minor(1078).to_string(), "₹10.78");
        assert_eq!(Money::from_minor(5).to_string(), "₹0.05");
        assert_eq!(Money::ZERO.to_string(), "₹0.00");
        assert_eq!(Money::from_minor(-497).to_string(), "-₹4.97");
    }

    #[test]
    fn test_from_decimal_rounds_midpoint_away_from_zero() {
        assert_eq!(Money::from_decimal(Decimal::new(17_905, 1)).minor_units(), 1791);
        assert_eq!(Money::from_decimal(Decimal::new(17_904, 1)).minor_units(), 1790);
        assert_eq!(Money::from_decimal(Decimal::new(-25, 1)).minor_units(), -3);
    }

    #[test]
    fn test_saturating_sub_floor() {
        let a = Money::from_minor(100);
        let b = Money::from_minor(250);
        assert_eq!(a.saturating_sub_floor(b), Money::ZERO);
        assert_eq!(b.saturating_sub_floor(a).minor_units(), 150);
    }

    #[test]
    fn test_sum_and_mul() {
        let total: Money = [Money::from_minor(1078) * 2, Money::from_minor(746)]
            .into_iter()
            .sum();
        assert_eq!(total.minor_units(), 2902);
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(10).minor_units(), 1000);
    }
}
