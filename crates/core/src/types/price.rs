//! Type-safe price representation using decimal arithmetic.
//!
//! The backend sends prices as JSON numbers (`9.99`). They are parsed into
//! [`Decimal`] so cart totals are exact and never show binary float
//! artifacts such as `49.949999`.

use std::fmt;
use std::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Truncate to whole cents, rounding toward negative infinity.
    #[must_use]
    pub fn floor_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let parsed: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(parsed, price("9.99"));

        let whole: Price = serde_json::from_str("12").unwrap();
        assert_eq!(whole, price("12"));
    }

    #[test]
    fn test_times_is_exact() {
        assert_eq!(price("9.99").times(5), price("49.95"));
        assert_eq!(price("0.1").times(3), price("0.3"));
    }

    #[test]
    fn test_floor_cents_truncates() {
        assert_eq!(price("10.129").floor_cents(), price("10.12"));
        assert_eq!(price("10.1").floor_cents(), price("10.1"));
        assert_eq!(price("-0.001").floor_cents(), price("-0.01"));
    }

    #[test]
    fn test_display() {
        assert_eq!(price("9.5").to_string(), "$9.50");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
    }

    #[test]
    fn test_sum() {
        let total: Price = [price("1.10"), price("2.20")].into_iter().sum();
        assert_eq!(total, price("3.30"));
    }
}
