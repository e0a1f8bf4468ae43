//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// Prices are never negative in the catalog.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative decimal price in the shop's display currency.
///
/// Decimal (not float) arithmetic, so cart totals add up exactly. The wire
/// representation is a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// A zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0.round_dp(2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromStr;

    #[test]
    fn test_rejects_negative() {
        let amount = Decimal::from_str("-1.50").unwrap();
        assert!(matches!(Price::new(amount), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_accepts_zero_and_positive() {
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(Decimal::from_str("4.99").unwrap()).is_ok());
    }

    #[test]
    fn test_line_total() {
        let price = Price::new(Decimal::from_str("2.50").unwrap()).unwrap();
        assert_eq!(price.times(3), Decimal::from_str("7.50").unwrap());
    }

    #[test]
    fn test_display_two_decimals() {
        let price = Price::new(Decimal::from_str("4.999").unwrap()).unwrap();
        assert_eq!(price.to_string(), "$5.00");
    }

    #[test]
    fn test_serde_as_string() {
        let price = Price::new(Decimal::from_str("12.50").unwrap()).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"12.50\"");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
