//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as decimal strings (`"2999"`, `"18.50"`) in the store file
//! and over the API. Numbers are accepted on input so hand-edited data and
//! older clients keep working, but output is always a string.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    Invalid,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from its decimal string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a decimal or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Relative distance between two prices, measured against `self`.
    ///
    /// Returns `None` when `self` is zero and `other` is not (the ratio is
    /// unbounded); two zero prices are zero distance apart.
    #[must_use]
    pub fn relative_difference(&self, other: &Self) -> Option<Decimal> {
        let diff = (self.0 - other.0).abs();
        if self.0.is_zero() {
            return diff.is_zero().then_some(Decimal::ZERO);
        }
        diff.checked_div(self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_scale() {
        assert_eq!(Price::parse("18.50").unwrap().to_string(), "18.50");
        assert_eq!(Price::parse(" 2999 ").unwrap().to_string(), "2999");
    }

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::parse("1599").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"1599\"");
    }

    #[test]
    fn test_deserializes_from_string_or_number() {
        let from_str: Price = serde_json::from_str("\"899\"").unwrap();
        let from_num: Price = serde_json::from_str("899").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
    }

    #[test]
    fn test_relative_difference() {
        let base = Price::parse("1000").unwrap();
        let near = Price::parse("1050").unwrap();
        assert_eq!(
            base.relative_difference(&near),
            Some(Decimal::from_str("0.05").unwrap())
        );
    }

    #[test]
    fn test_relative_difference_zero_base() {
        assert_eq!(Price::ZERO.relative_difference(&Price::ZERO), Some(Decimal::ZERO));
        assert_eq!(
            Price::ZERO.relative_difference(&Price::parse("1").unwrap()),
            None
        );
    }
}
