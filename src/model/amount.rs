//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles
//! parsing values that may or may not include a dollar sign and commas, as
//! well as JSON bodies where the amount arrives as a plain number.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::str::FromStr;

/// Represents a monetary amount.
///
/// This type wraps `Decimal` and provides custom serialization and
/// deserialization so that both `42.5` and `"$1,234.56"` on the wire produce
/// the same value. Serialization always emits a plain JSON number.
///
/// # Examples
///
/// ```
/// # use expenses_cli::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,234.50").unwrap();
/// let b = Amount::from_str("1234.5").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "$1,234.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new `Amount` from a `Decimal` value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying `Decimal` value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns the amount with negative values clamped to zero. Aggregations
    /// require non-negative inputs, so anything below zero is treated the
    /// same as a missing value.
    pub fn clamped(self) -> Self {
        if self.0.is_sign_negative() {
            Amount::ZERO
        } else {
            self
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        Amount(iter.map(|a| a.0).sum())
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount '{}'", self.0)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let negative = trimmed.starts_with('-');
        let cleaned: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if cleaned.is_empty() {
            return Err(AmountError(s.to_string()));
        }
        let mut value = Decimal::from_str(&cleaned).map_err(|_| AmountError(s.to_string()))?;
        if negative {
            value.set_sign_negative(true);
        }
        Ok(Amount(value))
    }
}

impl Display for Amount {
    /// Formats as `$1,234.50`, with a leading minus for negative values.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2).abs();
        let text = format!("{rounded:.2}");
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let mut grouped = String::new();
        for (ix, c) in whole.chars().enumerate() {
            if ix > 0 && (whole.len() - ix) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{sign}${grouped}.{cents}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.to_f64() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The two known backends disagree: one sends numbers, one sends
        // formatted strings. Accept both.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => {
                let value = Decimal::from_f64(n)
                    .ok_or_else(|| D::Error::custom(format!("amount {n} is not representable")))?;
                Ok(Amount(value))
            }
            Wire::Text(s) => Amount::from_str(&s).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn parse_plain() {
        let a = Amount::from_str("42.50").unwrap();
        assert_eq!(a.value(), Decimal::new(4250, 2));
    }

    #[test]
    fn parse_with_dollar_and_commas() {
        let a = Amount::from_str("$1,234.56").unwrap();
        assert_eq!(a.value(), Decimal::new(123456, 2));
    }

    #[test]
    fn parse_negative() {
        let a = Amount::from_str("-$5.00").unwrap();
        assert!(a.value().is_sign_negative());
        assert_eq!(a.clamped(), Amount::ZERO);
    }

    #[test]
    fn parse_garbage_is_an_error() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn display_groups_thousands() {
        let a = Amount::from_str("1234567.8").unwrap();
        assert_eq!(a.to_string(), "$1,234,567.80");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn deserialize_number_and_string() {
        let a: Amount = serde_json::from_str("12.5").unwrap();
        let b: Amount = serde_json::from_str("\"$12.50\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serialize_as_number() {
        let a = Amount::from_str("9.75").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "9.75");
    }
}
