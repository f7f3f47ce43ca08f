//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog sells in Costa Rican colones only, so a [`Price`] is just an
//! amount; the currency is implied everywhere it is displayed.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency symbol for colones.
pub const COLON_SYMBOL: char = '₡';

/// Errors that can occur when parsing a [`Price`] from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be empty")]
    Empty,
    #[error("price is not a number")]
    Invalid,
    #[error("price must be greater than zero")]
    NotPositive,
    #[error("price can have at most 2 decimal places")]
    TooPrecise,
}

/// A product price in colones.
///
/// Deserializes from either a JSON number or string, serializes as a string
/// so no precision is lost on the way back to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price typed into the product form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, not a decimal number, not
    /// strictly positive, or has more than two fractional digits.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(s).map_err(|_| PriceError::Invalid)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }

        Ok(Self(amount.normalize()))
    }

    /// Format for display, rounded to whole colones (e.g. `₡12 500`).
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let digits = rounded.abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{COLON_SYMBOL}{grouped}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::parse("12500").unwrap().display(), "₡12 500");
        assert_eq!(Price::parse("1250000").unwrap().display(), "₡1 250 000");
        assert_eq!(Price::parse("999").unwrap().display(), "₡999");
    }

    #[test]
    fn test_display_rounds_to_whole_colones() {
        assert_eq!(Price::parse("4999.50").unwrap().display(), "₡5 000");
        assert_eq!(Price::parse("4999.49").unwrap().display(), "₡4 999");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Price::parse("  "), Err(PriceError::Empty));
        assert_eq!(Price::parse("doce"), Err(PriceError::Invalid));
        assert_eq!(Price::parse("0"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse("-5"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse("1.005"), Err(PriceError::TooPrecise));
    }

    #[test]
    fn test_parse_accepts_trailing_zeros() {
        assert_eq!(Price::parse("15.500").unwrap(), Price::parse("15.5").unwrap());
    }

    #[test]
    fn test_deserializes_from_number_or_string() {
        let from_number: Price = serde_json::from_str("15000.5").unwrap();
        let from_string: Price = serde_json::from_str("\"15000.5\"").unwrap();
        assert_eq!(from_number, from_string);
    }
}
