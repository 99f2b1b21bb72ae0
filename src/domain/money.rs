use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Monetary amount. Travels as a JSON number, held as an exact decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const TARGET_DECIMALS: u32 = 2;

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    #[cfg(test)]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[cfg(test)]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Parses what a user typed into an amount field.
    ///
    /// Accepts plain and scientific notation, rounds half-to-even to
    /// [`Money::TARGET_DECIMALS`] places.
    pub fn from_input(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::validation("Amount is required"));
        }

        let value = Decimal::from_str(input)
            .or_else(|_| Decimal::from_scientific(input))
            .map_err(|_| Error::validation(format!("Amount must be a number, got '{}'", input)))?;

        Ok(Self(value.round_dp_with_strategy(
            Self::TARGET_DECIMALS,
            RoundingStrategy::MidpointNearestEven,
        )))
    }

    /// Amount typed by a user for something that moves money.
    pub fn positive_from_input(input: &str) -> Result<Self, Error> {
        let amount = Self::from_input(input)?;
        if amount.0 <= Decimal::ZERO {
            return Err(Error::validation("Amount must be greater than zero"));
        }
        Ok(amount)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
