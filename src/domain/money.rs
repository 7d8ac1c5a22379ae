//! Decimal-safe monetary amounts.
//!
//! The backend sends money in several shapes: a wrapped decimal
//! (`{"$numberDecimal": "123.45"}`), a bare JSON number, a string, `null`, or
//! nothing at all. [`MoneyValue`] captures every shape and
//! [`MoneyValue::to_money`] is the single conversion into [`Money`].
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw monetary value exactly as it arrived on the wire.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MoneyValue {
    /// BSON decimal wrapper.
    Wrapped {
        #[serde(rename = "$numberDecimal")]
        number_decimal: String,
    },
    Number(serde_json::Number),
    Text(String),
    /// Anything else (objects of another shape, booleans, arrays).
    Other(serde_json::Value),
}

impl MoneyValue {
    /// Converts the raw value into a non-negative amount.
    ///
    /// Unparseable input and negative amounts become zero.
    pub fn to_money(&self) -> Money {
        let parsed = match self {
            MoneyValue::Wrapped { number_decimal } => parse_decimal(number_decimal),
            MoneyValue::Number(number) => parse_decimal(&number.to_string()),
            MoneyValue::Text(text) => parse_decimal(text),
            MoneyValue::Other(_) => None,
        };

        match parsed {
            Some(amount) => Money::new(amount),
            None => {
                log::debug!("Coercing malformed monetary value to zero: {self:?}");
                Money::ZERO
            }
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Converts an optional wire value; a missing field is worth zero.
pub fn parse_money(value: Option<&MoneyValue>) -> Money {
    value.map(MoneyValue::to_money).unwrap_or(Money::ZERO)
}

/// Non-negative currency amount backed by [`Decimal`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps an amount, clamping negatives to zero.
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self::ZERO
        } else {
            Self(amount)
        }
    }

    /// Returns the underlying decimal amount.
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

/// Saturates at [`Decimal::MAX`] instead of overflowing.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
