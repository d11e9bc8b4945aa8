//! Money type for representing monetary values.
//!
//! Amounts are integer cents. Catalog prices arrive as decimal strings and are
//! rounded half away from zero on conversion.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol as it prefixes an amount.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$ ",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Separator between whole and fractional units when displayed.
    pub fn decimal_separator(&self) -> char {
        match self {
            Currency::BRL | Currency::EUR => ',',
            Currency::USD | Currency::GBP => '.',
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BRL" => Some(Currency::BRL),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., centavos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Parse a decimal amount such as `"129.90"`.
    ///
    /// Extra precision is rounded half-away-from-zero to whole cents.
    ///
    /// ```
    /// use shopfront_commerce::money::{Currency, Money};
    /// let price = Money::parse("129.9", Currency::BRL).unwrap();
    /// assert_eq!(price.amount_cents, 12990);
    /// ```
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, CommerceError> {
        let decimal = Decimal::from_str(amount.trim())
            .map_err(|e| CommerceError::InvalidPrice(format!("{amount:?}: {e}")))?;
        Self::from_decimal(decimal, currency)
    }

    /// Convert a decimal amount in whole units into cents.
    pub fn from_decimal(decimal: Decimal, currency: Currency) -> Result<Self, CommerceError> {
        let scale = Decimal::from(10_i64.pow(currency.decimal_places()));
        let cents = decimal
            .checked_mul(scale)
            .ok_or(CommerceError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(cents, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Sum an iterator of Money values, returning None on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Format as a display string (e.g., "R$ 129,90").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "129,90").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let abs = self.amount_cents.unsigned_abs();
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        format!(
            "{sign}{}{}{:0width$}",
            abs / divisor,
            self.currency.decimal_separator(),
            abs % divisor,
            width = places as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_parse() {
        assert_eq!(Money::parse("129.90", Currency::BRL).unwrap().amount_cents, 12990);
        assert_eq!(Money::parse("5", Currency::BRL).unwrap().amount_cents, 500);
        assert_eq!(Money::parse("0.005", Currency::USD).unwrap().amount_cents, 1);
        assert!(Money::parse("abc", Currency::BRL).is_err());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(12990, Currency::BRL).display(), "R$ 129,90");
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(5, Currency::USD).display(), "$0.05");
        assert_eq!(Money::new(-150, Currency::USD).display(), "$-1.50");
    }

    #[test]
    fn test_money_try_add() {
        let a = Money::new(1000, Currency::BRL);
        let b = Money::new(500, Currency::BRL);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1500);

        let usd = Money::new(500, Currency::USD);
        assert!(a.try_add(&usd).is_none());
    }

    #[test]
    fn test_money_try_multiply_overflow() {
        let m = Money::new(i64::MAX, Currency::BRL);
        assert!(m.try_multiply(2).is_none());
        assert_eq!(Money::new(1000, Currency::BRL).try_multiply(3).unwrap().amount_cents, 3000);
    }

    #[test]
    fn test_money_try_sum() {
        let values = [Money::new(100, Currency::BRL), Money::new(250, Currency::BRL)];
        let total = Money::try_sum(values.iter(), Currency::BRL).unwrap();
        assert_eq!(total.amount_cents, 350);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("brl"), Some(Currency::BRL));
        assert_eq!(Currency::from_code("EUR"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
