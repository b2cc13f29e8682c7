//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are in the currency's standard unit (e.g., euros, not cents).
/// Binary floats never touch money anywhere in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Create a price from an amount in the smallest currency unit (cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency,
        }
    }

    /// The amount in whole currency units, rounded toward zero.
    ///
    /// This is the basis for loyalty point accrual: one point per whole
    /// unit paid.
    #[must_use]
    pub fn whole_units(&self) -> i64 {
        self.amount.trunc().to_i64().unwrap_or(0)
    }
}

impl fmt::Display for Price {
    /// Format for display (e.g., "€ 19.95").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes for the markets Seedling sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EUR => "\u{20ac}",
            Self::USD => "$",
            Self::GBP => "\u{a3}",
        }
    }

    /// The ISO 4217 code as a string, as the payment provider expects it.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(1995, CurrencyCode::EUR);
        assert_eq!(price.amount, Decimal::new(1995, 2));
        assert_eq!(price.to_string(), "\u{20ac} 19.95");
    }

    #[test]
    fn test_whole_units_truncates() {
        assert_eq!(Price::from_cents(1999, CurrencyCode::EUR).whole_units(), 19);
        assert_eq!(Price::from_cents(100, CurrencyCode::EUR).whole_units(), 1);
        assert_eq!(Price::from_cents(99, CurrencyCode::EUR).whole_units(), 0);
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(CurrencyCode::EUR.code(), "EUR");
        assert_eq!(CurrencyCode::USD.symbol(), "$");
        assert_eq!(CurrencyCode::GBP.to_string(), "GBP");
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(45, 1), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$ 4.50");
    }
}
