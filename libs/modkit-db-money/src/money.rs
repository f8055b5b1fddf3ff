//! Monetary value object stored by composite money columns.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyCode;
use crate::error::MoneyError;

/// An amount of money in a single currency. Immutable once built.
///
/// Equality compares amounts numerically, so `USD 10` equals `USD 10.00000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    currency: CurrencyCode,
    amount: Decimal,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { currency, amount }
    }

    /// Build money from an amount and a currency code string.
    ///
    /// # Errors
    /// Returns `MoneyError::InvalidCurrency` if `currency` is not a valid code.
    pub fn of(amount: impl Into<Decimal>, currency: &str) -> Result<Self, MoneyError> {
        Ok(Self::new(amount.into(), CurrencyCode::parse(currency)?))
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}
