//! Write-time decomposition and read-time recomposition of money values.

use rust_decimal::Decimal;
use sea_orm::{QueryResult, Value};

use crate::column::CompositeMoneyColumn;
use crate::currency::CurrencyCode;
use crate::error::{MoneyError, Result};
use crate::money::Money;

impl CompositeMoneyColumn {
    /// Split a value into `(column, value)` pairs for both physical columns, currency first.
    ///
    /// The amount is normalized to the column scale. Amounts too large for the
    /// column are passed through; the database rejects them on write.
    ///
    /// # Errors
    /// Returns `MoneyError::NullNotAllowed` when `value` is `None` and the
    /// column is not nullable.
    pub fn decompose(&self, value: Option<&Money>) -> Result<[(&str, Value); 2]> {
        let (currency, amount) = match value {
            Some(money) => (
                Some(money.currency().as_str().to_owned()),
                Some(self.normalize(money.amount())),
            ),
            None if self.is_nullable() => (None, None),
            None => return Err(MoneyError::NullNotAllowed(self.name().to_owned())),
        };
        tracing::trace!(column = %self.name(), ?currency, ?amount, "decomposed money value");
        Ok([
            (
                self.currency_column(),
                Value::String(currency.map(Box::new)),
            ),
            (self.amount_column(), Value::Decimal(amount.map(Box::new))),
        ])
    }

    /// Rebuild a value from both physical values.
    ///
    /// # Errors
    /// - `MoneyError::PartialValue` when exactly one of the two values is present.
    /// - `MoneyError::NullNotAllowed` when both are absent on a non-nullable column.
    pub fn recompose(
        &self,
        currency: Option<CurrencyCode>,
        amount: Option<Decimal>,
    ) -> Result<Option<Money>> {
        match (currency, amount) {
            (Some(currency), Some(amount)) => {
                Ok(Some(Money::new(self.normalize(amount), currency)))
            }
            (None, None) if self.is_nullable() => Ok(None),
            (None, None) => Err(MoneyError::NullNotAllowed(self.name().to_owned())),
            (currency, amount) => {
                tracing::warn!(
                    column = %self.name(),
                    currency_present = currency.is_some(),
                    amount_present = amount.is_some(),
                    "money column holds a partial value"
                );
                Err(MoneyError::PartialValue {
                    column: self.name().to_owned(),
                    currency: presence(currency.is_some()),
                    amount: presence(amount.is_some()),
                })
            }
        }
    }

    /// Read and recompose this column from a raw `SeaORM` query row.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` if a sub-column is missing or has an unexpected
    /// type, plus the errors of [`Self::recompose`].
    pub fn read(&self, row: &QueryResult) -> Result<Option<Money>> {
        let currency = self.read_currency(row)?;
        let amount = self.read_amount(row)?;
        self.recompose(currency, amount)
    }

    /// Read only the currency sub-column from a raw query row.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` on decode failures and
    /// `MoneyError::InvalidCurrency` if the stored code is malformed.
    pub fn read_currency(&self, row: &QueryResult) -> Result<Option<CurrencyCode>> {
        let raw: Option<String> = row.try_get("", self.currency_column())?;
        raw.as_deref().map(CurrencyCode::parse_padded).transpose()
    }

    /// Read only the amount sub-column from a raw query row, normalized to the column scale.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` on decode failures.
    pub fn read_amount(&self, row: &QueryResult) -> Result<Option<Decimal>> {
        let raw: Option<Decimal> = row.try_get("", self.amount_column())?;
        Ok(raw.map(|amount| self.normalize(amount)))
    }
}

fn presence(present: bool) -> &'static str {
    if present { "present" } else { "absent" }
}
