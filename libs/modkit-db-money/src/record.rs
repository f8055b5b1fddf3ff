//! Loaded rows and typed accessors over their money columns.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use sea_orm::{QueryResult, Value};

use crate::column::CompositeMoneyColumn;
use crate::currency::CurrencyCode;
use crate::error::{MoneyError, Result};
use crate::money::Money;
use crate::table::{ColumnSpec, ColumnType, Table};

/// One row read through a table declaration.
///
/// Money values are recomposed on access; [`Record::set_money`] decomposes
/// the new value immediately and marks both physical columns dirty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    table: String,
    id: Option<i64>,
    values: BTreeMap<String, Value>,
    dirty: BTreeSet<String>,
}

impl Record {
    pub(crate) fn from_query_result<'a>(
        row: &QueryResult,
        table: &Table,
        columns: impl IntoIterator<Item = &'a ColumnSpec>,
    ) -> Result<Self> {
        let mut record = Self {
            table: table.name().to_owned(),
            ..Self::default()
        };
        for spec in columns {
            let value = read_value(row, spec)?;
            if Some(spec.name()) == table.id_column() {
                if let Value::BigInt(id) = &value {
                    record.id = *id;
                }
            }
            record.values.insert(spec.name().to_owned(), value);
        }
        Ok(record)
    }

    /// Primary key, when the table has one and it was selected.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Raw physical value of `column`, if it was selected.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Recomposed value of a money column.
    ///
    /// # Errors
    /// - `MoneyError::UnknownColumn` if the sub-columns were not selected.
    /// - `MoneyError::PartialValue` if exactly one sub-column is NULL.
    pub fn money(&self, column: &CompositeMoneyColumn) -> Result<Option<Money>> {
        let currency = self.currency(column)?;
        let amount = self.amount(column)?;
        column.recompose(currency, amount)
    }

    /// Like [`Self::money`] but absent values are an error.
    ///
    /// # Errors
    /// Returns `MoneyError::NullNotAllowed` when the value is absent, plus the
    /// errors of [`Self::money`].
    pub fn require_money(&self, column: &CompositeMoneyColumn) -> Result<Money> {
        self.money(column)?
            .ok_or_else(|| MoneyError::NullNotAllowed(column.name().to_owned()))
    }

    /// Currency sub-field of a money column.
    ///
    /// # Errors
    /// Returns `MoneyError::UnknownColumn` if the column was not selected and
    /// `MoneyError::InvalidCurrency` if the stored code is malformed.
    pub fn currency(&self, column: &CompositeMoneyColumn) -> Result<Option<CurrencyCode>> {
        match self.lookup(column.currency_column())? {
            Value::String(raw) => raw
                .as_deref()
                .map(|s| CurrencyCode::parse_padded(s))
                .transpose(),
            _ => Err(mismatch(column.currency_column(), "text")),
        }
    }

    /// Amount sub-field of a money column, normalized to the column scale.
    ///
    /// # Errors
    /// Returns `MoneyError::UnknownColumn` if the column was not selected.
    pub fn amount(&self, column: &CompositeMoneyColumn) -> Result<Option<Decimal>> {
        match self.lookup(column.amount_column())? {
            Value::Decimal(raw) => Ok(raw.as_deref().map(|d| column.normalize(*d))),
            _ => Err(mismatch(column.amount_column(), "decimal")),
        }
    }

    /// Replace the value of a money column.
    ///
    /// # Errors
    /// Returns `MoneyError::NullNotAllowed` when `value` is `None` on a
    /// non-nullable column; the record is left unchanged.
    pub fn set_money(&mut self, column: &CompositeMoneyColumn, value: Option<&Money>) -> Result<()> {
        for (name, value) in column.decompose(value)? {
            self.values.insert(name.to_owned(), value);
            self.dirty.insert(name.to_owned());
        }
        Ok(())
    }

    /// Columns changed since the record was loaded, with their new values.
    pub fn dirty_values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.dirty
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v)))
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    fn lookup(&self, column: &str) -> Result<&Value> {
        self.values.get(column).ok_or_else(|| MoneyError::UnknownColumn {
            table: self.table.clone(),
            column: column.to_owned(),
        })
    }
}

fn mismatch(column: &str, expected: &str) -> MoneyError {
    MoneyError::Decode {
        column: column.to_owned(),
        reason: format!("expected a {expected} value"),
    }
}

fn read_value(row: &QueryResult, spec: &ColumnSpec) -> Result<Value> {
    let name = spec.name();
    Ok(match spec.ty() {
        ColumnType::Integer => Value::BigInt(row.try_get::<Option<i64>>("", name)?),
        ColumnType::Text | ColumnType::Char(_) => {
            Value::String(row.try_get::<Option<String>>("", name)?.map(Box::new))
        }
        ColumnType::Decimal { .. } => {
            Value::Decimal(row.try_get::<Option<Decimal>>("", name)?.map(Box::new))
        }
    })
}
