//! Money column → `sea_orm::Condition` expansion.
//!
//! A comparison against the logical column becomes a conjunction (or, for
//! `ne`, a disjunction) over the two physical columns. Each physical column
//! is also addressable on its own through [`CompositeMoneyColumn::currency`]
//! and [`CompositeMoneyColumn::amount`].

use std::marker::PhantomData;

use rust_decimal::Decimal;
use sea_orm::{
    Condition, Value,
    sea_query::{Alias, Expr, SimpleExpr},
};

use crate::column::CompositeMoneyColumn;
use crate::currency::CurrencyCode;
use crate::money::Money;

impl CompositeMoneyColumn {
    /// `currency = c AND amount = round(a, scale)`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, value: &Money) -> Condition {
        Condition::all()
            .add(self.currency().eq(value.currency()))
            .add(self.amount().eq(value.amount()))
    }

    /// `currency <> c OR amount <> round(a, scale)`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn ne(&self, value: &Money) -> Condition {
        Condition::any()
            .add(self.currency().ne(value.currency()))
            .add(self.amount().ne(value.amount()))
    }

    /// `currency IS NULL AND amount IS NULL`.
    #[must_use]
    pub fn is_null(&self) -> Condition {
        Condition::all()
            .add(self.currency().is_null())
            .add(self.amount().is_null())
    }

    /// `currency IS NOT NULL AND amount IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(&self) -> Condition {
        Condition::all()
            .add(self.currency().is_not_null())
            .add(self.amount().is_not_null())
    }

    /// [`Self::eq`] for `Some`, [`Self::is_null`] for `None`.
    #[must_use]
    pub fn eq_opt(&self, value: Option<&Money>) -> Condition {
        value.map_or_else(|| self.is_null(), |money| self.eq(money))
    }

    /// Any of `values`, each expanded as [`Self::eq`].
    #[must_use]
    pub fn is_in<'a>(&self, values: impl IntoIterator<Item = &'a Money>) -> Condition {
        values
            .into_iter()
            .fold(Condition::any(), |cond, money| cond.add(self.eq(money)))
    }

    /// The currency sub-column as an independently comparable column.
    #[must_use]
    pub fn currency(&self) -> SubColumn<'_, CurrencyCode> {
        SubColumn::new(self, self.currency_column())
    }

    /// The amount sub-column as an independently comparable column.
    ///
    /// Operands are normalized to the column scale before comparison.
    #[must_use]
    pub fn amount(&self) -> SubColumn<'_, Decimal> {
        SubColumn::new(self, self.amount_column())
    }
}

/// Value types that can be compared against a money sub-column.
pub trait SubValue: Sized {
    #[doc(hidden)]
    fn into_value(self, owner: &CompositeMoneyColumn) -> Value;
    #[doc(hidden)]
    fn null() -> Value;
}

impl SubValue for CurrencyCode {
    fn into_value(self, _owner: &CompositeMoneyColumn) -> Value {
        Value::String(Some(Box::new(self.as_str().to_owned())))
    }

    fn null() -> Value {
        Value::String(None)
    }
}

impl SubValue for Decimal {
    fn into_value(self, owner: &CompositeMoneyColumn) -> Value {
        Value::Decimal(Some(Box::new(owner.normalize(self))))
    }

    fn null() -> Value {
        Value::Decimal(None)
    }
}

/// One physical column of a money group, typed by the value it holds.
#[derive(Clone, Copy, Debug)]
pub struct SubColumn<'c, T> {
    owner: &'c CompositeMoneyColumn,
    name: &'c str,
    _value: PhantomData<fn() -> T>,
}

impl<'c, T: SubValue> SubColumn<'c, T> {
    fn new(owner: &'c CompositeMoneyColumn, name: &'c str) -> Self {
        Self {
            owner,
            name,
            _value: PhantomData,
        }
    }

    /// Physical column name.
    #[must_use]
    pub fn name(&self) -> &'c str {
        self.name
    }

    /// Whether the owning money column is nullable.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.owner.is_nullable()
    }

    fn expr(&self) -> Expr {
        Expr::col(Alias::new(self.name))
    }

    fn value(&self, value: T) -> Value {
        value.into_value(self.owner)
    }

    #[must_use]
    pub fn eq(&self, value: T) -> SimpleExpr {
        self.expr().eq(self.value(value))
    }

    #[must_use]
    pub fn ne(&self, value: T) -> SimpleExpr {
        self.expr().ne(self.value(value))
    }

    #[must_use]
    pub fn gt(&self, value: T) -> SimpleExpr {
        self.expr().gt(self.value(value))
    }

    #[must_use]
    pub fn gte(&self, value: T) -> SimpleExpr {
        self.expr().gte(self.value(value))
    }

    #[must_use]
    pub fn lt(&self, value: T) -> SimpleExpr {
        self.expr().lt(self.value(value))
    }

    #[must_use]
    pub fn lte(&self, value: T) -> SimpleExpr {
        self.expr().lte(self.value(value))
    }

    #[must_use]
    pub fn is_in(&self, values: impl IntoIterator<Item = T>) -> SimpleExpr {
        let values: Vec<Value> = values.into_iter().map(|v| self.value(v)).collect();
        self.expr().is_in(values)
    }

    #[must_use]
    pub fn is_null(&self) -> SimpleExpr {
        self.expr().is_null()
    }

    #[must_use]
    pub fn is_not_null(&self) -> SimpleExpr {
        self.expr().is_not_null()
    }

    /// `= value` for `Some`, `IS NULL` for `None`.
    #[must_use]
    pub fn eq_opt(&self, value: Option<T>) -> SimpleExpr {
        match value {
            Some(value) => self.eq(value),
            None => self.is_null(),
        }
    }

    /// Typed SQL NULL for this column, e.g. for explicit updates.
    #[must_use]
    pub fn null_value(&self) -> Value {
        T::null()
    }
}
