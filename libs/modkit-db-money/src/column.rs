//! Composite money column declaration.
//!
//! A [`CompositeMoneyColumn`] is one logical column backed by two physical
//! ones: a fixed-width currency column and a fixed-precision amount column.
//! Declaring it is pure; it becomes part of a table when registered through
//! [`crate::TableBuilder::composite_money`].

use rust_decimal::Decimal;

use crate::config::{MoneyConfig, RoundingPolicy};
use crate::error::{MoneyError, Result};

/// Maximum number of significant digits a `Decimal` amount can carry.
pub const MAX_PRECISION: u32 = 28;

/// A money column declared as `(precision, scale, base_name)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeMoneyColumn {
    name: String,
    currency: String,
    amount: String,
    currency_length: u32,
    precision: u32,
    scale: u32,
    nullable: bool,
    rounding: RoundingPolicy,
    range_check: bool,
    pairing_check: bool,
}

/// Declare a non-nullable money column with default settings.
///
/// Physical columns are named `<base_name>_currency` (`CHAR(3)`) and
/// `<base_name>_amount` (`DECIMAL(precision, scale)`).
///
/// # Errors
/// Returns `MoneyError::InvalidDefinition` if `scale >= precision`,
/// `precision` exceeds [`MAX_PRECISION`], or `base_name` is empty.
pub fn composite_money(precision: u32, scale: u32, base_name: &str) -> Result<CompositeMoneyColumn> {
    composite_money_with(&MoneyConfig::default(), precision, scale, base_name)
}

/// Declare a non-nullable money column using `config` for naming, rounding and checks.
///
/// # Errors
/// Same as [`composite_money`].
pub fn composite_money_with(
    config: &MoneyConfig,
    precision: u32,
    scale: u32,
    base_name: &str,
) -> Result<CompositeMoneyColumn> {
    let invalid = |reason: String| MoneyError::InvalidDefinition {
        column: base_name.to_owned(),
        reason,
    };

    if base_name.trim().is_empty() {
        return Err(invalid("base name must not be empty".to_owned()));
    }
    if precision == 0 || precision > MAX_PRECISION {
        return Err(invalid(format!(
            "precision must be within 1..={MAX_PRECISION}, got {precision}"
        )));
    }
    if scale >= precision {
        return Err(invalid(format!(
            "scale ({scale}) must be less than precision ({precision})"
        )));
    }

    let column = CompositeMoneyColumn {
        name: base_name.to_owned(),
        currency: format!("{base_name}{}", config.currency_suffix),
        amount: format!("{base_name}{}", config.amount_suffix),
        currency_length: config.currency_length,
        precision,
        scale,
        nullable: false,
        rounding: config.rounding,
        range_check: config.range_check,
        pairing_check: config.pairing_check,
    };
    tracing::trace!(
        column = %column.name,
        precision,
        scale,
        "declared composite money column"
    );
    Ok(column)
}

impl CompositeMoneyColumn {
    /// Same column with both sub-columns optional. Idempotent.
    #[must_use]
    pub fn nullable(&self) -> Self {
        Self {
            nullable: true,
            ..self.clone()
        }
    }

    /// Same column with a different rounding policy.
    #[must_use]
    pub fn with_rounding(&self, rounding: RoundingPolicy) -> Self {
        Self {
            rounding,
            ..self.clone()
        }
    }

    /// Logical (group) name, i.e. the base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn currency_column(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn amount_column(&self) -> &str {
        &self.amount
    }

    /// Both physical column names, currency first.
    #[must_use]
    pub fn sub_columns(&self) -> [&str; 2] {
        [&self.currency, &self.amount]
    }

    #[must_use]
    pub fn currency_length(&self) -> u32 {
        self.currency_length
    }

    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    #[must_use]
    pub fn range_check(&self) -> bool {
        self.range_check
    }

    #[must_use]
    pub fn pairing_check(&self) -> bool {
        self.pairing_check
    }

    /// Exclusive bound on the absolute amount: `10^(precision - scale)`.
    #[must_use]
    pub fn amount_bound(&self) -> Decimal {
        // precision <= 28 keeps 10^28 inside the 96-bit mantissa.
        let digits = self.precision - self.scale;
        Decimal::try_from_i128_with_scale(10_i128.pow(digits), 0).unwrap_or(Decimal::MAX)
    }

    /// Round `amount` to the column scale and pad it to exactly `scale` fractional digits.
    #[must_use]
    pub fn normalize(&self, amount: Decimal) -> Decimal {
        let mut value = amount.round_dp_with_strategy(self.scale, self.rounding.strategy());
        value.rescale(self.scale);
        value
    }
}
