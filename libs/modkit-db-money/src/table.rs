//! Table declarations and their column registry.
//!
//! A [`Table`] is declared once through [`TableBuilder`] and is immutable
//! afterwards. Money columns register both of their physical columns at
//! declaration time, tagged with the group (logical column) they belong to.

use crate::column::CompositeMoneyColumn;
use crate::error::{MoneyError, Result};

/// Name of the implicit primary key added by [`TableBuilder::int_id`].
pub const ID_COLUMN: &str = "id";

/// Physical column types supported by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit integer (auto-increment when it is the table id).
    Integer,
    Text,
    /// Fixed-length character column.
    Char(u32),
    Decimal { precision: u32, scale: u32 },
}

/// One registered physical column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    name: String,
    ty: ColumnType,
    nullable: bool,
    primary_key: bool,
    group: Option<String>,
}

impl ColumnSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            primary_key: false,
            group: None,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ty(&self) -> ColumnType {
        self.ty
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Logical money column this physical column belongs to, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// Table-level constraints derived from registered money columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CheckSpec {
    /// `-bound < amount < bound`.
    Range {
        column: String,
        bound: rust_decimal::Decimal,
    },
    /// Both columns NULL or both set.
    Pairing { currency: String, amount: String },
}

/// An immutable table declaration.
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    id: Option<String>,
    columns: Vec<ColumnSpec>,
    groups: Vec<CompositeMoneyColumn>,
    checks: Vec<CheckSpec>,
}

impl Table {
    /// Start declaring a table.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            table: Self {
                name: name.into(),
                id: None,
                columns: Vec::new(),
                groups: Vec::new(),
                checks: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary key column name, if the table was declared with an id.
    #[must_use]
    pub fn id_column(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// All physical columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Physical columns tagged with the money column `group`.
    pub fn group_columns<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ColumnSpec> {
        self.columns
            .iter()
            .filter(move |c| c.group.as_deref() == Some(group))
    }

    /// Registered money columns.
    #[must_use]
    pub fn money_columns(&self) -> &[CompositeMoneyColumn] {
        &self.groups
    }

    pub(crate) fn checks(&self) -> &[CheckSpec] {
        &self.checks
    }

    /// Look up a physical column or fail with `UnknownColumn`.
    ///
    /// # Errors
    /// Returns `MoneyError::UnknownColumn` if the table has no such column.
    pub fn require_column(&self, name: &str) -> Result<&ColumnSpec> {
        self.column(name).ok_or_else(|| MoneyError::UnknownColumn {
            table: self.name.clone(),
            column: name.to_owned(),
        })
    }

    /// Check that `column` is registered on this table exactly as declared.
    ///
    /// # Errors
    /// Returns `MoneyError::UnregisteredGroup` if no group with the same name,
    /// sub-columns and nullability is registered.
    pub fn ensure_registered(&self, column: &CompositeMoneyColumn) -> Result<()> {
        if self.groups.iter().any(|g| g == column) {
            Ok(())
        } else {
            Err(MoneyError::UnregisteredGroup {
                table: self.name.clone(),
                group: column.name().to_owned(),
            })
        }
    }
}

/// Builder that registers columns on a [`Table`] declaration.
#[derive(Debug)]
#[must_use]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    /// Add an auto-increment integer primary key named `id`.
    ///
    /// # Errors
    /// Returns `MoneyError::DuplicateColumn` if an id or an `id` column already exists.
    pub fn int_id(mut self) -> Result<Self> {
        let mut spec = ColumnSpec::new(ID_COLUMN, ColumnType::Integer);
        spec.primary_key = true;
        self.push(spec)?;
        self.table.id = Some(ID_COLUMN.to_owned());
        Ok(self)
    }

    /// Register a plain column.
    ///
    /// # Errors
    /// Returns `MoneyError::DuplicateColumn` if the name is taken.
    pub fn column(mut self, spec: ColumnSpec) -> Result<Self> {
        self.push(spec)?;
        Ok(self)
    }

    /// Register both physical columns of a money column, tagged with its group name.
    ///
    /// # Errors
    /// Returns `MoneyError::DuplicateColumn` if the group or either sub-column
    /// name is already registered.
    pub fn composite_money(mut self, column: &CompositeMoneyColumn) -> Result<Self> {
        if self.table.groups.iter().any(|g| g.name() == column.name()) {
            return Err(self.duplicate(column.name()));
        }

        let nullable = column.is_nullable();
        let currency = ColumnSpec {
            name: column.currency_column().to_owned(),
            ty: ColumnType::Char(column.currency_length()),
            nullable,
            primary_key: false,
            group: Some(column.name().to_owned()),
        };
        let amount = ColumnSpec {
            name: column.amount_column().to_owned(),
            ty: ColumnType::Decimal {
                precision: column.precision(),
                scale: column.scale(),
            },
            nullable,
            primary_key: false,
            group: Some(column.name().to_owned()),
        };
        // Validate both names before touching the registry.
        for name in column.sub_columns() {
            if self.table.column(name).is_some() {
                return Err(self.duplicate(name));
            }
        }
        self.push(currency)?;
        self.push(amount)?;

        if column.range_check() {
            self.table.checks.push(CheckSpec::Range {
                column: column.amount_column().to_owned(),
                bound: column.amount_bound(),
            });
        }
        if nullable && column.pairing_check() {
            self.table.checks.push(CheckSpec::Pairing {
                currency: column.currency_column().to_owned(),
                amount: column.amount_column().to_owned(),
            });
        }
        self.table.groups.push(column.clone());

        tracing::debug!(
            table = %self.table.name,
            column = %column.name(),
            currency = %column.currency_column(),
            amount = %column.amount_column(),
            nullable,
            "registered composite money column"
        );
        Ok(self)
    }

    /// Finish the declaration.
    pub fn build(self) -> Table {
        self.table
    }

    fn push(&mut self, spec: ColumnSpec) -> Result<()> {
        if self.table.column(&spec.name).is_some() {
            return Err(self.duplicate(&spec.name));
        }
        self.table.columns.push(spec);
        Ok(())
    }

    fn duplicate(&self, column: &str) -> MoneyError {
        MoneyError::DuplicateColumn {
            table: self.table.name.clone(),
            column: column.to_owned(),
        }
    }
}
