//! Insert, select and update helpers over table declarations.
//!
//! Every money value passes through the column codec, so callers never set
//! one physical sub-column without the other.

use sea_orm::{
    Condition, ConnectionTrait, DbBackend, Value,
    sea_query::{Alias, Asterisk, Expr, Func, IntoCondition, Order, Query, SimpleExpr},
};

use crate::column::CompositeMoneyColumn;
use crate::ddl::backend_name;
use crate::error::{MoneyError, Result};
use crate::money::Money;
use crate::record::Record;
use crate::table::{ColumnSpec, Table};

const COUNT_ALIAS: &str = "row_count";

impl Table {
    /// Start an insert into this table.
    #[must_use]
    pub fn insert(&self) -> Insert<'_> {
        Insert {
            table: self,
            values: Vec::new(),
        }
    }

    /// Build an insert with `fill`, execute it and return the generated id.
    ///
    /// # Errors
    /// Returns the errors of `fill` and of [`Insert::exec_and_get_id`].
    pub async fn insert_and_get_id<F>(&self, conn: &impl ConnectionTrait, fill: F) -> Result<i64>
    where
        F: FnOnce(&mut Insert<'_>) -> Result<()>,
    {
        let mut insert = self.insert();
        fill(&mut insert)?;
        insert.exec_and_get_id(conn).await
    }

    /// Select every column of this table.
    #[must_use]
    pub fn select(&self) -> Select<'_> {
        Select {
            table: self,
            columns: Vec::new(),
            condition: None,
            limit: None,
        }
    }

    /// `id = value`, or a condition matching nothing if the table has no id.
    #[must_use]
    pub fn id_eq(&self, id: i64) -> SimpleExpr {
        match self.id_column() {
            Some(col) => Expr::col(Alias::new(col)).eq(id),
            None => Expr::value(false),
        }
    }
}

/// Pending `INSERT` of one row.
#[derive(Debug)]
pub struct Insert<'t> {
    table: &'t Table,
    values: Vec<(String, Value)>,
}

impl Insert<'_> {
    /// Set a money column; both physical columns are written.
    ///
    /// # Errors
    /// - `MoneyError::UnregisteredGroup` if `column` is not registered on the table.
    /// - `MoneyError::NullNotAllowed` for `None` on a non-nullable column.
    pub fn set_money(
        &mut self,
        column: &CompositeMoneyColumn,
        value: Option<&Money>,
    ) -> Result<&mut Self> {
        self.table.ensure_registered(column)?;
        for (name, value) in column.decompose(value)? {
            self.put(name, value);
        }
        Ok(self)
    }

    /// Set a plain column.
    ///
    /// # Errors
    /// Returns `MoneyError::UnknownColumn` if the table has no such column and
    /// `MoneyError::InvalidDefinition` if it belongs to a money column.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let spec = self.table.require_column(column)?;
        if let Some(group) = spec.group() {
            return Err(MoneyError::InvalidDefinition {
                column: group.to_owned(),
                reason: format!("'{column}' is part of a money column and must be set through it"),
            });
        }
        self.put(column, value.into());
        Ok(self)
    }

    fn put(&mut self, column: &str, value: Value) {
        if let Some(slot) = self.values.iter_mut().find(|(name, _)| name == column) {
            slot.1 = value;
        } else {
            self.values.push((column.to_owned(), value));
        }
    }

    fn statement(&self) -> Result<sea_orm::sea_query::InsertStatement> {
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(self.table.name()));
        if self.values.is_empty() {
            stmt.or_default_values();
        } else {
            stmt.columns(self.values.iter().map(|(name, _)| Alias::new(name)));
            stmt.values(
                self.values
                    .iter()
                    .map(|(_, value)| SimpleExpr::Value(value.clone())),
            )?;
        }
        Ok(stmt)
    }

    /// Execute the insert.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` if the database rejects the row, e.g. an amount
    /// outside the column precision.
    pub async fn exec(&self, conn: &impl ConnectionTrait) -> Result<()> {
        let backend = conn.get_database_backend();
        conn.execute(backend.build(&self.statement()?)).await?;
        Ok(())
    }

    /// Execute the insert and return the generated primary key.
    ///
    /// # Errors
    /// Returns `MoneyError::Unsupported` if the table has no id column, and
    /// `MoneyError::Db` if the database rejects the row.
    pub async fn exec_and_get_id(&self, conn: &impl ConnectionTrait) -> Result<i64> {
        let backend = conn.get_database_backend();
        let Some(id_col) = self.table.id_column() else {
            return Err(MoneyError::Unsupported {
                backend: backend_name(backend),
                reason: format!("table '{}' has no id column", self.table.name()),
            });
        };

        let mut stmt = self.statement()?;
        let id = if backend == DbBackend::Postgres {
            stmt.returning_col(Alias::new(id_col));
            let row = conn
                .query_one(backend.build(&stmt))
                .await?
                .ok_or(sea_orm::DbErr::RecordNotInserted)?;
            row.try_get::<i64>("", id_col)?
        } else {
            let res = conn.execute(backend.build(&stmt)).await?;
            i64::try_from(res.last_insert_id()).map_err(|e| MoneyError::Decode {
                column: id_col.to_owned(),
                reason: e.to_string(),
            })?
        };
        tracing::debug!(table = %self.table.name(), id, "inserted row");
        Ok(id)
    }
}

/// Pending `SELECT` over one table.
#[derive(Debug, Clone)]
#[must_use]
pub struct Select<'t> {
    table: &'t Table,
    columns: Vec<&'t ColumnSpec>,
    condition: Option<Condition>,
    limit: Option<u64>,
}

impl<'t> Select<'t> {
    /// Restrict the selected columns to the id plus both sub-columns of `column`.
    /// Calls accumulate.
    ///
    /// # Errors
    /// Returns `MoneyError::UnregisteredGroup` if `column` is not registered on the table.
    pub fn slice(mut self, column: &CompositeMoneyColumn) -> Result<Self> {
        self.table.ensure_registered(column)?;
        if self.columns.is_empty() {
            if let Some(id) = self.table.id_column() {
                self.columns.push(self.table.require_column(id)?);
            }
        }
        for name in column.sub_columns() {
            let spec = self.table.require_column(name)?;
            if !self.columns.iter().any(|c| c.name() == name) {
                self.columns.push(spec);
            }
        }
        Ok(self)
    }

    /// AND `cond` into the `WHERE` clause.
    pub fn filter(mut self, cond: impl IntoCondition) -> Self {
        let cond = cond.into_condition();
        self.condition = Some(match self.condition.take() {
            Some(existing) => existing.add(cond),
            None => Condition::all().add(cond),
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn selected(&self) -> Vec<&'t ColumnSpec> {
        if self.columns.is_empty() {
            self.table.columns().iter().collect()
        } else {
            self.columns.clone()
        }
    }

    fn statement(&self, columns: &[&ColumnSpec]) -> sea_orm::sea_query::SelectStatement {
        let mut stmt = Query::select();
        stmt.from(Alias::new(self.table.name()))
            .columns(columns.iter().map(|c| Alias::new(c.name())));
        if let Some(cond) = &self.condition {
            stmt.cond_where(cond.clone());
        }
        if let Some(id) = self.table.id_column() {
            stmt.order_by(Alias::new(id), Order::Asc);
        }
        if let Some(limit) = self.limit {
            stmt.limit(limit);
        }
        stmt
    }

    /// Fetch all matching rows, ordered by id when the table has one.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` if the query fails or a value cannot be decoded.
    pub async fn all(&self, conn: &impl ConnectionTrait) -> Result<Vec<Record>> {
        let columns = self.selected();
        let backend = conn.get_database_backend();
        let rows = conn.query_all(backend.build(&self.statement(&columns))).await?;
        rows.iter()
            .map(|row| Record::from_query_result(row, self.table, columns.iter().copied()))
            .collect()
    }

    /// Fetch exactly one row.
    ///
    /// # Errors
    /// Returns `MoneyError::NotSingle` unless exactly one row matches.
    pub async fn single(&self, conn: &impl ConnectionTrait) -> Result<Record> {
        let mut rows = self.clone().limit(2).all(conn).await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(MoneyError::NotSingle(n)),
        }
    }

    /// Count matching rows.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` if the query fails.
    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64> {
        let mut stmt = Query::select();
        stmt.from(Alias::new(self.table.name()))
            .expr_as(Func::count(Expr::col(Asterisk)), Alias::new(COUNT_ALIAS));
        if let Some(cond) = &self.condition {
            stmt.cond_where(cond.clone());
        }
        let backend = conn.get_database_backend();
        let count = match conn.query_one(backend.build(&stmt)).await? {
            Some(row) => row.try_get::<i64>("", COUNT_ALIAS)?,
            None => 0,
        };
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

/// Write the dirty columns of `record` back to its row.
pub(crate) async fn update_dirty(
    table: &Table,
    conn: &impl ConnectionTrait,
    record: &Record,
) -> Result<u64> {
    let Some(id) = record.id() else {
        return Err(MoneyError::Unsupported {
            backend: backend_name(conn.get_database_backend()),
            reason: format!("record of table '{}' has no id", table.name()),
        });
    };
    let values: Vec<(Alias, SimpleExpr)> = record
        .dirty_values()
        .map(|(name, value)| (Alias::new(name), SimpleExpr::Value(value.clone())))
        .collect();
    if values.is_empty() {
        return Ok(0);
    }

    let stmt = Query::update()
        .table(Alias::new(table.name()))
        .values(values)
        .cond_where(table.id_eq(id))
        .to_owned();
    let backend = conn.get_database_backend();
    let res = conn.execute(backend.build(&stmt)).await?;
    tracing::debug!(table = %table.name(), id, rows = res.rows_affected(), "updated row");
    Ok(res.rows_affected())
}
