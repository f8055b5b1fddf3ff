//! DDL generation for table declarations.

use sea_orm::{
    ConnectionTrait, DbBackend, Value,
    sea_query::{Alias, ColumnDef, Expr, SimpleExpr, Table as DdlTable, TableCreateStatement, TableDropStatement},
};

use crate::error::{MoneyError, Result};
use crate::table::{CheckSpec, ColumnSpec, ColumnType, Table};

/// `SQLite` stores decimals as REAL; more digits than this do not survive a round trip.
pub const SQLITE_MAX_DECIMAL_PRECISION: u32 = 16;

pub(crate) fn backend_name(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::MySql => "MySQL",
        DbBackend::Postgres => "PostgreSQL",
        DbBackend::Sqlite => "SQLite",
    }
}

fn column_def(spec: &ColumnSpec, backend: DbBackend) -> Result<ColumnDef> {
    let mut def = ColumnDef::new(Alias::new(spec.name()));
    match spec.ty() {
        // SQLite only auto-increments a column declared exactly as INTEGER PRIMARY KEY.
        ColumnType::Integer if spec.is_primary_key() && backend == DbBackend::Sqlite => {
            def.integer().auto_increment().primary_key();
        }
        ColumnType::Integer if spec.is_primary_key() => {
            def.big_integer().auto_increment().primary_key();
        }
        ColumnType::Integer => {
            def.big_integer();
        }
        ColumnType::Text => {
            def.text();
        }
        ColumnType::Char(len) => {
            def.char_len(len);
        }
        ColumnType::Decimal { precision, scale } => {
            if backend == DbBackend::Sqlite && precision > SQLITE_MAX_DECIMAL_PRECISION {
                return Err(MoneyError::Unsupported {
                    backend: backend_name(backend),
                    reason: format!(
                        "column '{}' declares precision {precision}, at most {SQLITE_MAX_DECIMAL_PRECISION} is supported",
                        spec.name()
                    ),
                });
            }
            def.decimal_len(precision, scale);
        }
    }
    if spec.is_nullable() {
        def.null();
    } else {
        def.not_null();
    }
    Ok(def)
}

fn decimal(value: rust_decimal::Decimal) -> Value {
    Value::Decimal(Some(Box::new(value)))
}

fn check_expr(check: &CheckSpec) -> SimpleExpr {
    match check {
        CheckSpec::Range { column, bound } => Expr::col(Alias::new(column))
            .gt(decimal(-*bound))
            .and(Expr::col(Alias::new(column)).lt(decimal(*bound))),
        CheckSpec::Pairing { currency, amount } => Expr::col(Alias::new(currency))
            .is_null()
            .and(Expr::col(Alias::new(amount)).is_null())
            .or(Expr::col(Alias::new(currency))
                .is_not_null()
                .and(Expr::col(Alias::new(amount)).is_not_null())),
    }
}

impl Table {
    /// `CREATE TABLE IF NOT EXISTS` for this declaration on `backend`.
    ///
    /// # Errors
    /// Returns `MoneyError::Unsupported` if a column cannot be represented on `backend`.
    pub fn create_statement(&self, backend: DbBackend) -> Result<TableCreateStatement> {
        let mut stmt = DdlTable::create();
        stmt.table(Alias::new(self.name())).if_not_exists();
        for spec in self.columns() {
            stmt.col(&mut column_def(spec, backend)?);
        }
        for check in self.checks() {
            stmt.check(check_expr(check));
        }
        Ok(stmt)
    }

    #[must_use]
    pub fn drop_statement(&self) -> TableDropStatement {
        DdlTable::drop()
            .table(Alias::new(self.name()))
            .if_exists()
            .to_owned()
    }

    /// Create the table on `conn`.
    ///
    /// # Errors
    /// Returns `MoneyError::Unsupported` for unrepresentable columns and
    /// `MoneyError::Db` if the statement fails.
    pub async fn create(&self, conn: &impl ConnectionTrait) -> Result<()> {
        let backend = conn.get_database_backend();
        let stmt = backend.build(&self.create_statement(backend)?);
        tracing::debug!(table = %self.name(), sql = %stmt.sql, "creating table");
        conn.execute(stmt).await?;
        Ok(())
    }

    /// Drop the table on `conn` if it exists.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` if the statement fails.
    pub async fn drop(&self, conn: &impl ConnectionTrait) -> Result<()> {
        let backend = conn.get_database_backend();
        tracing::debug!(table = %self.name(), "dropping table");
        conn.execute(backend.build(&self.drop_statement())).await?;
        Ok(())
    }
}
