#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Composite money columns for `SeaORM`-backed tables.
//!
//! A money value (ISO-4217 currency code plus decimal amount) is exposed as one
//! logical column and persisted as two physical columns: `<base>_currency`
//! (`CHAR(3)`) and `<base>_amount` (`DECIMAL(precision, scale)`).
//!
//! - [`composite_money`] declares a column; [`CompositeMoneyColumn::nullable`]
//!   makes both sub-columns optional.
//! - [`TableBuilder::composite_money`] registers both sub-columns on a table.
//! - [`CompositeMoneyColumn::eq`] and friends expand comparisons into
//!   conditions over the sub-columns; [`CompositeMoneyColumn::currency`] and
//!   [`CompositeMoneyColumn::amount`] address each sub-column on its own.
//! - [`Record`] and [`Entity`] give typed access to loaded rows.
//!
//! Amounts are normalized to the column scale on write and on read. Amounts
//! with more integer digits than `precision - scale` are rejected by the
//! database when the row is written.
//!
//! # Features
//! - `sqlite` (default), `pg`, `mysql`: enable the matching `SeaORM` driver
//! - `integration`: container-backed tests
//!
//! # Example
//! ```rust,no_run
//! use modkit_db_money::{ConnectOpts, Money, Table, composite_money, connect};
//!
//! # async fn run() -> modkit_db_money::Result<()> {
//! let price = composite_money(8, 5, "price")?;
//! let table = Table::builder("item")
//!     .int_id()?
//!     .composite_money(&price)?
//!     .build();
//!
//! let conn = connect("sqlite::memory:", &ConnectOpts::default()).await?;
//! table.create(&conn).await?;
//!
//! let ten = Money::of(10, "USD")?;
//! let id = table
//!     .insert_and_get_id(&conn, |row| {
//!         row.set_money(&price, Some(&ten))?;
//!         Ok(())
//!     })
//!     .await?;
//!
//! let found = table.select().filter(price.eq(&ten)).single(&conn).await?;
//! assert_eq!(found.id(), Some(id));
//! assert_eq!(found.require_money(&price)?, ten);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod column;
pub mod config;
pub mod currency;
pub mod db;
pub mod ddl;
pub mod entity;
pub mod error;
pub mod money;
pub mod predicate;
pub mod query;
pub mod record;
pub mod table;

pub use column::{CompositeMoneyColumn, MAX_PRECISION, composite_money, composite_money_with};
pub use config::{MoneyConfig, RoundingPolicy};
pub use currency::CurrencyCode;
pub use db::{ConnectOpts, connect};
pub use entity::{Entity, EntityClass};
pub use error::{MoneyError, Result};
pub use money::Money;
pub use predicate::{SubColumn, SubValue};
pub use query::{Insert, Select};
pub use record::Record;
pub use table::{ColumnSpec, ColumnType, Table, TableBuilder};

// Re-export for callers that build their own conditions and statements.
pub use rust_decimal::Decimal;
pub use sea_orm;
