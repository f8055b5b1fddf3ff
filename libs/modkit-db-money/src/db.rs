//! Connection helper.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Connection pool options.
/// Each driver applies the subset it supports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime for a connection.
    #[serde(with = "humantime_serde")]
    pub max_lifetime: Option<Duration>,
    /// Log every statement through sqlx.
    pub sqlx_logging: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            max_lifetime: None,
            sqlx_logging: false,
        }
    }
}

/// Every pooled connection to an in-memory `SQLite` database sees its own database.
fn is_memory_dsn(dsn: &str) -> bool {
    let dsn = dsn.trim_start();
    dsn.starts_with("sqlite:") && (dsn.contains(":memory:") || dsn.contains("mode=memory"))
}

/// Open a `SeaORM` connection for `dsn`.
///
/// In-memory `SQLite` DSNs are pinned to a single pooled connection so that
/// every statement sees the same database.
///
/// # Errors
/// Returns `MoneyError::Db` if the DSN is invalid or the database is unreachable.
pub async fn connect(dsn: &str, opts: &ConnectOpts) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(dsn.to_owned());
    let max_conns = if is_memory_dsn(dsn) {
        Some(1)
    } else {
        opts.max_conns
    };
    if let Some(n) = max_conns {
        options.max_connections(n);
    }
    if let Some(n) = opts.min_conns {
        options.min_connections(n.min(max_conns.unwrap_or(n)));
    }
    if let Some(t) = opts.acquire_timeout {
        options.acquire_timeout(t);
    }
    if let Some(t) = opts.idle_timeout {
        options.idle_timeout(t);
    }
    if let Some(t) = opts.max_lifetime {
        options.max_lifetime(t);
    }
    options.sqlx_logging(opts.sqlx_logging);

    let conn = Database::connect(options).await?;
    tracing::debug!(backend = ?conn.get_database_backend(), max_conns, "database connected");
    Ok(conn)
}
