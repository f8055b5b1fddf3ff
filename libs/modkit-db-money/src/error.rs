use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, MoneyError>;

/// Typed error for money columns, table declarations and their queries.
#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrency(String),

    #[error("Invalid money column '{column}': {reason}")]
    InvalidDefinition { column: String, reason: String },

    #[error("Column '{0}' is not nullable")]
    NullNotAllowed(String),

    /// One sub-column of a money group is NULL while the other is not.
    #[error("Partial value in money column '{column}': currency {currency}, amount {amount}")]
    PartialValue {
        column: String,
        currency: &'static str,
        amount: &'static str,
    },

    #[error("Column '{column}' is already registered on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Money column '{group}' is not registered on table '{table}'")]
    UnregisteredGroup { table: String, group: String },

    #[error("Failed to decode column '{column}': {reason}")]
    Decode { column: String, reason: String },

    #[error("Expected exactly one row, found {0}")]
    NotSingle(usize),

    #[error("Unsupported by {backend}: {reason}")]
    Unsupported {
        backend: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error(transparent)]
    Query(#[from] sea_orm::sea_query::error::Error),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl From<figment::Error> for MoneyError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl MoneyError {
    /// `true` when the error was raised by the database while executing a statement,
    /// e.g. a numeric overflow or a violated check constraint.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::Db(
                sea_orm::DbErr::Exec(_)
                    | sea_orm::DbErr::Query(_)
                    | sea_orm::DbErr::RecordNotInserted
            )
        )
    }
}
