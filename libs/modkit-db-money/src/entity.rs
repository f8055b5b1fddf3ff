//! Entity binding: typed wrappers over [`Record`]s of one table.
//!
//! An entity type implements [`Entity`] and exposes plain getter methods that
//! forward to the record, e.g.
//!
//! ```ignore
//! struct AccountDao(Record);
//!
//! impl Entity for AccountDao {
//!     fn from_record(record: Record) -> Result<Self> { Ok(Self(record)) }
//!     fn record(&self) -> &Record { &self.0 }
//!     fn record_mut(&mut self) -> &mut Record { &mut self.0 }
//! }
//!
//! impl AccountDao {
//!     fn money(&self) -> Result<Money> { self.0.require_money(&ACCOUNT.composite_money) }
//! }
//!
//! let found = EntityClass::<AccountDao>::new(&ACCOUNT.table)
//!     .find(&conn, ACCOUNT.composite_money.eq(&money))
//!     .await?;
//! ```

use std::marker::PhantomData;

use sea_orm::{ConnectionTrait, sea_query::IntoCondition};

use crate::error::{MoneyError, Result};
use crate::query::update_dirty;
use crate::record::Record;
use crate::table::Table;

/// A type backed by one row of a table.
pub trait Entity: Sized {
    /// Wrap a freshly loaded record.
    ///
    /// # Errors
    /// Implementations may validate the record and reject it.
    fn from_record(record: Record) -> Result<Self>;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Primary key of the underlying row.
    fn id(&self) -> Option<i64> {
        self.record().id()
    }
}

/// Finder and persistence entry point for entities of one table.
#[derive(Debug)]
pub struct EntityClass<'t, E> {
    table: &'t Table,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityClass<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EntityClass<'_, E> {}

impl<'t, E: Entity> EntityClass<'t, E> {
    #[must_use]
    pub fn new(table: &'t Table) -> Self {
        Self {
            table,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn table(&self) -> &'t Table {
        self.table
    }

    /// All entities matching `cond`, ordered by id.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` on query failures and any error of [`Entity::from_record`].
    pub async fn find(&self, conn: &impl ConnectionTrait, cond: impl IntoCondition) -> Result<Vec<E>> {
        self.table
            .select()
            .filter(cond)
            .all(conn)
            .await?
            .into_iter()
            .map(E::from_record)
            .collect()
    }

    /// Every entity of the table.
    ///
    /// # Errors
    /// Same as [`Self::find`].
    pub async fn all(&self, conn: &impl ConnectionTrait) -> Result<Vec<E>> {
        self.table
            .select()
            .all(conn)
            .await?
            .into_iter()
            .map(E::from_record)
            .collect()
    }

    /// Number of rows matching `cond`.
    ///
    /// # Errors
    /// Returns `MoneyError::Db` if the query fails.
    pub async fn count(&self, conn: &impl ConnectionTrait, cond: impl IntoCondition) -> Result<u64> {
        self.table.select().filter(cond).count(conn).await
    }

    /// Entity with primary key `id`, if present.
    ///
    /// # Errors
    /// Same as [`Self::find`].
    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i64) -> Result<Option<E>> {
        let mut found = self.find(conn, self.table.id_eq(id)).await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    /// Persist the columns changed through the entity's record.
    ///
    /// Returns the number of rows updated, `0` when nothing was changed.
    ///
    /// # Errors
    /// - `MoneyError::Unsupported` if the record has no id.
    /// - `MoneyError::NotSingle` if the row no longer exists.
    /// - `MoneyError::Db` if the database rejects the new values.
    pub async fn save(&self, conn: &impl ConnectionTrait, entity: &mut E) -> Result<u64> {
        let updated = update_dirty(self.table, conn, entity.record()).await?;
        if entity.record().is_dirty() && updated != 1 {
            return Err(MoneyError::NotSingle(usize::try_from(updated).unwrap_or(usize::MAX)));
        }
        entity.record_mut().mark_clean();
        Ok(updated)
    }
}
