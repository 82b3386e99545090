//! SQLite repository backend.
//!
//! # Responsibility
//! - Store one entity type in its table (plus child tables) via `SqlEntity`.
//!
//! # Invariants
//! - Every call runs in its own transaction; parent and child rows are
//!   written or rolled back together.
//! - `find_all` is ordered by id.
//! - The connection must have been opened through `db::open_db*` so the
//!   schema exists.

use super::error::{BackendError, RepoError, RepoResult};
use super::repository::{already_exists, not_found, Repository};
use crate::codec::sql::{
    bind_values, delete_sql, insert_sql, load_all, load_by_id, row_exists, table_exists,
    update_sql, SqlEntity,
};
use crate::model::EntityId;
use log::debug;
use rusqlite::{params, params_from_iter, Connection};
use std::marker::PhantomData;

/// Relational repository borrowing an open connection.
pub struct SqliteRepository<'conn, T> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> T>,
}

impl<'conn, T: SqlEntity> SqliteRepository<'conn, T> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Like `new`, but fails with `MissingTable` when the schema lacks `T`'s table.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, T::TABLE)? {
            return Err(BackendError::MissingTable(T::TABLE).into());
        }
        Ok(Self::new(conn))
    }

    fn in_transaction<R>(&self, work: impl FnOnce(&Connection) -> RepoResult<R>) -> RepoResult<R> {
        let tx = self.conn.unchecked_transaction()?;
        let result = work(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

impl<T: SqlEntity> Repository<T> for SqliteRepository<'_, T> {
    fn create(&self, entity: &T) -> RepoResult<()> {
        self.in_transaction(|conn| {
            if row_exists::<T>(conn, entity.id())? {
                return Err(already_exists::<T>(entity.id()));
            }
            conn.execute(&insert_sql::<T>(), params_from_iter(bind_values(entity)?))?;
            entity.write_children(conn)?;
            Ok(())
        })?;

        debug!(
            "event=repo_write module=repo status=ok op=create entity={} id={}",
            T::ENTITY,
            entity.id()
        );
        Ok(())
    }

    fn read(&self, id: EntityId) -> RepoResult<T> {
        self.in_transaction(|conn| load_by_id::<T>(conn, id))?
            .ok_or_else(|| not_found::<T>(id))
    }

    fn update(&self, entity: &T) -> RepoResult<()> {
        self.in_transaction(|conn| {
            let changed =
                conn.execute(&update_sql::<T>(), params_from_iter(bind_values(entity)?))?;
            if changed == 0 {
                return Err(not_found::<T>(entity.id()));
            }
            T::delete_children(conn, entity.id())?;
            entity.write_children(conn)?;
            Ok(())
        })?;

        debug!(
            "event=repo_write module=repo status=ok op=update entity={} id={}",
            T::ENTITY,
            entity.id()
        );
        Ok(())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.in_transaction(|conn| {
            T::delete_children(conn, id)?;
            let changed = conn.execute(&delete_sql::<T>(), params![id])?;
            if changed == 0 {
                return Err(not_found::<T>(id));
            }
            Ok(())
        })?;

        debug!(
            "event=repo_write module=repo status=ok op=delete entity={} id={id}",
            T::ENTITY
        );
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        self.in_transaction(load_all::<T>)
    }

    fn count(&self) -> RepoResult<usize> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", T::TABLE),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        row_count(T::TABLE, count)
    }
}

fn row_count(table: &str, count: i64) -> RepoResult<usize> {
    usize::try_from(count)
        .map_err(|_| RepoError::malformed(format!("{table} row count {count} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::{row_count, SqliteRepository};
    use crate::db::open_db_in_memory;
    use crate::model::user::{User, UserRole};
    use crate::repo::{BackendError, RepoError, Repository};
    use rusqlite::Connection;

    #[test]
    fn try_new_requires_the_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteRepository::<User>::try_new(&conn).err().unwrap();
        assert!(matches!(
            err,
            RepoError::BackendUnavailable(BackendError::MissingTable("users"))
        ));
    }

    #[test]
    fn count_uses_the_table() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteRepository::<User>::try_new(&conn).unwrap();
        for id in 1..=3 {
            repo.create(&User {
                id,
                username: format!("user{id}"),
                email: format!("user{id}@example.com"),
                role: UserRole::Customer,
            })
            .unwrap();
        }
        assert_eq!(repo.count().unwrap(), 3);
        assert!(repo.exists(2).unwrap());
        assert!(!repo.exists(9).unwrap());
    }

    #[test]
    fn negative_row_count_is_malformed() {
        assert_eq!(row_count("users", 7).unwrap(), 7);
        let err = row_count("users", -1).unwrap_err();
        assert!(matches!(err, RepoError::MalformedRecord(ref m) if m.contains("users row count -1")));
    }
}
