//! Column/row codec for the SQLite backend.
//!
//! # Responsibility
//! - Describe how each entity maps to one table row plus optional child rows.
//! - Provide the shared SELECT/INSERT/UPDATE builders and hydration helpers.
//!
//! # Invariants
//! - `id` is always the first column and the `?1` placeholder.
//! - Entity references are stored as ids and re-hydrated on read; a missing
//!   referenced row is a `MalformedRecord`.
//! - Dates and times are stored as TEXT in `DATE_FORMAT`/`TIME_FORMAT`.

use super::{DATE_FORMAT, TIME_FORMAT};
use crate::model::{EntityId, Identifiable};
use crate::repo::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};

/// SQL mapping for one entity type.
pub trait SqlEntity: Identifiable + Sized {
    const TABLE: &'static str;
    /// Non-id columns, in the order produced by `to_columns`.
    const COLUMNS: &'static [&'static str];

    fn to_columns(&self) -> RepoResult<Vec<Value>>;

    /// Rebuilds the entity from a row selected by `select_sql`.
    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self>;

    /// Writes child-table rows after the parent row exists.
    fn write_children(&self, _conn: &Connection) -> RepoResult<()> {
        Ok(())
    }

    fn delete_children(_conn: &Connection, _id: EntityId) -> RepoResult<()> {
        Ok(())
    }
}

pub fn select_sql<T: SqlEntity>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

pub fn insert_sql<T: SqlEntity>() -> String {
    let placeholders = (1..=T::COLUMNS.len() + 1)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} (id, {}) VALUES ({placeholders})",
        T::TABLE,
        T::COLUMNS.join(", ")
    )
}

pub fn update_sql<T: SqlEntity>() -> String {
    let assignments = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {} SET {assignments} WHERE id = ?1", T::TABLE)
}

pub fn delete_sql<T: SqlEntity>() -> String {
    format!("DELETE FROM {} WHERE id = ?1", T::TABLE)
}

/// `[id, columns...]` bound in placeholder order.
pub fn bind_values<T: SqlEntity>(entity: &T) -> RepoResult<Vec<Value>> {
    let columns = entity.to_columns()?;
    if columns.len() != T::COLUMNS.len() {
        return Err(RepoError::malformed(format!(
            "{} produced {} columns, expected {}",
            T::ENTITY,
            columns.len(),
            T::COLUMNS.len()
        )));
    }
    let mut values = Vec::with_capacity(columns.len() + 1);
    values.push(Value::Integer(entity.id()));
    values.extend(columns);
    Ok(values)
}

pub fn load_by_id<T: SqlEntity>(conn: &Connection, id: EntityId) -> RepoResult<Option<T>> {
    let sql = format!("{} WHERE id = ?1", select_sql::<T>());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(T::from_row(conn, row)?)),
        None => Ok(None),
    }
}

/// Hydrates a referenced entity; absence means the stored reference dangles.
pub fn load_reference<T: SqlEntity>(
    conn: &Connection,
    id: EntityId,
    owner: &'static str,
) -> RepoResult<T> {
    load_by_id::<T>(conn, id)?.ok_or_else(|| {
        RepoError::malformed(format!(
            "{owner} references missing {} {id}",
            T::ENTITY
        ))
    })
}

/// Every row of `T`'s table, ordered by id.
pub fn load_all<T: SqlEntity>(conn: &Connection) -> RepoResult<Vec<T>> {
    let sql = format!("{} ORDER BY id ASC", select_sql::<T>());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut entities = Vec::new();
    while let Some(row) = rows.next()? {
        entities.push(T::from_row(conn, row)?);
    }
    Ok(entities)
}

pub fn row_exists<T: SqlEntity>(conn: &Connection, id: EntityId) -> RepoResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", T::TABLE);
    let exists = conn.query_row(&sql, params![id], |row| row.get::<_, bool>(0))?;
    Ok(exists)
}

pub fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

/// Reads a TEXT column and maps it through `parse`.
pub fn enum_column<E>(
    row: &Row<'_>,
    column: &str,
    parse: fn(&str) -> Option<E>,
) -> RepoResult<E> {
    let raw = row.get::<_, String>(column)?;
    parse(&raw).ok_or_else(|| {
        RepoError::malformed(format!("column `{column}` holds unknown value `{raw}`"))
    })
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub fn int(value: impl Into<i64>) -> Value {
    Value::Integer(value.into())
}

pub fn real(value: f64) -> Value {
    Value::Real(value)
}

pub fn date(value: NaiveDate) -> Value {
    Value::Text(value.format(DATE_FORMAT).to_string())
}

pub fn time(value: NaiveTime) -> Value {
    Value::Text(value.format(TIME_FORMAT).to_string())
}
