//! Repository error kinds shared by every backend.
//!
//! # Invariants
//! - Not-found is always `RepoError::NotFound`, never an empty `Option`.
//! - Column type/conversion failures are data problems (`MalformedRecord`),
//!   every other SQLite failure is a backend problem.

use crate::db::DbError;
use crate::model::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage medium failure behind `RepoError::BackendUnavailable`.
#[derive(Debug)]
pub enum BackendError {
    Io(std::io::Error),
    Db(DbError),
    LockPoisoned,
    MissingTable(&'static str),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "repository lock was poisoned"),
            Self::MissingTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::LockPoisoned => None,
            Self::MissingTable(_) => None,
        }
    }
}

/// Error surfaced by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    AlreadyExists {
        entity: &'static str,
        id: EntityId,
    },
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
    /// Polymorphic tag not known to the variant registry.
    UnknownVariant(String),
    /// Stored line/row cannot be decoded into its entity.
    MalformedRecord(String),
    BackendUnavailable(BackendError),
}

impl RepoError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists { entity, id } => write!(f, "{entity} already exists: {id}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::UnknownVariant(tag) => write!(f, "unknown reviewable variant `{tag}`"),
            Self::MalformedRecord(message) => write!(f, "malformed record: {message}"),
            Self::BackendUnavailable(err) => write!(f, "backend unavailable: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BackendUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for RepoError {
    fn from(value: BackendError) -> Self {
        Self::BackendUnavailable(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::BackendUnavailable(BackendError::Db(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::BackendUnavailable(BackendError::Io(value))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::InvalidColumnType(index, name, kind) => Self::MalformedRecord(
                format!("column `{name}` (#{index}) has unexpected type {kind}"),
            ),
            rusqlite::Error::FromSqlConversionFailure(index, kind, err) => Self::MalformedRecord(
                format!("column #{index} of type {kind} failed to convert: {err}"),
            ),
            rusqlite::Error::IntegralValueOutOfRange(index, value) => Self::MalformedRecord(
                format!("column #{index} value {value} is out of range"),
            ),
            other => Self::BackendUnavailable(BackendError::Db(DbError::Sqlite(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendError, RepoError};
    use rusqlite::types::Type;

    #[test]
    fn column_type_errors_are_malformed_records() {
        let err = RepoError::from(rusqlite::Error::InvalidColumnType(
            2,
            "capacity".to_string(),
            Type::Text,
        ));
        assert!(matches!(err, RepoError::MalformedRecord(ref message) if message.contains("capacity")));
    }

    #[test]
    fn other_sqlite_errors_are_backend_failures() {
        let err = RepoError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(
            err,
            RepoError::BackendUnavailable(BackendError::Db(_))
        ));
    }

    #[test]
    fn display_names_entity_and_id() {
        let err = RepoError::NotFound {
            entity: "booking",
            id: 42,
        };
        assert_eq!(err.to_string(), "booking not found: 42");
        assert!(err.is_not_found());
    }
}
