//! Backend selection and repository factory.
//!
//! # Responsibility
//! - Parse which backend to use and where it keeps its data.
//! - Hand out `Repository<T>` trait objects for any stored entity type.
//!
//! # Invariants
//! - Memory storage keeps one shared store per entity type, so repeated
//!   `repository::<T>()` calls observe the same data.
//! - File storage keeps `<data_dir>/<entity>.csv`; SQLite storage keeps
//!   `<data_dir>/eventbook.sqlite3`.

use crate::codec::{SqlEntity, TextCodec};
use crate::db::open_db;
use crate::repo::{
    BackendError, FileRepository, InMemoryRepository, RepoError, RepoResult, Repository,
    SqliteRepository,
};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub const SQLITE_FILE_NAME: &str = "eventbook.sqlite3";
const TEXT_FILE_EXTENSION: &str = "csv";

/// Which `Repository` implementation backs a `Storage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    File,
    Sqlite,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Sqlite => "sqlite",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBackendError(pub String);

impl Display for UnknownBackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported backend `{}`; expected memory|file|sqlite",
            self.0
        )
    }
}

impl Error for UnknownBackendError {}

impl FromStr for BackendKind {
    type Err = UnknownBackendError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(UnknownBackendError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Ignored by the memory backend.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(backend: BackendKind, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            data_dir: data_dir.into(),
        }
    }
}

/// Entity types every backend can store.
pub trait StoredEntity: TextCodec + SqlEntity + Clone + Send + Sync + 'static {}

impl<T> StoredEntity for T where T: TextCodec + SqlEntity + Clone + Send + Sync + 'static {}

type SharedStore = Arc<dyn Any + Send + Sync>;

enum Backend {
    Memory(Mutex<HashMap<TypeId, SharedStore>>),
    File(PathBuf),
    Sqlite(Connection),
}

/// Opened backend that hands out repositories.
pub struct Storage {
    kind: BackendKind,
    backend: Backend,
}

impl Storage {
    /// Prepares the configured backend.
    ///
    /// # Errors
    /// - `BackendUnavailable` when the data directory cannot be created or the
    ///   database cannot be opened and migrated.
    pub fn open(config: &StorageConfig) -> RepoResult<Self> {
        let backend = match config.backend {
            BackendKind::Memory => Backend::Memory(Mutex::new(HashMap::new())),
            BackendKind::File => {
                std::fs::create_dir_all(&config.data_dir)?;
                Backend::File(config.data_dir.clone())
            }
            BackendKind::Sqlite => {
                std::fs::create_dir_all(&config.data_dir)?;
                Backend::Sqlite(open_db(config.data_dir.join(SQLITE_FILE_NAME))?)
            }
        };

        info!(
            "event=storage_open module=storage status=ok backend={}",
            config.backend
        );
        Ok(Self {
            kind: config.backend,
            backend,
        })
    }

    /// Volatile storage with no data directory.
    pub fn memory() -> Self {
        Self {
            kind: BackendKind::Memory,
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// SQLite storage over an already opened and migrated connection.
    pub fn with_connection(conn: Connection) -> Self {
        Self {
            kind: BackendKind::Sqlite,
            backend: Backend::Sqlite(conn),
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Repository for `T` on this storage's backend.
    pub fn repository<T: StoredEntity>(&self) -> RepoResult<Box<dyn Repository<T> + '_>> {
        match &self.backend {
            Backend::Memory(stores) => Ok(Box::new(shared_memory_store::<T>(stores)?)),
            Backend::File(data_dir) => Ok(Box::new(FileRepository::<T>::new(text_file_path::<T>(
                data_dir,
            )))),
            Backend::Sqlite(conn) => Ok(Box::new(SqliteRepository::<T>::try_new(conn)?)),
        }
    }
}

fn shared_memory_store<T: StoredEntity>(
    stores: &Mutex<HashMap<TypeId, SharedStore>>,
) -> RepoResult<Arc<InMemoryRepository<T>>> {
    let mut stores = stores.lock().map_err(|_| BackendError::LockPoisoned)?;
    let store = stores
        .entry(TypeId::of::<T>())
        .or_insert_with(|| -> SharedStore { Arc::new(InMemoryRepository::<T>::new()) })
        .clone();
    store.downcast::<InMemoryRepository<T>>().map_err(|_| {
        RepoError::malformed(format!("memory store for {} has a foreign type", T::ENTITY))
    })
}

fn text_file_path<T: StoredEntity>(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.{TEXT_FILE_EXTENSION}", T::ENTITY))
}
