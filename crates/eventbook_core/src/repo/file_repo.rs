//! Flat-file repository backend.
//!
//! # Responsibility
//! - Persist one entity type as one line-per-record text file.
//!
//! # Invariants
//! - A missing file is an empty table; blank lines are ignored.
//! - Every mutation rewrites the whole file through a sibling temp file and a
//!   rename, so a failed write never leaves a partial file behind.
//! - Every repository on the same path shares one process-wide write lock.
//!   Paths are compared as given, not canonicalized. Other processes are not
//!   guarded against.

use super::error::{BackendError, RepoResult};
use super::repository::{already_exists, not_found, Repository};
use crate::codec::TextCodec;
use crate::model::{EntityId, Identifiable};
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

type PathLock = Arc<Mutex<()>>;

static PATH_LOCKS: Lazy<Mutex<HashMap<PathBuf, Weak<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the write lock shared by every repository on `path`.
fn path_lock(path: &Path) -> PathLock {
    // The map only holds weak handles, so a poisoned guard is still consistent.
    let mut locks = PATH_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(lock) = locks.get(path).and_then(Weak::upgrade) {
        return lock;
    }
    locks.retain(|_, lock| lock.strong_count() > 0);
    let lock = Arc::new(Mutex::new(()));
    locks.insert(path.to_path_buf(), Arc::downgrade(&lock));
    lock
}

/// Repository storing `T` records in a single text file.
pub struct FileRepository<T> {
    path: PathBuf,
    write_lock: PathLock,
    _entity: PhantomData<fn() -> T>,
}

impl<T> FileRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            write_lock: path_lock(&path),
            path,
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl<T: Identifiable + TextCodec> FileRepository<T> {
    fn load(&self) -> RepoResult<Vec<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(T::decode_text)
            .collect()
    }

    fn rewrite(&self, entities: &[T]) -> RepoResult<()> {
        let started_at = Instant::now();
        let mut buffer = String::new();
        for entity in entities {
            buffer.push_str(&entity.encode_text()?);
            buffer.push('\n');
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, buffer)?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                warn!(
                    "event=file_rewrite module=repo status=cleanup_failed entity={} error={cleanup}",
                    T::ENTITY
                );
            }
            return Err(err.into());
        }

        debug!(
            "event=file_rewrite module=repo status=ok entity={} records={} duration_ms={}",
            T::ENTITY,
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Load, mutate and rewrite under the write lock.
    fn mutate(&self, change: impl FnOnce(&mut Vec<T>) -> RepoResult<()>) -> RepoResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BackendError::LockPoisoned)?;
        let mut entities = self.load()?;
        change(&mut entities)?;
        self.rewrite(&entities)
    }
}

impl<T: Identifiable + TextCodec + Clone> Repository<T> for FileRepository<T> {
    fn create(&self, entity: &T) -> RepoResult<()> {
        self.mutate(|entities| {
            if entities.iter().any(|stored| stored.id() == entity.id()) {
                return Err(already_exists::<T>(entity.id()));
            }
            entities.push(entity.clone());
            Ok(())
        })
    }

    fn read(&self, id: EntityId) -> RepoResult<T> {
        self.load()?
            .into_iter()
            .find(|stored| stored.id() == id)
            .ok_or_else(|| not_found::<T>(id))
    }

    fn update(&self, entity: &T) -> RepoResult<()> {
        self.mutate(|entities| {
            let slot = entities
                .iter_mut()
                .find(|stored| stored.id() == entity.id())
                .ok_or_else(|| not_found::<T>(entity.id()))?;
            *slot = entity.clone();
            Ok(())
        })
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.mutate(|entities| {
            let index = entities
                .iter()
                .position(|stored| stored.id() == id)
                .ok_or_else(|| not_found::<T>(id))?;
            entities.remove(index);
            Ok(())
        })
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        self.load()
    }
}
