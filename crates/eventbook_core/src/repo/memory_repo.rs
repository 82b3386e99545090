//! In-process repository backend.
//!
//! # Invariants
//! - Values are cloned on the way in and on the way out, so callers never
//!   share state with the store. In-place edits require `update`.
//! - Entries keep insertion order; `update` keeps the original position.

use super::error::{BackendError, RepoResult};
use super::repository::{already_exists, not_found, Repository};
use crate::model::{EntityId, Identifiable};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Volatile repository backed by an insertion-ordered vector.
pub struct InMemoryRepository<T> {
    entries: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    fn entries(&self) -> RepoResult<RwLockReadGuard<'_, Vec<T>>> {
        Ok(self
            .entries
            .read()
            .map_err(|_| BackendError::LockPoisoned)?)
    }

    fn entries_mut(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<T>>> {
        Ok(self
            .entries
            .write()
            .map_err(|_| BackendError::LockPoisoned)?)
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identifiable + Clone> Repository<T> for InMemoryRepository<T> {
    fn create(&self, entity: &T) -> RepoResult<()> {
        let mut entries = self.entries_mut()?;
        if entries.iter().any(|stored| stored.id() == entity.id()) {
            return Err(already_exists::<T>(entity.id()));
        }
        entries.push(entity.clone());
        Ok(())
    }

    fn read(&self, id: EntityId) -> RepoResult<T> {
        self.entries()?
            .iter()
            .find(|stored| stored.id() == id)
            .cloned()
            .ok_or_else(|| not_found::<T>(id))
    }

    fn update(&self, entity: &T) -> RepoResult<()> {
        let mut entries = self.entries_mut()?;
        let slot = entries
            .iter_mut()
            .find(|stored| stored.id() == entity.id())
            .ok_or_else(|| not_found::<T>(entity.id()))?;
        *slot = entity.clone();
        Ok(())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let mut entries = self.entries_mut()?;
        let index = entries
            .iter()
            .position(|stored| stored.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        entries.remove(index);
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        Ok(self.entries()?.clone())
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.entries()?.len())
    }
}
