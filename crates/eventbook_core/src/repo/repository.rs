//! Backend-agnostic CRUD contract.
//!
//! # Invariants
//! - `create` never overwrites; `update` never inserts.
//! - `read`/`update`/`delete` on an absent id fail with `RepoError::NotFound`.
//! - `find_all` returns a fresh snapshot, never a live view.

use super::error::{RepoError, RepoResult};
use crate::model::{EntityId, Identifiable};
use std::sync::Arc;

/// Repository interface implemented by the memory, file and SQLite backends.
pub trait Repository<T: Identifiable> {
    /// Stores `entity`; fails with `AlreadyExists` on a duplicate id.
    fn create(&self, entity: &T) -> RepoResult<()>;
    /// Loads one entity by id.
    fn read(&self, id: EntityId) -> RepoResult<T>;
    /// Replaces the stored entity with the same id in full.
    fn update(&self, entity: &T) -> RepoResult<()>;
    fn delete(&self, id: EntityId) -> RepoResult<()>;
    /// Every stored entity in backend order.
    fn find_all(&self) -> RepoResult<Vec<T>>;

    fn exists(&self, id: EntityId) -> RepoResult<bool> {
        match self.read(id) {
            Ok(_) => Ok(true),
            Err(RepoError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.find_all()?.len())
    }
}

impl<T: Identifiable, R: Repository<T> + ?Sized> Repository<T> for Arc<R> {
    fn create(&self, entity: &T) -> RepoResult<()> {
        (**self).create(entity)
    }

    fn read(&self, id: EntityId) -> RepoResult<T> {
        (**self).read(id)
    }

    fn update(&self, entity: &T) -> RepoResult<()> {
        (**self).update(entity)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        (**self).find_all()
    }
}

pub(crate) fn not_found<T: Identifiable>(id: EntityId) -> RepoError {
    RepoError::NotFound {
        entity: T::ENTITY,
        id,
    }
}

pub(crate) fn already_exists<T: Identifiable>(id: EntityId) -> RepoError {
    RepoError::AlreadyExists {
        entity: T::ENTITY,
        id,
    }
}
