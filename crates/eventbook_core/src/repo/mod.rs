//! Repository contract and its three backends.
//!
//! # Responsibility
//! - Define the backend-agnostic CRUD contract (`Repository<T>`).
//! - Provide the volatile, flat-file and SQLite implementations.
//!
//! # Invariants
//! - Every backend reports the same error kind for the same situation.
//! - Backends never retry, cache or swallow errors.

mod error;
mod file_repo;
mod memory_repo;
mod repository;
mod sqlite_repo;

pub use error::{BackendError, RepoError, RepoResult};
pub use file_repo::FileRepository;
pub use memory_repo::InMemoryRepository;
pub use repository::Repository;
pub use sqlite_repo::SqliteRepository;
