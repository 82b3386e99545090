//! Persistence core for the event booking system.
//!
//! Entities are stored through one `Repository<T>` contract with three
//! interchangeable backends (memory, flat file, SQLite). Polymorphic
//! `ReviewableEntity` fields are encoded through a single variant registry.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use codec::{registry, SqlEntity, TextCodec, VariantCodec, VariantRegistry};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::booking::{Booking, HoldsSeats, Reservation};
pub use model::catalog::{Activity, Category, Event, FreeActivity, ReviewableEntity};
pub use model::feedback::{Review, Ticket, Wishlist};
pub use model::schedule::{ActivitySchedule, CapacityError};
pub use model::user::{User, UserRole};
pub use model::{EntityId, Identifiable};
pub use repo::{
    BackendError, FileRepository, InMemoryRepository, RepoError, RepoResult, Repository,
    SqliteRepository,
};
pub use service::{BookingService, BookingServiceError};
pub use storage::{BackendKind, Storage, StorageConfig, StoredEntity};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
