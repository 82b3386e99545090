//! Booking domain model.
//!
//! # Responsibility
//! - Define the plain value types stored through repositories.
//! - Define the shared identity contract (`Identifiable`).
//!
//! # Invariants
//! - Every stored record carries a caller-assigned integer id.
//! - Entity references hold full values, never bare ids.

pub mod booking;
pub mod catalog;
pub mod feedback;
pub mod schedule;
pub mod user;

/// Caller-assigned, non-auto-incrementing entity identifier.
pub type EntityId = i64;

/// Any record that can be stored in a repository.
pub trait Identifiable {
    /// Lowercase entity kind used in error messages, logs and file names.
    const ENTITY: &'static str;

    fn id(&self) -> EntityId;
}
