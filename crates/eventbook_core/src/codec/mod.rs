//! Entity codecs for the serializing backends.
//!
//! # Responsibility
//! - `text`: line codec used by the flat-file backend.
//! - `sql`: column/row codec used by the SQLite backend.
//! - `variant`: tag → codec registry for `ReviewableEntity` fields.
//!
//! # Invariants
//! - Every entity type has exactly one text codec and one SQL codec.
//! - Polymorphic values are encoded and decoded only through the registry.

pub mod sql;
mod sql_entities;
pub mod text;
mod text_entities;
pub mod variant;

pub use sql::SqlEntity;
pub use text::TextCodec;
pub use variant::{registry, VariantCodec, VariantRegistry, VariantRegistryError};

/// Wire format for calendar dates in both backends.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for wall-clock times in both backends. Fractional seconds are
/// written only when present.
pub const TIME_FORMAT: &str = "%H:%M:%S%.f";
