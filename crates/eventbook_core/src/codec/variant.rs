//! Reviewable-entity variant registry.
//!
//! # Responsibility
//! - Map a variant tag (`Activity`, `Event`, `FreeActivity`) to the codec
//!   that encodes/decodes that concrete shape for every backend.
//! - Provide the single dispatch point used by all codecs that embed a
//!   `ReviewableEntity`.
//!
//! # Invariants
//! - Unknown tags fail with `RepoError::UnknownVariant`; there is no fallback.
//! - Tags are unique within one registry.

use super::sql::{load_by_id, SqlEntity};
use super::text::{TextCodec, FIELD_SEPARATOR};
use crate::model::catalog::{Activity, Event, FreeActivity, ReviewableEntity};
use crate::model::EntityId;
use crate::repo::{RepoError, RepoResult};
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

static BUILTIN: Lazy<VariantRegistry> = Lazy::new(VariantRegistry::builtin);

/// Process-wide registry holding the built-in variants.
pub fn registry() -> &'static VariantRegistry {
    &BUILTIN
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantRegistryError {
    InvalidTag(String),
    DuplicateTag(String),
}

impl Display for VariantRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(tag) => write!(f, "variant tag is invalid: `{tag}`"),
            Self::DuplicateTag(tag) => write!(f, "variant tag already registered: `{tag}`"),
        }
    }
}

impl Error for VariantRegistryError {}

/// Codec for one concrete `ReviewableEntity` shape.
pub trait VariantCodec: Send + Sync {
    fn tag(&self) -> &'static str;
    /// Encodes the variant's own fields (without the tag).
    fn encode_text(&self, item: &ReviewableEntity) -> RepoResult<String>;
    fn decode_text(&self, record: &str) -> RepoResult<ReviewableEntity>;
    /// Hydrates the variant from its own table.
    fn load_sql(&self, conn: &Connection, id: EntityId) -> RepoResult<ReviewableEntity>;
}

/// Generic codec for a variant backed by an entity with text and SQL codecs.
struct EntityVariant<T> {
    tag: &'static str,
    wrap: fn(T) -> ReviewableEntity,
    unwrap: fn(&ReviewableEntity) -> Option<&T>,
}

impl<T> VariantCodec for EntityVariant<T>
where
    T: TextCodec + SqlEntity + Send + Sync,
{
    fn tag(&self) -> &'static str {
        self.tag
    }

    fn encode_text(&self, item: &ReviewableEntity) -> RepoResult<String> {
        let value = (self.unwrap)(item).ok_or_else(|| {
            RepoError::malformed(format!(
                "codec `{}` cannot encode a `{}` value",
                self.tag,
                item.tag()
            ))
        })?;
        value.encode_text()
    }

    fn decode_text(&self, record: &str) -> RepoResult<ReviewableEntity> {
        T::decode_text(record).map(self.wrap)
    }

    fn load_sql(&self, conn: &Connection, id: EntityId) -> RepoResult<ReviewableEntity> {
        let value = load_by_id::<T>(conn, id)?.ok_or_else(|| {
            RepoError::malformed(format!("dangling reference to {} {id}", T::ENTITY))
        })?;
        Ok((self.wrap)(value))
    }
}

/// Tag → codec map used by every polymorphic field.
#[derive(Default)]
pub struct VariantRegistry {
    codecs: BTreeMap<&'static str, Arc<dyn VariantCodec>>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `Activity`, `Event` and `FreeActivity`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn VariantCodec>; 3] = [
            Arc::new(EntityVariant::<Activity> {
                tag: "Activity",
                wrap: ReviewableEntity::Activity,
                unwrap: ReviewableEntity::as_activity,
            }),
            Arc::new(EntityVariant::<Event> {
                tag: "Event",
                wrap: ReviewableEntity::Event,
                unwrap: ReviewableEntity::as_event,
            }),
            Arc::new(EntityVariant::<FreeActivity> {
                tag: "FreeActivity",
                wrap: ReviewableEntity::FreeActivity,
                unwrap: ReviewableEntity::as_free_activity,
            }),
        ];
        for codec in builtins {
            let registered = registry.register(codec);
            debug_assert!(registered.is_ok(), "built-in variant rejected: {registered:?}");
        }
        registry
    }

    pub fn register(&mut self, codec: Arc<dyn VariantCodec>) -> Result<(), VariantRegistryError> {
        let tag = codec.tag();
        if !is_valid_tag(tag) {
            return Err(VariantRegistryError::InvalidTag(tag.to_string()));
        }
        if self.codecs.contains_key(tag) {
            return Err(VariantRegistryError::DuplicateTag(tag.to_string()));
        }
        self.codecs.insert(tag, codec);
        Ok(())
    }

    /// Sorted registered tags.
    pub fn tags(&self) -> Vec<&'static str> {
        self.codecs.keys().copied().collect()
    }

    pub fn codec(&self, tag: &str) -> RepoResult<&dyn VariantCodec> {
        self.codecs
            .get(tag)
            .map(|codec| codec.as_ref())
            .ok_or_else(|| RepoError::UnknownVariant(tag.to_string()))
    }

    /// Encodes `item` as `<tag>,<variant fields...>`.
    pub fn encode_text(&self, item: &ReviewableEntity) -> RepoResult<String> {
        let codec = self.codec(item.tag())?;
        let fields = codec.encode_text(item)?;
        Ok(format!("{}{FIELD_SEPARATOR}{fields}", codec.tag()))
    }

    /// Decodes a `<tag>,<variant fields...>` record.
    pub fn decode_text(&self, record: &str) -> RepoResult<ReviewableEntity> {
        let (tag, fields) = record.split_once(FIELD_SEPARATOR).ok_or_else(|| {
            RepoError::malformed(format!("reviewable record has no variant tag: `{record}`"))
        })?;
        self.codec(tag)?.decode_text(fields)
    }

    /// `(tag, id)` pair stored in relational tag/id columns.
    pub fn sql_key(&self, item: &ReviewableEntity) -> RepoResult<(&'static str, EntityId)> {
        let codec = self.codec(item.tag())?;
        Ok((codec.tag(), item.id()))
    }

    pub fn load_sql(
        &self,
        conn: &Connection,
        tag: &str,
        id: EntityId,
    ) -> RepoResult<ReviewableEntity> {
        self.codec(tag)?.load_sql(conn, id)
    }
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::{registry, VariantCodec, VariantRegistry, VariantRegistryError};
    use crate::model::catalog::{Category, Event, ReviewableEntity};
    use crate::model::EntityId;
    use crate::repo::{RepoError, RepoResult};
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use std::sync::Arc;

    struct NamedCodec(&'static str);

    impl VariantCodec for NamedCodec {
        fn tag(&self) -> &'static str {
            self.0
        }

        fn encode_text(&self, _item: &ReviewableEntity) -> RepoResult<String> {
            Ok(String::new())
        }

        fn decode_text(&self, _record: &str) -> RepoResult<ReviewableEntity> {
            Err(RepoError::UnknownVariant(self.0.to_string()))
        }

        fn load_sql(&self, _conn: &Connection, _id: EntityId) -> RepoResult<ReviewableEntity> {
            Err(RepoError::UnknownVariant(self.0.to_string()))
        }
    }

    fn concert() -> ReviewableEntity {
        ReviewableEntity::Event(Event {
            id: 4,
            name: "Jazz, live".to_string(),
            location: "Paradiso".to_string(),
            category: Category::Music,
            capacity: 300,
            current_size: 120,
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
            price: 35.0,
        })
    }

    #[test]
    fn builtin_registry_has_three_sorted_tags() {
        assert_eq!(registry().tags(), vec!["Activity", "Event", "FreeActivity"]);
    }

    #[test]
    fn text_encoding_starts_with_tag() {
        let encoded = registry().encode_text(&concert()).unwrap();
        assert!(encoded.starts_with("Event,4,"));
        assert_eq!(registry().decode_text(&encoded).unwrap(), concert());
    }

    #[test]
    fn unknown_tag_is_a_hard_failure() {
        let err = registry().decode_text("Workshop,1,x").unwrap_err();
        assert!(matches!(err, RepoError::UnknownVariant(ref tag) if tag == "Workshop"));
    }

    #[test]
    fn encoding_with_an_unregistered_variant_fails() {
        let empty = VariantRegistry::new();
        let err = empty.encode_text(&concert()).unwrap_err();
        assert!(matches!(err, RepoError::UnknownVariant(ref tag) if tag == "Event"));
    }

    #[test]
    fn rejects_invalid_or_duplicate_tags() {
        let mut registry = VariantRegistry::builtin();
        assert_eq!(
            registry.register(Arc::new(NamedCodec("Event"))),
            Err(VariantRegistryError::DuplicateTag("Event".to_string()))
        );
        assert_eq!(
            registry.register(Arc::new(NamedCodec("Bad Tag"))),
            Err(VariantRegistryError::InvalidTag("Bad Tag".to_string()))
        );
        registry
            .register(Arc::new(NamedCodec("Tour")))
            .expect("new tag should register");
        assert_eq!(registry.tags().len(), 4);
    }
}
