//! Bookable catalogue items and the reviewable-entity union.
//!
//! # Responsibility
//! - Define `Activity`, `Event` and `FreeActivity`.
//! - Define `ReviewableEntity`, the closed union used by reviews, tickets and
//!   wishlists.
//!
//! # Invariants
//! - All three variants share `{id, name, location, category}`.
//! - `ReviewableEntity::tag()` is the only place that maps a variant to its
//!   registry tag.

use super::{EntityId, Identifiable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalogue category shared by every reviewable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sports,
    Culture,
    Music,
    Food,
    Outdoor,
    Workshop,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sports => "sports",
            Self::Culture => "culture",
            Self::Music => "music",
            Self::Food => "food",
            Self::Outdoor => "outdoor",
            Self::Workshop => "workshop",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sports" => Some(Self::Sports),
            "culture" => Some(Self::Culture),
            "music" => Some(Self::Music),
            "food" => Some(Self::Food),
            "outdoor" => Some(Self::Outdoor),
            "workshop" => Some(Self::Workshop),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Paid activity that is booked through schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    pub category: Category,
    /// Maximum participants per schedule slot.
    pub capacity: u32,
    pub description: String,
    pub price: f64,
}

impl Identifiable for Activity {
    const ENTITY: &'static str = "activity";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Dated, ticketed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    pub category: Category,
    pub capacity: u32,
    /// Tickets issued so far.
    pub current_size: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
}

impl Identifiable for Event {
    const ENTITY: &'static str = "event";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Activity without capacity or price, described by a free-text program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeActivity {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    pub category: Category,
    pub program: String,
}

impl Identifiable for FreeActivity {
    const ENTITY: &'static str = "free_activity";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Anything that can be reviewed, ticketed or wish-listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReviewableEntity {
    Activity(Activity),
    Event(Event),
    FreeActivity(FreeActivity),
}

impl ReviewableEntity {
    /// Registry tag of the concrete variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Activity(_) => "Activity",
            Self::Event(_) => "Event",
            Self::FreeActivity(_) => "FreeActivity",
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Self::Activity(item) => item.id,
            Self::Event(item) => item.id,
            Self::FreeActivity(item) => item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Activity(item) => &item.name,
            Self::Event(item) => &item.name,
            Self::FreeActivity(item) => &item.name,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Activity(item) => &item.location,
            Self::Event(item) => &item.location,
            Self::FreeActivity(item) => &item.location,
        }
    }

    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            Self::Activity(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_free_activity(&self) -> Option<&FreeActivity> {
        match self {
            Self::FreeActivity(item) => Some(item),
            _ => None,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Activity(item) => item.category,
            Self::Event(item) => item.category,
            Self::FreeActivity(item) => item.category,
        }
    }
}

impl From<Activity> for ReviewableEntity {
    fn from(value: Activity) -> Self {
        Self::Activity(value)
    }
}

impl From<Event> for ReviewableEntity {
    fn from(value: Event) -> Self {
        Self::Event(value)
    }
}

impl From<FreeActivity> for ReviewableEntity {
    fn from(value: FreeActivity) -> Self {
        Self::FreeActivity(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Activity, Category, FreeActivity, ReviewableEntity};

    #[test]
    fn category_text_roundtrips() {
        for category in [
            Category::Sports,
            Category::Culture,
            Category::Music,
            Category::Food,
            Category::Outdoor,
            Category::Workshop,
            Category::Other,
        ] {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("Sports"), None);
    }

    #[test]
    fn reviewable_accessors_read_shared_fields() {
        let item = ReviewableEntity::from(FreeActivity {
            id: 9,
            name: "Park yoga".to_string(),
            location: "Vondelpark".to_string(),
            category: Category::Outdoor,
            program: "stretch, breathe".to_string(),
        });
        assert_eq!(item.tag(), "FreeActivity");
        assert_eq!(item.id(), 9);
        assert_eq!(item.name(), "Park yoga");
        assert_eq!(item.location(), "Vondelpark");
        assert_eq!(item.category(), Category::Outdoor);

        let activity = ReviewableEntity::from(Activity {
            id: 1,
            name: "Climbing".to_string(),
            location: "Gym".to_string(),
            category: Category::Sports,
            capacity: 12,
            description: "Bouldering intro".to_string(),
            price: 25.5,
        });
        assert_eq!(activity.tag(), "Activity");
    }
}
