//! Records that point at reviewable items: tickets, reviews and wishlists.
//!
//! # Invariants
//! - A wishlist holds at most one item per `(tag, id)` pair.
//! - Wishlist item order is preserved by every backend.

use super::catalog::ReviewableEntity;
use super::user::User;
use super::{EntityId, Identifiable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: EntityId,
    pub owner: User,
    pub event: ReviewableEntity,
    pub price: f64,
}

impl Identifiable for Ticket {
    const ENTITY: &'static str = "ticket";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: EntityId,
    pub user: User,
    pub reviewable: ReviewableEntity,
    /// 1..=5 stars.
    pub rating: u8,
    pub comment: String,
}

impl Identifiable for Review {
    const ENTITY: &'static str = "review";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: EntityId,
    pub owner: User,
    pub items: Vec<ReviewableEntity>,
}

impl Wishlist {
    pub fn new(id: EntityId, owner: User) -> Self {
        Self {
            id,
            owner,
            items: Vec::new(),
        }
    }

    /// Appends `item`, or replaces the entry with the same tag and id in place.
    pub fn add_item(&mut self, item: ReviewableEntity) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.tag() == item.tag() && existing.id() == item.id())
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Removes the item with `tag` and `id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, tag: &str, id: EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !(item.tag() == tag && item.id() == id));
        self.items.len() != before
    }
}

impl Identifiable for Wishlist {
    const ENTITY: &'static str = "wishlist";

    fn id(&self) -> EntityId {
        self.id
    }
}
