//! Activity schedule slots and seat accounting.
//!
//! # Invariants
//! - `available_capacity <= capacity` at all times.
//! - Seats are only taken/returned through `reserve`/`release`.

use super::catalog::Activity;
use super::{EntityId, Identifiable};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Seat accounting failure for one schedule slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// Party size of zero.
    InvalidPartySize,
    Insufficient { requested: u32, available: u32 },
}

impl Display for CapacityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPartySize => write!(f, "party size must be at least 1"),
            Self::Insufficient {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} seats but only {available} are available"
            ),
        }
    }
}

impl Error for CapacityError {}

/// One dated slot of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySchedule {
    pub id: EntityId,
    pub activity: Activity,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub capacity: u32,
    pub available_capacity: u32,
}

impl ActivitySchedule {
    /// Creates a slot with every seat available.
    pub fn new(
        id: EntityId,
        activity: Activity,
        date: NaiveDate,
        start_time: NaiveTime,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            activity,
            date,
            start_time,
            capacity,
            available_capacity: capacity,
        }
    }

    /// Takes `people` seats from this slot.
    pub fn reserve(&mut self, people: u32) -> Result<(), CapacityError> {
        if people == 0 {
            return Err(CapacityError::InvalidPartySize);
        }
        if people > self.available_capacity {
            return Err(CapacityError::Insufficient {
                requested: people,
                available: self.available_capacity,
            });
        }
        self.available_capacity -= people;
        Ok(())
    }

    /// Returns `people` seats, never exceeding `capacity`.
    pub fn release(&mut self, people: u32) {
        self.available_capacity = self
            .available_capacity
            .saturating_add(people)
            .min(self.capacity);
    }
}

impl Identifiable for ActivitySchedule {
    const ENTITY: &'static str = "activity_schedule";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivitySchedule, CapacityError};
    use crate::model::catalog::{Activity, Category};
    use chrono::{NaiveDate, NaiveTime};

    fn slot(capacity: u32) -> ActivitySchedule {
        ActivitySchedule::new(
            1,
            Activity {
                id: 1,
                name: "Kayak".to_string(),
                location: "Harbour".to_string(),
                category: Category::Outdoor,
                capacity: 20,
                description: "Two hours on the water".to_string(),
                price: 40.0,
            },
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            capacity,
        )
    }

    #[test]
    fn reserve_and_release_keep_bounds() {
        let mut schedule = slot(15);
        schedule.reserve(5).unwrap();
        assert_eq!(schedule.available_capacity, 10);

        schedule.release(20);
        assert_eq!(schedule.available_capacity, 15);
    }

    #[test]
    fn reserve_rejects_zero_and_overbooking() {
        let mut schedule = slot(3);
        assert_eq!(schedule.reserve(0), Err(CapacityError::InvalidPartySize));
        assert_eq!(
            schedule.reserve(4),
            Err(CapacityError::Insufficient {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(schedule.available_capacity, 3);
    }
}
