//! Seat-holding records: anonymous bookings and user reservations.

use super::schedule::ActivitySchedule;
use super::user::User;
use super::{EntityId, Identifiable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: EntityId,
    pub schedule: ActivitySchedule,
    pub number_of_people: u32,
    pub booked_on: NaiveDate,
}

impl Identifiable for Booking {
    const ENTITY: &'static str = "booking";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: EntityId,
    pub user: User,
    pub schedule: ActivitySchedule,
    pub number_of_people: u32,
}

impl Identifiable for Reservation {
    const ENTITY: &'static str = "reservation";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Records that occupy seats on one schedule slot.
pub trait HoldsSeats: Identifiable {
    fn schedule(&self) -> &ActivitySchedule;
    fn set_schedule(&mut self, schedule: ActivitySchedule);
    fn party_size(&self) -> u32;
}

impl HoldsSeats for Booking {
    fn schedule(&self) -> &ActivitySchedule {
        &self.schedule
    }

    fn set_schedule(&mut self, schedule: ActivitySchedule) {
        self.schedule = schedule;
    }

    fn party_size(&self) -> u32 {
        self.number_of_people
    }
}

impl HoldsSeats for Reservation {
    fn schedule(&self) -> &ActivitySchedule {
        &self.schedule
    }

    fn set_schedule(&mut self, schedule: ActivitySchedule) {
        self.schedule = schedule;
    }

    fn party_size(&self) -> u32 {
        self.number_of_people
    }
}
