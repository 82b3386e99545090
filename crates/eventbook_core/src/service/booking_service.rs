//! Seat accounting on top of the repositories.
//!
//! # Responsibility
//! - Place and cancel bookings and reservations while keeping the stored
//!   schedule's `available_capacity` in step.
//!
//! # Invariants
//! - The schedule is always read fresh from its repository and written back
//!   with an explicit `update`; values held by callers are never trusted.
//! - When storing the seat-holding record fails, the seats are returned with
//!   a compensating `update` and the original error is reported.
//! - Nothing here is atomic across repositories.

use crate::model::booking::{Booking, HoldsSeats, Reservation};
use crate::model::schedule::{ActivitySchedule, CapacityError};
use crate::model::EntityId;
use crate::repo::{RepoError, Repository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, BookingServiceError>;

#[derive(Debug)]
pub enum BookingServiceError {
    Repo(RepoError),
    Capacity(CapacityError),
}

impl Display for BookingServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Capacity(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookingServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Capacity(err) => Some(err),
        }
    }
}

impl From<RepoError> for BookingServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CapacityError> for BookingServiceError {
    fn from(value: CapacityError) -> Self {
        Self::Capacity(value)
    }
}

/// Booking use cases over borrowed repositories of any backend.
pub struct BookingService<'a> {
    schedules: &'a dyn Repository<ActivitySchedule>,
    bookings: &'a dyn Repository<Booking>,
    reservations: &'a dyn Repository<Reservation>,
}

impl<'a> BookingService<'a> {
    pub fn new(
        schedules: &'a dyn Repository<ActivitySchedule>,
        bookings: &'a dyn Repository<Booking>,
        reservations: &'a dyn Repository<Reservation>,
    ) -> Self {
        Self {
            schedules,
            bookings,
            reservations,
        }
    }

    /// Seats currently free on the stored schedule.
    pub fn available_seats(&self, schedule_id: EntityId) -> ServiceResult<u32> {
        Ok(self.schedules.read(schedule_id)?.available_capacity)
    }

    /// Takes seats for `booking` and stores it.
    ///
    /// Returns the stored booking, which embeds the updated schedule.
    pub fn place_booking(&self, booking: &Booking) -> ServiceResult<Booking> {
        self.place(self.bookings, booking)
    }

    /// Deletes the booking and gives its seats back.
    pub fn cancel_booking(&self, id: EntityId) -> ServiceResult<Booking> {
        self.cancel(self.bookings, id)
    }

    pub fn place_reservation(&self, reservation: &Reservation) -> ServiceResult<Reservation> {
        self.place(self.reservations, reservation)
    }

    pub fn cancel_reservation(&self, id: EntityId) -> ServiceResult<Reservation> {
        self.cancel(self.reservations, id)
    }

    fn place<T: HoldsSeats + Clone>(
        &self,
        records: &dyn Repository<T>,
        record: &T,
    ) -> ServiceResult<T> {
        let schedule_id = record.schedule().id;
        let people = record.party_size();

        let mut schedule = self.schedules.read(schedule_id)?;
        schedule.reserve(people)?;
        self.schedules.update(&schedule)?;

        let available = schedule.available_capacity;
        let mut stored = record.clone();
        stored.set_schedule(schedule);

        if let Err(err) = records.create(&stored) {
            if let Err(restore_err) = self.release_seats(schedule_id, people) {
                warn!(
                    "event=seat_restore module=service status=error entity={} schedule_id={schedule_id} people={people} error={restore_err}",
                    T::ENTITY
                );
            }
            return Err(err.into());
        }

        info!(
            "event=seat_take module=service status=ok entity={} id={} schedule_id={schedule_id} people={people} available={available}",
            T::ENTITY,
            stored.id()
        );
        Ok(stored)
    }

    fn cancel<T: HoldsSeats>(&self, records: &dyn Repository<T>, id: EntityId) -> ServiceResult<T> {
        let record = records.read(id)?;
        records.delete(id)?;

        let schedule_id = record.schedule().id;
        let people = record.party_size();
        let available = self.release_seats(schedule_id, people)?;

        info!(
            "event=seat_release module=service status=ok entity={} id={id} schedule_id={schedule_id} people={people} available={available}",
            T::ENTITY
        );
        Ok(record)
    }

    fn release_seats(&self, schedule_id: EntityId, people: u32) -> Result<u32, RepoError> {
        let mut schedule = self.schedules.read(schedule_id)?;
        schedule.release(people);
        self.schedules.update(&schedule)?;
        Ok(schedule.available_capacity)
    }
}
