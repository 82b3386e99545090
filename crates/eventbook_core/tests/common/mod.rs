#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use eventbook_core::{
    Activity, ActivitySchedule, BackendKind, Booking, Category, Event, FreeActivity, Repository,
    Reservation, Review, ReviewableEntity, Storage, StorageConfig, Ticket, User, UserRole,
    Wishlist,
};
use tempfile::TempDir;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn user(id: i64) -> User {
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        role: UserRole::Customer,
    }
}

pub fn activity(id: i64) -> Activity {
    Activity {
        id,
        name: "Kayak, sunset edition".to_string(),
        location: "Harbour \\ pier 2".to_string(),
        category: Category::Outdoor,
        capacity: 20,
        description: "Paddle out\nwatch the sun\r\ncome back".to_string(),
        price: 42.5,
    }
}

pub fn event(id: i64) -> Event {
    Event {
        id,
        name: "Jazz, blues & soul".to_string(),
        location: "Paradiso".to_string(),
        category: Category::Music,
        capacity: 300,
        current_size: 120,
        start_date: date(2026, 7, 1),
        end_date: date(2026, 7, 3),
        price: 35.0,
    }
}

pub fn free_activity(id: i64) -> FreeActivity {
    FreeActivity {
        id,
        name: "Old town walk".to_string(),
        location: "Town hall".to_string(),
        category: Category::Culture,
        program: "Cathedral, market,\nriver front".to_string(),
    }
}

pub fn schedule(id: i64, activity: Activity) -> ActivitySchedule {
    ActivitySchedule::new(
        id,
        activity,
        date(2026, 8, 2),
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        15,
    )
}

pub fn booking(id: i64, schedule: ActivitySchedule, people: u32) -> Booking {
    Booking {
        id,
        schedule,
        number_of_people: people,
        booked_on: date(2026, 7, 15),
    }
}

pub fn reservation(id: i64, user: User, schedule: ActivitySchedule) -> Reservation {
    Reservation {
        id,
        user,
        schedule,
        number_of_people: 2,
    }
}

pub fn ticket(id: i64, owner: User, event: Event) -> Ticket {
    Ticket {
        id,
        owner,
        event: event.into(),
        price: 35.0,
    }
}

pub fn review(id: i64, user: User, reviewable: ReviewableEntity) -> Review {
    Review {
        id,
        user,
        reviewable,
        rating: 4,
        comment: "Great, would go again.\nBring a jacket.".to_string(),
    }
}

/// Wishlist holding one item of every variant.
pub fn mixed_wishlist(id: i64, owner: User) -> Wishlist {
    let mut wishlist = Wishlist::new(id, owner);
    wishlist.add_item(activity(1).into());
    wishlist.add_item(event(1).into());
    wishlist.add_item(free_activity(1).into());
    wishlist
}

/// Stores the rows that the relational backend hydrates references from.
pub fn seed_references(storage: &Storage) {
    storage.repository::<User>().unwrap().create(&user(1)).unwrap();
    storage
        .repository::<Activity>()
        .unwrap()
        .create(&activity(1))
        .unwrap();
    storage.repository::<Event>().unwrap().create(&event(1)).unwrap();
    storage
        .repository::<FreeActivity>()
        .unwrap()
        .create(&free_activity(1))
        .unwrap();
    storage
        .repository::<ActivitySchedule>()
        .unwrap()
        .create(&schedule(1, activity(1)))
        .unwrap();
}

/// One storage per backend; the temp dir must outlive them.
pub fn all_backends() -> (TempDir, Vec<Storage>) {
    let dir = tempfile::tempdir().unwrap();
    let file = Storage::open(&StorageConfig::new(
        BackendKind::File,
        dir.path().join("file"),
    ))
    .unwrap();
    let sqlite = Storage::open(&StorageConfig::new(
        BackendKind::Sqlite,
        dir.path().join("sqlite"),
    ))
    .unwrap();
    (dir, vec![Storage::memory(), file, sqlite])
}
