mod common;

use common::{
    activity, all_backends, booking, mixed_wishlist, reservation, schedule, seed_references, user,
};
use eventbook_core::{
    ActivitySchedule, BackendKind, Booking, BookingService, RepoError, Repository, Reservation,
    Storage, StorageConfig, User, UserRole, Wishlist,
};
use std::thread;

#[test]
fn duplicate_create_is_rejected_and_keeps_the_original() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        let users = storage.repository::<User>().unwrap();
        users.create(&user(1)).unwrap();

        let mut clash = user(1);
        clash.username = "impostor".to_string();
        let err = users.create(&clash).unwrap_err();

        assert!(
            matches!(err, RepoError::AlreadyExists { entity: "user", id: 1 }),
            "{}: {err}",
            storage.kind()
        );
        assert_eq!(users.read(1).unwrap(), user(1), "{}", storage.kind());
        assert_eq!(users.count().unwrap(), 1, "{}", storage.kind());
    }
}

#[test]
fn absent_ids_are_not_found_for_read_update_and_delete() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        let users = storage.repository::<User>().unwrap();
        users.create(&user(1)).unwrap();

        for err in [
            users.read(42).unwrap_err(),
            users.update(&user(42)).unwrap_err(),
            users.delete(42).unwrap_err(),
        ] {
            assert!(
                matches!(err, RepoError::NotFound { entity: "user", id: 42 }),
                "{}: {err}",
                storage.kind()
            );
        }
        assert!(!users.exists(42).unwrap());
        assert_eq!(users.count().unwrap(), 1);
    }
}

#[test]
fn update_replaces_every_field() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        let users = storage.repository::<User>().unwrap();
        users.create(&user(1)).unwrap();

        let replacement = User {
            id: 1,
            username: "renamed".to_string(),
            email: "new@example.com".to_string(),
            role: UserRole::Organizer,
        };
        users.update(&replacement).unwrap();

        assert_eq!(users.read(1).unwrap(), replacement, "{}", storage.kind());
    }
}

#[test]
fn find_all_after_delete_returns_exactly_the_rest() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        let users = storage.repository::<User>().unwrap();
        for id in 1..=3 {
            users.create(&user(id)).unwrap();
        }
        users.delete(2).unwrap();

        let ids: Vec<i64> = users.find_all().unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3], "{}", storage.kind());

        for err in [
            users.read(2).unwrap_err(),
            users.update(&user(2)).unwrap_err(),
            users.delete(2).unwrap_err(),
        ] {
            assert!(
                matches!(err, RepoError::NotFound { entity: "user", id: 2 }),
                "{}: {err}",
                storage.kind()
            );
        }
    }
}

#[test]
fn file_storage_handles_on_other_threads_lose_no_writes() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(BackendKind::File, dir.path());

    thread::scope(|scope| {
        for worker in 0..8_i64 {
            let config = &config;
            scope.spawn(move || {
                let storage = Storage::open(config).unwrap();
                let users = storage.repository::<User>().unwrap();
                for n in 0..25 {
                    users.create(&user(worker * 100 + n)).unwrap();
                }
            });
        }
    });

    let storage = Storage::open(&config).unwrap();
    assert_eq!(storage.repository::<User>().unwrap().count().unwrap(), 200);
}

#[test]
fn retrieved_values_are_detached_until_update() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        seed_references(storage);
        let schedules = storage.repository::<ActivitySchedule>().unwrap();

        let mut loaded = schedules.read(1).unwrap();
        loaded.reserve(4).unwrap();
        assert_eq!(
            schedules.read(1).unwrap().available_capacity,
            15,
            "{}",
            storage.kind()
        );

        schedules.update(&loaded).unwrap();
        assert_eq!(schedules.read(1).unwrap().available_capacity, 11);
    }
}

#[test]
fn wishlist_keeps_every_variant_in_order() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        seed_references(storage);
        let wishlists = storage.repository::<Wishlist>().unwrap();

        let wishlist = mixed_wishlist(1, user(1));
        wishlists.create(&wishlist).unwrap();

        let loaded = wishlists.read(1).unwrap();
        assert_eq!(loaded, wishlist, "{}", storage.kind());
        let tags: Vec<&str> = loaded.items.iter().map(|item| item.tag()).collect();
        assert_eq!(tags, vec!["Activity", "Event", "FreeActivity"]);

        let mut trimmed = loaded;
        assert!(trimmed.remove_item("Event", 1));
        wishlists.update(&trimmed).unwrap();
        assert_eq!(wishlists.read(1).unwrap().items.len(), 2, "{}", storage.kind());
    }
}

#[test]
fn booking_scenario_takes_and_returns_seats() {
    let (_dir, backends) = all_backends();
    for storage in &backends {
        seed_references(storage);
        let schedules = storage.repository::<ActivitySchedule>().unwrap();
        let bookings = storage.repository::<Booking>().unwrap();
        let reservations = storage.repository::<Reservation>().unwrap();
        let service = BookingService::new(&*schedules, &*bookings, &*reservations);

        assert_eq!(schedules.read(1).unwrap().activity.capacity, 20);
        assert_eq!(service.available_seats(1).unwrap(), 15);

        service
            .place_booking(&booking(1, schedule(1, activity(1)), 5))
            .unwrap();
        assert_eq!(
            schedules.read(1).unwrap().available_capacity,
            10,
            "{}",
            storage.kind()
        );
        assert_eq!(
            bookings.read(1).unwrap().schedule.available_capacity,
            10,
            "{}",
            storage.kind()
        );

        service
            .place_reservation(&reservation(1, user(1), schedule(1, activity(1))))
            .unwrap();
        assert_eq!(service.available_seats(1).unwrap(), 8);

        service.cancel_booking(1).unwrap();
        service.cancel_reservation(1).unwrap();
        assert_eq!(
            schedules.read(1).unwrap().available_capacity,
            15,
            "{}",
            storage.kind()
        );
        assert!(bookings.find_all().unwrap().is_empty());
    }
}
