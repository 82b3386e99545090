//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run the booking scenario against any backend to verify core wiring.
//! - Print seat availability after each step for quick local sanity checks.

use chrono::{Days, Local, NaiveTime};
use clap::Parser;
use eventbook_core::{
    default_log_level, init_logging, Activity, ActivitySchedule, BackendKind, Booking,
    BookingService, BookingServiceError, Category, EntityId, Event, FreeActivity, Identifiable,
    LoggingError, RepoError, Repository, Reservation, Storage, StorageConfig, User, UserRole,
    Wishlist,
};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs the booking scenario through the selected storage backend.
#[derive(Parser)]
#[command(name = "eventbook", version, about = "Event booking persistence smoke test")]
struct Cli {
    /// Storage backend: memory, file or sqlite.
    #[arg(long, default_value = "memory")]
    backend: BackendKind,

    /// Directory for data files (file and sqlite backends).
    #[arg(long, default_value = "eventbook-data")]
    data_dir: PathBuf,

    /// Absolute directory for rolling log files. Logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Repo(RepoError),
    Service(BookingServiceError),
    Fixture(&'static str),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging: {err}"),
            Self::Repo(err) => write!(f, "storage: {err}"),
            Self::Service(err) => write!(f, "booking: {err}"),
            Self::Fixture(message) => write!(f, "fixture: {message}"),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<BookingServiceError> for CliError {
    fn from(value: BookingServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let storage = Storage::open(&StorageConfig::new(cli.backend, &cli.data_dir))?;
    println!("eventbook backend={}", storage.kind());

    run_booking_scenario(&storage)?;
    run_wishlist_scenario(&storage)?;
    Ok(())
}

fn run_booking_scenario(storage: &Storage) -> Result<(), CliError> {
    let activities = storage.repository::<Activity>()?;
    let schedules = storage.repository::<ActivitySchedule>()?;
    let bookings = storage.repository::<Booking>()?;
    let reservations = storage.repository::<Reservation>()?;

    // Leftovers from a previous run of a persistent backend.
    reset(&*bookings, 1)?;
    reset(&*schedules, 1)?;
    reset(&*activities, 1)?;

    let today = Local::now().date_naive();
    let slot_date = today
        .checked_add_days(Days::new(7))
        .ok_or(CliError::Fixture("schedule date overflows"))?;
    let start_time =
        NaiveTime::from_hms_opt(10, 0, 0).ok_or(CliError::Fixture("invalid start time"))?;

    let activity = Activity {
        id: 1,
        name: "Guided kayak tour".to_string(),
        location: "North harbour".to_string(),
        category: Category::Outdoor,
        capacity: 20,
        description: "Two hours along the coast, gear included".to_string(),
        price: 45.0,
    };
    activities.create(&activity)?;
    let schedule = ActivitySchedule::new(1, activity, slot_date, start_time, 15);
    schedules.create(&schedule)?;

    let service = BookingService::new(&*schedules, &*bookings, &*reservations);
    println!("schedule#1 available={}", service.available_seats(1)?);

    let booking = Booking {
        id: 1,
        schedule,
        number_of_people: 5,
        booked_on: today,
    };
    service.place_booking(&booking)?;
    println!(
        "booking#1 people=5 schedule#1 available={}",
        service.available_seats(1)?
    );

    service.cancel_booking(1)?;
    println!(
        "booking#1 cancelled schedule#1 available={}",
        service.available_seats(1)?
    );
    Ok(())
}

fn run_wishlist_scenario(storage: &Storage) -> Result<(), CliError> {
    let users = storage.repository::<User>()?;
    let events = storage.repository::<Event>()?;
    let free_activities = storage.repository::<FreeActivity>()?;
    let activities = storage.repository::<Activity>()?;
    let wishlists = storage.repository::<Wishlist>()?;

    reset(&*wishlists, 1)?;
    reset(&*users, 1)?;
    reset(&*events, 1)?;
    reset(&*free_activities, 1)?;

    let today = Local::now().date_naive();
    let owner = User {
        id: 1,
        username: "demo".to_string(),
        email: "demo@example.com".to_string(),
        role: UserRole::Customer,
    };
    let event = Event {
        id: 1,
        name: "Harbour jazz night".to_string(),
        location: "Pier 3".to_string(),
        category: Category::Music,
        capacity: 300,
        current_size: 0,
        start_date: today,
        end_date: today,
        price: 30.0,
    };
    let walk = FreeActivity {
        id: 1,
        name: "Old town walk".to_string(),
        location: "Town hall".to_string(),
        category: Category::Culture,
        program: "Cathedral, market, river front".to_string(),
    };
    users.create(&owner)?;
    events.create(&event)?;
    free_activities.create(&walk)?;

    let mut wishlist = Wishlist::new(1, owner);
    wishlist.add_item(activities.read(1)?.into());
    wishlist.add_item(event.into());
    wishlist.add_item(walk.into());
    wishlists.create(&wishlist)?;

    let stored = wishlists.read(1)?;
    let tags: Vec<&str> = stored.items.iter().map(|item| item.tag()).collect();
    println!("wishlist#1 items={}", tags.join(","));
    Ok(())
}

fn reset<T: Identifiable>(repo: &dyn Repository<T>, id: EntityId) -> Result<(), RepoError> {
    match repo.delete(id) {
        Err(err) if err.is_not_found() => Ok(()),
        other => other,
    }
}
