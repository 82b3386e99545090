//! `SqlEntity` mappings for every stored entity.

use super::sql::{date, enum_column, int, load_reference, real, text, time, SqlEntity};
use super::variant::registry;
use crate::model::booking::{Booking, Reservation};
use crate::model::catalog::{Activity, Category, Event, FreeActivity, ReviewableEntity};
use crate::model::feedback::{Review, Ticket, Wishlist};
use crate::model::schedule::ActivitySchedule;
use crate::model::user::{User, UserRole};
use crate::model::{EntityId, Identifiable};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};

impl SqlEntity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["username", "email", "role"];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            text(&self.username),
            text(&self.email),
            text(self.role.as_str()),
        ])
    }

    fn from_row(_conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            role: enum_column(row, "role", UserRole::parse)?,
        })
    }
}

impl SqlEntity for Activity {
    const TABLE: &'static str = "activities";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "location",
        "category",
        "capacity",
        "description",
        "price",
    ];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.location),
            text(self.category.as_str()),
            int(self.capacity),
            text(&self.description),
            real(self.price),
        ])
    }

    fn from_row(_conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            location: row.get("location")?,
            category: enum_column(row, "category", Category::parse)?,
            capacity: row.get("capacity")?,
            description: row.get("description")?,
            price: row.get("price")?,
        })
    }
}

impl SqlEntity for Event {
    const TABLE: &'static str = "events";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "location",
        "category",
        "capacity",
        "current_size",
        "start_date",
        "end_date",
        "price",
    ];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.location),
            text(self.category.as_str()),
            int(self.capacity),
            int(self.current_size),
            date(self.start_date),
            date(self.end_date),
            real(self.price),
        ])
    }

    fn from_row(_conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            location: row.get("location")?,
            category: enum_column(row, "category", Category::parse)?,
            capacity: row.get("capacity")?,
            current_size: row.get("current_size")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            price: row.get("price")?,
        })
    }
}

impl SqlEntity for FreeActivity {
    const TABLE: &'static str = "free_activities";
    const COLUMNS: &'static [&'static str] = &["name", "location", "category", "program"];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.location),
            text(self.category.as_str()),
            text(&self.program),
        ])
    }

    fn from_row(_conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            location: row.get("location")?,
            category: enum_column(row, "category", Category::parse)?,
            program: row.get("program")?,
        })
    }
}

impl SqlEntity for ActivitySchedule {
    const TABLE: &'static str = "activity_schedules";
    const COLUMNS: &'static [&'static str] = &[
        "activity_id",
        "date",
        "start_time",
        "capacity",
        "available_capacity",
    ];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            int(self.activity.id),
            date(self.date),
            time(self.start_time),
            int(self.capacity),
            int(self.available_capacity),
        ])
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let activity_id: EntityId = row.get("activity_id")?;
        Ok(Self {
            id: row.get("id")?,
            activity: load_reference(conn, activity_id, Self::ENTITY)?,
            date: row.get("date")?,
            start_time: row.get("start_time")?,
            capacity: row.get("capacity")?,
            available_capacity: row.get("available_capacity")?,
        })
    }
}

impl SqlEntity for Booking {
    const TABLE: &'static str = "bookings";
    const COLUMNS: &'static [&'static str] = &["schedule_id", "number_of_people", "booked_on"];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            int(self.schedule.id),
            int(self.number_of_people),
            date(self.booked_on),
        ])
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let schedule_id: EntityId = row.get("schedule_id")?;
        Ok(Self {
            id: row.get("id")?,
            schedule: load_reference(conn, schedule_id, Self::ENTITY)?,
            number_of_people: row.get("number_of_people")?,
            booked_on: row.get("booked_on")?,
        })
    }
}

impl SqlEntity for Reservation {
    const TABLE: &'static str = "reservations";
    const COLUMNS: &'static [&'static str] = &["user_id", "schedule_id", "number_of_people"];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            int(self.user.id),
            int(self.schedule.id),
            int(self.number_of_people),
        ])
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let user_id: EntityId = row.get("user_id")?;
        let schedule_id: EntityId = row.get("schedule_id")?;
        Ok(Self {
            id: row.get("id")?,
            user: load_reference(conn, user_id, Self::ENTITY)?,
            schedule: load_reference(conn, schedule_id, Self::ENTITY)?,
            number_of_people: row.get("number_of_people")?,
        })
    }
}

impl SqlEntity for Ticket {
    const TABLE: &'static str = "tickets";
    const COLUMNS: &'static [&'static str] = &["owner_id", "event_tag", "event_id", "price"];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        let (tag, id) = registry().sql_key(&self.event)?;
        Ok(vec![int(self.owner.id), text(tag), int(id), real(self.price)])
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let owner_id: EntityId = row.get("owner_id")?;
        Ok(Self {
            id: row.get("id")?,
            owner: load_reference(conn, owner_id, Self::ENTITY)?,
            event: load_variant(conn, row, "event_tag", "event_id")?,
            price: row.get("price")?,
        })
    }
}

impl SqlEntity for Review {
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "reviewable_tag",
        "reviewable_id",
        "rating",
        "comment",
    ];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        let (tag, id) = registry().sql_key(&self.reviewable)?;
        Ok(vec![
            int(self.user.id),
            text(tag),
            int(id),
            int(self.rating),
            text(&self.comment),
        ])
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let user_id: EntityId = row.get("user_id")?;
        Ok(Self {
            id: row.get("id")?,
            user: load_reference(conn, user_id, Self::ENTITY)?,
            reviewable: load_variant(conn, row, "reviewable_tag", "reviewable_id")?,
            rating: row.get("rating")?,
            comment: row.get("comment")?,
        })
    }
}

impl SqlEntity for Wishlist {
    const TABLE: &'static str = "wishlists";
    const COLUMNS: &'static [&'static str] = &["owner_id"];

    fn to_columns(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![int(self.owner.id)])
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let id: EntityId = row.get("id")?;
        let owner_id: EntityId = row.get("owner_id")?;
        Ok(Self {
            id,
            owner: load_reference(conn, owner_id, Self::ENTITY)?,
            items: load_wishlist_items(conn, id)?,
        })
    }

    fn write_children(&self, conn: &Connection) -> RepoResult<()> {
        let mut stmt = conn.prepare(
            "INSERT INTO wishlist_items (wishlist_id, position, item_tag, item_id)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (position, item) in self.items.iter().enumerate() {
            let (tag, item_id) = registry().sql_key(item)?;
            stmt.execute(params![self.id, position as i64, tag, item_id])?;
        }
        Ok(())
    }

    fn delete_children(conn: &Connection, id: EntityId) -> RepoResult<()> {
        conn.execute(
            "DELETE FROM wishlist_items WHERE wishlist_id = ?1",
            params![id],
        )?;
        Ok(())
    }
}

fn load_variant(
    conn: &Connection,
    row: &Row<'_>,
    tag_column: &str,
    id_column: &str,
) -> RepoResult<ReviewableEntity> {
    let tag: String = row.get(tag_column)?;
    let id: EntityId = row.get(id_column)?;
    registry().load_sql(conn, &tag, id)
}

fn load_wishlist_items(conn: &Connection, wishlist_id: EntityId) -> RepoResult<Vec<ReviewableEntity>> {
    let mut stmt = conn.prepare(
        "SELECT item_tag, item_id FROM wishlist_items
         WHERE wishlist_id = ?1
         ORDER BY position ASC",
    )?;
    let mut rows = stmt.query(params![wishlist_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(load_variant(conn, row, "item_tag", "item_id")?);
    }
    Ok(items)
}
