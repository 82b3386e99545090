//! `TextCodec` mappings for every stored entity.
//!
//! Field order below is the on-disk column order; changing it breaks
//! existing data files.

use super::text::{RecordReader, RecordWriter, TextCodec};
use crate::model::booking::{Booking, Reservation};
use crate::model::catalog::{Activity, Category, Event, FreeActivity};
use crate::model::feedback::{Review, Ticket, Wishlist};
use crate::model::schedule::ActivitySchedule;
use crate::model::user::{User, UserRole};
use crate::model::Identifiable;
use crate::repo::RepoResult;

impl TextCodec for User {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .text(&self.username)
            .text(&self.email)
            .text(self.role.as_str());
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 4)?;
        Ok(Self {
            id: fields.number("id")?,
            username: fields.text()?,
            email: fields.text()?,
            role: fields.enumeration("role", UserRole::parse)?,
        })
    }
}

impl TextCodec for Activity {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .text(&self.name)
            .text(&self.location)
            .text(self.category.as_str())
            .int(self.capacity)
            .text(&self.description)
            .float(self.price);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 7)?;
        Ok(Self {
            id: fields.number("id")?,
            name: fields.text()?,
            location: fields.text()?,
            category: fields.enumeration("category", Category::parse)?,
            capacity: fields.number("capacity")?,
            description: fields.text()?,
            price: fields.number("price")?,
        })
    }
}

impl TextCodec for Event {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .text(&self.name)
            .text(&self.location)
            .text(self.category.as_str())
            .int(self.capacity)
            .int(self.current_size)
            .date(self.start_date)
            .date(self.end_date)
            .float(self.price);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 9)?;
        Ok(Self {
            id: fields.number("id")?,
            name: fields.text()?,
            location: fields.text()?,
            category: fields.enumeration("category", Category::parse)?,
            capacity: fields.number("capacity")?,
            current_size: fields.number("current_size")?,
            start_date: fields.date("start_date")?,
            end_date: fields.date("end_date")?,
            price: fields.number("price")?,
        })
    }
}

impl TextCodec for FreeActivity {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .text(&self.name)
            .text(&self.location)
            .text(self.category.as_str())
            .text(&self.program);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 5)?;
        Ok(Self {
            id: fields.number("id")?,
            name: fields.text()?,
            location: fields.text()?,
            category: fields.enumeration("category", Category::parse)?,
            program: fields.text()?,
        })
    }
}

impl TextCodec for ActivitySchedule {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .nested(&self.activity)?
            .date(self.date)
            .time(self.start_time)
            .int(self.capacity)
            .int(self.available_capacity);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 6)?;
        Ok(Self {
            id: fields.number("id")?,
            activity: fields.nested()?,
            date: fields.date("date")?,
            start_time: fields.time("start_time")?,
            capacity: fields.number("capacity")?,
            available_capacity: fields.number("available_capacity")?,
        })
    }
}

impl TextCodec for Booking {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .nested(&self.schedule)?
            .int(self.number_of_people)
            .date(self.booked_on);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 4)?;
        Ok(Self {
            id: fields.number("id")?,
            schedule: fields.nested()?,
            number_of_people: fields.number("number_of_people")?,
            booked_on: fields.date("booked_on")?,
        })
    }
}

impl TextCodec for Reservation {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .nested(&self.user)?
            .nested(&self.schedule)?
            .int(self.number_of_people);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 4)?;
        Ok(Self {
            id: fields.number("id")?,
            user: fields.nested()?,
            schedule: fields.nested()?,
            number_of_people: fields.number("number_of_people")?,
        })
    }
}

impl TextCodec for Ticket {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .nested(&self.owner)?
            .variant(&self.event)?
            .float(self.price);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 4)?;
        Ok(Self {
            id: fields.number("id")?,
            owner: fields.nested()?,
            event: fields.variant()?,
            price: fields.number("price")?,
        })
    }
}

impl TextCodec for Review {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .nested(&self.user)?
            .variant(&self.reviewable)?
            .int(self.rating)
            .text(&self.comment);
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 5)?;
        Ok(Self {
            id: fields.number("id")?,
            user: fields.nested()?,
            reviewable: fields.variant()?,
            rating: fields.number("rating")?,
            comment: fields.text()?,
        })
    }
}

impl TextCodec for Wishlist {
    fn encode_text(&self) -> RepoResult<String> {
        let mut out = RecordWriter::new();
        out.int(self.id)
            .nested(&self.owner)?
            .variants(&self.items)?;
        Ok(out.finish())
    }

    fn decode_text(record: &str) -> RepoResult<Self> {
        let mut fields = RecordReader::new(Self::ENTITY, record, 3)?;
        Ok(Self {
            id: fields.number("id")?,
            owner: fields.nested()?,
            items: fields.variants()?,
        })
    }
}
