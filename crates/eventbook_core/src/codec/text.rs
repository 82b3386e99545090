//! Line-oriented record codec.
//!
//! A record is a list of fields joined by `,`. Inside a field, `\` escapes
//! `\`, `,`, newline (`\n`) and carriage return (`\r`), so an encoded record
//! never contains a raw line break.
//!
//! A nested entity is written as ONE field holding its full escaped record.
//! Splitting an outer record therefore never cuts into an inner one, at any
//! depth. A polymorphic value is a nested field whose content is
//! `<tag>,<variant fields...>`.

use super::variant::registry;
use super::{DATE_FORMAT, TIME_FORMAT};
use crate::model::catalog::ReviewableEntity;
use crate::repo::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

pub const FIELD_SEPARATOR: char = ',';
const ESCAPE: char = '\\';

/// Text codec for one entity type; one record per line.
pub trait TextCodec: Sized {
    fn encode_text(&self) -> RepoResult<String>;
    fn decode_text(record: &str) -> RepoResult<Self>;
}

/// Builds one record field by field.
#[derive(Debug, Default)]
pub struct RecordWriter {
    out: String,
    fields: usize,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, value: &str) -> &mut Self {
        if self.fields > 0 {
            self.out.push(FIELD_SEPARATOR);
        }
        escape_into(&mut self.out, value);
        self.fields += 1;
        self
    }

    pub fn int(&mut self, value: impl Into<i64>) -> &mut Self {
        self.text(&value.into().to_string())
    }

    pub fn float(&mut self, value: f64) -> &mut Self {
        self.text(&value.to_string())
    }

    pub fn date(&mut self, value: NaiveDate) -> &mut Self {
        self.text(&value.format(DATE_FORMAT).to_string())
    }

    pub fn time(&mut self, value: NaiveTime) -> &mut Self {
        self.text(&value.format(TIME_FORMAT).to_string())
    }

    /// Embeds the full record of a referenced entity as one field.
    pub fn nested<T: TextCodec>(&mut self, value: &T) -> RepoResult<&mut Self> {
        let encoded = value.encode_text()?;
        Ok(self.text(&encoded))
    }

    pub fn variant(&mut self, item: &ReviewableEntity) -> RepoResult<&mut Self> {
        let encoded = registry().encode_text(item)?;
        Ok(self.text(&encoded))
    }

    /// Embeds a list of polymorphic values as one field.
    pub fn variants(&mut self, items: &[ReviewableEntity]) -> RepoResult<&mut Self> {
        let mut inner = RecordWriter::new();
        for item in items {
            inner.variant(item)?;
        }
        Ok(self.text(&inner.finish()))
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Reads the fields of one record in order.
#[derive(Debug)]
pub struct RecordReader {
    entity: &'static str,
    fields: Vec<String>,
    cursor: usize,
}

impl RecordReader {
    /// Splits `record` and checks it has exactly `expected` fields.
    pub fn new(entity: &'static str, record: &str, expected: usize) -> RepoResult<Self> {
        let fields = split_fields(record)?;
        if fields.len() != expected {
            return Err(RepoError::malformed(format!(
                "{entity} record has {} fields, expected {expected}",
                fields.len()
            )));
        }
        Ok(Self {
            entity,
            fields,
            cursor: 0,
        })
    }

    pub fn text(&mut self) -> RepoResult<String> {
        let index = self.cursor;
        let entity = self.entity;
        let field = self.fields.get_mut(index).ok_or_else(|| {
            RepoError::malformed(format!("{entity} record is missing field #{index}"))
        })?;
        self.cursor += 1;
        Ok(std::mem::take(field))
    }

    /// Parses the next field as any `FromStr` scalar (integers, floats).
    pub fn number<N: FromStr>(&mut self, label: &str) -> RepoResult<N> {
        let raw = self.text()?;
        raw.parse::<N>()
            .map_err(|_| self.invalid(label, &raw, "a number"))
    }

    pub fn date(&mut self, label: &str) -> RepoResult<NaiveDate> {
        let raw = self.text()?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|_| self.invalid(label, &raw, "a YYYY-MM-DD date"))
    }

    pub fn time(&mut self, label: &str) -> RepoResult<NaiveTime> {
        let raw = self.text()?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT)
            .map_err(|_| self.invalid(label, &raw, "an HH:MM:SS time"))
    }

    pub fn enumeration<E>(&mut self, label: &str, parse: fn(&str) -> Option<E>) -> RepoResult<E> {
        let raw = self.text()?;
        parse(&raw).ok_or_else(|| self.invalid(label, &raw, "a known value"))
    }

    pub fn nested<T: TextCodec>(&mut self) -> RepoResult<T> {
        let raw = self.text()?;
        T::decode_text(&raw)
    }

    pub fn variant(&mut self) -> RepoResult<ReviewableEntity> {
        let raw = self.text()?;
        registry().decode_text(&raw)
    }

    pub fn variants(&mut self) -> RepoResult<Vec<ReviewableEntity>> {
        let raw = self.text()?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        split_fields(&raw)?
            .iter()
            .map(|item| registry().decode_text(item))
            .collect()
    }

    fn invalid(&self, label: &str, raw: &str, expected: &str) -> RepoError {
        RepoError::malformed(format!(
            "{} field #{} ({label}) is not {expected}: `{raw}`",
            self.entity,
            self.cursor.saturating_sub(1)
        ))
    }
}

fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            FIELD_SEPARATOR => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

/// Splits one record into unescaped fields.
pub fn split_fields(record: &str) -> RepoResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = record.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(escaped @ (ESCAPE | FIELD_SEPARATOR)) => current.push(escaped),
                Some(other) => {
                    return Err(RepoError::malformed(format!(
                        "unknown escape sequence `\\{other}`"
                    )));
                }
                None => return Err(RepoError::malformed("record ends with a dangling escape")),
            },
            FIELD_SEPARATOR => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::{split_fields, RecordReader, RecordWriter};
    use crate::repo::RepoError;

    #[test]
    fn escaped_fields_survive_splitting() {
        let mut writer = RecordWriter::new();
        writer
            .text("plain")
            .text("a,b")
            .text("back\\slash")
            .text("two\nlines\r");
        let record = writer.finish();
        assert!(!record.contains('\n'));

        let fields = split_fields(&record).unwrap();
        assert_eq!(fields, vec!["plain", "a,b", "back\\slash", "two\nlines\r"]);
    }

    #[test]
    fn nested_records_stay_one_field_at_any_depth() {
        let mut inner = RecordWriter::new();
        inner.int(1).text("x,y");
        let inner = inner.finish();

        let mut middle = RecordWriter::new();
        middle.text(&inner).text("z");
        let middle = middle.finish();

        let mut outer = RecordWriter::new();
        outer.int(9).text(&middle);
        let outer = outer.finish();

        let top = split_fields(&outer).unwrap();
        assert_eq!(top.len(), 2);
        let second = split_fields(&top[1]).unwrap();
        assert_eq!(second, vec![inner.clone(), "z".to_string()]);
        assert_eq!(split_fields(&second[0]).unwrap(), vec!["1", "x,y"]);
    }

    #[test]
    fn reader_rejects_wrong_field_count() {
        let err = RecordReader::new("user", "1,ana", 4).unwrap_err();
        assert!(matches!(err, RepoError::MalformedRecord(ref m) if m.contains("2 fields")));
    }

    #[test]
    fn reader_reports_unparsable_scalars() {
        let mut reader = RecordReader::new("activity", "abc,2026-13-01", 2).unwrap();
        let err = reader.number::<u32>("capacity").unwrap_err();
        assert!(matches!(err, RepoError::MalformedRecord(ref m) if m.contains("capacity")));

        let err = reader.date("date").unwrap_err();
        assert!(matches!(err, RepoError::MalformedRecord(ref m) if m.contains("2026-13-01")));
    }

    #[test]
    fn dangling_or_unknown_escape_is_malformed() {
        assert!(matches!(
            split_fields("abc\\"),
            Err(RepoError::MalformedRecord(_))
        ));
        assert!(matches!(
            split_fields("a\\qb"),
            Err(RepoError::MalformedRecord(_))
        ));
    }
}
