use chrono::NaiveDate;
use icalendar::{Calendar, Component, Event, EventLike};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::EventRecord;

#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("event {title:?} has date {date:?}, expected YYYY-MM-DD")]
    InvalidDate { title: String, date: String },
}

/// Event-list-to-document capability.
pub trait CalendarEncoder: Send + Sync {
    fn encode(&self, records: &[EventRecord]) -> Result<String, EncodeError>;
}

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex compiles"));

#[derive(Clone, Default)]
pub struct ICalExporter;

impl ICalExporter {
    pub fn new() -> Self {
        Self
    }

    fn decompose_date(record: &EventRecord) -> Result<NaiveDate, EncodeError> {
        let invalid = || EncodeError::InvalidDate {
            title: record.title.clone(),
            date: record.date.clone(),
        };
        if !DATE_RE.is_match(&record.date) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|_| invalid())
    }
}

impl CalendarEncoder for ICalExporter {
    fn encode(&self, records: &[EventRecord]) -> Result<String, EncodeError> {
        let mut calendar = Calendar::new();
        calendar.name("Aggregated Events");

        for record in records {
            let date = Self::decompose_date(record)?;

            let mut event = Event::new();
            event.summary(&record.title);
            // A bare NaiveDate start encodes as an all-day DTSTART.
            event.starts(date);
            // Absent optionals are encoded as empty strings, never omitted.
            event.location(record.location.as_deref().unwrap_or(""));
            event.description(record.description.as_deref().unwrap_or(""));
            event.add_property("URL", record.url.as_deref().unwrap_or(""));
            event.uid(&format!(
                "{}-{}-event-aggregator",
                record.date,
                record.title.replace(' ', "-")
            ));
            calendar.push(event);
        }

        Ok(calendar.to_string())
    }
}
