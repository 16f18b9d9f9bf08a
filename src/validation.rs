use thiserror::Error;

use crate::models::{EventCandidate, EventRecord};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Promotes an extraction candidate to a usable record. `title` and `date`
/// must be present and non-empty; everything else passes through untouched.
/// Also the gate for externally supplied event payloads before rendering.
pub fn validate_candidate(candidate: EventCandidate) -> Result<EventRecord, ValidationError> {
    let EventCandidate {
        title,
        date,
        location,
        description,
        url,
    } = candidate;

    let title = title.filter(|value| !value.trim().is_empty());
    let date = date.filter(|value| !value.trim().is_empty());

    match (title, date) {
        (Some(title), Some(date)) => Ok(EventRecord {
            title,
            date,
            location,
            description,
            url,
        }),
        (title, date) => {
            let mut missing = Vec::new();
            if title.is_none() {
                missing.push("title");
            }
            if date.is_none() {
                missing.push("date");
            }
            Err(ValidationError::MissingFields(missing))
        }
    }
}
