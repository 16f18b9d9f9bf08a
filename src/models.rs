use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw shape returned by the extraction model, before validation.
/// Non-string values fail deserialization rather than being coerced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventCandidate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct EventRecord {
    #[schema(example = "Science Fair")]
    pub title: String,
    /// Calendar day in `YYYY-MM-DD` form; no time-of-day, no timezone.
    #[schema(format = "date", example = "2025-03-15")]
    pub date: String,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Source page of the event. Filled with the submitted URL when the
    /// extractor does not return one.
    pub url: Option<String>,
}
