use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{AppState, error::ApiError, models::EventRecord};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessEventsRequest {
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    /// Newline-delimited list of event page URLs.
    #[schema(example = "https://a.example\nhttps://b.example")]
    pub urls: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessEventsResponse {
    pub events: Vec<EventRecord>,
    #[serde(rename = "icsUrl")]
    #[schema(example = "http://localhost:3001/events.ics")]
    pub ics_url: String,
}

#[utoipa::path(get, path = "/", tag = "events")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Event Aggregator API",
        "endpoints": {
            "/processEvents": "POST an email and newline-delimited URLs to build a calendar",
            "/events.ics": "Download the most recently generated calendar"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "events")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "events")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    post,
    path = "/processEvents",
    request_body = ProcessEventsRequest,
    responses(
        (status = 200, description = "Aggregated events and calendar link", body = ProcessEventsResponse),
        (status = 400, description = "Missing email or urls"),
        (status = 500, description = "A page could not be fetched, extracted, or encoded")
    ),
    tag = "events"
)]
pub async fn process_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProcessEventsRequest>,
) -> Result<Json<ProcessEventsResponse>, ApiError> {
    let base_url = request_base(&headers, state.settings.port);

    let outcome = state
        .pipeline
        .process(request.email.as_deref(), request.urls.as_deref(), &base_url)
        .await?;

    Ok(Json(ProcessEventsResponse {
        events: outcome.events,
        ics_url: outcome.ics_url,
    }))
}

/// Absolute base of the current request, honoring reverse-proxy headers.
fn request_base(headers: &HeaderMap, port: u16) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{port}"));
    format!("{scheme}://{host}")
}
