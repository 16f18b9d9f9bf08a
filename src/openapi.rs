use utoipa::OpenApi;

use crate::handlers::{ProcessEventsRequest, ProcessEventsResponse};
use crate::models::EventRecord;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::process_events
    ),
    components(schemas(EventRecord, ProcessEventsRequest, ProcessEventsResponse)),
    tags(
        (name = "events", description = "Event aggregation operations")
    )
)]
pub struct ApiDoc;
