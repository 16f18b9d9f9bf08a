pub mod error;
pub mod extract;
pub mod fetch;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod notify;
pub mod openapi;
pub mod pipeline;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use http::Method;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::extract::OpenAiExtractor;
use crate::fetch::HttpPageFetcher;
use crate::handlers::{healthz_live, healthz_ready, process_events, root};
use crate::ical::ICalExporter;
use crate::notify::SmtpNotifier;
use crate::openapi::ApiDoc;
use crate::pipeline::Pipeline;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub pipeline: Arc<Pipeline>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let pipeline = Pipeline::new(
        Arc::new(HttpPageFetcher::new(Duration::from_millis(
            settings.fetch_settle_ms,
        ))),
        Arc::new(OpenAiExtractor::new(
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
            settings.openai_model.clone(),
        )),
        Arc::new(ICalExporter::new()),
        Arc::new(SmtpNotifier::new(
            settings.smtp_host.clone(),
            settings.smtp_username.clone(),
            settings.smtp_password.clone(),
            settings.smtp_from.clone(),
        )),
        settings.public_dir.clone(),
    );

    let state = AppState {
        settings: settings.clone(),
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Event Aggregator API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    // The form frontend is served separately; let it reach the API.
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/processEvents", post(process_events))
        // Unmatched paths fall through to the public directory, which is
        // where the generated calendar lives.
        .fallback_service(ServeDir::new(&state.settings.public_dir))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(cors_layer).layer(trace_layer)
}
