use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::extract::{EventExtractor, ExtractionError};
use crate::fetch::{FetchError, PageFetcher};
use crate::ical::{CalendarEncoder, EncodeError};
use crate::models::EventRecord;
use crate::notify::Notifier;
use crate::validation::{ValidationError, validate_candidate};

/// Fixed artifact name; every request overwrites the same file.
pub const ICS_FILE_NAME: &str = "events.ics";

/// Cause of a single URL's processing failure.
#[derive(Debug, Error)]
pub enum UrlFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractionError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("failed to process {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: UrlFailure,
    },
    #[error("failed to encode calendar: {0}")]
    Encode(#[from] EncodeError),
    #[error("failed to persist calendar: {0}")]
    Persist(#[from] io::Error),
}

#[derive(Debug)]
pub struct ProcessOutcome {
    pub events: Vec<EventRecord>,
    pub ics_url: String,
}

/// Per-request orchestration: fetch and extract each URL in order, encode
/// the collected records, persist the artifact, then notify. Any fetch,
/// extraction, validation, or encode failure aborts the whole request
/// before anything is written; there are no partial results.
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn EventExtractor>,
    encoder: Arc<dyn CalendarEncoder>,
    notifier: Arc<dyn Notifier>,
    public_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn EventExtractor>,
        encoder: Arc<dyn CalendarEncoder>,
        notifier: Arc<dyn Notifier>,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            encoder,
            notifier,
            public_dir: public_dir.into(),
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.public_dir.join(ICS_FILE_NAME)
    }

    pub async fn process(
        &self,
        email: Option<&str>,
        raw_urls: Option<&str>,
        base_url: &str,
    ) -> Result<ProcessOutcome, PipelineError> {
        let (email, urls) = validate_input(email, raw_urls)?;

        let mut events = Vec::with_capacity(urls.len());
        for url in &urls {
            info!(%url, "processing URL");
            let record = self
                .process_url(url)
                .await
                .map_err(|source| PipelineError::Url {
                    url: url.clone(),
                    source,
                })?;
            events.push(record);
        }

        let document = self.encoder.encode(&events)?;

        tokio::fs::create_dir_all(&self.public_dir).await?;
        tokio::fs::write(self.artifact_path(), &document).await?;

        let ics_url = format!("{}/{}", base_url.trim_end_matches('/'), ICS_FILE_NAME);
        info!(%ics_url, events = events.len(), "calendar written");

        // Detached send: the response never waits on, or fails with, the
        // mail transport.
        let notifier = Arc::clone(&self.notifier);
        let recipient = email.to_string();
        let link = ics_url.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.notify(&recipient, &link).await {
                error!(error = %err, recipient = %recipient, "failed to send notification email");
            }
        });

        Ok(ProcessOutcome { events, ics_url })
    }

    async fn process_url(&self, url: &str) -> Result<EventRecord, UrlFailure> {
        let page_text = self.fetcher.fetch(url).await?;
        let candidate = self.extractor.extract(&page_text).await?;
        let mut record = validate_candidate(candidate)?;
        if record.url.is_none() {
            record.url = Some(url.to_string());
        }
        Ok(record)
    }
}

fn validate_input<'a>(
    email: Option<&'a str>,
    raw_urls: Option<&'a str>,
) -> Result<(&'a str, Vec<String>), PipelineError> {
    let missing = || PipelineError::InvalidRequest("missing email or urls in request body".into());

    let email = email.map(str::trim).filter(|e| !e.is_empty()).ok_or_else(missing)?;
    let raw_urls = raw_urls.filter(|u| !u.trim().is_empty()).ok_or_else(missing)?;

    let urls: Vec<String> = raw_urls
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return Err(PipelineError::InvalidRequest("no URLs provided".into()));
    }

    Ok((email, urls))
}
