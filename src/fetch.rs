use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("navigation to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Page-fetch capability: returns the rendered text of a page, not its
/// markup. A browser engine can be slotted in behind this trait.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

static SCRIPT_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("regex compiles")
});

pub struct HttpPageFetcher {
    client: reqwest::Client,
    settle: Duration,
}

impl HttpPageFetcher {
    pub fn new(settle: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            settle,
        }
    }

    /// Visible-text capture of a document: script and style blocks are
    /// dropped, remaining text nodes joined one per line.
    fn render_text(html: &str) -> String {
        let stripped = SCRIPT_STYLE_RE.replace_all(html, " ");
        let document = Html::parse_document(&stripped);
        let mut lines = Vec::new();
        for text in document.root_element().text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        lines.join("\n")
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        let html = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        // Target pages populate event details asynchronously; give deferred
        // rendering a moment before capturing the text.
        tokio::time::sleep(self.settle).await;

        Ok(Self::render_text(&html))
    }
}
