use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::models::EventCandidate;

const SYSTEM_PROMPT: &str = "Extract the event information from the provided text. \
Format the output as a JSON object with the keys: title (string), \
date (string, YYYY-MM-DD), location (string, optional), \
description (string, optional), and url (string, optional).";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no language-model credential configured")]
    MissingCredentials,
    #[error("extraction request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("extraction API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("extraction response carried no content")]
    EmptyResponse,
    #[error("failed to parse model response as event JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Text-to-structured-data capability. One model call per page.
#[async_trait]
pub trait EventExtractor: Send + Sync {
    async fn extract(&self, page_text: &str) -> Result<EventCandidate, ExtractionError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct OpenAiExtractor {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(base_url: Url, api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl EventExtractor for OpenAiExtractor {
    async fn extract(&self, page_text: &str) -> Result<EventCandidate, ExtractionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ExtractionError::MissingCredentials)?;

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": page_text },
            ],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api { status, body });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ExtractionError::EmptyResponse)?;

        Ok(serde_json::from_str(&content)?)
    }
}
