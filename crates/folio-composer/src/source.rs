//! Boundary to the text generation backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ureq::Agent;

/// Failure to obtain generated content.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("generator returned empty content")]
    Empty,
    #[error("generation task failed: {0}")]
    Task(String),
}

/// Produces document content for a topic.
///
/// The returned text is opaque; it is stored as-is and only interpreted when
/// rendered.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn generate(&self, topic: &str, overview: &str) -> Result<String, SourceError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
    overview: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    content: String,
}

/// [`ContentSource`] that POSTs `{"topic", "overview"}` as JSON and reads
/// `{"content"}` back.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    agent: Agent,
    url: String,
}

impl HttpContentSource {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn generate(&self, topic: &str, overview: &str) -> Result<String, SourceError> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let topic = topic.to_owned();
        let overview = overview.to_owned();

        tracing::info!(url = %url, topic = %topic, "Requesting generated content");

        let content = tokio::task::spawn_blocking(move || request_content(&agent, &url, &topic, &overview))
            .await
            .map_err(|e| SourceError::Task(e.to_string()))??;

        if content.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(content)
    }
}

fn request_content(agent: &Agent, url: &str, topic: &str, overview: &str) -> Result<String, SourceError> {
    let response = agent
        .post(url)
        .send_json(&GenerateRequest { topic, overview })
        .map_err(|e| SourceError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(SourceError::Status {
            status,
            body: error_body,
        });
    }

    body.read_json::<GenerateResponse>()
        .map(|response| response.content)
        .map_err(|e| SourceError::InvalidResponse(e.to_string()))
}
