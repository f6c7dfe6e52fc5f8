//! Kroki HTTP engine.
//!
//! Sends diagram source to a Kroki server (`POST {url}/{endpoint}/svg`) and
//! returns the SVG body. Requests run on tokio's blocking pool since `ureq` is
//! a synchronous client.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use folio_markup::DiagramLanguage;
use regex::Regex;
use ureq::Agent;

use crate::engine::{DiagramEngine, DiagramImage, EngineError, RenderTarget};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static GOOGLE_FONTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@import\s+url\([^)]*fonts\.googleapis\.com[^)]*\)\s*;?").unwrap()
});

/// Remove Google Fonts `@import` rules from SVG.
///
/// Some Kroki backends embed these; they trigger network fetches wherever the
/// SVG is displayed.
#[must_use]
pub fn strip_google_fonts_import(svg: &str) -> String {
    GOOGLE_FONTS_RE.replace_all(svg, "").into_owned()
}

/// Create an HTTP agent with the given timeout.
///
/// Status codes are returned as responses rather than errors so the error
/// body can be reported.
#[must_use]
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`DiagramEngine`] backed by a Kroki server.
#[derive(Debug, Clone)]
pub struct KrokiEngine {
    agent: Agent,
    server_url: String,
}

impl KrokiEngine {
    /// Create an engine for `server_url` with [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(server_url: impl Into<String>, timeout: Duration) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_owned();
        Self {
            agent: create_agent(timeout),
            server_url,
        }
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint_url(&self, language: DiagramLanguage) -> String {
        format!("{}/{}/svg", self.server_url, language.kroki_endpoint())
    }
}

#[async_trait]
impl DiagramEngine for KrokiEngine {
    async fn render(
        &self,
        target: &RenderTarget,
        language: DiagramLanguage,
        source: &str,
    ) -> Result<DiagramImage, EngineError> {
        let agent = self.agent.clone();
        let url = self.endpoint_url(language);
        let body = source.to_owned();

        tracing::debug!(target_id = %target, url = %url, "Sending diagram to Kroki");

        let bytes = tokio::task::spawn_blocking(move || send_diagram_request(&agent, &url, &body))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))??;

        let svg = String::from_utf8(bytes).map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
        Ok(DiagramImage {
            svg: strip_google_fonts_import(&svg),
        })
    }
}

/// POST the source and return the response body.
///
/// Status >= 400 becomes [`EngineError::Status`] carrying the error body.
fn send_diagram_request(agent: &Agent, url: &str, source: &str) -> Result<Vec<u8>, EngineError> {
    let response = agent
        .post(url)
        .header("Content-Type", "text/plain")
        .send(source.as_bytes())
        .map_err(|e| EngineError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(EngineError::Status {
            status,
            body: error_body,
        });
    }

    body.read_to_vec()
        .map_err(|e| EngineError::InvalidResponse(e.to_string()))
}
