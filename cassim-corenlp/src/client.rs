//! Blocking client for a running CoreNLP server.
//!
//! # Configuration
//!
//! Defaults can come from the environment:
//! - `CORENLP_URL`: server endpoint (default: "http://localhost:9000")
//! - `CORENLP_TIMEOUT_SECS`: per-request timeout (default: 30)

use crate::error::{CoreNlpError, CoreNlpResult};
use crate::response::ParseResponse;
use cassim::{BracketedTree, CassimResult, SentenceParser};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Annotators needed for constituency parses.
const ANNOTATORS: &str = "tokenize,ssplit,parse";

/// Configuration for the CoreNLP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreNlpConfig {
    /// Server endpoint
    pub url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry
    pub retry_backoff_ms: u64,
    /// Idle pooled connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for CoreNlpConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("CORENLP_URL").unwrap_or_else(|_| "http://localhost:9000".to_string()),
            timeout_secs: std::env::var("CORENLP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            max_retries: 3,
            retry_backoff_ms: 250,
            pool_max_idle_per_host: 4,
        }
    }
}

impl CoreNlpConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = backoff.as_millis() as u64;
        self
    }

    pub fn validate(&self) -> CoreNlpResult<()> {
        if self.url.is_empty() {
            return Err(CoreNlpError::Config("url cannot be empty".to_string()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(CoreNlpError::Config(format!(
                "url must start with http:// or https://, got {:?}",
                self.url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreNlpError::Config("timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (starting at 0).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(1u64 << attempt.min(16)))
    }
}

/// Server properties for parsing pre-split sentences, one per line.
fn request_properties() -> String {
    serde_json::json!({
        "annotators": ANNOTATORS,
        "outputFormat": "json",
        "ssplit.eolonly": "true",
    })
    .to_string()
}

/// A CoreNLP parser client.
///
/// The underlying connection pool is shared between threads; no lock is held
/// while a request is in flight.
#[derive(Debug, Clone)]
pub struct CoreNlpClient {
    client: Client,
    config: CoreNlpConfig,
}

impl CoreNlpClient {
    pub fn new(config: CoreNlpConfig) -> CoreNlpResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> CoreNlpResult<Self> {
        Self::new(CoreNlpConfig::from_env())
    }

    pub fn config(&self) -> &CoreNlpConfig {
        &self.config
    }

    /// Whether the server answers at all.
    pub fn is_available(&self) -> bool {
        self.client.head(&self.config.url).send().is_ok()
    }

    /// Parse the sentences of one document in a single request.
    pub fn parse_batch(&self, sentences: &[String]) -> CoreNlpResult<Vec<BracketedTree>> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }
        let body = sentences
            .iter()
            .map(|s| s.replace('\n', " "))
            .collect::<Vec<_>>()
            .join("\n");

        let mut attempt = 0;
        loop {
            match self.send(&body) {
                Ok(text) => return ParseResponse::from_json(&text)?.into_trees(sentences.len()),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying CoreNLP request"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn send(&self, body: &str) -> CoreNlpResult<String> {
        debug!(url = %self.config.url, bytes = body.len(), "CoreNLP request");
        let response = self
            .client
            .post(&self.config.url)
            .query(&[("properties", request_properties())])
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body.to_string())
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(CoreNlpError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl SentenceParser for CoreNlpClient {
    type Tree = BracketedTree;

    fn parse_sentences(&self, sentences: &[String]) -> CassimResult<Vec<BracketedTree>> {
        Ok(self.parse_batch(sentences)?)
    }
}
