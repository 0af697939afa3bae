// src/llm/http_client.rs
// Shared HTTP plumbing and retry policy for all LLM providers

use crate::error::{BackendError, BackendErrorKind, MAX_ERROR_BODY_CHARS, truncate_chars};
use crate::llm::Provider;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default maximum attempts (including the first) for transient failures
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default base backoff duration between retries (doubles each retry)
const DEFAULT_BASE_BACKOFF_SECS: u64 = 1;
/// Default ceiling for a single backoff
const DEFAULT_MAX_BACKOFF_SECS: u64 = 8;

/// A JSON POST to a provider endpoint
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    /// Per-request timeout overriding the client default
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
            timeout: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Model warming up (503) or rate limited (429)
    pub fn is_transient(&self) -> bool {
        self.status == 503 || self.status == 429
    }
}

/// The request never produced a response
#[derive(Error, Debug)]
#[error("request failed: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Outbound HTTP seam; swapped for a scripted transport in tests
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a pooled reqwest client
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_secs(DEFAULT_BASE_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Shared HTTP client configuration for all LLM providers
pub struct LlmHttpClient {
    transport: Arc<dyn Transport>,
    pub retry: RetryPolicy,
}

impl LlmHttpClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
        }
    }

    /// Create from an existing reqwest::Client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self::new(Arc::new(ReqwestTransport::new(client)))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute the request, retrying only transient unavailability.
    /// Returns the response body on a success status.
    pub async fn execute_with_retry(
        &self,
        request_id: &str,
        provider: Provider,
        request: &HttpRequest,
    ) -> Result<String, BackendError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(request_id = %request_id, attempt, "Sending {} request", provider);

            let response = self.transport.post_json(request).await.map_err(|e| {
                BackendError::new(provider, BackendErrorKind::Transport, e.to_string())
            })?;

            if response.is_success() {
                return Ok(response.body);
            }

            if !response.is_transient() {
                return Err(BackendError::status(provider, response.status, &response.body));
            }

            let cause = format!(
                "model loading or rate limited ({}): {}",
                response.status,
                truncate_chars(&response.body, MAX_ERROR_BODY_CHARS)
            );

            if attempt >= max_attempts {
                return Err(BackendError::new(
                    provider,
                    BackendErrorKind::Unavailable,
                    format!("{} (gave up after {} attempts)", cause, attempt),
                ));
            }

            let backoff = self.retry.backoff_for(attempt - 1);
            warn!(
                request_id = %request_id,
                status = response.status,
                attempt,
                "Transient error, retrying in {:?}...",
                backoff
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}
