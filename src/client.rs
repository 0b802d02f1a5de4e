//! HTTP client for the assistant service.
//!
//! One POST per turn with no retries; every failure is classified into a
//! [`ClientError`] so callers can log it before collapsing it into the
//! conversation's fallback reply.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use thiserror::Error;

use crate::config::Config;
use crate::logging;
use crate::models::{AssistantReply, ChatRequest};

const MAX_ERROR_BODY_CHARS: usize = 500;

// === Errors ===

/// Classified failure of a single assistant call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("could not reach assistant service: {0}")]
    Network(String),
    #[error("assistant service timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("assistant service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("assistant reply was malformed: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Short tag used in log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "network",
            ClientError::Timeout(_) => "timeout",
            ClientError::Status { .. } => "status",
            ClientError::Malformed(_) => "malformed",
        }
    }
}

// === Types ===

/// Anything that can answer one chat message.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    fn endpoint(&self) -> &str;

    async fn send_message(&self, message: &str) -> Result<AssistantReply, ClientError>;
}

/// Client for the JSON-over-HTTP assistant endpoint.
#[derive(Debug, Clone)]
#[must_use]
pub struct HttpAssistantClient {
    http_client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

// === HttpAssistantClient ===

impl HttpAssistantClient {
    /// Create a client from CLI configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_endpoint(config.endpoint(), config.request_timeout())
    }

    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        logging::info(format!("Assistant endpoint: {endpoint}"));
        logging::info(format!("Request timeout: {}s", timeout.as_secs()));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
            timeout,
        })
    }

    /// Check that the endpoint answers HTTP at all.
    ///
    /// Issues a GET, so a POST-only route answering 405 still counts as
    /// reachable. Returns the status code seen.
    pub async fn check_reachable(&self) -> Result<u16, ClientError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| self.classify(err))?;
        Ok(response.status().as_u16())
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else if err.is_decode() {
            ClientError::Malformed(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

// === Trait Implementations ===

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_message(&self, message: &str) -> Result<AssistantReply, ClientError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| self.classify(err))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str::<AssistantReply>(&body)
            .map_err(|err| ClientError::Malformed(err.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push_str("...");
    out
}
