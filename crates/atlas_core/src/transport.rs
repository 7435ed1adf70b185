//! Wire request/response types and the HTTP transport
//!
//! The transport is the SDK's only suspension point: builders and parsers
//! are synchronous, and each service call performs exactly one send. There
//! is no retry, caching or cancellation policy here; a failed attempt
//! surfaces as a single [`TransportFailure`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::GlobalConfig;

/// A request ready to go on the wire
///
/// GET when `body` is `None`, POST with a JSON body otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    /// Fully assembled URL including query parameters
    pub url: Url,
    /// JSON body for POST requests
    pub body: Option<Value>,
}

impl WireRequest {
    /// A GET request
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self { url, body: None }
    }

    /// A POST request with a JSON body
    #[must_use]
    pub const fn post(url: Url, body: Value) -> Self {
        Self {
            url,
            body: Some(body),
        }
    }

    /// Whether this request carries a body
    #[must_use]
    pub const fn is_post(&self) -> bool {
        self.body.is_some()
    }
}

/// A successful raw API response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response payload; `Null` when the body was not JSON
    pub body: Value,
}

/// Failure reported by the transport
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// The server answered with a non-success HTTP status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Upstream error payload, `Null` when not JSON
        data: Value,
        /// Generic transport-level description
        message: String,
    },

    /// The request never completed
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request ran out of time
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The configured timeout in seconds
        timeout_secs: u64,
    },
}

/// The network seam of every service call
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response
    async fn send(&self, request: &WireRequest) -> Result<RawResponse, TransportFailure>;
}

/// reqwest-backed transport
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a transport from the global configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GlobalConfig) -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportFailure::Connection(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &WireRequest) -> Result<RawResponse, TransportFailure> {
        debug!(url = %request.url, post = request.is_post(), "Sending request");

        let builder = match &request.body {
            Some(body) => self.client.post(request.url.clone()).json(body),
            None => self.client.get(request.url.clone()),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportFailure::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                TransportFailure::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportFailure::Connection(e.to_string()))?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                data: body,
                message: format!("HTTP {status}"),
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}
