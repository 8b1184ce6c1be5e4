//! Downstream transport to the model-hosting endpoint.
//!
//! One request per invocation: `{target, content-type, payload}` out, a
//! chunked byte stream back. The [`StreamingTransport`] trait is the seam
//! between the gateway pipeline and the wire — tests substitute mock
//! transports, and deployments with a different signing scheme (e.g.
//! SigV4) plug in their own implementation.
//!
//! [`HttpTransport`] is the default: a `reqwest` client POSTing JSON and
//! re-framing the response body on newlines so every yielded chunk is one
//! complete JSON document. Dropping the returned stream drops the HTTP
//! response, releasing the connection on every exit path including early
//! abandonment.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{GatewayError, Result};

/// Raw chunked response body: one item per wire chunk.
pub type RawChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Transport seam between the gateway and the remote endpoint.
#[async_trait]
pub trait StreamingTransport: Send + Sync {
    /// Send one invocation request and return the raw chunk stream.
    ///
    /// Fails synchronously (before any chunk is produced) on connection,
    /// authentication, and non-2xx responses.
    async fn invoke(&self, target: &str, payload: &Value) -> Result<RawChunkStream>;
}

/// Transport timeouts. All bounds are configurable; none are hard-coded
/// into the request path.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP/TLS connection establishment bound.
    pub connect_timeout: Duration,
    /// Bound on receiving the response headers (not the body, which may
    /// stream for much longer).
    pub request_timeout: Duration,
    /// Per-chunk read bound while streaming the body.
    pub idle_read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            idle_read_timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP transport for managed model-hosting endpoints.
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    bearer_token: Option<String>,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for a region's default endpoint.
    pub fn new(region: &str, bearer_token: Option<String>, config: TransportConfig) -> Result<Self> {
        let endpoint = format!("https://bedrock-runtime.{region}.amazonaws.com");
        Self::with_endpoint(endpoint, bearer_token, config)
    }

    /// Create a transport against an explicit endpoint (used by tests and
    /// gateway-compatible proxies).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        bearer_token: Option<String>,
        config: TransportConfig,
    ) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.idle_read_timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bearer_token,
            request_timeout: config.request_timeout,
        })
    }

    fn invoke_url(&self, target: &str) -> String {
        format!(
            "{}/model/{}/invoke-with-response-stream",
            self.endpoint, target
        )
    }
}

#[async_trait]
impl StreamingTransport for HttpTransport {
    async fn invoke(&self, target: &str, payload: &Value) -> Result<RawChunkStream> {
        // Credentials are checked per invocation, not at construction, so a
        // gateway can be built before secrets are available.
        let token = self
            .bearer_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::AuthenticationFailed)?;

        let url = self.invoke_url(target);
        debug!(target, %url, "dispatching invocation");

        let request = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload);

        let response = tokio::time::timeout(self.request_timeout, request.send())
            .await
            .map_err(|_| GatewayError::Transient("request timed out".into()))?
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    GatewayError::Transient(e.to_string())
                } else {
                    GatewayError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(status_error(status, message));
        }

        Ok(frame_lines(response.bytes_stream()))
    }
}

/// Map a non-2xx status to the gateway error taxonomy.
fn status_error(status: StatusCode, message: String) -> GatewayError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::Validation(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited { retry_after: None },
        StatusCode::REQUEST_TIMEOUT => GatewayError::Transient(message),
        s if s.is_server_error() => GatewayError::Transient(message),
        s => GatewayError::Api {
            status: s.as_u16(),
            message,
        },
    }
}

/// Re-frame an HTTP byte stream on newlines.
///
/// Network reads split the body at arbitrary points; downstream parsing
/// expects each chunk to be one complete JSON document, so buffer until a
/// newline and yield whole lines. A trailing unterminated line is flushed
/// when the body ends.
fn frame_lines(
    body: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> RawChunkStream {
    Box::pin(async_stream::try_stream! {
        futures_util::pin_mut!(body);
        let mut buffer = BytesMut::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| GatewayError::Stream(e.to_string()))?;
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(pos + 1);
                let line = trim_line(&line);
                if !line.is_empty() {
                    yield Bytes::copy_from_slice(line);
                }
            }
        }

        let line = trim_line(&buffer);
        if !line.is_empty() {
            yield Bytes::copy_from_slice(line);
        }
    })
}

fn trim_line(line: &[u8]) -> &[u8] {
    let mut line = line;
    while let [rest @ .., last] = line {
        if matches!(last, b'\n' | b'\r' | b' ' | b'\t') {
            line = rest;
        } else {
            break;
        }
    }
    while let [first, rest @ ..] = line {
        if matches!(first, b'\r' | b' ' | b'\t') {
            line = rest;
        } else {
            break;
        }
    }
    line
}
