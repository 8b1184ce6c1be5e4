//! Modelgate error types

use std::time::Duration;

/// Modelgate error types
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // Transport/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The remote endpoint rejected the request payload shape.
    ///
    /// For gated families the executor responds by retrying with the
    /// ordered fallback payload shapes before surfacing this.
    #[error("payload rejected by endpoint: {0}")]
    Validation(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Network or server-side failure. Surfaced as-is; any outer
    /// retry/backoff policy belongs to the caller.
    #[error("transient endpoint failure: {0}")]
    Transient(String),

    // Streaming errors
    #[error("stream error: {0}")]
    Stream(String),

    #[error("empty response from endpoint")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Whether this error is a payload-shape rejection.
    ///
    /// Only these participate in the fallback-shape retry protocol.
    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }

    /// Whether this error is transient (network/server-side).
    ///
    /// The gateway never retries these itself; the classification is
    /// exposed so callers can implement their own backoff.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Transient(_) | GatewayError::RateLimited { .. } | GatewayError::Http(_)
        )
    }

    /// Retry-after hint from a `RateLimited` error, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GatewayError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for modelgate operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_not_transient() {
        let err = GatewayError::Validation("bad shape".into());
        assert!(err.is_validation());
        assert!(!err.is_transient());
    }

    #[test]
    fn rate_limited_carries_hint() {
        let err = GatewayError::RateLimited {
            retry_after: Some(Duration::from_secs(2)),
        };
        assert!(err.is_transient());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(GatewayError::EmptyResponse.retry_after(), None);
    }
}
