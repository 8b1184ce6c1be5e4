//! Gateway facade wiring the invocation pipeline.

mod builder;

pub use builder::{ModelGateBuilder, API_TOKEN_ENV};

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::directory::ModelDirectory;
use crate::invoke::invoke_with_fallback;
use crate::stream::{normalize, DeltaStream};
use crate::telemetry;
use crate::transport::StreamingTransport;
use crate::truncate::collapse_for;
use crate::types::{GenerationOptions, Message};
use crate::{GatewayError, Result};

/// Streaming inference gateway.
///
/// One `ModelGate` serves any number of concurrent invocations: the only
/// shared state is the immutable [`ModelDirectory`] and the transport's
/// connection pool. Each call resolves the model, bounds the conversation,
/// shapes the family-specific payload, dispatches (with fallback shapes
/// for schema-gated families), and hands back a lazy text-delta stream.
///
/// Dropping the returned stream at any point releases the underlying
/// network resources; nothing keeps producing once the caller stops
/// pulling.
pub struct ModelGate {
    directory: Arc<ModelDirectory>,
    transport: Arc<dyn StreamingTransport>,
}

impl ModelGate {
    /// Create a builder for configuring a gateway.
    pub fn builder() -> ModelGateBuilder {
        ModelGateBuilder::new()
    }

    pub(crate) fn from_parts(
        directory: Arc<ModelDirectory>,
        transport: Arc<dyn StreamingTransport>,
    ) -> Self {
        Self {
            directory,
            transport,
        }
    }

    /// The directory this gateway resolves models against.
    pub fn directory(&self) -> &ModelDirectory {
        &self.directory
    }

    /// Stream generated text for a conversation.
    ///
    /// Resolution and truncation never fail; invocation failures (auth,
    /// validation after fallback, transient) surface here before any
    /// delta is produced, and mid-stream failures arrive as the terminal
    /// item of the returned stream after any deltas already yielded.
    pub async fn stream_text(
        &self,
        model_id: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<DeltaStream> {
        if messages.is_empty() {
            return Err(GatewayError::InvalidInput("messages must not be empty".into()));
        }

        let entry = self.directory.resolve(model_id);
        let family = entry.family;
        let bounded = collapse_for(messages, family);

        debug!(
            model = %entry.canonical_id,
            target = entry.invoke_target(),
            family = family.as_str(),
            messages = bounded.len(),
            "invoking model"
        );

        let start = Instant::now();
        let result = invoke_with_fallback(
            self.transport.as_ref(),
            entry.invoke_target(),
            family,
            &bounded,
            options,
            entry.max_input_tokens,
        )
        .await;

        metrics::histogram!(telemetry::INVOCATION_DURATION_SECONDS,
            "family" => family.as_str())
        .record(start.elapsed().as_secs_f64());
        metrics::counter!(telemetry::INVOCATIONS_TOTAL,
            "family" => family.as_str(),
            "status" => if result.is_ok() { "ok" } else { "error" },
        )
        .increment(1);

        let raw = result?;
        Ok(normalize(raw, family))
    }
}
