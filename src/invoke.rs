//! Invocation execution with payload-shape fallback.
//!
//! Sends the built payload to the transport and, for schema-gated families
//! only, works through the ordered alternate shapes when the endpoint
//! rejects the payload. The alternates are declared in
//! [`crate::request::fallback_shapes`]; this module is just the small loop
//! that consumes them.
//!
//! Fallback rules:
//! - only `Validation` errors trigger the next shape; auth, transient, and
//!   all other failures are returned immediately
//! - at most three attempts per invocation (primary + two alternates)
//! - when every shape fails, the **original** error is surfaced — it
//!   describes the documented shape, the alternates are best-effort

use tracing::warn;

use crate::family::ProviderFamily;
use crate::request::{build_with_shape, fallback_shapes, PayloadShape};
use crate::telemetry;
use crate::transport::{RawChunkStream, StreamingTransport};
use crate::types::{GenerationOptions, Message};
use crate::Result;

/// Dispatch one invocation, consuming the family's shape list.
pub async fn invoke_with_fallback(
    transport: &dyn StreamingTransport,
    target: &str,
    family: ProviderFamily,
    messages: &[Message],
    options: &GenerationOptions,
    model_limit: u32,
) -> Result<RawChunkStream> {
    let mut original_err = None;

    for &shape in fallback_shapes(family) {
        let payload = build_with_shape(shape, family, messages, options, model_limit);

        match transport.invoke(target, &payload).await {
            Ok(stream) => return Ok(stream),
            Err(e) if e.is_validation() => {
                if shape != PayloadShape::Primary {
                    metrics::counter!(telemetry::FALLBACK_ATTEMPTS_TOTAL,
                        "family" => family.as_str(),
                        "shape" => shape.as_str(),
                    )
                    .increment(1);
                }
                warn!(
                    target,
                    family = family.as_str(),
                    shape = shape.as_str(),
                    error = %e,
                    "endpoint rejected payload shape"
                );
                // Keep the first rejection; it corresponds to the
                // documented shape and is the most useful to report.
                original_err.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    // fallback_shapes() is never empty, so a rejection was recorded.
    Err(original_err
        .unwrap_or_else(|| crate::GatewayError::Validation("payload rejected by endpoint".into())))
}
