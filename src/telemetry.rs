//! Telemetry metric name constants.
//!
//! Centralised metric names for modelgate operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `modelgate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `family` — provider family tag (e.g. "anthropic_messages")
//! - `model` — canonical model id
//! - `status` — outcome: "ok" or "error"

/// Total invocations dispatched through the gateway.
///
/// Labels: `family`, `status` ("ok" | "error").
pub const INVOCATIONS_TOTAL: &str = "modelgate_invocations_total";

/// Time from dispatch to the raw stream being established, in seconds.
///
/// Labels: `family`.
pub const INVOCATION_DURATION_SECONDS: &str = "modelgate_invocation_duration_seconds";

/// Total fallback payload-shape attempts (not counting the primary shape).
///
/// Labels: `family`, `shape`.
pub const FALLBACK_ATTEMPTS_TOTAL: &str = "modelgate_fallback_attempts_total";

/// Total raw chunks skipped during normalization (undecodable or textless).
///
/// A steady non-zero rate here usually means upstream wire-format drift;
/// skipping is deliberately silent at the stream level, so this counter is
/// the only signal.
///
/// Labels: `family`.
pub const CHUNKS_SKIPPED_TOTAL: &str = "modelgate_chunks_skipped_total";

/// Total text deltas yielded to callers.
///
/// Labels: `family`.
pub const DELTAS_TOTAL: &str = "modelgate_deltas_total";
