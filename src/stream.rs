//! Stream normalization: raw chunks to text deltas.
//!
//! Each raw chunk is an opaque byte buffer expected to decode as one JSON
//! document; where in that document the text lives differs per family.
//! [`normalize`] maps the raw chunk stream into a lazy, single-pass,
//! forward-only sequence of [`TextDelta`]s.
//!
//! Skip semantics, deliberately: a chunk that does not decode, or decodes
//! without a text-bearing field for its family, is dropped without failing
//! the stream. Keep-alives and bookkeeping events (message start/stop,
//! usage reports) arrive interleaved with text and must not kill a
//! response. The cost is that wire-format drift is invisible at the stream
//! level, so every skip increments
//! [`telemetry::CHUNKS_SKIPPED_TOTAL`] for monitoring to catch.
//!
//! Failure ordering: a mid-stream error is delivered after all deltas that
//! preceded it — partial output is not discarded. A stream that ends
//! without ever producing a raw chunk yields a terminal
//! [`GatewayError::EmptyResponse`].

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::family::ProviderFamily;
use crate::telemetry;
use crate::transport::RawChunkStream;
use crate::types::TextDelta;
use crate::{GatewayError, Result};

/// Normalized text-delta stream.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<TextDelta>> + Send>>;

/// Parse a raw chunk stream into text deltas for the given family.
pub fn normalize(raw: RawChunkStream, family: ProviderFamily) -> DeltaStream {
    Box::pin(async_stream::stream! {
        let mut raw = raw;
        let mut saw_chunk = false;

        while let Some(item) = raw.next().await {
            match item {
                Ok(bytes) => {
                    saw_chunk = true;
                    let text = serde_json::from_slice::<Value>(&bytes)
                        .ok()
                        .and_then(|chunk| extract_text(&chunk, family));
                    match text {
                        Some(text) if !text.is_empty() => {
                            metrics::counter!(telemetry::DELTAS_TOTAL,
                                "family" => family.as_str())
                            .increment(1);
                            yield Ok(TextDelta::new(text));
                        }
                        _ => {
                            metrics::counter!(telemetry::CHUNKS_SKIPPED_TOTAL,
                                "family" => family.as_str())
                            .increment(1);
                        }
                    }
                }
                // Deltas already yielded stay valid; the failure is
                // appended as the terminal item.
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        if !saw_chunk {
            yield Err(GatewayError::EmptyResponse);
        }
    })
}

/// Pull the text fragment out of one decoded chunk, per family.
fn extract_text(chunk: &Value, family: ProviderFamily) -> Option<String> {
    match family {
        ProviderFamily::AnthropicMessages => {
            if chunk.get("type").and_then(Value::as_str) == Some("content_block_delta") {
                chunk
                    .pointer("/delta/text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            } else {
                None
            }
        }
        ProviderFamily::OpenAiChat => chat_delta_content(chunk)
            .or_else(|| {
                chunk
                    .get("output_text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .or_else(|| {
                chunk
                    .get("completion")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .or_else(|| first_content_block_text(chunk)),
        ProviderFamily::TitanText => chunk
            .get("outputText")
            .and_then(Value::as_str)
            .map(str::to_string),
        ProviderFamily::TextCompletion | ProviderFamily::Unknown => chunk
            .get("completion")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// `choices[0].delta.content` — either a plain string or an array of
/// content blocks whose `text` fields are concatenated.
fn chat_delta_content(chunk: &Value) -> Option<String> {
    let content = chunk.pointer("/choices/0/delta/content")?;
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(blocks) => {
            let joined: String = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            Some(joined)
        }
        _ => None,
    }
}

/// First `content[].text` block, the shape some chat deployments emit for
/// non-incremental final messages.
fn first_content_block_text(chunk: &Value) -> Option<String> {
    chunk
        .get("content")?
        .as_array()?
        .iter()
        .find_map(|b| b.get("text").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    fn raw(chunks: Vec<Result<Bytes>>) -> RawChunkStream {
        Box::pin(futures_util::stream::iter(chunks))
    }

    fn ok_chunk(v: Value) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(&v).unwrap()))
    }

    async fn collect_text(stream: DeltaStream) -> Vec<Result<TextDelta>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn anthropic_deltas_extracted_in_order() {
        let stream = normalize(
            raw(vec![
                ok_chunk(json!({"type": "message_start"})),
                ok_chunk(json!({"type": "content_block_delta", "delta": {"text": "Hel"}})),
                ok_chunk(json!({"type": "content_block_delta", "delta": {"text": "lo"}})),
                ok_chunk(json!({"type": "message_stop"})),
            ]),
            ProviderFamily::AnthropicMessages,
        );

        let events = collect_text(stream).await;
        let texts: Vec<_> = events.into_iter().map(|e| e.unwrap().text).collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn titan_reads_top_level_output_text() {
        let stream = normalize(
            raw(vec![
                ok_chunk(json!({"outputText": "part one "})),
                ok_chunk(json!({"index": 0})),
                ok_chunk(json!({"outputText": "part two"})),
            ]),
            ProviderFamily::TitanText,
        );

        let texts: Vec<_> = collect_text(stream)
            .await
            .into_iter()
            .map(|e| e.unwrap().text)
            .collect();
        assert_eq!(texts, vec!["part one ", "part two"]);
    }

    #[tokio::test]
    async fn chat_prefers_delta_content_then_falls_back() {
        let stream = normalize(
            raw(vec![
                ok_chunk(json!({"choices": [{"delta": {"content": "a"}}]})),
                ok_chunk(json!({"choices": [{"delta": {"content": [{"text": "b"}, {"text": "c"}]}}]})),
                ok_chunk(json!({"output_text": "d"})),
                ok_chunk(json!({"completion": "e"})),
                ok_chunk(json!({"content": [{"type": "text", "text": "f"}]})),
            ]),
            ProviderFamily::OpenAiChat,
        );

        let texts: Vec<_> = collect_text(stream)
            .await
            .into_iter()
            .map(|e| e.unwrap().text)
            .collect();
        assert_eq!(texts, vec!["a", "bc", "d", "e", "f"]);
    }

    #[tokio::test]
    async fn malformed_and_textless_chunks_are_skipped_silently() {
        let stream = normalize(
            raw(vec![
                Ok(Bytes::from_static(b"not json at all")),
                ok_chunk(json!({"completion": "kept"})),
                ok_chunk(json!({"something_else": true})),
            ]),
            ProviderFamily::Unknown,
        );

        let texts: Vec<_> = collect_text(stream)
            .await
            .into_iter()
            .map(|e| e.unwrap().text)
            .collect();
        assert_eq!(texts, vec!["kept"]);
    }

    #[tokio::test]
    async fn mid_stream_failure_preserves_prior_deltas() {
        let stream = normalize(
            raw(vec![
                ok_chunk(json!({"completion": "before"})),
                Err(GatewayError::Stream("connection reset".into())),
            ]),
            ProviderFamily::TextCompletion,
        );

        let events = collect_text(stream).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().text, "before");
        assert!(matches!(events[1], Err(GatewayError::Stream(_))));
    }

    #[tokio::test]
    async fn empty_body_yields_terminal_empty_response() {
        let stream = normalize(raw(vec![]), ProviderFamily::TitanText);
        let events = collect_text(stream).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(GatewayError::EmptyResponse)));
    }

    #[tokio::test]
    async fn chunks_without_text_do_not_trigger_empty_response() {
        let stream = normalize(
            raw(vec![ok_chunk(json!({"type": "message_stop"}))]),
            ProviderFamily::AnthropicMessages,
        );
        let events = collect_text(stream).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn empty_extracted_text_is_treated_as_textless() {
        let stream = normalize(
            raw(vec![ok_chunk(json!({"completion": ""}))]),
            ProviderFamily::Unknown,
        );
        let events = collect_text(stream).await;
        assert!(events.is_empty());
    }
}
