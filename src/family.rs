//! Provider family classification.
//!
//! Every model identifier maps to exactly one [`ProviderFamily`], a closed
//! set of backend categories sharing one request/response wire shape. The
//! mapping is substring-based so that region-scoped identifiers (e.g.
//! `us.anthropic.claude-…`) classify the same as their bare form.
//!
//! Request shaping ([`crate::request`]) and stream normalization
//! ([`crate::stream`]) both match exhaustively on the family, so adding a
//! variant forces every dispatch site to be revisited.

use serde::{Deserialize, Serialize};

/// Closed set of model-hosting backend categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    /// Chat backends taking a versioned envelope with content-block
    /// message arrays (Anthropic-style).
    AnthropicMessages,
    /// Single-turn text backends taking one `inputText` plus a nested
    /// generation config (Titan-style).
    TitanText,
    /// Chat backends taking flat role/content message arrays
    /// (OpenAI-style). Historically schema-ambiguous, see
    /// [`crate::request::fallback_shapes`].
    OpenAiChat,
    /// Single-prompt completion backends (`prompt` +
    /// `max_tokens_to_sample`).
    TextCompletion,
    /// Unrecognised identifiers. Requests use the completion shape;
    /// streamed chunks are read best-effort.
    Unknown,
}

/// Marker substrings per family, in match priority order. First match wins.
const MARKERS: &[(&[&str], ProviderFamily)] = &[
    (&["anthropic", "claude"], ProviderFamily::AnthropicMessages),
    (&["titan", "amazon"], ProviderFamily::TitanText),
    (&["openai", "gpt-oss"], ProviderFamily::OpenAiChat),
    (&["cohere", "ai21"], ProviderFamily::TextCompletion),
];

impl ProviderFamily {
    /// Classify a model identifier into its family.
    ///
    /// Pure and deterministic: lowercases the identifier and tests marker
    /// substrings anywhere in the string, in fixed priority order. No
    /// match yields [`ProviderFamily::Unknown`].
    pub fn classify(identifier: &str) -> Self {
        let id = identifier.to_ascii_lowercase();
        for (markers, family) in MARKERS {
            if markers.iter().any(|m| id.contains(m)) {
                return *family;
            }
        }
        ProviderFamily::Unknown
    }

    /// Default input-token limit assumed when a model is not listed in the
    /// directory. Large-context families default far higher than unknowns.
    pub fn default_max_input_tokens(&self) -> u32 {
        match self {
            ProviderFamily::AnthropicMessages => 200_000,
            ProviderFamily::TitanText => 8_000,
            ProviderFamily::OpenAiChat => 128_000,
            ProviderFamily::TextCompletion => 8_000,
            ProviderFamily::Unknown => 4_000,
        }
    }

    /// Families whose effective input window is small enough that
    /// conversation history must be collapsed before dispatch.
    pub fn is_tight_context(&self) -> bool {
        matches!(self, ProviderFamily::OpenAiChat)
    }

    /// Families with historically ambiguous request schemas, for which the
    /// executor retries validation failures with fallback payload shapes.
    pub fn is_schema_gated(&self) -> bool {
        matches!(self, ProviderFamily::OpenAiChat)
    }

    /// Stable label for metrics and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::AnthropicMessages => "anthropic_messages",
            ProviderFamily::TitanText => "titan_text",
            ProviderFamily::OpenAiChat => "openai_chat",
            ProviderFamily::TextCompletion => "text_completion",
            ProviderFamily::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_marker_anywhere_in_id() {
        assert_eq!(
            ProviderFamily::classify("anthropic.claude-3-sonnet-20240229-v1:0"),
            ProviderFamily::AnthropicMessages
        );
        assert_eq!(
            ProviderFamily::classify("amazon.titan-text-express-v1"),
            ProviderFamily::TitanText
        );
        assert_eq!(
            ProviderFamily::classify("openai.gpt-oss-120b-1:0"),
            ProviderFamily::OpenAiChat
        );
        assert_eq!(
            ProviderFamily::classify("cohere.command-text-v14"),
            ProviderFamily::TextCompletion
        );
    }

    #[test]
    fn region_prefix_does_not_change_family() {
        assert_eq!(
            ProviderFamily::classify("us.anthropic.claude-3-haiku-20240307-v1:0"),
            ProviderFamily::AnthropicMessages
        );
        assert_eq!(
            ProviderFamily::classify("eu.amazon.titan-text-lite-v1"),
            ProviderFamily::TitanText
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(
            ProviderFamily::classify("Anthropic.Claude-V2"),
            ProviderFamily::AnthropicMessages
        );
        assert_eq!(
            ProviderFamily::classify("OPENAI.GPT-OSS-20B"),
            ProviderFamily::OpenAiChat
        );
    }

    #[test]
    fn priority_order_is_fixed() {
        // "anthropic" outranks "amazon" even when both markers appear.
        assert_eq!(
            ProviderFamily::classify("amazon-hosted.anthropic.claude"),
            ProviderFamily::AnthropicMessages
        );
    }

    #[test]
    fn unmatched_identifiers_are_unknown() {
        assert_eq!(
            ProviderFamily::classify("foo.bar-model"),
            ProviderFamily::Unknown
        );
        assert_eq!(ProviderFamily::classify(""), ProviderFamily::Unknown);
    }

    #[test]
    fn unknown_default_limit_is_smallest() {
        let unknown = ProviderFamily::Unknown.default_max_input_tokens();
        for family in [
            ProviderFamily::AnthropicMessages,
            ProviderFamily::TitanText,
            ProviderFamily::OpenAiChat,
            ProviderFamily::TextCompletion,
        ] {
            assert!(family.default_max_input_tokens() > unknown);
        }
    }
}
