//! Family-specific request payload shaping.
//!
//! Each provider family expects a different wire shape for the same
//! canonical inputs. [`build`] performs that mapping exhaustively over
//! [`ProviderFamily`]; the effective token ceiling is always
//! `min(requested, model limit)` regardless of family.
//!
//! For schema-gated families the full ordered list of payload shapes is
//! declared by [`fallback_shapes`], consumed by the executor's retry loop.
//! Keeping the list declarative makes the fallback set enumerable and
//! testable on its own.

use serde_json::{json, Value};

use crate::family::ProviderFamily;
use crate::types::{GenerationOptions, Message, Role};

/// Envelope version expected by Anthropic-style backends.
const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// One request payload shape.
///
/// `Primary` is the family's documented shape from [`build`]; the others
/// are historical alternates some deployments of the gated family accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Primary,
    /// `{"input", "max_tokens", "temperature", "top_p"}`
    InputField,
    /// `{"prompt", "max_tokens", "temperature", "top_p"}`
    PromptField,
}

impl PayloadShape {
    /// Stable label for logging and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadShape::Primary => "primary",
            PayloadShape::InputField => "input_field",
            PayloadShape::PromptField => "prompt_field",
        }
    }
}

/// Ordered payload shapes to attempt for a family.
///
/// Only schema-gated families carry alternates; everything else gets
/// exactly one attempt with the primary shape.
pub fn fallback_shapes(family: ProviderFamily) -> &'static [PayloadShape] {
    if family.is_schema_gated() {
        &[
            PayloadShape::Primary,
            PayloadShape::InputField,
            PayloadShape::PromptField,
        ]
    } else {
        &[PayloadShape::Primary]
    }
}

/// Build the primary request payload for a family.
pub fn build(
    family: ProviderFamily,
    messages: &[Message],
    options: &GenerationOptions,
    model_limit: u32,
) -> Value {
    build_with_shape(PayloadShape::Primary, family, messages, options, model_limit)
}

/// Build a request payload using a specific shape.
///
/// Alternate shapes ignore the family's primary mapping and reduce the
/// conversation to its final user content.
pub fn build_with_shape(
    shape: PayloadShape,
    family: ProviderFamily,
    messages: &[Message],
    options: &GenerationOptions,
    model_limit: u32,
) -> Value {
    let ceiling = options.max_tokens.min(model_limit);

    match shape {
        PayloadShape::InputField => json!({
            "input": last_user_content(messages),
            "max_tokens": ceiling,
            "temperature": options.temperature,
            "top_p": options.top_p,
        }),
        PayloadShape::PromptField => json!({
            "prompt": last_user_content(messages),
            "max_tokens": ceiling,
            "temperature": options.temperature,
            "top_p": options.top_p,
        }),
        PayloadShape::Primary => match family {
            ProviderFamily::AnthropicMessages => json!({
                "anthropic_version": ANTHROPIC_VERSION,
                "max_tokens": ceiling,
                "messages": anthropic_messages(messages),
                "temperature": options.temperature,
                "top_p": options.top_p,
            }),
            ProviderFamily::TitanText => json!({
                "inputText": last_user_content(messages),
                "textGenerationConfig": {
                    "maxTokenCount": ceiling,
                    "temperature": options.temperature,
                    "topP": options.top_p,
                },
            }),
            ProviderFamily::OpenAiChat => json!({
                "messages": chat_messages(messages),
                "max_tokens": ceiling,
                "temperature": options.temperature,
                "top_p": options.top_p,
            }),
            // Unknown identifiers get the completion shape; the endpoint is
            // the final arbiter of whether it understands them.
            ProviderFamily::TextCompletion | ProviderFamily::Unknown => json!({
                "prompt": last_user_content(messages),
                "max_tokens_to_sample": ceiling,
                "temperature": options.temperature,
                "top_p": options.top_p,
            }),
        },
    }
}

/// Anthropic-style message array: content-block wrapping, with system
/// messages remapped to user turns carrying a "System:" prefix.
fn anthropic_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            let (role, text) = match m.role {
                Role::System => ("user".to_string(), format!("System: {}", m.content)),
                role => (role.as_str().to_string(), m.content.clone()),
            };
            json!({
                "role": role,
                "content": [{ "type": "text", "text": text }],
            })
        })
        .collect()
}

/// Flat role/content message array for chat-style backends.
fn chat_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect()
}

/// Content of the last user message, falling back to the last message of
/// any role, then to the empty string.
fn last_user_content(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .or_else(|| messages.last())
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> GenerationOptions {
        GenerationOptions::default().max_tokens(4000)
    }

    #[test]
    fn token_ceiling_is_min_of_requested_and_limit() {
        let messages = [Message::user("hi")];
        let payload = build(ProviderFamily::AnthropicMessages, &messages, &opts(), 1000);
        assert_eq!(payload["max_tokens"], 1000);

        let payload = build(ProviderFamily::AnthropicMessages, &messages, &opts(), 200_000);
        assert_eq!(payload["max_tokens"], 4000);
    }

    #[test]
    fn anthropic_shape_wraps_content_blocks_and_remaps_system() {
        let messages = [Message::system("You are X"), Message::user("hi")];
        let payload = build(ProviderFamily::AnthropicMessages, &messages, &opts(), 1000);

        assert_eq!(payload["anthropic_version"], ANTHROPIC_VERSION);
        let wire = payload["messages"].as_array().unwrap();
        assert_eq!(wire[0]["role"], "user");
        assert_eq!(wire[0]["content"][0]["text"], "System: You are X");
        assert_eq!(wire[1]["role"], "user");
        assert_eq!(wire[1]["content"][0]["type"], "text");
        assert_eq!(wire[1]["content"][0]["text"], "hi");
    }

    #[test]
    fn titan_shape_nests_generation_config() {
        let messages = [Message::user("first"), Message::assistant("ok"), Message::user("last")];
        let payload = build(ProviderFamily::TitanText, &messages, &opts(), 8000);

        assert_eq!(payload["inputText"], "last");
        assert_eq!(payload["textGenerationConfig"]["maxTokenCount"], 4000);
        assert_eq!(payload["textGenerationConfig"]["topP"], 0.9);
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn chat_shape_is_flat() {
        let messages = [Message::system("s"), Message::user("u")];
        let payload = build(ProviderFamily::OpenAiChat, &messages, &opts(), 128_000);

        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "u");
        assert_eq!(payload["max_tokens"], 4000);
        assert_eq!(payload["top_p"], 0.9);
    }

    #[test]
    fn completion_shape_covers_unknown_family() {
        let messages = [Message::user("prompt text")];
        for family in [ProviderFamily::TextCompletion, ProviderFamily::Unknown] {
            let payload = build(family, &messages, &opts(), 4000);
            assert_eq!(payload["prompt"], "prompt text");
            assert_eq!(payload["max_tokens_to_sample"], 4000);
        }
    }

    #[test]
    fn gated_family_exposes_ordered_alternates() {
        assert_eq!(
            fallback_shapes(ProviderFamily::OpenAiChat),
            &[
                PayloadShape::Primary,
                PayloadShape::InputField,
                PayloadShape::PromptField
            ]
        );
        assert_eq!(
            fallback_shapes(ProviderFamily::AnthropicMessages),
            &[PayloadShape::Primary]
        );
    }

    #[test]
    fn alternate_shapes_reduce_to_last_user_content() {
        let messages = [Message::system("s"), Message::user("the ask")];
        let alt = build_with_shape(
            PayloadShape::InputField,
            ProviderFamily::OpenAiChat,
            &messages,
            &opts(),
            500,
        );
        assert_eq!(alt["input"], "the ask");
        assert_eq!(alt["max_tokens"], 500);
        assert!(alt.get("messages").is_none());

        let alt = build_with_shape(
            PayloadShape::PromptField,
            ProviderFamily::OpenAiChat,
            &messages,
            &opts(),
            500,
        );
        assert_eq!(alt["prompt"], "the ask");
    }
}
