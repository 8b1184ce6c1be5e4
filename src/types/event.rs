//! Streaming output events

use serde::{Deserialize, Serialize};

/// One incremental fragment of generated text.
///
/// A full response is the ordered concatenation of all deltas yielded by
/// the stream. The text is non-empty: chunks whose extracted text would be
/// empty are skipped during normalization rather than yielded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDelta {
    pub text: String,
}

impl TextDelta {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
