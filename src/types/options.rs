//! Generation options

use serde::{Deserialize, Serialize};

/// Sampling and length options for a generation request (family-agnostic).
///
/// `temperature` and `top_p` live in the 0–1 domain by convention; the
/// gateway passes them through without validating, leaving range policy
/// to the remote endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Requested completion length. The effective ceiling sent on the wire
    /// is always `min(max_tokens, model input limit)`.
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl GenerationOptions {
    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn top_p(mut self, p: f64) -> Self {
        self.top_p = p;
        self
    }
}
