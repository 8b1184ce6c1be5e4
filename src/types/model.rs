//! Model directory entry

use serde::{Deserialize, Serialize};

use crate::family::ProviderFamily;

/// One known model identity with its capacity limits.
///
/// Entries are resolvable by `canonical_id` and, when present, by
/// `invoke_target` (the alias actually sent to the remote endpoint, e.g. a
/// region-scoped inference profile id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub canonical_id: String,
    pub display_name: String,
    pub family: ProviderFamily,
    pub max_input_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoke_target: Option<String>,
}

impl ModelEntry {
    /// Create an entry with the family's default input limit and no alias.
    pub fn new(canonical_id: impl Into<String>, family: ProviderFamily) -> Self {
        let canonical_id = canonical_id.into();
        Self {
            display_name: canonical_id.clone(),
            canonical_id,
            family,
            max_input_tokens: family.default_max_input_tokens(),
            invoke_target: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_max_input_tokens(mut self, limit: u32) -> Self {
        self.max_input_tokens = limit;
        self
    }

    pub fn with_invoke_target(mut self, target: impl Into<String>) -> Self {
        self.invoke_target = Some(target.into());
        self
    }

    /// The identifier sent to the remote endpoint: the alias when present,
    /// otherwise the canonical id.
    pub fn invoke_target(&self) -> &str {
        self.invoke_target.as_deref().unwrap_or(&self.canonical_id)
    }
}
