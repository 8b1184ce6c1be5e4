//! Model directory — known model identities and capacity limits.
//!
//! The directory holds [`ModelEntry`] records merged from two layers:
//!
//! 1. **Embedded seed** — compiled-in JSON of well-known models, always
//!    available
//! 2. **Descriptor records** — deployment-supplied allowlist entries,
//!    merged on top (see [`source`])
//!
//! It is built once and never mutated afterwards, so concurrent reads
//! need no synchronisation; the gateway shares it behind an `Arc`.
//! Lookups never fail: an identifier absent from both layers gets a
//! synthesized entry with family-inferred limits.

mod source;

pub use source::{
    from_env, load_file, parse_csv, parse_descriptors, ModelDescriptor, ALLOWED_MODELS_ENV,
    ALLOWED_MODELS_PATH_ENV,
};

use std::collections::HashMap;

use crate::family::ProviderFamily;
use crate::types::ModelEntry;

/// Read-only directory of model identities.
#[derive(Debug, Clone, Default)]
pub struct ModelDirectory {
    entries: HashMap<String, ModelEntry>,
    /// alias → canonical id
    aliases: HashMap<String, String>,
}

impl ModelDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with the embedded seed.
    ///
    /// The seed is a curated set of well-known models with verified input
    /// limits; it is always available even when no descriptor source is
    /// configured.
    pub fn with_embedded_seed() -> Self {
        let mut directory = Self::new();
        match serde_json::from_str::<Vec<ModelEntry>>(EMBEDDED_SEED) {
            Ok(entries) => {
                for entry in entries {
                    directory.insert(entry);
                }
            }
            Err(e) => {
                // Seed is compiled in and covered by tests; an empty
                // directory is still usable if it ever regresses.
                tracing::warn!(error = %e, "failed to parse embedded model seed");
            }
        }
        directory
    }

    /// Build from the embedded seed plus descriptor records merged on top.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let mut directory = Self::with_embedded_seed();
        for descriptor in descriptors {
            directory.apply_descriptor(descriptor);
        }
        directory
    }

    /// Insert an entry, replacing any existing entry with the same id and
    /// re-registering its alias.
    pub fn insert(&mut self, entry: ModelEntry) {
        if let Some(alias) = &entry.invoke_target {
            self.aliases
                .insert(alias.clone(), entry.canonical_id.clone());
        }
        self.entries.insert(entry.canonical_id.clone(), entry);
    }

    /// Merge one descriptor record.
    ///
    /// A record matching a seeded entry keeps the seed's verified limits
    /// and only overlays the descriptor's name and alias; an unseeded
    /// record synthesizes a fresh entry.
    fn apply_descriptor(&mut self, descriptor: ModelDescriptor) {
        let mut entry = match self.entries.get(&descriptor.model_id) {
            Some(existing) => existing.clone(),
            None => {
                let family = descriptor
                    .provider_name
                    .as_deref()
                    .map(ProviderFamily::classify)
                    .filter(|f| *f != ProviderFamily::Unknown)
                    .unwrap_or_else(|| ProviderFamily::classify(&descriptor.model_id));
                ModelEntry::new(&descriptor.model_id, family)
                    .with_display_name(display_label(&descriptor.model_id))
            }
        };

        if let Some(name) = descriptor.model_name {
            entry.display_name = name;
        }
        if let Some(alias) = descriptor.alias_id {
            entry.invoke_target = Some(alias);
        }
        self.insert(entry);
    }

    /// Look up an entry without synthesizing: canonical id first, then
    /// alias.
    pub fn get(&self, identifier: &str) -> Option<&ModelEntry> {
        self.entries.get(identifier).or_else(|| {
            self.aliases
                .get(identifier)
                .and_then(|canonical| self.entries.get(canonical))
        })
    }

    /// Resolve an identifier to an entry, synthesizing one when unknown.
    ///
    /// Synthesized entries classify the identifier, assume the family's
    /// default input limit, and invoke the identifier as given. Resolution
    /// never fails.
    pub fn resolve(&self, identifier: &str) -> ModelEntry {
        if let Some(entry) = self.get(identifier) {
            return entry.clone();
        }
        let family = ProviderFamily::classify(identifier);
        ModelEntry::new(identifier, family)
            .with_display_name(display_label(identifier))
            .with_invoke_target(identifier)
    }

    /// All entries, in no particular order.
    pub fn list(&self) -> Vec<&ModelEntry> {
        self.entries.values().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human-readable label derived from a model id.
///
/// Well-known vendor prefixes are stripped and dashes spaced out; anything
/// else falls back to the id tail.
pub fn display_label(model_id: &str) -> String {
    let short = model_id.rsplit('/').next().unwrap_or(model_id);
    let lower = short.to_ascii_lowercase();
    if lower.contains("claude") {
        cleaned_label(short, "anthropic.")
    } else if lower.contains("titan") {
        cleaned_label(short, "amazon.")
    } else {
        short.to_string()
    }
}

fn cleaned_label(short: &str, vendor_prefix: &str) -> String {
    let stripped = short
        .strip_prefix(vendor_prefix)
        .or_else(|| {
            // Region-scoped ids carry a segment before the vendor.
            short.find(vendor_prefix).map(|i| &short[i + vendor_prefix.len()..])
        })
        .unwrap_or(short);
    stripped.replace('-', " ")
}

/// Raw JSON seed data compiled into the binary.
const EMBEDDED_SEED: &str = include_str!("seed.json");
