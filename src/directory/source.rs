//! Descriptor sources for the model directory.
//!
//! The directory is seeded from an ordered list of descriptor records
//! supplied by the deployment. Two sources are tried in order:
//!
//! 1. a CSV environment variable of model ids (fast path, no file access)
//! 2. a JSON file whose path is named by a second environment variable
//!
//! A missing or unreadable source is never fatal: it logs a warning and
//! the directory degrades to the embedded seed plus synthesized entries.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{GatewayError, Result};

/// CSV list of allowed model ids.
pub const ALLOWED_MODELS_ENV: &str = "MODELGATE_ALLOWED_MODELS";

/// Path to a JSON descriptor file.
pub const ALLOWED_MODELS_PATH_ENV: &str = "MODELGATE_ALLOWED_MODELS_PATH";

/// One descriptor record from an external source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub model_id: String,
    #[serde(default)]
    pub alias_id: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

impl ModelDescriptor {
    /// Bare descriptor carrying only a model id.
    pub fn id_only(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Self::default()
        }
    }
}

/// Accept the descriptor-file formats seen in the wild.
///
/// Preferred is an array of descriptor objects; an array of bare id
/// strings and the model-listing wrapper (`{"modelSummaries": [...]}`)
/// are accepted as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Records(Vec<ModelDescriptor>),
    Ids(Vec<String>),
    Summaries {
        #[serde(rename = "modelSummaries")]
        model_summaries: Vec<ModelDescriptor>,
    },
}

/// Parse a descriptor payload in any accepted format.
pub fn parse_descriptors(json: &str) -> Result<Vec<ModelDescriptor>> {
    let payload: RawPayload = serde_json::from_str(json).map_err(|e| {
        GatewayError::Configuration(format!("failed to parse model descriptor JSON: {e}"))
    })?;
    Ok(match payload {
        RawPayload::Records(records) => records,
        RawPayload::Ids(ids) => ids.into_iter().map(ModelDescriptor::id_only).collect(),
        RawPayload::Summaries { model_summaries } => model_summaries,
    })
}

/// Parse a CSV of model ids into bare descriptors. Blank entries dropped.
pub fn parse_csv(csv: &str) -> Vec<ModelDescriptor> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ModelDescriptor::id_only)
        .collect()
}

/// Load descriptors from a JSON file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<ModelDescriptor>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        GatewayError::Configuration(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_descriptors(&raw)
}

/// Load descriptors from the environment: CSV variable first, then the
/// descriptor file. Failures degrade to an empty list with a warning.
pub fn from_env() -> Vec<ModelDescriptor> {
    if let Ok(csv) = std::env::var(ALLOWED_MODELS_ENV) {
        let records = parse_csv(&csv);
        if !records.is_empty() {
            return records;
        }
    }

    match std::env::var(ALLOWED_MODELS_PATH_ENV) {
        Ok(path) if !path.is_empty() => match load_file(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!(path, error = %e, "descriptor source unreadable, using empty list");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}
