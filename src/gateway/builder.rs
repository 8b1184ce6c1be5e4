//! Builder for configuring gateway instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::ModelGate;
use crate::directory::{self, ModelDescriptor, ModelDirectory};
use crate::transport::{HttpTransport, StreamingTransport, TransportConfig};
use crate::Result;

/// Environment variable consulted for the bearer token when none is set
/// explicitly.
pub const API_TOKEN_ENV: &str = "MODELGATE_API_TOKEN";

const DEFAULT_REGION: &str = "us-east-1";

/// Builder for [`ModelGate`] instances.
///
/// Credentials may be absent at build time; their absence only surfaces
/// as an authentication failure when an invocation is attempted.
pub struct ModelGateBuilder {
    region: Option<String>,
    api_token: Option<String>,
    endpoint: Option<String>,
    transport_config: TransportConfig,
    descriptors: Option<Vec<ModelDescriptor>>,
    descriptor_path: Option<PathBuf>,
    directory: Option<ModelDirectory>,
    transport: Option<Arc<dyn StreamingTransport>>,
}

impl ModelGateBuilder {
    pub fn new() -> Self {
        Self {
            region: None,
            api_token: None,
            endpoint: None,
            transport_config: TransportConfig::default(),
            descriptors: None,
            descriptor_path: None,
            directory: None,
            transport: None,
        }
    }

    /// Region used to derive the default endpoint (default: `us-east-1`).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Bearer token presented to the endpoint.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Override the endpoint URL (testing, gateway-compatible proxies).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// TCP/TLS connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.connect_timeout = timeout;
        self
    }

    /// Bound on receiving response headers.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.request_timeout = timeout;
        self
    }

    /// Per-chunk read bound while streaming.
    pub fn idle_read_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.idle_read_timeout = timeout;
        self
    }

    /// Supply descriptor records directly, skipping environment sources.
    pub fn descriptors(mut self, descriptors: Vec<ModelDescriptor>) -> Self {
        self.descriptors = Some(descriptors);
        self
    }

    /// Read descriptor records from a JSON file. An unreadable file logs
    /// a warning and degrades to the embedded seed only.
    pub fn descriptor_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor_path = Some(path.into());
        self
    }

    /// Inject a fully built directory, bypassing seed and descriptors.
    pub fn directory(mut self, directory: ModelDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Inject a custom transport (testing, alternative signing schemes).
    pub fn transport(mut self, transport: Arc<dyn StreamingTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the gateway. The directory is constructed exactly once here
    /// and is immutable for the gateway's lifetime.
    pub fn build(self) -> Result<ModelGate> {
        let directory = match self.directory {
            Some(directory) => directory,
            None => {
                let descriptors = match (self.descriptors, &self.descriptor_path) {
                    (Some(descriptors), _) => descriptors,
                    (None, Some(path)) => match directory::load_file(path) {
                        Ok(records) => records,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e,
                                "descriptor source unreadable, using embedded seed only");
                            Vec::new()
                        }
                    },
                    (None, None) => directory::from_env(),
                };
                ModelDirectory::from_descriptors(descriptors)
            }
        };

        let transport: Arc<dyn StreamingTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let token = self
                    .api_token
                    .or_else(|| std::env::var(API_TOKEN_ENV).ok());
                let transport = match self.endpoint {
                    Some(endpoint) => {
                        HttpTransport::with_endpoint(endpoint, token, self.transport_config)?
                    }
                    None => HttpTransport::new(
                        self.region.as_deref().unwrap_or(DEFAULT_REGION),
                        token,
                        self.transport_config,
                    )?,
                };
                Arc::new(transport)
            }
        };

        Ok(ModelGate::from_parts(Arc::new(directory), transport))
    }
}

impl Default for ModelGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
