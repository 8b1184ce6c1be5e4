//! Modelgate - streaming inference gateway for managed model-hosting endpoints
//!
//! This crate accepts a model identifier plus a conversation and produces a
//! normalized stream of text deltas, hiding the fact that different hosted
//! model families expect different request shapes, different token-limit
//! semantics, and emit differently-structured streamed chunks.
//!
//! Per invocation the gateway classifies the target model into a closed
//! [`ProviderFamily`], bounds the conversation to the family's input
//! sensitivity, builds the family's wire payload, dispatches it (retrying
//! schema-gated families through an ordered list of fallback payload
//! shapes), and parses the heterogeneous chunked response into one uniform
//! event shape.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use modelgate::{GenerationOptions, Message, ModelGate};
//!
//! #[tokio::main]
//! async fn main() -> modelgate::Result<()> {
//!     let gateway = ModelGate::builder()
//!         .region("us-east-1")
//!         .api_token("your-token")
//!         .build()?;
//!
//!     let mut deltas = gateway
//!         .stream_text(
//!             "anthropic.claude-3-sonnet-20240229-v1:0",
//!             &[
//!                 Message::system("You are a helpful assistant."),
//!                 Message::user("Describe a landing page for a bakery."),
//!             ],
//!             &GenerationOptions::default(),
//!         )
//!         .await?;
//!
//!     while let Some(delta) = deltas.next().await {
//!         print!("{}", delta?.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod directory;
pub mod error;
pub mod family;
pub mod gateway;
pub mod invoke;
pub mod request;
pub mod stream;
pub mod telemetry;
pub mod transport;
pub mod truncate;
pub mod types;

// Re-export main types at crate root
pub use error::{GatewayError, Result};
pub use family::ProviderFamily;
pub use gateway::{ModelGate, ModelGateBuilder};

// Re-export all types
pub use directory::{ModelDescriptor, ModelDirectory};
pub use request::PayloadShape;
pub use stream::DeltaStream;
pub use transport::{HttpTransport, RawChunkStream, StreamingTransport, TransportConfig};
pub use types::{GenerationOptions, Message, ModelEntry, Role, TextDelta};
