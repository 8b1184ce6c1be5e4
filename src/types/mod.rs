//! Public types for the modelgate API.

mod event;
mod message;
mod model;
mod options;

pub use event::TextDelta;
pub use message::{Message, Role};
pub use model::ModelEntry;
pub use options::GenerationOptions;
