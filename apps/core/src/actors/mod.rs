//! Actor layer: the language model runs in its own task behind a channel.

pub mod llm;
pub mod messages;
pub mod traits;

pub use llm::LlmActorHandle;
pub use traits::LlmActor;
