use crate::error::AppError;
use async_trait::async_trait;

/// Defines the public interface for a language model actor.
///
/// The router only needs plain text in and plain text out, so a hosted API, a local
/// model or a scripted test double can stand behind this trait.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Generates a complete text answer for `prompt`.
    async fn generate(&self, prompt: String) -> Result<String, AppError>;
}
