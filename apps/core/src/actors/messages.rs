use crate::error::AppError;
use tokio::sync::oneshot;

/// Messages that can be sent to the language model actor.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request to generate a complete text response.
    Generate {
        prompt: String,
        /// A channel to send the final `String` result back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}
