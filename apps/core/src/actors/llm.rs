use crate::actors::messages::LlmMessage;
use crate::actors::traits::LlmActor;
use crate::config::LlmConfig;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

const FALLBACK_ERROR_MESSAGE: &str = "Failed to generate response";

/// Added to the HTTP timeout for the handle-side wait, which also covers queueing.
const HANDLE_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

/// A handle to the language model actor.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    request_timeout: Duration,
}

impl LlmActorHandle {
    /// Spawns the actor runner in a new Tokio task and returns a handle to it.
    ///
    /// The runner serves one request at a time, so a call's wait includes time spent
    /// queued behind earlier calls. Requests whose caller has already given up are
    /// skipped without contacting the endpoint.
    ///
    /// Fails if the configured endpoint is not a valid URL.
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel(32);
        let request_timeout = Duration::from_secs(config.timeout_secs) + HANDLE_TIMEOUT_HEADROOM;
        let actor = LlmActorRunner::new(receiver, config)?;
        tokio::spawn(async move { actor.run().await });
        Ok(Self {
            sender,
            request_timeout,
        })
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn generate(&self, prompt: String) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Generate {
            prompt,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }
}

// --- Wire format ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    endpoint: url::Url,
    config: LlmConfig,
    client: Client,
}

impl LlmActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, config: LlmConfig) -> Result<Self, AppError> {
        let endpoint = config.request_url()?;
        Ok(Self {
            receiver,
            endpoint,
            config,
            client: Client::new(),
        })
    }

    async fn run(mut self) {
        info!("LlmActor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("LlmActor stopped");
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::Generate { prompt, responder } => {
                if responder.is_closed() {
                    warn!("Skipping language model request abandoned by its caller");
                    return;
                }
                let result = self.generate_content(prompt).await;
                if let Err(e) = &result {
                    error!("Error generating language model response: {}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    fn build_payload(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(format!("{}{}", self.config.persona_prefix, prompt)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        }
    }

    async fn generate_content(&self, prompt: String) -> Result<String, AppError> {
        debug!("LLM generating for prompt: {}", prompt);

        let payload = self.build_payload(&prompt);
        let request_future = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send();

        let res = timeout(Duration::from_secs(self.config.timeout_secs), request_future).await??;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|env| env.error)
                .and_then(|err| err.message)
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
            return Err(AppError::Llm(message));
        }

        let body: GenerateResponse = res
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                AppError::MalformedResponse("response has no candidate text".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn test_config(server_uri: &str) -> LlmConfig {
        LlmConfig {
            api_url: format!("{}{}", server_uri, GENERATE_PATH),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(test_config(&mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "You are a helpful college assistant. Please answer the following question concisely and accurately: What is entropy?"}]}],
                "generationConfig": {"maxOutputTokens": 512, "topK": 40}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "A measure of disorder."}]}}]
            })))
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle.generate("What is entropy?".to_string()).await;

        // 3. Assert
        assert_eq!(result.unwrap(), "A measure of disorder.");
    }

    #[tokio::test]
    async fn test_generate_error_carries_api_message() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(test_config(&mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid."}
            })))
            .mount(&mock_server)
            .await;

        let result = handle.generate("Hello".to_string()).await;

        match result {
            Err(AppError::Llm(msg)) => assert_eq!(msg, "API key not valid."),
            other => panic!("Expected AppError::Llm, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_error_without_message_uses_fallback() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(test_config(&mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let result = handle.generate("Hello".to_string()).await;

        match result {
            Err(AppError::Llm(msg)) => assert_eq!(msg, FALLBACK_ERROR_MESSAGE),
            other => panic!("Expected AppError::Llm, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_missing_candidates_is_malformed() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(test_config(&mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&mock_server)
            .await;

        let result = handle.generate("Hello".to_string()).await;
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_handle_waits_longer_than_http_timeout() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(test_config(&mock_server.uri())).unwrap();
        assert_eq!(handle.request_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_abandoned_request_is_not_sent() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(test_config(&mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Still here."}]}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (responder, receiver) = oneshot::channel();
        drop(receiver);
        handle
            .sender
            .send(LlmMessage::Generate {
                prompt: "Nobody is waiting".to_string(),
                responder,
            })
            .await
            .unwrap();

        let result = handle.generate("Hello".to_string()).await;
        assert_eq!(result.unwrap(), "Still here.");
    }

    #[tokio::test]
    async fn test_invalid_endpoint_rejected() {
        let config = LlmConfig {
            api_url: "not a url".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(LlmActorHandle::new(config), Err(AppError::Config(_))));
    }
}
