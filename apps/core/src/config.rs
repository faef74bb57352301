//! Runtime configuration loaded from the environment.
//!
//! Values are read after `dotenv` has populated the process environment, then
//! validated before any actor is spawned.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use url::Url;
use validator::Validate;

pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

pub const DEFAULT_PERSONA_PREFIX: &str =
    "You are a helpful college assistant. Please answer the following question concisely and accurately: ";

/// Student ID used when the session does not carry one.
pub const DEMO_STUDENT_ID: &str = "12345";

/// Generation parameters and endpoint for the language model.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct LlmConfig {
    /// Full `generateContent` endpoint, without the `key` query parameter.
    #[validate(length(min = 1))]
    pub api_url: String,
    /// API key appended as `?key=`. May be empty for local mock endpoints.
    pub api_key: String,
    /// Text prepended to every prompt sent to the model.
    #[validate(length(min = 1))]
    pub persona_prefix: String,
    /// Controls the creativity of the model's responses. Value between 0.0 and 2.0.
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_output_tokens: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f32,
    #[validate(range(min = 1))]
    pub top_k: u32,
    /// Upper bound for one generate round trip, in seconds.
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            persona_prefix: DEFAULT_PERSONA_PREFIX.to_string(),
            temperature: 0.7,
            max_output_tokens: 512,
            top_p: 0.8,
            top_k: 40,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Endpoint URL with the API key attached.
    pub fn request_url(&self) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.api_url)?;
        if !self.api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub llm: LlmConfig,
    #[validate(length(min = 1))]
    pub demo_student_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            demo_student_id: DEMO_STUDENT_ID.to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = LlmConfig::default();
        let llm = LlmConfig {
            api_url: env::var("GEMINI_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            persona_prefix: env::var("LLM_PERSONA_PREFIX").unwrap_or(defaults.persona_prefix),
            temperature: parse_var("LLM_TEMPERATURE", defaults.temperature)?,
            max_output_tokens: parse_var("LLM_MAX_OUTPUT_TOKENS", defaults.max_output_tokens)?,
            top_p: parse_var("LLM_TOP_P", defaults.top_p)?,
            top_k: parse_var("LLM_TOP_K", defaults.top_k)?,
            timeout_secs: parse_var("LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
        };

        let config = Self {
            llm,
            demo_student_id: env::var("CAMPUS_DEMO_STUDENT_ID")
                .unwrap_or_else(|_| DEMO_STUDENT_ID.to_string()),
        };

        config.validate()?;
        config.llm.request_url()?;
        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
