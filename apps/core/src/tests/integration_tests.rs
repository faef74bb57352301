//! Integration Tests
//!
//! End-to-end routing through the real language model actor (against a mocked
//! Gemini endpoint), the mock student database and the campus location store.

use crate::actors::LlmActorHandle;
use crate::assistant::{AssistantService, APOLOGY_MESSAGE};
use crate::campus::LocationStore;
use crate::config::LlmConfig;
use crate::database::{MockDatabase, StudentDataSource};
use crate::models::{NewReminder, SessionContext};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 9).unwrap()
}

fn build_assistant(
    server: &MockServer,
    database: Arc<MockDatabase>,
) -> AssistantService<LlmActorHandle, MockDatabase> {
    let config = LlmConfig {
        api_url: format!("{}{}", server.uri(), GENERATE_PATH),
        api_key: "integration-key".to_string(),
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    let llm = LlmActorHandle::new(config).expect("Failed to start LLM actor");
    AssistantService::new(Arc::new(llm), database, Arc::new(LocationStore::new()))
        .with_clock(Arc::new(monday))
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

fn student() -> SessionContext {
    SessionContext::authenticated("AGS22BCDS001")
}

// ============================================================================
// Workflows
// ============================================================================

#[cfg(test)]
mod workflow_tests {
    use super::*;

    #[tokio::test]
    async fn test_schedule_answer_with_model_addendum() {
        // 1. Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(reply("Your first class starts at 9."))
            .expect(1)
            .mount(&server)
            .await;
        let assistant = build_assistant(&server, Arc::new(MockDatabase::new()));

        // 2. Act
        let answer = assistant
            .process_query(&student(), "What's my schedule for tomorrow?")
            .await;

        // 3. Assert
        assert!(answer.starts_with("Here's your schedule for tomorrow (Tuesday):\n\n"));
        assert!(answer.contains("• Algorithms Lab (CS202)\n  4:00 PM - 5:30 PM"));
        assert!(answer.ends_with("Additional information:\nYour first class starts at 9."));
    }

    #[tokio::test]
    async fn test_anonymous_prompt_carries_login_notice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "You are a helpful college assistant. Please answer the following question concisely and accurately: As a college assistant, I can only access your personal data when you're logged in. What is the capital of France?"}]}]
            })))
            .respond_with(reply("Paris."))
            .expect(1)
            .mount(&server)
            .await;
        let assistant = build_assistant(&server, Arc::new(MockDatabase::new()));

        let answer = assistant
            .process_query(&SessionContext::anonymous(), "What is the capital of France?")
            .await;

        assert_eq!(answer, "Paris.");
    }

    #[tokio::test]
    async fn test_model_error_becomes_apology() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid."}
            })))
            .mount(&server)
            .await;
        let assistant = build_assistant(&server, Arc::new(MockDatabase::new()));

        let answer = assistant
            .process_query(&student(), "Explain the theory of relativity")
            .await;

        assert_eq!(answer, APOLOGY_MESSAGE);
    }

    #[tokio::test]
    async fn test_added_reminder_shows_in_command_listing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("unused"))
            .expect(0)
            .mount(&server)
            .await;
        let database = Arc::new(MockDatabase::new());
        let assistant = build_assistant(&server, database.clone());

        let created = database
            .add_reminder(
                "AGS22BCDS001",
                NewReminder {
                    title: "Pay hostel fees".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
                    time: "10:00".to_string(),
                    description: "Accounts office, ground floor".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, "REM103");

        let answer = assistant.process_query(&student(), "!reminders").await;

        assert!(answer.starts_with("Here are your reminders:\n\n• Study for CS101 Exam"));
        assert!(answer.ends_with(
            "• Pay hostel fees\n  Date: 12/20/2024, Time: 10:00\n  Accounts office, ground floor"
        ));
    }

    #[tokio::test]
    async fn test_navigation_never_calls_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("unused"))
            .expect(0)
            .mount(&server)
            .await;
        let assistant = build_assistant(&server, Arc::new(MockDatabase::new()));

        let answer = assistant
            .process_query(&student(), "What's nearby Central Library?")
            .await;

        assert!(answer.starts_with("Places near Central Library:"));
    }
}
