// Campus Assistant terminal entry point.
// Reads questions from stdin and prints the router's answers.

use anyhow::{Context, Result};
use campus_assistant_core::actors::LlmActorHandle;
use campus_assistant_core::assistant::AssistantService;
use campus_assistant_core::campus::LocationStore;
use campus_assistant_core::config::AppConfig;
use campus_assistant_core::database::MockDatabase;
use campus_assistant_core::models::SessionContext;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let json = std::env::var("CAMPUS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_target(true)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.llm.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; language model calls will be rejected");
    }

    let llm = LlmActorHandle::new(config.llm.clone()).context("failed to start language model actor")?;
    let assistant = AssistantService::new(
        Arc::new(llm),
        Arc::new(MockDatabase::new()),
        Arc::new(LocationStore::new()),
    )
    .with_demo_student_id(config.demo_student_id.clone());

    info!("Campus assistant ready");
    let mut session = SessionContext::anonymous();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Ask a question. Commands: :login <id>, :logout, :quit\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let reply = match input.split_once(' ').map_or((input, ""), |(c, rest)| (c, rest.trim())) {
            ("", _) => None,
            (":quit", _) => break,
            (":login", id) => {
                let id = if id.is_empty() { config.demo_student_id.as_str() } else { id };
                session = SessionContext::authenticated(id);
                Some(format!("Logged in as {}.", id))
            }
            (":logout", _) => {
                session = SessionContext::anonymous();
                Some("Logged out.".to_string())
            }
            _ => Some(assistant.process_query(&session, input).await),
        };

        if let Some(reply) = reply {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    info!("Campus assistant stopped");
    Ok(())
}
