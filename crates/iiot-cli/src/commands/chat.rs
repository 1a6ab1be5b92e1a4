//! Assistant command

use anyhow::{Context, Result};
use iiot_core::ai::{AIBackend, AIClient};
use iiot_core::chat::ChatSession;
use iiot_core::db::Database;
use iiot_core::prompts::sensor_context;

/// Readings passed to the assistant as context
const CONTEXT_READINGS: usize = 10;

pub async fn cmd_chat(db: &Database, message: &str, sensor: Option<&str>) -> Result<()> {
    let ai = AIClient::from_env();
    match &ai {
        Some(client) => println!("🤖 {} ({})", client.backend_name(), client.model()),
        None => println!("💡 Tip: Set GEMINI_API_KEY or OLLAMA_HOST to enable the assistant"),
    }

    let readings = db
        .recent_readings(CONTEXT_READINGS, sensor)
        .context("Failed to load recent readings")?;
    let context = sensor_context(&readings);

    let mut session = ChatSession::new();
    let reply = session.respond(ai.as_ref(), message, Some(&context)).await;

    println!();
    println!("{}", reply);

    Ok(())
}
