//! Chat assistant
//!
//! A [`ChatSession`] owns one conversation. Callers hold the session (the
//! server keeps them in a session map) and pass it in for each turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{AIBackend, AIClient};
use crate::prompts;

pub const GREETING: &str =
    "Hello! I'm your AI assistant. How can I help you with your sensor data today?";
pub const CHAT_UNAVAILABLE: &str = "AI chat unavailable. API key not configured.";
pub const CHAT_FAILED: &str = "Sorry, I couldn't process that. Please try again.";
pub const ANALYSIS_UNAVAILABLE: &str = "AI analysis unavailable. API key not configured.";
pub const ANALYSIS_FAILED: &str = "Could not retrieve AI-powered insight.";

/// Default number of messages a session keeps
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            sent_at: Utc::now(),
        }
    }
}

/// One conversation with the assistant
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    #[serde(skip)]
    limit: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New session opening with the greeting
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Keep at most `limit` messages (oldest dropped first)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            limit: limit.max(2),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.limit {
            let excess = self.messages.len() - self.limit;
            self.messages.drain(..excess);
        }
    }

    /// History as `User: ...` / `AI: ...` lines
    pub fn history_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", if m.is_user { "User" } else { "AI" }, m.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Run one turn: record the message, ask the backend, record the reply
    ///
    /// Never fails; backend problems become the fallback reply.
    pub async fn respond(
        &mut self,
        ai: Option<&AIClient>,
        message: &str,
        context: Option<&str>,
    ) -> String {
        let prompt = prompts::chat_prompt(&self.history_text(), message, context);
        self.push(ChatMessage::user(message.trim()));

        let reply = match ai {
            None => CHAT_UNAVAILABLE.to_string(),
            Some(client) => match client.generate(&prompt).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => CHAT_FAILED.to_string(),
                Err(e) => {
                    warn!(backend = client.backend_name(), error = %e, "Chat generation failed");
                    CHAT_FAILED.to_string()
                }
            },
        };

        self.push(ChatMessage::assistant(reply.clone()));
        reply
    }
}

/// AI commentary on a single reading, with the fixed fallbacks
pub async fn enhanced_insight(
    ai: Option<&AIClient>,
    sensor: &str,
    location: &str,
    value: f64,
    unit: &str,
) -> String {
    let Some(client) = ai else {
        return ANALYSIS_UNAVAILABLE.to_string();
    };
    let prompt = prompts::enhanced_insight_prompt(sensor, location, value, unit);
    match client.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => ANALYSIS_FAILED.to_string(),
        Err(e) => {
            warn!(backend = client.backend_name(), error = %e, "Insight generation failed");
            ANALYSIS_FAILED.to_string()
        }
    }
}
