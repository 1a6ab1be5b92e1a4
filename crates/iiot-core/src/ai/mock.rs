//! Mock backend for testing
//!
//! Useful for unit tests and development without an API key or LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// Mock AI backend for testing
///
/// Returns a fixed reply, or fails every call when unhealthy.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: String,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: "Readings look stable. Keep monitoring and check any sensor flagged as critical first."
                .to_string(),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Use a custom reply
    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if !self.healthy {
            return Err(Error::Ai("Mock backend is unavailable".to_string()));
        }
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
