//! Pluggable AI backend abstraction
//!
//! The chat assistant and the enhanced insight text go through this module.
//! Nothing in the evaluator depends on it: with no backend configured the
//! assistant answers with fixed fallback text.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, ollama, mock). Default: gemini when
//!   `GEMINI_API_KEY` is set, otherwise ollama when `OLLAMA_HOST` is set
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod gemini;
mod mock;
mod ollama;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use ollama::OllamaBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Complete a prompt, returning the model's text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name used for generation
    fn model(&self) -> &str;

    /// Backend host URL
    fn host(&self) -> &str;
}

/// Concrete AI client over the supported backends
#[derive(Clone)]
pub enum AIClient {
    Gemini(GeminiBackend),
    Ollama(OllamaBackend),
    Mock(MockBackend),
}

impl AIClient {
    /// Create from environment variables
    ///
    /// Returns `None` when the selected backend is not configured.
    pub fn from_env() -> Option<Self> {
        let backend = match std::env::var("AI_BACKEND") {
            Ok(b) => b,
            Err(_) if std::env::var("GEMINI_API_KEY").is_ok() => "gemini".to_string(),
            Err(_) => "ollama".to_string(),
        };

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env().map(AIClient::Gemini),
            "ollama" => OllamaBackend::from_env().map(AIClient::Ollama),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AIClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str, model: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(api_key, model))
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Short backend name for status output
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::Ollama(_) => "ollama",
            AIClient::Mock(_) => "mock",
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(prompt).await,
            AIClient::Ollama(b) => b.generate(prompt).await,
            AIClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockAiServer;

    #[tokio::test]
    async fn test_mock_client_dispatch() {
        let client = AIClient::mock();
        assert_eq!(client.backend_name(), "mock");
        assert!(client.health_check().await);
        assert!(!client.generate("hello").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ollama_backend_against_mock_server() {
        let server = MockAiServer::start().await;
        let client = AIClient::ollama(&server.url(), "llama3.2");
        assert!(client.health_check().await);
        let reply = client.generate("Is the greenhouse too warm?").await.unwrap();
        assert!(reply.contains("greenhouse"));
        assert_eq!(client.model(), "llama3.2");
    }

    #[tokio::test]
    async fn test_gemini_backend_against_mock_server() {
        let server = MockAiServer::start().await;
        let client = AIClient::Gemini(
            GeminiBackend::new("test-key", "gemini-1.5-flash").with_host(&server.url()),
        );
        assert!(client.health_check().await);
        let reply = client.generate("Is the greenhouse too warm?").await.unwrap();
        assert!(reply.contains("greenhouse"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unhealthy() {
        let client = AIClient::ollama("http://127.0.0.1:9", "llama3.2");
        assert!(!client.health_check().await);
        assert!(client.generate("hi").await.is_err());
    }
}
