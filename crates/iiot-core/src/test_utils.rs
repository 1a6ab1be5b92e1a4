//! Test utilities for iiot-core
//!
//! A mock HTTP server speaking just enough of the Ollama and Gemini APIs for
//! backend tests, plus a webhook endpoint that records alert payloads.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

type Received = Arc<Mutex<Vec<Value>>>;

/// Mock AI/webhook server for testing and development
pub struct MockAiServer {
    addr: SocketAddr,
    received: Received,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let received: Received = Arc::default();
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route(
                "/v1beta/models/:model",
                get(handle_gemini_model).post(handle_gemini_generate),
            )
            .route("/webhook", post(handle_webhook))
            .route("/webhook/fail", post(handle_webhook_fail))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Payloads POSTed to `/webhook`
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn mock_reply(prompt: &str) -> String {
    let question = prompt.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
    format!("Mock analysis: {}", question.trim())
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<Value> {
    Json(json!({ "models": [{ "name": "llama3.2:latest" }] }))
}

#[derive(Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

/// Ollama generate endpoint
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<Value> {
    Json(json!({
        "model": request.model,
        "response": mock_reply(&request.prompt),
        "done": true,
    }))
}

async fn handle_gemini_model(Path(model): Path<String>) -> Json<Value> {
    Json(json!({ "name": format!("models/{}", model) }))
}

/// Gemini `models/{model}:generateContent`
async fn handle_gemini_generate(Path(_model): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    Json(json!({
        "candidates": [{ "content": { "parts": [{ "text": mock_reply(prompt) }] } }]
    }))
}

async fn handle_webhook(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
    received.lock().unwrap().push(body);
    StatusCode::NO_CONTENT
}

async fn handle_webhook_fail() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}
