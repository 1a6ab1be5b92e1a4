//! IIoT Monitor Core Library
//!
//! Shared functionality for the IIoT sensor monitor:
//! - Insight Evaluator with pluggable per-industry threshold tables
//! - Dashboard presentation helpers (status variants, gauges, trends)
//! - SQLite storage for readings and alerts
//! - History export (CSV, JSON)
//! - Alert dispatch to a notification webhook
//! - Chat assistant over pluggable AI backends (Gemini, Ollama)

pub mod ai;
pub mod alerts;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod prompts;

/// Test utilities including a mock AI/webhook server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, GeminiBackend, MockBackend, OllamaBackend};
pub use alerts::{
    AlertDispatcher, AlertRecord, AlertRequest, AlertSink, DispatchOutcome, WebhookSink,
};
pub use chat::{ChatMessage, ChatSession};
pub use db::Database;
pub use error::{Error, Result};
pub use export::{export_file_name, readings_to_csv, ExportFormat};
pub use insights::{
    AlertLevel, Insight, InsightEvaluator, InsightStatus, SensorCard, StatusVariant,
    ThresholdRegistry, ThresholdTable, Trend,
};
pub use models::{Industry, NewReading, SensorReading, SensorType, TimeRange};
