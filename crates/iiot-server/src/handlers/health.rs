//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use iiot_core::ai::AIBackend;

#[derive(Debug, Serialize)]
pub struct AiInfo {
    pub backend: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub readings: i64,
    pub threshold_tables: usize,
    pub alert_sink: bool,
    pub chat_sessions: usize,
    pub ai: Option<AiInfo>,
}

/// GET /api/health - Liveness and backend info
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let readings = state.db.count_readings()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        readings,
        threshold_tables: state.evaluator.registry().len(),
        alert_sink: state.alerts.has_sink(),
        chat_sessions: state.chat_sessions.active_count().await,
        ai: state.ai.as_ref().map(|client| AiInfo {
            backend: client.backend_name().to_string(),
            model: client.model().to_string(),
        }),
    }))
}
