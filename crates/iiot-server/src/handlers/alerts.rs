//! Alert handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use iiot_core::alerts::{AlertRecord, AlertRequest, DispatchOutcome};

/// Query parameters for listing alerts
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// GET /api/alerts - Most recent alerts first
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AlertQuery>,
) -> Result<Json<Vec<AlertRecord>>, AppError> {
    let alerts = state.db.list_alerts(params.limit.min(MAX_PAGE_LIMIT))?;
    Ok(Json(alerts))
}

/// POST /api/alerts - Store an alert and forward it to the notification sink
///
/// Delivery failures are reported in the outcome; the alert stays stored.
pub async fn send_alert(
    State(state): State<Arc<AppState>>,
    Json(alert): Json<AlertRequest>,
) -> Result<Json<DispatchOutcome>, AppError> {
    let outcome = state
        .alerts
        .dispatch(&alert)
        .await
        .map_err(AppError::from_core)?;
    Ok(Json(outcome))
}
