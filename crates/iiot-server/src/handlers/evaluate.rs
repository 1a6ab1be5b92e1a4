//! Evaluation handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use iiot_core::alerts::{AlertRequest, DispatchOutcome};
use iiot_core::chat::enhanced_insight;
use iiot_core::insights::{Insight, StatusVariant, ThresholdTable};
use iiot_core::models::{NewReading, SensorType};

/// Request to evaluate one reading
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    /// Sensor name (case-insensitive, e.g. "temperature", "Gas")
    pub sensor: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Also store the reading
    #[serde(default)]
    pub record: bool,
    /// Ask the AI backend for commentary
    #[serde(default)]
    pub enhance: bool,
    /// Dispatch an alert to this recipient when the insight warrants one
    #[serde(default)]
    pub alert_recipient: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub insight: Insight,
    pub variant: StatusVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<DispatchOutcome>,
}

/// POST /api/evaluate - Classify a reading
///
/// Evaluation itself never fails. Recording requires a known sensor type.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let insight = state
        .evaluator
        .evaluate(&req.sensor, req.value, &req.unit, req.industry.as_deref());

    debug!(
        sensor = %req.sensor,
        value = req.value,
        status = insight.status.as_str(),
        "Evaluated reading"
    );

    let reading_id = if req.record {
        let sensor = SensorType::normalize(&req.sensor)
            .ok_or_else(|| AppError::bad_request(&format!("Unknown sensor type: {}", req.sensor)))?;
        let mut reading = NewReading::new(sensor, req.value, req.unit.trim());
        if let Some(location) = req.location.as_deref().filter(|l| !l.trim().is_empty()) {
            reading = reading.with_location(location.trim());
        }
        Some(state.db.insert_reading(&reading).map_err(AppError::from_core)?)
    } else {
        None
    };

    let ai_insight = if req.enhance {
        let location = req.location.as_deref().unwrap_or("Unknown");
        Some(enhanced_insight(state.ai.as_ref(), &req.sensor, location, req.value, &req.unit).await)
    } else {
        None
    };

    let alert = match req.alert_recipient.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(recipient) => {
            match AlertRequest::from_insight(recipient, &req.sensor, req.value, &req.unit, &insight) {
                Some(alert) => Some(
                    state
                        .alerts
                        .dispatch(&alert)
                        .await
                        .map_err(AppError::from_core)?,
                ),
                None => None,
            }
        }
        None => None,
    };

    Ok(Json(EvaluateResponse {
        variant: insight.variant(),
        insight,
        reading_id,
        ai_insight,
        alert,
    }))
}

/// GET /api/thresholds - Active threshold tables, defaults first
pub async fn list_thresholds(State(state): State<Arc<AppState>>) -> Json<Vec<ThresholdTable>> {
    let mut tables: Vec<ThresholdTable> = state.evaluator.registry().tables().cloned().collect();
    tables.sort_by_key(|t| t.key());

    Json(tables)
}
