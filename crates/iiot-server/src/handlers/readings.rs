//! Reading handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use iiot_core::insights::{Insight, StatusVariant};
use iiot_core::models::{NewReading, SensorReading, SensorType};

/// Query parameters for listing readings
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub sensor_name: Option<String>,
}

fn default_limit() -> usize {
    100
}

/// GET /api/readings - Most recent readings first
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReadingsQuery>,
) -> Result<Json<Vec<SensorReading>>, AppError> {
    let limit = params.limit.min(MAX_PAGE_LIMIT);
    let sensor_name = params.sensor_name.as_deref().filter(|s| !s.trim().is_empty());
    let readings = state.db.recent_readings(limit, sensor_name)?;
    Ok(Json(readings))
}

/// Request to record a reading
#[derive(Debug, Deserialize)]
pub struct RecordReadingRequest {
    /// Sensor type (e.g. "temperature")
    pub sensor: String,
    pub value: f64,
    /// Defaults to the sensor type's usual unit
    #[serde(default)]
    pub unit: Option<String>,
    /// Display name; defaults to the sensor type's name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordReadingResponse {
    pub id: i64,
    pub insight: Insight,
    pub variant: StatusVariant,
}

/// POST /api/readings - Record a reading and classify it
pub async fn record_reading(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordReadingRequest>,
) -> Result<(StatusCode, Json<RecordReadingResponse>), AppError> {
    let sensor = SensorType::normalize(&req.sensor)
        .ok_or_else(|| AppError::bad_request(&format!("Unknown sensor type: {}", req.sensor)))?;
    let unit = req
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| sensor.default_unit());

    let mut reading = NewReading::new(sensor, req.value, unit);
    if let Some(name) = req.name.as_deref().filter(|n| !n.trim().is_empty()) {
        reading = reading.with_name(name.trim());
    }
    if let Some(location) = req.location.as_deref().filter(|l| !l.trim().is_empty()) {
        reading = reading.with_location(location.trim());
    }

    let id = state.db.insert_reading(&reading).map_err(AppError::from_core)?;
    let industry = req.industry.as_deref().and_then(|i| i.parse().ok());
    let insight = state.evaluator.evaluate_typed(sensor, req.value, unit, industry);

    Ok((
        StatusCode::CREATED,
        Json(RecordReadingResponse {
            id,
            variant: insight.variant(),
            insight,
        }),
    ))
}
