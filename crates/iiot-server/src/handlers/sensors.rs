//! Sensor detail handlers: history and export

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::Response,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use iiot_core::export::{export_file_name, ExportFormat};
use iiot_core::insights::Trend;
use iiot_core::models::{SensorReading, SensorType, TimeRange};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl HistoryQuery {
    fn range(&self) -> Result<TimeRange, AppError> {
        match self.range.as_deref() {
            Some(r) => r.parse().map_err(|e: String| AppError::bad_request(&e)),
            None => Ok(TimeRange::default()),
        }
    }

    fn format(&self) -> Result<ExportFormat, AppError> {
        match self.format.as_deref() {
            Some(f) => f.parse().map_err(|e: String| AppError::bad_request(&e)),
            None => Ok(ExportFormat::default()),
        }
    }
}

fn parse_sensor(sensor: &str) -> Result<SensorType, AppError> {
    SensorType::normalize(sensor)
        .ok_or_else(|| AppError::not_found(&format!("Unknown sensor type: {}", sensor)))
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub sensor_type: SensorType,
    pub range: TimeRange,
    pub trend: Trend,
    pub readings: Vec<SensorReading>,
}

/// GET /api/sensors/:sensor/history - Readings in a time range, oldest first
pub async fn sensor_history(
    State(state): State<Arc<AppState>>,
    Path(sensor): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let sensor = parse_sensor(&sensor)?;
    let range = params.range()?;

    let readings = state.db.reading_history(sensor, range.since(Utc::now()))?;

    Ok(Json(HistoryResponse {
        sensor_type: sensor,
        range,
        trend: Trend::from_readings(&readings),
        readings,
    }))
}

/// GET /api/sensors/:sensor/export - Download history as CSV (or JSON)
pub async fn export_sensor(
    State(state): State<Arc<AppState>>,
    Path(sensor): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Response, AppError> {
    let sensor = parse_sensor(&sensor)?;
    let range = params.range()?;
    let format = params.format()?;

    let content = state.db.export_history(sensor, range, format, Utc::now())?;
    let filename = export_file_name(sensor, range, format);

    Response::builder()
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(content))
        .map_err(|e| AppError::internal(&e.to_string()))
}
