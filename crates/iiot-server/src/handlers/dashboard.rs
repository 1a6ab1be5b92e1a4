//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use iiot_core::insights::SensorCard;
use iiot_core::models::{Industry, SensorType, TimeRange};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub industry: Option<Industry>,
    pub cards: Vec<SensorCard>,
    pub online: usize,
    /// Cards whose insight warrants an alert
    pub alerts: usize,
}

/// GET /api/dashboard - One card per sensor
///
/// The four core sensors always appear (offline when silent); other sensor
/// types appear once they have reported.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let industry = match params.industry.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(name) => Some(
            name.parse::<Industry>()
                .map_err(|e| AppError::bad_request(&e))?,
        ),
        None => None,
    };

    let since = TimeRange::LastDay.since(Utc::now());
    let mut cards = Vec::new();

    for sensor in SensorType::all() {
        let latest = state.db.latest_reading(*sensor)?;
        if latest.is_none() && !sensor.is_core() {
            continue;
        }
        let history = state.db.reading_history(*sensor, since)?;
        cards.push(SensorCard::build(
            &state.evaluator,
            *sensor,
            latest,
            &history,
            industry,
        ));
    }

    let online = cards.iter().filter(|c| c.is_online()).count();
    let alerts = cards
        .iter()
        .filter(|c| c.insight.alert_level.should_alert())
        .count();

    Ok(Json(DashboardResponse {
        industry,
        cards,
        online,
        alerts,
    }))
}
