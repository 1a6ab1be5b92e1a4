//! Dashboard presentation helpers: trend, gauge and sensor cards

use serde::{Deserialize, Serialize};

use super::engine::InsightEvaluator;
use super::types::{Insight, InsightStatus, StatusVariant};
use crate::models::{Industry, SensorReading, SensorType};

/// Direction of a sensor's recent history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl Trend {
    /// Compare the first and last values of a history (oldest first)
    ///
    /// Needs more than two points; anything within ±5% of the first value is
    /// stable.
    pub fn from_values(values: &[f64]) -> Self {
        if values.len() <= 2 {
            return Trend::Stable;
        }
        let first = values[0];
        let last = values[values.len() - 1];
        if last > first * 1.05 {
            Trend::Rising
        } else if last < first * 0.95 {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }

    pub fn from_readings(readings: &[SensorReading]) -> Self {
        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        Self::from_values(&values)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }
}

/// Colour band of a gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeTone {
    Primary,
    Warning,
    Destructive,
}

/// Fill level and tone for a gauge widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    /// 0-100
    pub percentage: f64,
    pub tone: GaugeTone,
}

impl Gauge {
    pub fn for_reading(sensor: SensorType, value: f64) -> Self {
        Self {
            percentage: gauge_percentage(sensor, value),
            tone: gauge_tone(sensor, value),
        }
    }
}

/// Temperature fills against a 50°C scale, everything else is already a percentage
pub fn gauge_percentage(sensor: SensorType, value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let raw = match sensor {
        SensorType::Temperature => value / 50.0 * 100.0,
        _ => value,
    };
    raw.clamp(0.0, 100.0)
}

pub fn gauge_tone(sensor: SensorType, value: f64) -> GaugeTone {
    match sensor {
        SensorType::Temperature if value > 35.0 => GaugeTone::Destructive,
        SensorType::Temperature if value > 30.0 => GaugeTone::Warning,
        _ => GaugeTone::Primary,
    }
}

/// Insight shown for a sensor that has not reported
pub fn offline(sensor: SensorType) -> Insight {
    Insight::new(
        InsightStatus::Offline,
        format!(
            "No data received from {}. The sensor may be disconnected or malfunctioning.",
            sensor.display_name()
        ),
        "Verify sensor power supply and network connection.",
    )
}

/// Everything the dashboard needs for one sensor tile
#[derive(Debug, Clone, Serialize)]
pub struct SensorCard {
    pub sensor_type: SensorType,
    pub title: String,
    pub reading: Option<SensorReading>,
    pub insight: Insight,
    pub variant: StatusVariant,
    pub trend: Trend,
    pub gauge: Option<Gauge>,
}

impl SensorCard {
    /// Build a card from the latest reading and its history (oldest first)
    pub fn build(
        evaluator: &InsightEvaluator,
        sensor: SensorType,
        latest: Option<SensorReading>,
        history: &[SensorReading],
        industry: Option<Industry>,
    ) -> Self {
        let insight = match &latest {
            Some(r) => evaluator.evaluate_typed(sensor, r.value, &r.unit, industry),
            None => offline(sensor),
        };
        let gauge = latest.as_ref().map(|r| Gauge::for_reading(sensor, r.value));
        let title = latest
            .as_ref()
            .map(|r| r.sensor_name.clone())
            .unwrap_or_else(|| sensor.display_name().to_string());

        Self {
            sensor_type: sensor,
            title,
            variant: insight.variant(),
            trend: Trend::from_readings(history),
            reading: latest,
            insight,
            gauge,
        }
    }

    pub fn is_online(&self) -> bool {
        self.reading.is_some()
    }
}
