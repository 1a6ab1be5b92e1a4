//! History export
//!
//! Supports:
//! - CSV (`Timestamp,Value,Unit`, RFC 3339 timestamps)
//! - JSON (the readings as stored)

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{SensorReading, SensorType, TimeRange};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Unit")]
    unit: &'a str,
}

/// Render readings as CSV with a `Timestamp,Value,Unit` header
pub fn readings_to_csv(readings: &[SensorReading]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if readings.is_empty() {
        writer.write_record(["Timestamp", "Value", "Unit"])?;
    }
    for reading in readings {
        writer.serialize(CsvRow {
            timestamp: reading
                .observed_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            value: reading.value,
            unit: &reading.unit,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::InvalidData(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

/// Download name for an export, e.g. `temperature_sensor_data_24h.csv`
pub fn export_file_name(sensor: SensorType, range: TimeRange, format: ExportFormat) -> String {
    format!(
        "{}_sensor_data_{}.{}",
        sensor.as_str(),
        range.as_str(),
        format.extension()
    )
}

impl Database {
    /// Export one sensor's history for a time range ending at `now`
    pub fn export_history(
        &self,
        sensor: SensorType,
        range: TimeRange,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let readings = self.reading_history(sensor, range.since(now))?;
        tracing::debug!(
            sensor = sensor.as_str(),
            range = range.as_str(),
            rows = readings.len(),
            "Exporting history"
        );
        match format {
            ExportFormat::Csv => readings_to_csv(&readings),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&readings)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewReading;
    use chrono::TimeZone;

    fn reading(value: f64, unit: &str, at: DateTime<Utc>) -> SensorReading {
        SensorReading {
            id: 0,
            sensor_type: SensorType::Temperature,
            sensor_name: "Temperature".into(),
            value,
            unit: unit.into(),
            location: None,
            observed_at: at,
        }
    }

    #[test]
    fn test_csv_layout() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let csv = readings_to_csv(&[reading(21.5, "°C", at), reading(22.0, "°C", at)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Timestamp,Value,Unit");
        assert_eq!(lines[1], "2024-03-01T12:30:00.000Z,21.5,°C");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_empty_has_header() {
        assert_eq!(readings_to_csv(&[]).unwrap().trim(), "Timestamp,Value,Unit");
    }

    #[test]
    fn test_csv_quotes_awkward_units() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let csv = readings_to_csv(&[reading(1.0, "a,b", at)]).unwrap();
        assert!(csv.contains("\"a,b\""));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            export_file_name(SensorType::Humidity, TimeRange::LastWeek, ExportFormat::Csv),
            "humidity_sensor_data_7d.csv"
        );
        assert_eq!(
            export_file_name(SensorType::Gas, TimeRange::LastDay, ExportFormat::Json),
            "gas_sensor_data_24h.json"
        );
    }

    #[test]
    fn test_export_history_from_db() {
        let db = Database::in_memory().unwrap();
        let now = Utc::now();
        db.insert_reading(&NewReading::new(SensorType::Temperature, 20.0, "°C").observed_at(now))
            .unwrap();
        db.insert_reading(
            &NewReading::new(SensorType::Temperature, 19.0, "°C")
                .observed_at(now - chrono::Duration::days(3)),
        )
        .unwrap();

        let csv = db
            .export_history(SensorType::Temperature, TimeRange::LastDay, ExportFormat::Csv, now)
            .unwrap();
        assert_eq!(csv.lines().count(), 2);

        let json = db
            .export_history(SensorType::Temperature, TimeRange::LastWeek, ExportFormat::Json, now)
            .unwrap();
        let parsed: Vec<SensorReading> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
    }
}
