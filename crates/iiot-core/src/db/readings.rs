//! Sensor reading operations

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Row};
use tracing::{debug, info};

use super::{format_datetime, invalid_text, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewReading, SensorReading, SensorType};

const READING_COLUMNS: &str =
    "id, sensor_type, sensor_name, value, unit, location, observed_at";

fn row_to_reading(row: &Row<'_>) -> rusqlite::Result<SensorReading> {
    let type_str: String = row.get(1)?;
    let observed_at: String = row.get(6)?;
    Ok(SensorReading {
        id: row.get(0)?,
        sensor_type: type_str.parse::<SensorType>().map_err(|e| invalid_text(1, e))?,
        sensor_name: row.get(2)?,
        value: row.get(3)?,
        unit: row.get(4)?,
        location: row.get(5)?,
        observed_at: parse_datetime(6, &observed_at)?,
    })
}

impl Database {
    /// Record a reading, returning its id
    pub fn insert_reading(&self, reading: &NewReading) -> Result<i64> {
        if !reading.value.is_finite() {
            return Err(Error::InvalidData(format!(
                "Reading value must be finite, got {}",
                reading.value
            )));
        }
        if reading.sensor_name.trim().is_empty() {
            return Err(Error::InvalidData("Sensor name is required".into()));
        }

        let conn = self.conn()?;
        let observed_at = reading.observed_at.unwrap_or_else(Utc::now);

        conn.execute(
            r#"
            INSERT INTO sensor_readings (sensor_type, sensor_name, value, unit, location, observed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                reading.sensor_type.as_str(),
                reading.sensor_name.trim(),
                reading.value,
                reading.unit.trim(),
                reading.location,
                format_datetime(&observed_at),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(
            id,
            sensor = reading.sensor_type.as_str(),
            value = reading.value,
            "Reading recorded"
        );
        Ok(id)
    }

    /// Most recent reading of one sensor type
    pub fn latest_reading(&self, sensor_type: SensorType) -> Result<Option<SensorReading>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM sensor_readings WHERE sensor_type = ? ORDER BY observed_at DESC, id DESC LIMIT 1",
            READING_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![sensor_type.as_str()], row_to_reading)?;
        Ok(rows.next().transpose()?)
    }

    /// Newest readings first, optionally filtered by sensor name (case-insensitive)
    pub fn recent_readings(
        &self,
        limit: usize,
        sensor_name: Option<&str>,
    ) -> Result<Vec<SensorReading>> {
        let conn = self.conn()?;
        let limit = limit as i64;

        let readings = match sensor_name {
            Some(name) => {
                let sql = format!(
                    "SELECT {} FROM sensor_readings WHERE sensor_name = ? COLLATE NOCASE ORDER BY observed_at DESC, id DESC LIMIT ?",
                    READING_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![name.trim(), limit], row_to_reading)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM sensor_readings ORDER BY observed_at DESC, id DESC LIMIT ?",
                    READING_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![limit], row_to_reading)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(readings)
    }

    /// Readings of one sensor type observed at or after `since`, oldest first
    pub fn reading_history(
        &self,
        sensor_type: SensorType,
        since: DateTime<Utc>,
    ) -> Result<Vec<SensorReading>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM sensor_readings WHERE sensor_type = ? AND observed_at >= ? ORDER BY observed_at ASC, id ASC",
            READING_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![sensor_type.as_str(), format_datetime(&since)],
            row_to_reading,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count_readings(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM sensor_readings", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert the demo data set: one sensor per dashboard tile, each with a
    /// short history ending at `now`. Returns the number of rows inserted.
    pub fn seed_demo_readings(&self, now: DateTime<Utc>) -> Result<usize> {
        let series: [(SensorType, &str, &str, &str, [f64; 6]); 4] = [
            (
                SensorType::Temperature,
                "Greenhouse Temp",
                "°C",
                "Greenhouse A1",
                [29.0, 31.2, 33.5, 35.1, 36.8, 38.5],
            ),
            (
                SensorType::Gas,
                "VOC Sensor",
                "ppm",
                "Solvent Storage",
                [1450.0, 1720.0, 1980.0, 2210.0, 2420.0, 2600.0],
            ),
            (
                SensorType::Humidity,
                "Line 2 Humidity",
                "%",
                "Assembly Line 2",
                [41.0, 37.5, 34.0, 30.5, 27.0, 25.0],
            ),
            (
                SensorType::Proximity,
                "Bay Proximity",
                "cm",
                "CNC Machine Bay",
                [48.0, 41.0, 30.0, 18.5, 9.0, 4.2],
            ),
        ];

        let mut inserted = 0;
        for (sensor, name, unit, location, values) in series {
            let steps = values.len() as i64;
            for (i, value) in values.iter().enumerate() {
                let observed_at = now - Duration::minutes(10 * (steps - 1 - i as i64));
                let reading = NewReading::new(sensor, *value, unit)
                    .with_name(name)
                    .with_location(location)
                    .observed_at(observed_at);
                self.insert_reading(&reading)?;
                inserted += 1;
            }
        }

        info!(inserted, "Seeded demo readings");
        Ok(inserted)
    }
}
