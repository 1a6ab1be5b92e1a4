//! Alert log operations

use chrono::Utc;
use rusqlite::{params, Row};

use super::{format_datetime, invalid_text, parse_datetime, Database};
use crate::alerts::{AlertRecord, AlertRequest};
use crate::error::Result;
use crate::insights::AlertLevel;

impl Database {
    /// Store an alert, returning its id
    pub fn insert_alert(&self, alert: &AlertRequest) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO alerts (recipient, sensor_name, message, value, unit, alert_level, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                alert.recipient,
                alert.sensor_name,
                alert.message,
                alert.value,
                alert.unit,
                alert.alert_level.as_str(),
                format_datetime(&Utc::now()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Mark an alert as forwarded to the notification sink
    pub fn mark_alert_delivered(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("UPDATE alerts SET delivered = TRUE WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Most recent alerts first
    pub fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, recipient, sensor_name, message, value, unit, alert_level, delivered, created_at
            FROM alerts
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let alerts = stmt
            .query_map(params![limit as i64], row_to_alert)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(alerts)
    }

    pub fn get_alert(&self, id: i64) -> Result<Option<AlertRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, recipient, sensor_name, message, value, unit, alert_level, delivered, created_at
            FROM alerts WHERE id = ?
            "#,
        )?;
        let mut rows = stmt.query_map(params![id], row_to_alert)?;
        Ok(rows.next().transpose()?)
    }
}

fn row_to_alert(row: &Row<'_>) -> rusqlite::Result<AlertRecord> {
    let level_str: String = row.get(6)?;
    let created_at_str: String = row.get(8)?;
    Ok(AlertRecord {
        id: row.get(0)?,
        recipient: row.get(1)?,
        sensor_name: row.get(2)?,
        message: row.get(3)?,
        value: row.get(4)?,
        unit: row.get(5)?,
        alert_level: level_str.parse::<AlertLevel>().map_err(|e| invalid_text(6, e))?,
        delivered: row.get(7)?,
        created_at: parse_datetime(8, &created_at_str)?,
    })
}
