//! History and export commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use iiot_core::db::Database;
use iiot_core::export::{export_file_name, ExportFormat};
use iiot_core::insights::Trend;
use iiot_core::models::{SensorType, TimeRange};

fn parse_args(sensor: &str, range: &str) -> Result<(SensorType, TimeRange)> {
    let sensor: SensorType = sensor.parse().map_err(anyhow::Error::msg)?;
    let range: TimeRange = range.parse().map_err(anyhow::Error::msg)?;
    Ok((sensor, range))
}

pub fn cmd_history(db: &Database, sensor: &str, range: &str) -> Result<()> {
    let (sensor, range) = parse_args(sensor, range)?;
    let readings = db
        .reading_history(sensor, range.since(Utc::now()))
        .context("Failed to load history")?;

    println!("📈 {} history ({})", sensor.display_name(), range);

    if readings.is_empty() {
        println!("   No readings in this range.");
        return Ok(());
    }

    for r in &readings {
        println!(
            "   {}  {:>10} {}",
            r.observed_at.format("%Y-%m-%d %H:%M"),
            r.value,
            r.unit
        );
    }
    println!();
    println!(
        "   {} readings, trend: {}",
        readings.len(),
        Trend::from_readings(&readings).as_str()
    );

    Ok(())
}

/// Write history as CSV, returning the path written
pub fn cmd_export(
    db: &Database,
    sensor: &str,
    range: &str,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let (sensor, range) = parse_args(sensor, range)?;
    let csv = db
        .export_history(sensor, range, ExportFormat::Csv, Utc::now())
        .context("Failed to export history")?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export_file_name(sensor, range, ExportFormat::Csv)));
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("💾 Exported {} history ({}) to {}", sensor, range, path.display());
    Ok(path)
}
