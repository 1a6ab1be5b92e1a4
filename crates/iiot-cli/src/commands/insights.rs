//! Insight commands: evaluate, record, dashboard

use anyhow::{Context, Result};
use chrono::Utc;
use iiot_core::db::Database;
use iiot_core::insights::{Insight, InsightEvaluator, SensorCard, Trend};
use iiot_core::models::{Industry, NewReading, SensorType, TimeRange};

use super::{status_icon, truncate};

fn parse_industry(industry: Option<&str>) -> Result<Option<Industry>> {
    industry
        .filter(|i| !i.trim().is_empty())
        .map(|i| i.parse::<Industry>().map_err(anyhow::Error::msg))
        .transpose()
}

fn print_insight(insight: &Insight) {
    println!(
        "{} {} ({} alert)",
        status_icon(insight.status),
        insight.message,
        insight.alert_level
    );
    println!("   → {}", insight.recommendation);
}

/// Classify one reading. Unknown sensors still get the default insight.
pub fn cmd_evaluate(
    evaluator: &InsightEvaluator,
    sensor: &str,
    value: f64,
    unit: &str,
    industry: Option<&str>,
    json: bool,
) -> Result<()> {
    // Validate the industry name up front so typos are not silently ignored
    let industry = parse_industry(industry)?;
    let insight = evaluator.evaluate(sensor, value, unit, industry.map(|i| i.as_str()));

    if json {
        println!("{}", serde_json::to_string_pretty(&insight)?);
        return Ok(());
    }

    println!("📟 {} = {} {}", sensor, value, unit);
    print_insight(&insight);

    Ok(())
}

pub fn cmd_record(
    db: &Database,
    evaluator: &InsightEvaluator,
    sensor: &str,
    value: f64,
    unit: &str,
    name: Option<&str>,
    location: Option<&str>,
) -> Result<()> {
    let sensor_type: SensorType = sensor.parse().map_err(anyhow::Error::msg)?;

    let mut reading = NewReading::new(sensor_type, value, unit);
    if let Some(name) = name {
        reading = reading.with_name(name);
    }
    if let Some(location) = location {
        reading = reading.with_location(location);
    }

    let id = db
        .insert_reading(&reading)
        .context("Failed to record reading")?;
    println!("✅ Recorded reading #{} ({} {} {})", id, reading.sensor_name, value, unit);

    let insight = evaluator.evaluate_typed(sensor_type, value, unit, None);
    print_insight(&insight);

    Ok(())
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Rising => "↑",
        Trend::Falling => "↓",
        Trend::Stable => "→",
    }
}

pub fn cmd_dashboard(
    db: &Database,
    evaluator: &InsightEvaluator,
    industry: Option<&str>,
) -> Result<()> {
    let industry = parse_industry(industry)?;
    let since = TimeRange::LastDay.since(Utc::now());

    println!("📊 Sensor Dashboard");
    if let Some(industry) = industry {
        println!("   Industry: {}", industry);
    }
    println!("   ─────────────────────────────────────────────");

    let mut alerts = 0;
    for sensor in SensorType::all() {
        let latest = db.latest_reading(*sensor)?;
        let history = match &latest {
            Some(_) => db.reading_history(*sensor, since)?,
            None if sensor.is_core() => Vec::new(),
            None => continue,
        };
        let card = SensorCard::build(evaluator, *sensor, latest, &history, industry);

        let reading = match &card.reading {
            Some(r) => format!("{} {} {}", r.value, r.unit, trend_arrow(card.trend)),
            None => "no data".to_string(),
        };
        println!(
            "   {} {:<20} {:<16} {}",
            status_icon(card.insight.status),
            truncate(&card.title, 20),
            reading,
            card.insight.message
        );
        if card.insight.alert_level.should_alert() {
            alerts += 1;
        }
    }

    println!();
    if alerts > 0 {
        println!("⚠️  {} sensor(s) need attention", alerts);
    } else {
        println!("✅ All sensors nominal");
    }

    Ok(())
}
