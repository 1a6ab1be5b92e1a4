//! Alert log command

use anyhow::{Context, Result};
use iiot_core::db::Database;

use super::truncate;

pub fn cmd_alerts(db: &Database, limit: usize) -> Result<()> {
    let alerts = db.list_alerts(limit).context("Failed to list alerts")?;

    if alerts.is_empty() {
        println!("✅ No alerts recorded");
        return Ok(());
    }

    println!("🚨 Recent alerts");
    println!("   ─────────────────────────────────────────────");
    for alert in &alerts {
        let reading = match (alert.value, &alert.unit) {
            (Some(v), Some(u)) => format!("{} {}", v, u),
            (Some(v), None) => v.to_string(),
            _ => String::new(),
        };
        println!(
            "   #{:<4} {} [{}] {} {}",
            alert.id,
            alert.created_at.format("%Y-%m-%d %H:%M"),
            alert.alert_level,
            alert.sensor_name,
            reading
        );
        println!(
            "         {} → {}{}",
            truncate(&alert.message, 60),
            alert.recipient,
            if alert.delivered { "" } else { " (not delivered)" }
        );
    }

    Ok(())
}
