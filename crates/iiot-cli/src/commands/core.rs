//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_evaluator` - Evaluator with built-in and override thresholds
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Insert demo readings

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use iiot_core::config;
use iiot_core::db::Database;
use iiot_core::insights::InsightEvaluator;

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Evaluator using the built-in tables plus any override file
pub fn load_evaluator(config_path: Option<&Path>) -> Result<InsightEvaluator> {
    let registry = config::load_registry(config_path).context("Failed to load threshold tables")?;
    Ok(InsightEvaluator::with_registry(registry))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let readings = db.count_readings().context("Failed to read database")?;
    if readings > 0 {
        println!("   Existing readings: {}", readings);
    }

    if let Some(path) = config::default_config_path() {
        if path.exists() {
            println!("   Threshold overrides: {}", path.display());
        }
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Load demo data: iiot seed");
    println!("  2. Start web UI: iiot serve");

    Ok(())
}

pub fn cmd_seed(db: &Database) -> Result<()> {
    println!("🌱 Seeding demo readings...");

    let inserted = db
        .seed_demo_readings(Utc::now())
        .context("Failed to seed demo readings")?;

    println!("✅ Inserted {} readings", inserted);
    println!("   Run 'iiot dashboard' to see their insights.");

    Ok(())
}
