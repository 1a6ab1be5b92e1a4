//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use iiot_core::config;
use iiot_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting IIoT monitor web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let registry =
        config::load_registry(config_path).context("Failed to load threshold tables")?;
    println!("   Threshold tables: {}", registry.len());

    let server_config = ServerConfig::from_env().with_thresholds(registry);
    if !server_config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} (IIOT_ALLOWED_ORIGINS)",
            server_config.allowed_origins.join(", ")
        );
    }
    if std::env::var(iiot_core::alerts::ALERT_WEBHOOK_ENV).is_ok() {
        println!("   🔔 Alert webhook: enabled");
    }
    println!();

    let db = open_db(db_path)?;
    let static_dir = static_dir
        .map(|d| d.to_str().context("Static directory path is not valid UTF-8"))
        .transpose()?;

    iiot_server::serve(db, host, port, static_dir, server_config).await
}
