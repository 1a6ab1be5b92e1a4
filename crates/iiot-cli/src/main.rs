//! IIoT Monitor CLI - Insight evaluator for industrial sensors
//!
//! Usage:
//!   iiot init                          Initialize database
//!   iiot evaluate temperature 42 -u °C Classify a reading
//!   iiot dashboard --industry mechanical
//!   iiot serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Seed => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_seed(&db)
        }
        Commands::Evaluate {
            sensor,
            value,
            unit,
            industry,
            json,
        } => {
            let evaluator = commands::load_evaluator(config)?;
            commands::cmd_evaluate(&evaluator, &sensor, value, &unit, industry.as_deref(), json)
        }
        Commands::Record {
            sensor,
            value,
            unit,
            name,
            location,
        } => {
            let db = commands::open_db(&cli.db)?;
            let evaluator = commands::load_evaluator(config)?;
            commands::cmd_record(
                &db,
                &evaluator,
                &sensor,
                value,
                &unit,
                name.as_deref(),
                location.as_deref(),
            )
        }
        Commands::Dashboard { industry } => {
            let db = commands::open_db(&cli.db)?;
            let evaluator = commands::load_evaluator(config)?;
            commands::cmd_dashboard(&db, &evaluator, industry.as_deref())
        }
        Commands::History { sensor, range } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_history(&db, &sensor, &range)
        }
        Commands::Export {
            sensor,
            range,
            output,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, &sensor, &range, output.as_deref()).map(|_| ())
        }
        Commands::Alerts { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_alerts(&db, limit)
        }
        Commands::Chat { message, sensor } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_chat(&db, &message, sensor.as_deref()).await
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, config, &host, port, static_dir.as_deref()).await,
    }
}
