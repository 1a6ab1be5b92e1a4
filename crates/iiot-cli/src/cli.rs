//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// IIoT Monitor - Classify and track industrial sensor readings
#[derive(Parser)]
#[command(name = "iiot")]
#[command(about = "Insight evaluator and dashboard for industrial IoT sensors", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, env = "IIOT_DB", default_value = "iiot.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Threshold override file (TOML)
    ///
    /// Defaults to thresholds.toml in the platform data directory when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Insert demo readings for the dashboard sensors
    Seed,

    /// Classify a single reading without storing it
    Evaluate {
        /// Sensor type (temperature, humidity, gas, proximity, ...)
        sensor: String,

        /// Reading value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Unit of the value (e.g. °C, %, cm)
        #[arg(short, long, default_value = "")]
        unit: String,

        /// Industry profile: agriculture, mechanical, electronics
        #[arg(short, long)]
        industry: Option<String>,

        /// Print the insight as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a reading and show its insight
    Record {
        /// Sensor type
        sensor: String,

        /// Reading value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Unit of the value
        #[arg(short, long)]
        unit: String,

        /// Display name (defaults to the sensor type)
        #[arg(short, long)]
        name: Option<String>,

        /// Where the sensor is installed
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Show the latest insight for every sensor
    Dashboard {
        /// Industry profile: agriculture, mechanical, electronics
        #[arg(short, long)]
        industry: Option<String>,
    },

    /// Show a sensor's history
    History {
        /// Sensor type
        sensor: String,

        /// Time range: 1h, 6h, 24h, 7d, 30d
        #[arg(short, long, default_value = "24h")]
        range: String,
    },

    /// Export a sensor's history as CSV
    Export {
        /// Sensor type
        sensor: String,

        /// Time range: 1h, 6h, 24h, 7d, 30d
        #[arg(short, long, default_value = "24h")]
        range: String,

        /// Output file (defaults to <sensor>_sensor_data_<range>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List recent alerts
    Alerts {
        /// Maximum number of alerts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Ask the assistant about recent readings
    Chat {
        /// Question to ask
        message: String,

        /// Restrict context to one sensor name
        #[arg(short, long)]
        sensor: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files to serve (the dashboard UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
