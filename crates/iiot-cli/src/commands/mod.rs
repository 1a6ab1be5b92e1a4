//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, seed) and shared utilities (open_db, load_evaluator)
//! - `insights` - Evaluate, record and dashboard commands
//! - `history` - History and CSV export commands
//! - `alerts` - Alert log command
//! - `chat` - Assistant command
//! - `serve` - Web server command

pub mod alerts;
pub mod chat;
pub mod core;
pub mod history;
pub mod insights;
pub mod serve;

// Re-export command functions for main.rs
pub use alerts::*;
pub use chat::*;
pub use core::*;
pub use history::*;
pub use insights::*;
pub use serve::*;

use iiot_core::insights::{InsightStatus, StatusVariant};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Status marker for terminal output
pub fn status_icon(status: InsightStatus) -> &'static str {
    match status.variant() {
        StatusVariant::Destructive => "🔴",
        StatusVariant::Secondary => "🟡",
        StatusVariant::Default => "🟢",
        StatusVariant::Outline if status == InsightStatus::Offline => "⚫",
        StatusVariant::Outline => "🔵",
    }
}
