//! Core types for the Insight Evaluator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    Normal,
    Optimal,
    Safe,
    Clear,
    Info,
    Warning,
    Critical,
    /// No reading available for the sensor
    Offline,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightStatus::Normal => "normal",
            InsightStatus::Optimal => "optimal",
            InsightStatus::Safe => "safe",
            InsightStatus::Clear => "clear",
            InsightStatus::Info => "info",
            InsightStatus::Warning => "warning",
            InsightStatus::Critical => "critical",
            InsightStatus::Offline => "offline",
        }
    }

    /// Alert level implied by the status when a rule does not set one
    pub fn default_alert_level(&self) -> AlertLevel {
        match self {
            InsightStatus::Critical => AlertLevel::Critical,
            InsightStatus::Warning => AlertLevel::Medium,
            _ => AlertLevel::Low,
        }
    }

    /// Presentation variant for badges and cards
    pub fn variant(&self) -> StatusVariant {
        match self {
            InsightStatus::Critical => StatusVariant::Destructive,
            InsightStatus::Warning => StatusVariant::Secondary,
            InsightStatus::Optimal | InsightStatus::Safe | InsightStatus::Clear => {
                StatusVariant::Default
            }
            InsightStatus::Normal | InsightStatus::Info | InsightStatus::Offline => {
                StatusVariant::Outline
            }
        }
    }
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(InsightStatus::Normal),
            "optimal" => Ok(InsightStatus::Optimal),
            "safe" => Ok(InsightStatus::Safe),
            "clear" => Ok(InsightStatus::Clear),
            "info" => Ok(InsightStatus::Info),
            "warning" => Ok(InsightStatus::Warning),
            "critical" => Ok(InsightStatus::Critical),
            "offline" => Ok(InsightStatus::Offline),
            _ => Err(format!("Unknown insight status: {}", s)),
        }
    }
}

/// Severity used to decide whether the alert path triggers
///
/// `Low` never raises an alert; the others escalate in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "low",
            AlertLevel::Medium => "medium",
            AlertLevel::High => "high",
            AlertLevel::Critical => "critical",
        }
    }

    pub fn should_alert(&self) -> bool {
        *self != AlertLevel::Low
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertLevel::Low),
            "medium" => Ok(AlertLevel::Medium),
            "high" => Ok(AlertLevel::High),
            "critical" => Ok(AlertLevel::Critical),
            _ => Err(format!("Unknown alert level: {}", s)),
        }
    }
}

/// Badge variant for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusVariant {
    Destructive,
    Secondary,
    Default,
    Outline,
}

impl StatusVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusVariant::Destructive => "destructive",
            StatusVariant::Secondary => "secondary",
            StatusVariant::Default => "default",
            StatusVariant::Outline => "outline",
        }
    }
}

impl fmt::Display for StatusVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The classification of one sensor reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub status: InsightStatus,
    pub message: String,
    pub recommendation: String,
    pub alert_level: AlertLevel,
}

impl Insight {
    /// Create an insight whose alert level follows from its status
    pub fn new(
        status: InsightStatus,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            recommendation: recommendation.into(),
            alert_level: status.default_alert_level(),
        }
    }

    /// Override the alert level
    pub fn with_alert_level(mut self, alert_level: AlertLevel) -> Self {
        self.alert_level = alert_level;
        self
    }

    /// Returned for anything the evaluator cannot classify
    pub fn recorded() -> Self {
        Self::new(
            InsightStatus::Normal,
            "Sensor data recorded",
            "Continue monitoring",
        )
    }

    pub fn variant(&self) -> StatusVariant {
        self.status.variant()
    }
}

impl Default for Insight {
    fn default() -> Self {
        Self::recorded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(InsightStatus::Optimal.as_str(), "optimal");
        assert_eq!(
            InsightStatus::from_str("critical").unwrap(),
            InsightStatus::Critical
        );
        assert_eq!(
            serde_json::to_string(&InsightStatus::Clear).unwrap(),
            "\"clear\""
        );
    }

    #[test]
    fn test_alert_level_ordering() {
        assert!(AlertLevel::Critical > AlertLevel::High);
        assert!(AlertLevel::High > AlertLevel::Medium);
        assert!(AlertLevel::Medium > AlertLevel::Low);
        assert!(!AlertLevel::Low.should_alert());
        assert!(AlertLevel::Medium.should_alert());
    }

    #[test]
    fn test_variant_mapping() {
        assert_eq!(InsightStatus::Critical.variant(), StatusVariant::Destructive);
        assert_eq!(InsightStatus::Warning.variant(), StatusVariant::Secondary);
        assert_eq!(InsightStatus::Optimal.variant(), StatusVariant::Default);
        assert_eq!(InsightStatus::Safe.variant(), StatusVariant::Default);
        assert_eq!(InsightStatus::Clear.variant(), StatusVariant::Default);
        assert_eq!(InsightStatus::Normal.variant(), StatusVariant::Outline);
        assert_eq!(InsightStatus::Info.variant(), StatusVariant::Outline);
        assert_eq!(InsightStatus::Offline.variant(), StatusVariant::Outline);
    }

    #[test]
    fn test_recorded_insight() {
        let insight = Insight::recorded();
        assert_eq!(insight.status, InsightStatus::Normal);
        assert_eq!(insight.message, "Sensor data recorded");
        assert_eq!(insight.recommendation, "Continue monitoring");
        assert_eq!(insight.alert_level, AlertLevel::Low);
        assert_eq!(Insight::default(), insight);
    }
}
