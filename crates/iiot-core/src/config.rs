//! Threshold override configuration
//!
//! Built-in tables live in code; a TOML file can replace or add tables.
//! The file is read from an explicit path, or from
//! `<data_local_dir>/iiot/config/thresholds.toml` when present.
//!
//! ```toml
//! [[tables]]
//! sensor = "temperature"
//! industry = "Agriculture"
//! unit = "°C"
//! fallback = { status = "optimal", message = "Fine", recommendation = "None" }
//!
//! [[tables.rules]]
//! below = 5.0
//! status = "critical"
//! message = "Frost risk at {value}°C"
//! recommendation = "Cover crops"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::insights::{
    AlertLevel, InsightStatus, Outcome, ThresholdRegistry, ThresholdTable,
};
use crate::models::{Industry, SensorType};

/// Default override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("iiot").join("config").join("thresholds.toml"))
}

/// Built-in tables with any overrides applied
///
/// An explicit path must exist. Without one, the default location is used
/// only if a file is there.
pub fn load_registry(override_path: Option<&Path>) -> Result<ThresholdRegistry> {
    let mut registry = ThresholdRegistry::builtin();

    let path = match override_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Threshold config not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    if let Some(path) = path {
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let tables = parse_overrides(&content)?;
        info!(
            path = %path.display(),
            tables = tables.len(),
            "Loaded threshold overrides"
        );
        for table in tables {
            registry.register(table);
        }
    }

    Ok(registry)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    tables: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    sensor: String,
    industry: Option<String>,
    unit: Option<String>,
    fallback: Option<RawOutcome>,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawOutcome {
    status: String,
    alert_level: Option<String>,
    message: String,
    recommendation: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    below: Option<f64>,
    above: Option<f64>,
    #[serde(flatten)]
    outcome: RawOutcome,
}

/// Parse override tables from TOML content
pub fn parse_overrides(content: &str) -> Result<Vec<ThresholdTable>> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid threshold TOML: {}", e)))?;

    raw.tables.into_iter().map(convert_table).collect()
}

fn convert_table(raw: RawTable) -> Result<ThresholdTable> {
    let sensor: SensorType = raw.sensor.parse().map_err(Error::InvalidData)?;
    let mut table = ThresholdTable::new(sensor);

    if let Some(industry) = raw.industry {
        let industry: Industry = industry.parse().map_err(Error::InvalidData)?;
        table = table.for_industry(industry);
    }
    if let Some(unit) = raw.unit.filter(|u| !u.trim().is_empty()) {
        table = table.unit(unit);
    }

    for rule in raw.rules {
        let outcome = convert_outcome(rule.outcome)?;
        table = match (rule.below, rule.above) {
            (Some(limit), None) if limit.is_finite() => table.below(limit, outcome),
            (None, Some(limit)) if limit.is_finite() => table.above(limit, outcome),
            _ => {
                return Err(Error::InvalidData(format!(
                    "Rule for {} needs exactly one finite `below` or `above` bound",
                    sensor
                )))
            }
        };
    }

    if let Some(fallback) = raw.fallback {
        table = table.otherwise(convert_outcome(fallback)?);
    }

    Ok(table)
}

fn convert_outcome(raw: RawOutcome) -> Result<Outcome> {
    let status: InsightStatus = raw.status.parse().map_err(Error::InvalidData)?;
    let mut outcome = Outcome::new(status, raw.message, raw.recommendation);
    if let Some(level) = raw.alert_level {
        let level: AlertLevel = level.parse().map_err(Error::InvalidData)?;
        outcome = outcome.alert(level);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightEvaluator;

    const SAMPLE: &str = include_str!("../../../config/thresholds.toml");

    #[test]
    fn test_sample_config_parses() {
        let tables = parse_overrides(SAMPLE).unwrap();
        assert!(!tables.is_empty());
    }

    #[test]
    fn test_override_replaces_builtin() {
        let content = r#"
            [[tables]]
            sensor = "temperature"
            unit = "C"
            fallback = { status = "normal", message = "ok", recommendation = "none" }

            [[tables.rules]]
            above = 20.0
            status = "warning"
            alert_level = "high"
            message = "Too warm at {value}{unit}"
            recommendation = "Open a window"
        "#;

        let mut registry = ThresholdRegistry::builtin();
        for table in parse_overrides(content).unwrap() {
            registry.register(table);
        }
        let evaluator = InsightEvaluator::with_registry(registry);

        let insight = evaluator.evaluate("temperature", 25.0, "°C", None);
        assert_eq!(insight.status, InsightStatus::Warning);
        assert_eq!(insight.alert_level, AlertLevel::High);
        assert_eq!(insight.message, "Too warm at 25°C");

        let insight = evaluator.evaluate("temperature", 5.0, "°C", None);
        assert_eq!(insight.status, InsightStatus::Normal);
        assert_eq!(insight.message, "ok");
    }

    #[test]
    fn test_rule_needs_one_bound() {
        let content = r#"
            [[tables]]
            sensor = "gas"

            [[tables.rules]]
            below = 1.0
            above = 2.0
            status = "warning"
            message = "m"
            recommendation = "r"
        "#;
        assert!(matches!(parse_overrides(content), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_unknown_names_rejected() {
        let content = r#"
            [[tables]]
            sensor = "light"
        "#;
        assert!(parse_overrides(content).is_err());

        let content = r#"
            [[tables]]
            sensor = "gas"
            industry = "Textiles"
        "#;
        assert!(parse_overrides(content).is_err());

        let content = r#"
            [[tables]]
            sensor = "gas"
            fallback = { status = "fine", message = "m", recommendation = "r" }
        "#;
        assert!(parse_overrides(content).is_err());
    }

    #[test]
    fn test_load_registry_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.toml");
        fs::write(
            &path,
            r#"
            [[tables]]
            sensor = "pressure"

            [[tables.rules]]
            above = 100.0
            status = "critical"
            message = "Overpressure"
            recommendation = "Vent line"
            "#,
        )
        .unwrap();

        let registry = load_registry(Some(&path)).unwrap();
        assert!(registry.get(SensorType::Pressure, None).is_some());
        assert!(registry.get(SensorType::Temperature, None).is_some());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(load_registry(Some(&path)), Err(Error::Config(_))));
    }
}
