//! Threshold tables and the registry that selects them
//!
//! A [`ThresholdTable`] is an ordered list of bound rules plus a fallback
//! outcome. Rules are checked in order and the first match wins, so tables
//! list their low-bound rules before their high-bound rules and their
//! critical rules before their warning rules.
//!
//! Critical bounds are strict: a `below(10.0)` rule does not match `10.0`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::types::{AlertLevel, Insight, InsightStatus};
use crate::models::{Industry, SensorType};

/// A single-sided bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Matches values strictly less than the limit
    Below(f64),
    /// Matches values strictly greater than the limit
    Above(f64),
}

impl Bound {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Bound::Below(limit) => value < limit,
            Bound::Above(limit) => value > limit,
        }
    }
}

/// What a matching rule produces
///
/// `message` and `recommendation` may contain `{value}` and `{unit}`
/// placeholders, filled in from the reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub status: InsightStatus,
    pub message: String,
    pub recommendation: String,
    /// Defaults to the status' alert level
    pub alert_level: Option<AlertLevel>,
}

impl Outcome {
    pub fn new(
        status: InsightStatus,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            recommendation: recommendation.into(),
            alert_level: None,
        }
    }

    pub fn alert(mut self, level: AlertLevel) -> Self {
        self.alert_level = Some(level);
        self
    }

    pub fn to_insight(&self, value: f64, unit: &str) -> Insight {
        Insight {
            status: self.status,
            message: render(&self.message, value, unit),
            recommendation: render(&self.recommendation, value, unit),
            alert_level: self
                .alert_level
                .unwrap_or_else(|| self.status.default_alert_level()),
        }
    }
}

fn render(template: &str, value: f64, unit: &str) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{value}", &value.to_string())
        .replace("{unit}", unit)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub bound: Bound,
    pub outcome: Outcome,
}

/// Rules for one (sensor, industry) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    pub sensor: SensorType,
    /// `None` for the default table
    pub industry: Option<Industry>,
    /// Required unit; `None` accepts any unit
    pub unit: Option<String>,
    pub rules: Vec<Rule>,
    pub fallback: Outcome,
}

impl ThresholdTable {
    /// Start a table whose fallback is the generic "recorded" outcome
    pub fn new(sensor: SensorType) -> Self {
        let recorded = Insight::recorded();
        Self {
            sensor,
            industry: None,
            unit: None,
            rules: Vec::new(),
            fallback: Outcome::new(recorded.status, recorded.message, recorded.recommendation),
        }
    }

    pub fn for_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn below(mut self, limit: f64, outcome: Outcome) -> Self {
        self.rules.push(Rule {
            bound: Bound::Below(limit),
            outcome,
        });
        self
    }

    pub fn above(mut self, limit: f64, outcome: Outcome) -> Self {
        self.rules.push(Rule {
            bound: Bound::Above(limit),
            outcome,
        });
        self
    }

    pub fn otherwise(mut self, outcome: Outcome) -> Self {
        self.fallback = outcome;
        self
    }

    pub fn key(&self) -> (SensorType, Option<Industry>) {
        (self.sensor, self.industry)
    }

    /// Whether a reading's unit satisfies this table's unit check
    pub fn accepts_unit(&self, unit: &str) -> bool {
        match &self.unit {
            None => true,
            Some(expected) => canonical_unit(expected) == canonical_unit(unit),
        }
    }

    /// Classify a value. Callers check the unit first.
    pub fn classify(&self, value: f64, unit: &str) -> Insight {
        self.rules
            .iter()
            .find(|rule| rule.bound.matches(value))
            .map(|rule| &rule.outcome)
            .unwrap_or(&self.fallback)
            .to_insight(value, unit)
    }
}

/// Fold spelling variants of a unit onto one form
pub fn canonical_unit(unit: &str) -> String {
    let unit = unit.trim().to_lowercase();
    match unit.as_str() {
        "°c" | "c" | "celsius" | "degc" | "deg c" | "℃" => "°c".to_string(),
        "%" | "percent" | "%rh" | "rh" => "%".to_string(),
        "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => "cm".to_string(),
        _ => unit,
    }
}

/// Threshold tables keyed by (sensor, industry)
#[derive(Debug, Clone, Default)]
pub struct ThresholdRegistry {
    tables: BTreeMap<(SensorType, Option<Industry>), ThresholdTable>,
}

impl ThresholdRegistry {
    /// An empty registry (every evaluation yields the default insight)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in default and industry tables
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for table in super::builtin::default_tables() {
            registry.register(table);
        }
        for table in super::builtin::industry_tables() {
            registry.register(table);
        }
        registry
    }

    /// Add a table, returning the one it replaced
    pub fn register(&mut self, table: ThresholdTable) -> Option<ThresholdTable> {
        self.tables.insert(table.key(), table)
    }

    /// Exact lookup, no fallback to the default table
    pub fn get(&self, sensor: SensorType, industry: Option<Industry>) -> Option<&ThresholdTable> {
        self.tables.get(&(sensor, industry))
    }

    /// Tables to try for an evaluation: the industry table first, then the default
    pub fn candidates(
        &self,
        sensor: SensorType,
        industry: Option<Industry>,
    ) -> impl Iterator<Item = &ThresholdTable> {
        let industry_table = industry.and_then(|i| self.get(sensor, Some(i)));
        industry_table
            .into_iter()
            .chain(self.get(sensor, None))
    }

    pub fn tables(&self) -> impl Iterator<Item = &ThresholdTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ThresholdTable {
        ThresholdTable::new(SensorType::Temperature)
            .unit("°C")
            .below(
                0.0,
                Outcome::new(InsightStatus::Critical, "Freezing at {value}{unit}", "Heat"),
            )
            .below(5.0, Outcome::new(InsightStatus::Warning, "Cold", "Watch"))
            .otherwise(Outcome::new(InsightStatus::Normal, "Fine", "Nothing"))
    }

    #[test]
    fn test_bounds_are_strict() {
        assert!(Bound::Below(10.0).matches(9.99));
        assert!(!Bound::Below(10.0).matches(10.0));
        assert!(Bound::Above(40.0).matches(40.01));
        assert!(!Bound::Above(40.0).matches(40.0));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = sample_table();
        assert_eq!(table.classify(-1.0, "°C").status, InsightStatus::Critical);
        assert_eq!(table.classify(3.0, "°C").status, InsightStatus::Warning);
        assert_eq!(table.classify(5.0, "°C").status, InsightStatus::Normal);
    }

    #[test]
    fn test_placeholders_rendered() {
        let insight = sample_table().classify(-2.5, "°C");
        assert_eq!(insight.message, "Freezing at -2.5°C");
        assert_eq!(insight.alert_level, AlertLevel::Critical);
    }

    #[test]
    fn test_unit_check() {
        let table = sample_table();
        assert!(table.accepts_unit("°C"));
        assert!(table.accepts_unit(" celsius "));
        assert!(!table.accepts_unit("°F"));
        assert!(ThresholdTable::new(SensorType::Gas).accepts_unit(""));
    }

    #[test]
    fn test_registry_candidates_prefer_industry() {
        let mut registry = ThresholdRegistry::empty();
        registry.register(sample_table());
        registry.register(sample_table().for_industry(Industry::Agriculture));

        let found: Vec<_> = registry
            .candidates(SensorType::Temperature, Some(Industry::Agriculture))
            .map(|t| t.industry)
            .collect();
        assert_eq!(found, vec![Some(Industry::Agriculture), None]);

        let found: Vec<_> = registry
            .candidates(SensorType::Temperature, Some(Industry::Electronics))
            .map(|t| t.industry)
            .collect();
        assert_eq!(found, vec![None]);

        assert_eq!(registry.candidates(SensorType::Gas, None).count(), 0);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ThresholdRegistry::empty();
        assert!(registry.register(sample_table()).is_none());
        assert!(registry.register(sample_table()).is_some());
        assert_eq!(registry.len(), 1);
    }
}
