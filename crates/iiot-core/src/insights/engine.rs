//! Insight Evaluator - maps one reading to an [`Insight`]

use super::thresholds::ThresholdRegistry;
use super::types::Insight;
use crate::models::{Industry, SensorType};

/// Rule-based evaluator over a [`ThresholdRegistry`]
///
/// Evaluation is total and pure: any input the registry cannot classify
/// (unknown sensor, unit mismatch, NaN or infinite value) yields
/// [`Insight::recorded`].
#[derive(Debug, Clone)]
pub struct InsightEvaluator {
    registry: ThresholdRegistry,
}

impl Default for InsightEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEvaluator {
    /// Evaluator over the built-in tables
    pub fn new() -> Self {
        Self::with_registry(ThresholdRegistry::builtin())
    }

    pub fn with_registry(registry: ThresholdRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ThresholdRegistry {
        &self.registry
    }

    /// Evaluate a reading identified by a free-form sensor name and industry
    pub fn evaluate(
        &self,
        sensor_name: &str,
        value: f64,
        unit: &str,
        industry: Option<&str>,
    ) -> Insight {
        let Some(sensor) = SensorType::normalize(sensor_name) else {
            tracing::debug!(sensor = sensor_name, "Unmapped sensor type");
            return Insight::recorded();
        };
        let industry = industry.and_then(Industry::normalize);
        self.evaluate_typed(sensor, value, unit, industry)
    }

    /// Evaluate a reading whose sensor type is already known
    pub fn evaluate_typed(
        &self,
        sensor: SensorType,
        value: f64,
        unit: &str,
        industry: Option<Industry>,
    ) -> Insight {
        if !value.is_finite() {
            tracing::debug!(sensor = sensor.as_str(), "Non-finite reading");
            return Insight::recorded();
        }

        for table in self.registry.candidates(sensor, industry) {
            if !table.accepts_unit(unit) {
                tracing::debug!(
                    sensor = sensor.as_str(),
                    industry = ?table.industry,
                    unit,
                    "Unit check failed, trying next table"
                );
                continue;
            }
            let insight = table.classify(value, unit);
            tracing::debug!(
                sensor = sensor.as_str(),
                industry = ?table.industry,
                value,
                status = insight.status.as_str(),
                "Reading evaluated"
            );
            return insight;
        }

        Insight::recorded()
    }
}

/// Evaluate against the built-in tables
///
/// Builds the registry on every call; hold an [`InsightEvaluator`] when
/// evaluating more than a handful of readings.
pub fn evaluate(sensor_name: &str, value: f64, unit: &str, industry: Option<&str>) -> Insight {
    InsightEvaluator::new().evaluate(sensor_name, value, unit, industry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::thresholds::{Outcome, ThresholdTable};
    use crate::insights::types::{AlertLevel, InsightStatus, StatusVariant};

    fn evaluator() -> InsightEvaluator {
        InsightEvaluator::new()
    }

    #[test]
    fn test_unsupported_inputs_return_default() {
        let ev = evaluator();
        assert_eq!(ev.evaluate("light", 300.0, "lux", None), Insight::recorded());
        assert_eq!(ev.evaluate("temperature", 25.0, "°F", None), Insight::recorded());
        assert_eq!(ev.evaluate("humidity", 50.0, "g/m3", None), Insight::recorded());
        assert_eq!(ev.evaluate("proximity", 20.0, "in", None), Insight::recorded());
        assert_eq!(ev.evaluate("temperature", f64::NAN, "°C", None), Insight::recorded());
        assert_eq!(
            ev.evaluate("gas", f64::INFINITY, "", None).alert_level,
            AlertLevel::Low
        );
    }

    #[test]
    fn test_temperature_boundaries() {
        let ev = evaluator();

        let insight = ev.evaluate("temperature", 9.99, "°C", None);
        assert_eq!(insight.status, InsightStatus::Critical);
        assert_eq!(insight.message, "CRITICAL: Temperature too low");
        assert_eq!(insight.alert_level, AlertLevel::Critical);

        let insight = ev.evaluate("temperature", 10.0, "°C", None);
        assert_eq!(insight.status, InsightStatus::Warning);
        assert_eq!(insight.alert_level, AlertLevel::Medium);

        assert_eq!(
            ev.evaluate("temperature", 40.0, "°C", None).status,
            InsightStatus::Warning
        );
        assert_eq!(
            ev.evaluate("temperature", 40.01, "°C", None).status,
            InsightStatus::Critical
        );
        assert_eq!(
            ev.evaluate("temperature", 15.0, "°C", None).status,
            InsightStatus::Optimal
        );
        assert_eq!(
            ev.evaluate("temperature", 35.0, "°C", None).status,
            InsightStatus::Optimal
        );
    }

    #[test]
    fn test_optimal_temperature() {
        let insight = evaluator().evaluate("Temperature", 25.0, "°C", None);
        assert_eq!(insight.status, InsightStatus::Optimal);
        assert_eq!(insight.alert_level, AlertLevel::Low);
        assert_eq!(insight.variant(), StatusVariant::Default);
    }

    #[test]
    fn test_humidity_bands() {
        let ev = evaluator();
        assert_eq!(ev.evaluate("humidity", 25.0, "%", None).status, InsightStatus::Critical);
        assert_eq!(ev.evaluate("humidity", 30.0, "%", None).status, InsightStatus::Warning);
        assert_eq!(ev.evaluate("humidity", 55.0, "%", None).status, InsightStatus::Optimal);
        assert_eq!(ev.evaluate("humidity", 75.0, "%", None).status, InsightStatus::Warning);
        assert_eq!(ev.evaluate("humidity", 80.5, "%", None).status, InsightStatus::Critical);
    }

    #[test]
    fn test_gas_critical_without_unit() {
        let insight = evaluator().evaluate("gas", 2600.0, "", None);
        assert_eq!(insight.status, InsightStatus::Critical);
        assert_eq!(insight.alert_level, AlertLevel::Critical);
        assert!(insight.recommendation.contains("EVACUATE"));

        // Alias and arbitrary unit
        let insight = evaluator().evaluate("Gas Level", 1200.0, "ppm", None);
        assert_eq!(insight.status, InsightStatus::Safe);

        let insight = evaluator().evaluate("methane", 500.0, "ppm", None);
        assert_eq!(insight.status, InsightStatus::Warning);
    }

    #[test]
    fn test_proximity_bands() {
        let ev = evaluator();
        let insight = ev.evaluate("proximity", 5.0, "cm", None);
        assert_eq!(insight.status, InsightStatus::Critical);
        assert_eq!(insight.alert_level, AlertLevel::Critical);
        assert!(insight.message.contains("collision risk"));

        assert_eq!(ev.evaluate("distance", 20.0, "cm", None).status, InsightStatus::Warning);
        assert_eq!(ev.evaluate("proximity", 30.0, "cm", None).status, InsightStatus::Info);
        assert_eq!(ev.evaluate("proximity", 50.0, "cm", None).status, InsightStatus::Clear);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let ev = evaluator();
        let status = |sensor: &str, value: f64, unit: &str| ev.evaluate(sensor, value, unit, None).status;

        assert_eq!(status("gas", 699.99, "ppm"), InsightStatus::Warning);
        assert_eq!(status("gas", 700.0, "ppm"), InsightStatus::Safe);
        assert_eq!(status("gas", 2500.0, "ppm"), InsightStatus::Safe);
        assert_eq!(status("gas", 2500.01, "ppm"), InsightStatus::Critical);

        assert_eq!(status("humidity", 30.0, "%"), InsightStatus::Warning);
        assert_eq!(status("humidity", 40.0, "%"), InsightStatus::Optimal);
        assert_eq!(status("humidity", 70.0, "%"), InsightStatus::Optimal);
        assert_eq!(status("humidity", 80.0, "%"), InsightStatus::Warning);

        assert_eq!(status("proximity", 9.99, "cm"), InsightStatus::Critical);
        assert_eq!(status("proximity", 10.0, "cm"), InsightStatus::Warning);
        assert_eq!(status("proximity", 49.99, "cm"), InsightStatus::Info);
    }

    #[test]
    fn test_idempotent() {
        let ev = evaluator();
        let a = ev.evaluate("humidity", 72.0, "%", Some("Electronics"));
        let b = ev.evaluate("humidity", 72.0, "%", Some("Electronics"));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_agriculture_table_differs_from_default() {
        let ev = evaluator();
        let farm = ev.evaluate("temperature", 32.0, "°C", Some("Agriculture"));
        let plain = ev.evaluate("temperature", 32.0, "°C", None);
        assert_eq!(farm.status, InsightStatus::Warning);
        assert_eq!(plain.status, InsightStatus::Optimal);
        assert!(farm.message.contains("32"));
        assert_ne!(farm, plain);
    }

    #[test]
    fn test_industry_alert_levels() {
        let ev = evaluator();
        let insight = ev.evaluate("temperature", 40.0, "°C", Some("agriculture"));
        assert_eq!(insight.status, InsightStatus::Warning);
        assert_eq!(insight.alert_level, AlertLevel::High);

        let insight = ev.evaluate("voc", 1500.0, "ppm", Some("Electronics"));
        assert_eq!(insight.status, InsightStatus::Critical);

        let insight = ev.evaluate("vibration", 6.2, "mm/s", Some("Mechanical"));
        assert_eq!(insight.status, InsightStatus::Warning);
        assert_eq!(insight.alert_level, AlertLevel::High);
        assert!(insight.message.contains("6.2 mm/s"));
    }

    #[test]
    fn test_unknown_industry_uses_defaults() {
        let ev = evaluator();
        assert_eq!(
            ev.evaluate("temperature", 32.0, "°C", Some("Textiles")),
            ev.evaluate("temperature", 32.0, "°C", None)
        );
        // Mechanical has no temperature table of its own
        assert_eq!(
            ev.evaluate("temperature", 32.0, "°C", Some("Mechanical")),
            ev.evaluate("temperature", 32.0, "°C", None)
        );
    }

    #[test]
    fn test_industry_unit_mismatch_falls_back_to_default() {
        // Agriculture proximity is a tank level in %, the default table is cm
        let ev = evaluator();
        let tank = ev.evaluate("ultrasonic", 8.0, "%", Some("Agriculture"));
        assert_eq!(tank.status, InsightStatus::Critical);
        assert!(tank.message.contains("tank"));

        let distance = ev.evaluate("ultrasonic", 8.0, "cm", Some("Agriculture"));
        assert_eq!(distance, ev.evaluate("proximity", 8.0, "cm", None));
    }

    #[test]
    fn test_vibration_without_industry_is_recorded() {
        assert_eq!(
            evaluator().evaluate("vibration", 9.0, "mm/s", None),
            Insight::recorded()
        );
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = ThresholdRegistry::empty();
        registry.register(
            ThresholdTable::new(SensorType::Pressure)
                .above(100.0, Outcome::new(InsightStatus::Critical, "Over", "Vent")),
        );
        let ev = InsightEvaluator::with_registry(registry);
        assert_eq!(ev.evaluate("pressure", 150.0, "kPa", None).status, InsightStatus::Critical);
        assert_eq!(ev.evaluate("temperature", 5.0, "°C", None), Insight::recorded());
    }

    #[test]
    fn test_free_function_matches_evaluator() {
        assert_eq!(
            evaluate("humidity", 90.0, "%", None),
            evaluator().evaluate("humidity", 90.0, "%", None)
        );
    }
}
