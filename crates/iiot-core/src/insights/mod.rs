//! Insight Evaluator - rule-based classification of sensor readings
//!
//! Each reading is mapped to an [`Insight`]: a status, a human-readable
//! message and recommendation, and an [`AlertLevel`] that decides whether the
//! alert path fires. Classification is driven by [`ThresholdTable`]s held in a
//! [`ThresholdRegistry`], keyed by sensor type and optional industry.
//!
//! ## Lookup order
//!
//! 1. The industry table for `(sensor, industry)`, if its unit check passes
//! 2. The default table for `sensor`, if its unit check passes
//! 3. [`Insight::recorded`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use iiot_core::insights::InsightEvaluator;
//!
//! let evaluator = InsightEvaluator::new();
//! let insight = evaluator.evaluate("temperature", 32.0, "°C", Some("Agriculture"));
//! ```

pub mod builtin;
pub mod engine;
pub mod presenter;
pub mod thresholds;
pub mod types;

pub use engine::{evaluate, InsightEvaluator};
pub use presenter::{gauge_percentage, gauge_tone, offline, Gauge, GaugeTone, SensorCard, Trend};
pub use thresholds::{canonical_unit, Bound, Outcome, Rule, ThresholdRegistry, ThresholdTable};
pub use types::{AlertLevel, Insight, InsightStatus, StatusVariant};
