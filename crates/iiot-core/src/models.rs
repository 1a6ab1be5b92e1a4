//! Data models for sensor readings and their context

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of sensor the monitor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Temperature,
    Humidity,
    Gas,
    Proximity,
    Vibration,
    Pressure,
    Voltage,
}

impl SensorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Temperature => "temperature",
            SensorType::Humidity => "humidity",
            SensorType::Gas => "gas",
            SensorType::Proximity => "proximity",
            SensorType::Vibration => "vibration",
            SensorType::Pressure => "pressure",
            SensorType::Voltage => "voltage",
        }
    }

    /// Map a free-form sensor name onto a known type.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace, so
    /// `"Gas Level"`, `"methane"` and `"gas"` all resolve to [`SensorType::Gas`].
    /// Returns `None` for names the monitor has no tables for.
    pub fn normalize(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let sensor = match name.as_str() {
            "temperature" | "temp" => SensorType::Temperature,
            "humidity" => SensorType::Humidity,
            "gas" | "gas level" | "methane" | "methane level" | "voc" => SensorType::Gas,
            "proximity" | "distance" | "ultrasonic" => SensorType::Proximity,
            "vibration" => SensorType::Vibration,
            "pressure" => SensorType::Pressure,
            "voltage" => SensorType::Voltage,
            _ => return None,
        };
        Some(sensor)
    }

    /// Every sensor type, in dashboard order
    pub fn all() -> &'static [SensorType] {
        &[
            SensorType::Temperature,
            SensorType::Humidity,
            SensorType::Gas,
            SensorType::Proximity,
            SensorType::Vibration,
            SensorType::Pressure,
            SensorType::Voltage,
        ]
    }

    /// Sensors that always get a dashboard tile, reporting or not
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            SensorType::Temperature | SensorType::Humidity | SensorType::Gas | SensorType::Proximity
        )
    }

    /// Display name used on dashboard cards
    pub fn display_name(&self) -> &'static str {
        match self {
            SensorType::Temperature => "Temperature",
            SensorType::Humidity => "Humidity",
            SensorType::Gas => "Gas Level",
            SensorType::Proximity => "Proximity",
            SensorType::Vibration => "Vibration",
            SensorType::Pressure => "Pressure",
            SensorType::Voltage => "Voltage",
        }
    }

    /// Unit a reading of this type is usually reported in
    pub fn default_unit(&self) -> &'static str {
        match self {
            SensorType::Temperature => "°C",
            SensorType::Humidity => "%",
            SensorType::Gas => "ppm",
            SensorType::Proximity => "cm",
            SensorType::Vibration => "mm/s",
            SensorType::Pressure => "kPa",
            SensorType::Voltage => "V",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorType::normalize(s).ok_or_else(|| format!("Unknown sensor type: {}", s))
    }
}

/// Industry context that selects alternate threshold tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    Agriculture,
    Mechanical,
    Electronics,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Agriculture => "Agriculture",
            Industry::Mechanical => "Mechanical",
            Industry::Electronics => "Electronics",
        }
    }

    /// Case-insensitive lookup; unknown industries yield `None`
    pub fn normalize(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "agriculture" => Some(Industry::Agriculture),
            "mechanical" => Some(Industry::Mechanical),
            "electronics" => Some(Industry::Electronics),
            _ => None,
        }
    }

    pub fn all() -> &'static [Industry] {
        &[
            Industry::Agriculture,
            Industry::Mechanical,
            Industry::Electronics,
        ]
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::normalize(s).ok_or_else(|| {
            let known: Vec<&str> = Industry::all().iter().map(Industry::as_str).collect();
            format!("Unknown industry: {} (expected one of {})", s, known.join(", "))
        })
    }
}

/// A stored sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: i64,
    pub sensor_type: SensorType,
    /// Human-facing sensor name (e.g. "Greenhouse Temp")
    pub sensor_name: String,
    pub value: f64,
    pub unit: String,
    pub location: Option<String>,
    pub observed_at: DateTime<Utc>,
}

/// A reading to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReading {
    pub sensor_type: SensorType,
    pub sensor_name: String,
    pub value: f64,
    pub unit: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Defaults to the time of insertion
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl NewReading {
    pub fn new(sensor_type: SensorType, value: f64, unit: impl Into<String>) -> Self {
        Self {
            sensor_type,
            sensor_name: sensor_type.display_name().to_string(),
            value,
            unit: unit.into(),
            location: None,
            observed_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.sensor_name = name.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }
}

/// History window for the detail view and exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    LastHour,
    #[serde(rename = "6h")]
    LastSixHours,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::LastHour => "1h",
            TimeRange::LastSixHours => "6h",
            TimeRange::LastDay => "24h",
            TimeRange::LastWeek => "7d",
            TimeRange::LastMonth => "30d",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            TimeRange::LastHour => Duration::hours(1),
            TimeRange::LastSixHours => Duration::hours(6),
            TimeRange::LastDay => Duration::hours(24),
            TimeRange::LastWeek => Duration::days(7),
            TimeRange::LastMonth => Duration::days(30),
        }
    }

    /// Start of the window ending at `now`
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(TimeRange::LastHour),
            "6h" => Ok(TimeRange::LastSixHours),
            "24h" => Ok(TimeRange::LastDay),
            "7d" => Ok(TimeRange::LastWeek),
            "30d" => Ok(TimeRange::LastMonth),
            _ => Err(format!("Unknown time range: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_aliases() {
        assert_eq!(SensorType::normalize("Gas Level"), Some(SensorType::Gas));
        assert_eq!(SensorType::normalize("methane"), Some(SensorType::Gas));
        assert_eq!(SensorType::normalize(" DISTANCE "), Some(SensorType::Proximity));
        assert_eq!(SensorType::normalize("ultrasonic"), Some(SensorType::Proximity));
        assert_eq!(SensorType::normalize("Temperature"), Some(SensorType::Temperature));
        assert_eq!(SensorType::normalize("light"), None);
        assert_eq!(SensorType::normalize(""), None);
    }

    #[test]
    fn test_sensor_type_round_trips_through_str() {
        for sensor in SensorType::all() {
            assert_eq!(SensorType::from_str(sensor.as_str()).unwrap(), *sensor);
        }
    }

    #[test]
    fn test_core_sensors() {
        let core: Vec<_> = SensorType::all().iter().filter(|s| s.is_core()).collect();
        assert_eq!(core.len(), 4);
        assert!(!SensorType::Vibration.is_core());
    }

    #[test]
    fn test_industry_normalize() {
        assert_eq!(Industry::normalize("agriculture"), Some(Industry::Agriculture));
        assert_eq!(Industry::normalize("ELECTRONICS"), Some(Industry::Electronics));
        assert_eq!(Industry::normalize("Textiles"), None);

        let err = "Textiles".parse::<Industry>().unwrap_err();
        assert!(err.starts_with("Unknown industry: Textiles"));
        for industry in Industry::all() {
            assert!(err.contains(industry.as_str()));
        }
    }

    #[test]
    fn test_time_range_parsing() {
        assert_eq!("7d".parse::<TimeRange>().unwrap(), TimeRange::LastWeek);
        assert!("2w".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::LastDay);

        let now = Utc::now();
        assert_eq!(now - TimeRange::LastSixHours.since(now), Duration::hours(6));
    }

    #[test]
    fn test_new_reading_builder() {
        let reading = NewReading::new(SensorType::Humidity, 55.0, "%")
            .with_name("Line 2 Humidity")
            .with_location("Assembly Line 2");
        assert_eq!(reading.sensor_name, "Line 2 Humidity");
        assert_eq!(reading.location.as_deref(), Some("Assembly Line 2"));
        assert!(reading.observed_at.is_none());
    }
}
