//! Built-in threshold tables
//!
//! The default tables apply to every industry. Industry tables replace the
//! default for their (sensor, industry) pair; anything an industry does not
//! define falls through to the default table.

use super::thresholds::{Outcome, ThresholdTable};
use super::types::{AlertLevel, InsightStatus};
use crate::models::{Industry, SensorType};

use InsightStatus::{Clear, Critical, Info, Normal, Optimal, Safe, Warning};

/// Tables used when no industry (or an unknown one) is given
pub fn default_tables() -> Vec<ThresholdTable> {
    vec![
        default_temperature(),
        default_humidity(),
        default_gas(),
        default_proximity(),
    ]
}

/// Per-industry overrides
pub fn industry_tables() -> Vec<ThresholdTable> {
    vec![
        agriculture_temperature(),
        agriculture_humidity(),
        agriculture_water_level(),
        electronics_humidity(),
        electronics_temperature(),
        electronics_voc(),
        mechanical_limit(SensorType::Vibration, 5.0),
        mechanical_limit(SensorType::Pressure, 200.0),
        mechanical_limit(SensorType::Voltage, 450.0),
    ]
}

// Critical below 10 or above 40, warning in [10,15) and (35,40], optimal in [15,35].
fn default_temperature() -> ThresholdTable {
    ThresholdTable::new(SensorType::Temperature)
        .unit("°C")
        .below(
            10.0,
            Outcome::new(
                Critical,
                "CRITICAL: Temperature too low",
                "Check heating systems, risk of equipment damage",
            ),
        )
        .above(
            40.0,
            Outcome::new(
                Critical,
                "CRITICAL: Temperature too high",
                "Check cooling systems, equipment overheating risk",
            ),
        )
        .below(
            15.0,
            Outcome::new(Warning, "Low temperature detected", "Monitor heating systems"),
        )
        .above(
            35.0,
            Outcome::new(Warning, "High temperature detected", "Monitor cooling systems"),
        )
        .otherwise(Outcome::new(
            Optimal,
            "Temperature within normal range (15-35°C)",
            "Maintain current conditions",
        ))
}

fn default_humidity() -> ThresholdTable {
    ThresholdTable::new(SensorType::Humidity)
        .unit("%")
        .below(
            30.0,
            Outcome::new(
                Critical,
                "CRITICAL: Humidity too low",
                "Risk of static electricity, increase humidity",
            ),
        )
        .above(
            80.0,
            Outcome::new(
                Critical,
                "CRITICAL: Humidity too high",
                "Condensation risk, improve ventilation",
            ),
        )
        .below(
            40.0,
            Outcome::new(Warning, "Low humidity detected", "Monitor humidity levels"),
        )
        .above(
            70.0,
            Outcome::new(Warning, "High humidity detected", "Check ventilation systems"),
        )
        .otherwise(Outcome::new(
            Optimal,
            "Humidity within optimal range (40-70%)",
            "Maintain current conditions",
        ))
}

// Gas sensors report raw ppm-like counts in whatever unit the board emits,
// so there is no unit check.
fn default_gas() -> ThresholdTable {
    ThresholdTable::new(SensorType::Gas)
        .below(
            700.0,
            Outcome::new(
                Warning,
                "Low gas levels detected - potential sensor issue",
                "Check sensor calibration and connections",
            ),
        )
        .above(
            2500.0,
            Outcome::new(
                Critical,
                "CRITICAL GAS ALERT - Dangerous levels detected",
                "EVACUATE AREA - Check for gas leaks immediately",
            ),
        )
        .otherwise(Outcome::new(
            Safe,
            "Gas levels within normal range (700-2500)",
            "Continue regular monitoring",
        ))
}

fn default_proximity() -> ThresholdTable {
    ThresholdTable::new(SensorType::Proximity)
        .unit("cm")
        .below(
            10.0,
            Outcome::new(
                Critical,
                "CRITICAL: Object very close - collision risk",
                "IMMEDIATE ACTION - Clear obstruction",
            ),
        )
        .below(
            30.0,
            Outcome::new(
                Warning,
                "Object detected close - safety concern",
                "Monitor area, check for obstructions",
            ),
        )
        .below(
            50.0,
            Outcome::new(Info, "Object in proximity range", "Normal monitoring"),
        )
        .otherwise(Outcome::new(
            Clear,
            "Area clear - safe distance maintained",
            "Normal operation",
        ))
}

// Optimal growing band is 10-30°C. Above 38 the risk is high, above 45 crops
// take permanent damage.
fn agriculture_temperature() -> ThresholdTable {
    ThresholdTable::new(SensorType::Temperature)
        .for_industry(Industry::Agriculture)
        .unit("°C")
        .below(
            5.0,
            Outcome::new(
                Critical,
                "Frost risk: {value}°C can damage crops",
                "Activate frost protection and cover sensitive crops",
            ),
        )
        .above(
            45.0,
            Outcome::new(
                Critical,
                "Extreme heat stress: {value}°C can cause permanent crop damage",
                "Activate all irrigation and misting systems immediately, increase greenhouse ventilation",
            ),
        )
        .below(
            10.0,
            Outcome::new(
                Warning,
                "Cool conditions: {value}°C slows crop growth",
                "Check greenhouse heating and close vents overnight",
            ),
        )
        .above(
            38.0,
            Outcome::new(
                Warning,
                "High temperature: {value}°C risks reduced photosynthesis and heat stress",
                "Increase irrigation frequency and confirm ventilation is running",
            )
            .alert(AlertLevel::High),
        )
        .above(
            30.0,
            Outcome::new(
                Warning,
                "Warm conditions: {value}°C is above the optimal growing range",
                "Monitor leaf temperature and soil moisture",
            ),
        )
        .otherwise(Outcome::new(
            Optimal,
            "Temperature of {value}°C is ideal for current crops",
            "Maintain current climate control settings",
        ))
}

fn agriculture_humidity() -> ThresholdTable {
    ThresholdTable::new(SensorType::Humidity)
        .for_industry(Industry::Agriculture)
        .unit("%")
        .below(
            30.0,
            Outcome::new(
                Warning,
                "Low humidity: plants may be losing water too quickly at {value}%",
                "Activate misting systems and increase irrigation",
            ),
        )
        .above(
            85.0,
            Outcome::new(
                Warning,
                "High humidity: {value}% increases risk of fungal disease",
                "Increase air circulation and reduce irrigation frequency",
            ),
        )
        .otherwise(Outcome::new(
            Optimal,
            "Humidity at {value}% is supporting healthy plant growth",
            "Maintain current settings",
        ))
}

// Ultrasonic sensors on irrigation tanks report fill level as a percentage.
fn agriculture_water_level() -> ThresholdTable {
    ThresholdTable::new(SensorType::Proximity)
        .for_industry(Industry::Agriculture)
        .unit("%")
        .below(
            10.0,
            Outcome::new(
                Critical,
                "Irrigation tank critically low at {value}%",
                "Refill water tank immediately and pause scheduled irrigation",
            ),
        )
        .below(
            30.0,
            Outcome::new(
                Warning,
                "Water tank low at {value}%",
                "Schedule a refill or activate the refill pump",
            ),
        )
        .otherwise(Outcome::new(
            Normal,
            "Water tank at {value}%, sufficient for scheduled operations",
            "No action needed",
        ))
}

fn electronics_humidity() -> ThresholdTable {
    ThresholdTable::new(SensorType::Humidity)
        .for_industry(Industry::Electronics)
        .unit("%")
        .below(
            30.0,
            Outcome::new(
                Critical,
                "CRITICAL: Static risk (ESD) at {value}% humidity",
                "Activate humidification, enforce ESD grounding straps, halt movement of sensitive components",
            ),
        )
        .above(
            70.0,
            Outcome::new(
                Warning,
                "Corrosion risk: {value}% humidity allows moisture ingress",
                "Activate dehumidifiers and check seals on component storage",
            )
            .alert(AlertLevel::High),
        )
        .otherwise(Outcome::new(
            Safe,
            "Humidity at {value}% is within the ESD-safe range",
            "Maintain current settings",
        ))
}

fn electronics_temperature() -> ThresholdTable {
    ThresholdTable::new(SensorType::Temperature)
        .for_industry(Industry::Electronics)
        .unit("°C")
        .above(
            30.0,
            Outcome::new(
                Warning,
                "Component overheating risk at {value}°C",
                "Verify HVAC operation and check for blocked air vents near machinery",
            ),
        )
        .otherwise(Outcome::new(
            Optimal,
            "Temperature at {value}°C is ideal for the cleanroom",
            "No action needed",
        ))
}

fn electronics_voc() -> ThresholdTable {
    ThresholdTable::new(SensorType::Gas)
        .for_industry(Industry::Electronics)
        .above(
            1000.0,
            Outcome::new(
                Critical,
                "High VOC concentration ({value} ppm) is a health hazard",
                "Activate emergency ventilation, require PPE, investigate solvent spills",
            ),
        )
        .otherwise(Outcome::new(
            Safe,
            "VOC levels within safe operational limits",
            "No action needed",
        ))
}

fn mechanical_limit(sensor: SensorType, limit: f64) -> ThresholdTable {
    let name = sensor.display_name();
    ThresholdTable::new(sensor)
        .for_industry(Industry::Mechanical)
        .above(
            limit,
            Outcome::new(
                Warning,
                format!("ALERT: {} reading {{value}} {{unit}} exceeds {}", name, limit),
                format!("Inspect equipment and reduce load until {} is below {}", name.to_lowercase(), limit),
            )
            .alert(AlertLevel::High),
        )
        .otherwise(Outcome::new(
            Normal,
            format!("{} within operating limits", name),
            "Continue with standard operating procedures",
        ))
}
