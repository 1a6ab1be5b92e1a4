//! Prompt text for the AI assistant

use crate::models::SensorReading;

/// Readings rendered one per line as context for the model
///
/// `"<name> <value><unit> at <timestamp>"`, newest first as given.
pub fn sensor_context(readings: &[SensorReading]) -> String {
    readings
        .iter()
        .map(|r| {
            format!(
                "{} {}{} at {}",
                r.sensor_name,
                r.value,
                r.unit,
                r.observed_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chat turn prompt: prior history plus the new message
pub fn chat_prompt(history: &str, message: &str, context: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a helpful AI assistant for an industrial IoT monitoring dashboard.\n\
         The user is asking for help with their sensor data.\n",
    );

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str("Recent sensor readings:\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt.push_str("Current conversation history:\n");
    prompt.push_str(history);
    prompt.push_str(&format!(
        "\nUser's new message: \"{}\"\n\n\
         Provide a helpful and concise response. \
         If you need more information, ask clarifying questions. \
         Suggest actions the user can take where appropriate.",
        message.trim()
    ));
    prompt
}

/// One-shot analysis of a single reading
pub fn enhanced_insight_prompt(sensor: &str, location: &str, value: f64, unit: &str) -> String {
    format!(
        "You are an expert assistant for an industrial IoT monitoring system.\n\
         A sensor of type \"{sensor}\" at location \"{location}\" is reporting a value of {value} {unit}.\n\
         Based on this data, provide a concise, actionable insight and a potential root cause.\n\
         The message should be no more than 2-3 short sentences.\n\
         Example: \"Elevated temperature suggests potential equipment stress. \
         Check for ventilation blockages or coolant leaks.\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SensorType;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_sensor_context_lines() {
        let reading = SensorReading {
            id: 1,
            sensor_type: SensorType::Gas,
            sensor_name: "VOC Sensor".into(),
            value: 2600.0,
            unit: "ppm".into(),
            location: None,
            observed_at: Utc.with_ymd_and_hms(2024, 5, 2, 8, 15, 0).unwrap(),
        };
        assert_eq!(
            sensor_context(&[reading]),
            "VOC Sensor 2600ppm at 2024-05-02 08:15:00 UTC"
        );
        assert_eq!(sensor_context(&[]), "");
    }

    #[test]
    fn test_chat_prompt_includes_parts() {
        let prompt = chat_prompt("User: hi\nAI: hello", "  why is gas high? ", Some("VOC 2600ppm"));
        assert!(prompt.contains("Recent sensor readings:\nVOC 2600ppm"));
        assert!(prompt.contains("User: hi\nAI: hello"));
        assert!(prompt.contains("User's new message: \"why is gas high?\""));

        let prompt = chat_prompt("", "hello", Some("  "));
        assert!(!prompt.contains("Recent sensor readings"));
    }

    #[test]
    fn test_enhanced_prompt() {
        let prompt = enhanced_insight_prompt("temperature", "Greenhouse A1", 38.5, "°C");
        assert!(prompt.contains("\"temperature\" at location \"Greenhouse A1\""));
        assert!(prompt.contains("38.5 °C"));
    }
}
