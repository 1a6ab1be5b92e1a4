//! Database tests

use super::*;
use crate::alerts::AlertRequest;
use crate::insights::AlertLevel;
use crate::models::*;
use chrono::Duration;

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_readings().unwrap(), 0);
    assert!(db.latest_reading(SensorType::Gas).unwrap().is_none());
    assert!(db.list_alerts(10).unwrap().is_empty());
}

#[test]
fn test_insert_and_latest() {
    let db = Database::in_memory().unwrap();
    let now = Utc::now();

    db.insert_reading(
        &NewReading::new(SensorType::Temperature, 21.0, "°C").observed_at(now - Duration::minutes(5)),
    )
    .unwrap();
    let id = db
        .insert_reading(
            &NewReading::new(SensorType::Temperature, 23.5, "°C")
                .with_name("Greenhouse Temp")
                .with_location("Greenhouse A1")
                .observed_at(now),
        )
        .unwrap();
    assert!(id > 0);

    let latest = db.latest_reading(SensorType::Temperature).unwrap().unwrap();
    assert_eq!(latest.id, id);
    assert_eq!(latest.value, 23.5);
    assert_eq!(latest.sensor_name, "Greenhouse Temp");
    assert_eq!(latest.location.as_deref(), Some("Greenhouse A1"));
    assert_eq!(latest.observed_at.timestamp_millis(), now.timestamp_millis());

    assert!(db.latest_reading(SensorType::Gas).unwrap().is_none());
}

#[test]
fn test_insert_rejects_bad_values() {
    let db = Database::in_memory().unwrap();
    let err = db
        .insert_reading(&NewReading::new(SensorType::Gas, f64::NAN, "ppm"))
        .unwrap_err();
    assert!(matches!(err, crate::Error::InvalidData(_)));

    let err = db
        .insert_reading(&NewReading::new(SensorType::Gas, 100.0, "ppm").with_name("  "))
        .unwrap_err();
    assert!(matches!(err, crate::Error::InvalidData(_)));
}

#[test]
fn test_recent_readings_filter_and_order() {
    let db = Database::in_memory().unwrap();
    let now = Utc::now();
    for i in 0..5 {
        db.insert_reading(
            &NewReading::new(SensorType::Humidity, 40.0 + i as f64, "%")
                .with_name("Line 2 Humidity")
                .observed_at(now - Duration::minutes(10 - i)),
        )
        .unwrap();
    }
    db.insert_reading(&NewReading::new(SensorType::Gas, 900.0, "ppm").observed_at(now))
        .unwrap();

    let recent = db.recent_readings(3, None).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].sensor_type, SensorType::Gas);

    let humidity = db.recent_readings(10, Some("line 2 humidity")).unwrap();
    assert_eq!(humidity.len(), 5);
    assert_eq!(humidity[0].value, 44.0);
    assert_eq!(humidity[4].value, 40.0);
}

#[test]
fn test_history_window() {
    let db = Database::in_memory().unwrap();
    let now = Utc::now();
    for hours in [30, 5, 2, 0] {
        db.insert_reading(
            &NewReading::new(SensorType::Temperature, hours as f64, "°C")
                .observed_at(now - Duration::hours(hours)),
        )
        .unwrap();
    }

    let day = db
        .reading_history(SensorType::Temperature, TimeRange::LastDay.since(now))
        .unwrap();
    let values: Vec<f64> = day.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![5.0, 2.0, 0.0]);

    let week = db
        .reading_history(SensorType::Temperature, TimeRange::LastWeek.since(now))
        .unwrap();
    assert_eq!(week.len(), 4);
}

#[test]
fn test_seed_demo_readings() {
    let db = Database::in_memory().unwrap();
    let inserted = db.seed_demo_readings(Utc::now()).unwrap();
    assert_eq!(inserted, 24);

    for sensor in SensorType::all() {
        assert_eq!(db.latest_reading(*sensor).unwrap().is_some(), sensor.is_core());
    }
    let temp = db.latest_reading(SensorType::Temperature).unwrap().unwrap();
    assert_eq!(temp.value, 38.5);
    assert_eq!(temp.location.as_deref(), Some("Greenhouse A1"));
    let gas = db.latest_reading(SensorType::Gas).unwrap().unwrap();
    assert_eq!(gas.value, 2600.0);
}

#[test]
fn test_alert_log() {
    let db = Database::in_memory().unwrap();
    let request = AlertRequest {
        recipient: "ops@example.com".into(),
        sensor_name: "VOC Sensor".into(),
        message: "CRITICAL GAS ALERT - Dangerous levels detected".into(),
        value: Some(2600.0),
        unit: Some("ppm".into()),
        alert_level: AlertLevel::Critical,
    };

    let id = db.insert_alert(&request).unwrap();
    let stored = db.get_alert(id).unwrap().unwrap();
    assert!(!stored.delivered);
    assert_eq!(stored.alert_level, AlertLevel::Critical);
    assert_eq!(stored.value, Some(2600.0));

    db.mark_alert_delivered(id).unwrap();
    assert!(db.get_alert(id).unwrap().unwrap().delivered);
    assert_eq!(db.list_alerts(10).unwrap().len(), 1);
    assert!(db.get_alert(id + 1).unwrap().is_none());
}

#[test]
fn test_corrupt_reading_rows_are_errors() {
    let db = Database::in_memory().unwrap();
    db.insert_reading(&NewReading::new(SensorType::Gas, 800.0, "ppm"))
        .unwrap();

    let conn = db.conn().unwrap();
    conn.execute(
        "UPDATE sensor_readings SET sensor_type = 'sonar' WHERE sensor_type = 'gas'",
        [],
    )
    .unwrap();
    assert!(db.recent_readings(10, None).is_err());

    conn.execute(
        "UPDATE sensor_readings SET sensor_type = 'gas', observed_at = 'yesterday'",
        [],
    )
    .unwrap();
    assert!(db.latest_reading(SensorType::Gas).is_err());
}

#[test]
fn test_corrupt_alert_rows_are_errors() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_alert(&AlertRequest {
            recipient: "ops@example.com".into(),
            sensor_name: "VOC Sensor".into(),
            message: "Gas high".into(),
            value: None,
            unit: None,
            alert_level: AlertLevel::High,
        })
        .unwrap();

    let conn = db.conn().unwrap();
    conn.execute("UPDATE alerts SET alert_level = 'urgent'", [])
        .unwrap();
    assert!(db.get_alert(id).is_err());

    conn.execute(
        "UPDATE alerts SET alert_level = 'high', created_at = 'not a date'",
        [],
    )
    .unwrap();
    assert!(db.list_alerts(10).is_err());
}
