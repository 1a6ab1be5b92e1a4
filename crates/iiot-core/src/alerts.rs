//! Alert dispatch
//!
//! Insights whose alert level is above `low` can be escalated. An alert is
//! always written to the `alerts` table first; forwarding it to a
//! notification sink (a webhook) is best effort and a failed delivery is
//! reported back to the caller, never dropped.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::insights::{AlertLevel, Insight};

/// Environment variable naming the webhook alerts are POSTed to
pub const ALERT_WEBHOOK_ENV: &str = "IIOT_ALERT_WEBHOOK";

/// An alert to store and forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    /// Where the notification should go (email address or handle)
    #[serde(alias = "email")]
    pub recipient: String,
    #[serde(alias = "sensorName")]
    pub sensor_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(alias = "alertLevel", default = "default_alert_level")]
    pub alert_level: AlertLevel,
}

fn default_alert_level() -> AlertLevel {
    AlertLevel::Medium
}

impl AlertRequest {
    /// Build an alert for an insight, or `None` when the insight does not warrant one
    pub fn from_insight(
        recipient: impl Into<String>,
        sensor_name: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        insight: &Insight,
    ) -> Option<Self> {
        if !insight.alert_level.should_alert() {
            return None;
        }
        Some(Self {
            recipient: recipient.into(),
            sensor_name: sensor_name.into(),
            message: insight.message.clone(),
            value: Some(value),
            unit: Some(unit.into()),
            alert_level: insight.alert_level,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.recipient.trim().is_empty() {
            return Err(Error::InvalidData("Alert recipient is required".into()));
        }
        if self.sensor_name.trim().is_empty() {
            return Err(Error::InvalidData("Sensor name is required".into()));
        }
        Ok(())
    }

    /// Notification subject line
    pub fn subject(&self) -> String {
        format!("Alert: {} - {}", self.sensor_name, self.alert_level)
    }
}

/// A stored alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: i64,
    pub recipient: String,
    pub sensor_name: String,
    pub message: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub alert_level: AlertLevel,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of dispatching one alert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub ok: bool,
    pub alert_id: i64,
    /// Whether a sink accepted the notification
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Destination for alert notifications
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn deliver(&self, alert: &AlertRequest) -> Result<()>;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    subject: String,
    #[serde(flatten)]
    alert: &'a AlertRequest,
    sent_at: DateTime<Utc>,
}

/// POSTs alerts as JSON to a fixed URL
#[derive(Clone)]
pub struct WebhookSink {
    http_client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: &str) -> Self {
        Self {
            http_client: Client::new(),
            url: url.to_string(),
        }
    }

    /// Create from `IIOT_ALERT_WEBHOOK`, if set
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(ALERT_WEBHOOK_ENV).ok()?;
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        Some(Self::new(url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AlertSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, alert: &AlertRequest) -> Result<()> {
        let payload = WebhookPayload {
            subject: alert.subject(),
            alert,
            sent_at: Utc::now(),
        };
        self.http_client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Stores alerts and forwards them to an optional sink
#[derive(Clone)]
pub struct AlertDispatcher {
    db: Database,
    sink: Option<Arc<dyn AlertSink>>,
}

impl AlertDispatcher {
    /// Dispatcher that only stores alerts
    pub fn new(db: Database) -> Self {
        Self { db, sink: None }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Use the webhook from the environment when configured
    pub fn from_env(db: Database) -> Self {
        let dispatcher = Self::new(db);
        match WebhookSink::from_env() {
            Some(sink) => {
                info!(url = sink.url(), "Alert webhook configured");
                dispatcher.with_sink(Arc::new(sink))
            }
            None => dispatcher,
        }
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub async fn dispatch(&self, alert: &AlertRequest) -> Result<DispatchOutcome> {
        alert.validate()?;

        let alert_id = self.db.insert_alert(alert)?;
        info!(
            alert_id,
            sensor = %alert.sensor_name,
            level = alert.alert_level.as_str(),
            "Alert stored"
        );

        let Some(sink) = &self.sink else {
            return Ok(DispatchOutcome {
                ok: true,
                alert_id,
                delivered: false,
                note: Some("Stored alert; no notification sink configured".to_string()),
            });
        };

        match sink.deliver(alert).await {
            Ok(()) => {
                self.db.mark_alert_delivered(alert_id)?;
                Ok(DispatchOutcome {
                    ok: true,
                    alert_id,
                    delivered: true,
                    note: None,
                })
            }
            Err(e) => {
                warn!(alert_id, sink = sink.name(), error = %e, "Alert delivery failed");
                Ok(DispatchOutcome {
                    ok: true,
                    alert_id,
                    delivered: false,
                    note: Some(format!("Stored alert; delivery via {} failed", sink.name())),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightEvaluator;
    use crate::test_utils::MockAiServer;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        seen: Mutex<Vec<AlertRequest>>,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, alert: &AlertRequest) -> Result<()> {
            if self.fail {
                return Err(Error::InvalidData("sink offline".into()));
            }
            self.seen.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn critical_gas() -> AlertRequest {
        let insight = InsightEvaluator::new().evaluate("gas", 2600.0, "ppm", None);
        AlertRequest::from_insight("ops@example.com", "VOC Sensor", 2600.0, "ppm", &insight)
            .unwrap()
    }

    #[test]
    fn test_low_insights_do_not_alert() {
        let insight = InsightEvaluator::new().evaluate("temperature", 22.0, "°C", None);
        assert!(AlertRequest::from_insight("ops@example.com", "Temp", 22.0, "°C", &insight).is_none());
    }

    #[test]
    fn test_from_insight_copies_fields() {
        let alert = critical_gas();
        assert_eq!(alert.alert_level, AlertLevel::Critical);
        assert_eq!(alert.message, "CRITICAL GAS ALERT - Dangerous levels detected");
        assert_eq!(alert.value, Some(2600.0));
        assert_eq!(alert.subject(), "Alert: VOC Sensor - critical");
    }

    #[test]
    fn test_validation() {
        let mut alert = critical_gas();
        alert.recipient = " ".into();
        assert!(alert.validate().is_err());

        let mut alert = critical_gas();
        alert.sensor_name.clear();
        assert!(alert.validate().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_without_sink_stores_only() {
        let db = Database::in_memory().unwrap();
        let outcome = AlertDispatcher::new(db.clone())
            .dispatch(&critical_gas())
            .await
            .unwrap();
        assert!(outcome.ok);
        assert!(!outcome.delivered);
        assert!(outcome.note.is_some());
        assert_eq!(db.list_alerts(10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_delivers_and_marks() {
        let db = Database::in_memory().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = AlertDispatcher::new(db.clone()).with_sink(sink.clone());

        let outcome = dispatcher.dispatch(&critical_gas()).await.unwrap();
        assert!(outcome.delivered);
        assert_eq!(sink.seen.lock().unwrap().len(), 1);
        assert!(db.get_alert(outcome.alert_id).unwrap().unwrap().delivered);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_kept() {
        let db = Database::in_memory().unwrap();
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let dispatcher = AlertDispatcher::new(db.clone()).with_sink(sink);

        let outcome = dispatcher.dispatch(&critical_gas()).await.unwrap();
        assert!(outcome.ok);
        assert!(!outcome.delivered);
        let stored = db.get_alert(outcome.alert_id).unwrap().unwrap();
        assert!(!stored.delivered);
    }

    #[tokio::test]
    async fn test_webhook_sink_posts_payload() {
        let server = MockAiServer::start().await;
        let db = Database::in_memory().unwrap();
        let sink = WebhookSink::new(&format!("{}/webhook", server.url()));
        let dispatcher = AlertDispatcher::new(db).with_sink(Arc::new(sink));

        let outcome = dispatcher.dispatch(&critical_gas()).await.unwrap();
        assert!(outcome.delivered);

        let received = server.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["subject"], "Alert: VOC Sensor - critical");
        assert_eq!(received[0]["alert_level"], "critical");
        assert_eq!(received[0]["value"], 2600.0);
    }

    #[tokio::test]
    async fn test_webhook_error_status_is_failure() {
        let server = MockAiServer::start().await;
        let sink = WebhookSink::new(&format!("{}/webhook/fail", server.url()));
        assert!(sink.deliver(&critical_gas()).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_request_not_stored() {
        let db = Database::in_memory().unwrap();
        let mut alert = critical_gas();
        alert.recipient.clear();
        assert!(AlertDispatcher::new(db.clone()).dispatch(&alert).await.is_err());
        assert!(db.list_alerts(10).unwrap().is_empty());
    }
}
