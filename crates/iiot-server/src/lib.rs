//! IIoT Monitor Web Server
//!
//! Axum-based REST API over the Insight Evaluator: evaluate readings, serve
//! the dashboard cards, record and export history, dispatch alerts, and chat
//! with the assistant.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (pagination limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use iiot_core::ai::{AIBackend, AIClient};
use iiot_core::alerts::AlertDispatcher;
use iiot_core::db::Database;
use iiot_core::insights::{InsightEvaluator, ThresholdRegistry};

mod handlers;

pub use handlers::ChatSessionManager;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Threshold tables; the built-in tables when `None`
    pub thresholds: Option<ThresholdRegistry>,
}

impl ServerConfig {
    /// Read `IIOT_ALLOWED_ORIGINS` (comma-separated)
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("IIOT_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            allowed_origins,
            thresholds: None,
        }
    }

    pub fn with_thresholds(mut self, registry: ThresholdRegistry) -> Self {
        self.thresholds = Some(registry);
        self
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub evaluator: InsightEvaluator,
    pub ai: Option<AIClient>,
    pub alerts: AlertDispatcher,
    /// Session manager for chat conversations
    pub chat_sessions: ChatSessionManager,
}

impl AppState {
    /// State wired from the environment (AI backend, alert webhook)
    pub fn new(db: Database, config: &ServerConfig) -> Self {
        let registry = config
            .thresholds
            .clone()
            .unwrap_or_else(ThresholdRegistry::builtin);

        let ai = AIClient::from_env();
        match &ai {
            Some(client) => info!(
                "AI backend configured: {} at {} (model: {})",
                client.backend_name(),
                client.host(),
                client.model()
            ),
            None => info!("ℹ️  AI backend not configured (set GEMINI_API_KEY or OLLAMA_HOST to enable chat)"),
        }

        Self {
            alerts: AlertDispatcher::from_env(db.clone()),
            db,
            evaluator: InsightEvaluator::with_registry(registry),
            ai,
            chat_sessions: ChatSessionManager::new(),
        }
    }

    /// Replace the AI client
    pub fn with_ai(mut self, ai: Option<AIClient>) -> Self {
        self.ai = ai;
        self
    }

    /// Replace the alert dispatcher
    pub fn with_alerts(mut self, alerts: AlertDispatcher) -> Self {
        self.alerts = alerts;
        self
    }
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = AppState::new(db, &config);
    create_router_with_state(state, static_dir, &config)
}

/// Create the application router around prepared state (for testing)
pub fn create_router_with_state(
    state: AppState,
    static_dir: Option<&str>,
    config: &ServerConfig,
) -> Router {
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Evaluation
        .route("/evaluate", post(handlers::evaluate))
        .route("/thresholds", get(handlers::list_thresholds))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Readings
        .route(
            "/readings",
            get(handlers::list_readings).post(handlers::record_reading),
        )
        .route("/sensors/:sensor/history", get(handlers::sensor_history))
        .route("/sensors/:sensor/export", get(handlers::export_sensor))
        // Alerts
        .route(
            "/alerts",
            get(handlers::list_alerts).post(handlers::send_alert),
        )
        // Chat
        .route("/chat", post(handlers::chat))
        .route("/chat/session", post(handlers::create_chat_session))
        .route(
            "/chat/session/:id",
            get(handlers::get_chat_session).delete(handlers::delete_chat_session),
        );

    // Build CORS layer
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection().await;

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection() {
    if let Some(client) = AIClient::from_env() {
        if client.health_check().await {
            info!(
                "✅ AI backend connected: {} (model: {})",
                client.host(),
                client.model()
            );
        } else {
            warn!(
                "⚠️  AI backend configured but not responding: {} (model: {})",
                client.host(),
                client.model()
            );
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, surfacing validation problems to the client
    pub fn from_core(err: iiot_core::Error) -> Self {
        match err {
            iiot_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
