//! Chat handlers - conversational questions about sensor data
//!
//! Conversations are kept in memory per session id and expire after a period
//! of inactivity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{AppError, AppState};
use iiot_core::chat::{ChatMessage, ChatSession};
use iiot_core::prompts::sensor_context;

/// Session timeout (30 minutes of inactivity)
const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Readings included as context for each turn
const CONTEXT_READINGS: usize = 10;

/// Longest accepted chat message
const MAX_MESSAGE_LEN: usize = 4000;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A conversation, locked for the whole of a turn so concurrent turns on the
/// same session run one after the other
type SharedChat = Arc<Mutex<ChatSession>>;

struct StoredSession {
    created_at: Instant,
    last_activity: Instant,
    chat: SharedChat,
}

impl StoredSession {
    fn new() -> Self {
        Self {
            created_at: Instant::now(),
            last_activity: Instant::now(),
            chat: Arc::new(Mutex::new(ChatSession::new())),
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// In-memory chat session manager
///
/// Only ids minted here are ever stored; an unknown or expired id starts a
/// new session under a fresh id.
pub struct ChatSessionManager {
    sessions: RwLock<HashMap<String, StoredSession>>,
    timeout: Duration,
}

impl Default for ChatSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSessionManager {
    pub fn new() -> Self {
        Self::with_timeout(SESSION_TIMEOUT)
    }

    /// Expire sessions after `timeout` of inactivity
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    fn new_session_id() -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        hasher.update(counter.to_le_bytes());
        let hash = hasher.finalize();
        format!("chat_{:x}", hash)[..21].to_string()
    }

    /// Create a new session and return its ID
    pub async fn create_session(&self) -> String {
        let mut sessions = self.sessions.write().await;
        Self::insert_new(&mut sessions, self.timeout).0
    }

    fn insert_new(
        sessions: &mut HashMap<String, StoredSession>,
        timeout: Duration,
    ) -> (String, SharedChat) {
        // Clean up expired sessions while we're here
        sessions.retain(|_, s| !s.is_expired(timeout));

        let session_id = Self::new_session_id();
        let session = StoredSession::new();
        let chat = session.chat.clone();
        sessions.insert(session_id.clone(), session);
        (session_id, chat)
    }

    /// Resolve the session for a turn, touching it
    ///
    /// Returns the requested id when it names a live session, otherwise a
    /// freshly minted one.
    async fn session_for(&self, requested: Option<&str>) -> (String, SharedChat) {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = requested {
            if let Some(session) = sessions.get_mut(id).filter(|s| !s.is_expired(self.timeout)) {
                session.last_activity = Instant::now();
                return (id.to_string(), session.chat.clone());
            }
        }

        Self::insert_new(&mut sessions, self.timeout)
    }

    /// Delete a session
    pub async fn delete_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    /// Get session info (None if unknown or expired)
    pub async fn get_session_info(&self, session_id: &str) -> Option<SessionInfo> {
        let (created_at, last_activity, chat) = {
            let sessions = self.sessions.read().await;
            let s = sessions
                .get(session_id)
                .filter(|s| !s.is_expired(self.timeout))?;
            (s.created_at, s.last_activity, s.chat.clone())
        };

        let messages = chat.lock().await.messages().to_vec();
        Some(SessionInfo {
            session_id: session_id.to_string(),
            message_count: messages.len(),
            created_at_secs_ago: created_at.elapsed().as_secs(),
            last_activity_secs_ago: last_activity.elapsed().as_secs(),
            messages,
        })
    }

    /// Number of live sessions
    pub async fn active_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|s| !s.is_expired(self.timeout))
            .count()
    }
}

/// Session info response
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub message_count: usize,
    pub created_at_secs_ago: u64,
    pub last_activity_secs_ago: u64,
    pub messages: Vec<ChatMessage>,
}

/// Request to chat with the assistant
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Optional session ID for conversation continuity
    #[serde(default)]
    pub session_id: Option<String>,
    /// Restrict the reading context to one sensor name
    #[serde(default)]
    pub sensor_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Session ID for follow-up messages
    pub session_id: String,
}

/// POST /api/chat/session - Create a new chat session
pub async fn create_chat_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionInfo>, AppError> {
    let session_id = state.chat_sessions.create_session().await;
    debug!(session_id = %session_id, "Created chat session");

    state
        .chat_sessions
        .get_session_info(&session_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::internal("Failed to create chat session"))
}

/// GET /api/chat/session/:id - Get session info and messages
pub async fn get_chat_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfo>, AppError> {
    let info = state
        .chat_sessions
        .get_session_info(&session_id)
        .await
        .ok_or_else(|| AppError::not_found("Session not found or expired"))?;

    Ok(Json(info))
}

/// DELETE /api/chat/session/:id - Delete a chat session
pub async fn delete_chat_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    let deleted = state.chat_sessions.delete_session(&session_id).await;
    debug!(session_id = %session_id, deleted, "Deleted chat session");
    Json(serde_json::json!({ "deleted": deleted }))
}

/// POST /api/chat - Send a message to the assistant
///
/// Without an AI backend the reply is the "unavailable" notice rather than an
/// error, so the conversation still records the turn.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("Message is required"));
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Err(AppError::bad_request("Message is too long"));
    }

    let sensor_name = req.sensor_name.as_deref().filter(|s| !s.trim().is_empty());
    let readings = state.db.recent_readings(CONTEXT_READINGS, sensor_name)?;
    let context = sensor_context(&readings);

    let requested = req.session_id.as_deref().filter(|s| !s.is_empty());
    let (session_id, chat) = state.chat_sessions.session_for(requested).await;
    if requested.is_some_and(|id| id != session_id) {
        debug!(session_id = %session_id, "Unknown or expired chat session, started a new one");
    }

    // Held across the backend call so turns on one session never interleave
    let mut session = chat.lock().await;
    debug!(
        session_id = %session_id,
        history_len = session.messages().len(),
        context_readings = readings.len(),
        "Processing chat message"
    );

    let reply = session
        .respond(state.ai.as_ref(), message, Some(&context))
        .await;
    drop(session);

    Ok(Json(ChatResponse { reply, session_id }))
}
