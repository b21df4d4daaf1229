//! TTL-evicted store for voice session transcripts.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use config::SessionStoreConfig;
use moka::future::Cache;
use provider::MessageRole;
use tokio::sync::Mutex;

/// One transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Server-held conversation context for one voice session.
#[derive(Debug)]
pub struct VoiceSession {
    pub id: String,
    pub messages: Vec<TranscriptMessage>,
    pub created_at: DateTime<Utc>,
}

impl VoiceSession {
    pub fn new(id: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: vec![TranscriptMessage {
                role: MessageRole::System,
                content: system_prompt.into(),
            }],
            created_at: Utc::now(),
        }
    }

    /// Wipe the transcript back to a single system message.
    pub fn reset(&mut self, system_prompt: impl Into<String>) {
        self.messages = vec![TranscriptMessage {
            role: MessageRole::System,
            content: system_prompt.into(),
        }];
        self.created_at = Utc::now();
    }
}

/// Session store with bounded capacity and TTL eviction.
///
/// Values are `Arc<Mutex<VoiceSession>>`: overlapping requests for the
/// same session serialize on the session mutex, not on the store, and a
/// handle obtained before eviction stays valid for the request using it.
pub struct SessionStore {
    sessions: Cache<String, Arc<Mutex<VoiceSession>>>,
}

impl SessionStore {
    pub fn new(config: &SessionStoreConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .time_to_idle(Duration::from_secs(config.idle_secs))
            .build();
        Self { sessions }
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<VoiceSession>>> {
        self.sessions.get(session_id).await
    }

    pub async fn insert(&self, session: VoiceSession) -> Arc<Mutex<VoiceSession>> {
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, handle.clone()).await;
        handle
    }

    pub async fn remove(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
    }
}
