//! # Chat Sessions
//!
//! File: cli/src/bot/session.rs
//!
//! ## Overview
//!
//! A `Session` is the explicit per-user context of a conversation:
//! - the transcript, an append-only list of user/assistant turns
//! - the generator context, the past inputs and generated replies handed to
//!   the conversational generator (legacy strategy only)
//!
//! Both are reset together by `Session::clear`.
//!
//! `SessionStore` is the registry used by the HTTP server. Each session sits
//! behind its own mutex, so a slow turn in one conversation never holds up
//! another, and no session can observe another's turns. Sessions that stay
//! idle longer than the configured time-to-live are removed by
//! `SessionStore::prune_idle`, which the server runs periodically.
//!
use crate::core::error::{LookarounError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// History passed to the conversational generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationContext {
    pub past_user_inputs: Vec<String>,
    pub generated_responses: Vec<String>,
}

impl ConversationContext {
    pub fn push(&mut self, input: &str, reply: &str) {
        self.past_user_inputs.push(input.to_string());
        self.generated_responses.push(reply.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.past_user_inputs.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    transcript: Vec<Turn>,
    context: ConversationContext,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            transcript: Vec::new(),
            context: ConversationContext::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the session was created, recorded to or cleared last.
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ConversationContext {
        &mut self.context
    }

    /// Appends the user's message followed by the assistant's answer.
    pub fn record(&mut self, input: &str, answer: &str) {
        let now = Utc::now();
        self.transcript.push(Turn {
            role: Role::User,
            text: input.to_string(),
            at: now,
        });
        self.transcript.push(Turn {
            role: Role::Assistant,
            text: answer.to_string(),
            at: now,
        });
        self.last_active = now;
    }

    /// Drops the transcript and the generator context.
    pub fn clear(&mut self) {
        debug!("Clearing session {}", self.id);
        self.transcript = Vec::new();
        self.context = ConversationContext::default();
        self.last_active = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory registry of live sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new, empty session and returns its id.
    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!("Started session {}", id);
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| LookarounError::SessionNotFound { id }.into())
    }

    /// Ends a session, discarding its transcript.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Ended session {}", id);
                Ok(())
            }
            None => Err(LookarounError::SessionNotFound { id }.into()),
        }
    }

    /// Removes sessions idle for longer than `ttl` and returns how many went.
    ///
    /// A session whose lock is held is in the middle of a turn and is kept.
    pub async fn prune_idle(&self, ttl: TimeDelta) -> usize {
        let cutoff = Utc::now() - ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| match session.try_lock() {
            Ok(session) if session.last_active < cutoff => {
                info!(
                    "Expiring idle session {} (created {}, last active {})",
                    id,
                    session.created_at().to_rfc3339(),
                    session.last_active.to_rfc3339()
                );
                false
            }
            _ => true,
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
