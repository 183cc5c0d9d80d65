//! Ephemeral per-user conversation state for multi-step flows.
//!
//! Entries expire `ttl` after they were set. Expiry is enforced lazily: a read that finds an
//! expired entry removes it and reports absence. The check and the removal happen under one
//! lock, so a concurrent `set_state` on the same key is never lost to an eviction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// State of one user's conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    /// Flow tag, e.g. `awaiting_wallet_address`.
    pub state: String,
    pub data: Map<String, Value>,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is(&self, tag: &str) -> bool {
        self.state == tag
    }
}

/// TTL-keyed map from user id to [`ConversationState`].
pub struct StateStore {
    states: Mutex<HashMap<String, ConversationState>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl StateStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Overwrites the user's state; expiry restarts at now + ttl.
    pub async fn set_state(&self, user_id: &str, state: impl Into<String>, data: Map<String, Value>) {
        let now = self.clock.now();
        let entry = ConversationState {
            state: state.into(),
            data,
            started_at: now,
            expires_at: now + self.ttl,
        };
        debug!(user_id = %user_id, state = %entry.state, expires_at = %entry.expires_at, "state set");
        self.states.lock().await.insert(user_id.to_string(), entry);
    }

    /// Returns the live state, evicting it first if it has expired.
    pub async fn get_state(&self, user_id: &str) -> Option<ConversationState> {
        let mut states = self.states.lock().await;
        Self::live_entry(&mut states, user_id, self.clock.now()).cloned()
    }

    /// Removes the user's state if present.
    pub async fn clear_state(&self, user_id: &str) {
        if self.states.lock().await.remove(user_id).is_some() {
            debug!(user_id = %user_id, "state cleared");
        }
    }

    /// Merges `partial` into the live state's data. Without a live state this does nothing and
    /// creates nothing. Returns whether a state was updated.
    pub async fn update_data(&self, user_id: &str, partial: Map<String, Value>) -> bool {
        let mut states = self.states.lock().await;
        match Self::live_entry(&mut states, user_id, self.clock.now()) {
            Some(entry) => {
                entry.data.extend(partial);
                true
            }
            None => false,
        }
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn live_entry<'a>(
        states: &'a mut HashMap<String, ConversationState>,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Option<&'a mut ConversationState> {
        let expired = states.get(user_id)?.is_expired_at(now);
        if expired {
            states.remove(user_id);
            debug!(user_id = %user_id, "state expired, evicted");
            return None;
        }
        states.get_mut(user_id)
    }
}
