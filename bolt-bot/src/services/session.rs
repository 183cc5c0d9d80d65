//! Session service: per-user session records over a [`Repository`].

use std::sync::Arc;

use serde_json::{Map, Value};
use storage::{Repository, SessionRecord};
use tracing::{debug, info, instrument};

use crate::core::{BotError, Result};

/// Reads and mutates [`SessionRecord`]s. Every mutation is a single repository call, so
/// concurrent messages from one user never overwrite each other's changes.
#[derive(Clone)]
pub struct SessionService {
    repo: Arc<dyn Repository<SessionRecord>>,
}

impl SessionService {
    pub fn new(repo: Arc<dyn Repository<SessionRecord>>) -> Self {
        Self { repo }
    }

    pub async fn get_session(&self, user_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.repo.get(user_id).await?)
    }

    /// Saves an empty session for `user_id`, replacing any existing one.
    #[instrument(skip(self))]
    pub async fn create_session(&self, user_id: &str) -> Result<SessionRecord> {
        let record = self.repo.save(user_id, SessionRecord::new(user_id)).await?;
        info!(user_id = %user_id, "session created");
        Ok(record)
    }

    /// Returns the user's session, creating an empty one if there is none. An existing record
    /// is never overwritten.
    pub async fn get_or_create_session(&self, user_id: &str) -> Result<SessionRecord> {
        if let Some(record) = self.get_session(user_id).await? {
            return Ok(record);
        }

        let id = user_id.to_string();
        let record = self
            .repo
            .update(
                user_id,
                Box::new(move |current: Option<SessionRecord>| {
                    Some(current.unwrap_or_else(|| SessionRecord::new(id)))
                }),
            )
            .await?;
        record.ok_or_else(|| BotError::Bot(format!("session {} was not stored", user_id)))
    }

    /// Merges `data` into the user's session, creating the session first if needed. The read,
    /// merge and write happen as one repository update.
    #[instrument(skip(self, data))]
    pub async fn update_session_data(
        &self,
        user_id: &str,
        data: Map<String, Value>,
    ) -> Result<SessionRecord> {
        let id = user_id.to_string();
        let record = self
            .repo
            .update(
                user_id,
                Box::new(move |current: Option<SessionRecord>| {
                    let mut record = current.unwrap_or_else(|| SessionRecord::new(id));
                    record.merge(data);
                    Some(record)
                }),
            )
            .await?
            .ok_or_else(|| BotError::Bot(format!("session {} was not stored", user_id)))?;
        debug!(user_id = %user_id, keys = record.session_data.len(), "session data updated");
        Ok(record)
    }

    /// Empties the user's session data and keeps the record. Returns false when the user has
    /// no session.
    #[instrument(skip(self))]
    pub async fn clear_session(&self, user_id: &str) -> Result<bool> {
        let cleared = self
            .repo
            .update(
                user_id,
                Box::new(|current: Option<SessionRecord>| {
                    current.map(|mut record| {
                        record.clear_session();
                        record
                    })
                }),
            )
            .await?
            .is_some();
        if cleared {
            info!(user_id = %user_id, "session cleared");
        }
        Ok(cleared)
    }
}
