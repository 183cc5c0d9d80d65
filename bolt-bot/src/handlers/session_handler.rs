//! Touches the sender's session record before any handling.

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::core::{Handler, Message, Result};
use crate::services::SessionService;

/// Get-or-creates the user's session in before(); always continues.
#[derive(Clone)]
pub struct SessionHandler {
    sessions: SessionService,
}

impl SessionHandler {
    pub fn new(sessions: SessionService) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Handler for SessionHandler {
    fn name(&self) -> &str {
        "SessionHandler"
    }

    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.key();
        let record = self
            .sessions
            .get_or_create_session(&user_id)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user_id, "Failed to load session");
                e
            })?;
        debug!(user_id = %user_id, keys = record.session_data.len(), "session loaded");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;
    use std::sync::Arc;
    use storage::{JsonRepository, SessionRecord};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_before_creates_session_and_continues() {
        let dir = TempDir::new().unwrap();
        let repo = JsonRepository::<SessionRecord>::new(dir.path().join("s.json"))
            .await
            .unwrap();
        let sessions = SessionService::new(Arc::new(repo));
        let handler = SessionHandler::new(sessions.clone());

        assert!(handler.before(&message(42, "hi")).await.unwrap());
        assert!(handler.before(&message(42, "again")).await.unwrap());

        assert_eq!(
            sessions.get_session("42").await.unwrap(),
            Some(SessionRecord::new("42"))
        );
    }
}
