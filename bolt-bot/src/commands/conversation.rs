//! Commands that drive conversation state: wallet query, cancel, privacy clear.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Map;
use tracing::info;

use super::Command;
use crate::core::{HandlerResponse, Message, Result};
use crate::services::SessionService;
use crate::state::StateStore;

/// State tag while the bot waits for a wallet address.
pub const AWAITING_WALLET_ADDRESS: &str = "awaiting_wallet_address";

const WALLET_PROMPT: &str = "🔍 <b>Wallet Information</b>\n\n\
Enter a TON wallet address to get public information.\n\
<i>No personal data is stored.</i> Send /cancel to stop.";

/// `/wallet`: asks for an address; the next text message is looked up.
pub struct WalletCommand {
    states: Arc<StateStore>,
}

impl WalletCommand {
    pub fn new(states: Arc<StateStore>) -> Self {
        Self { states }
    }
}

#[async_trait]
impl Command for WalletCommand {
    fn name(&self) -> &str {
        "/wallet"
    }

    fn aliases(&self) -> &[&str] {
        &["wallet", "/query"]
    }

    fn description(&self) -> &str {
        "Query a TON wallet"
    }

    async fn execute(&self, message: &Message) -> Result<HandlerResponse> {
        self.states
            .set_state(&message.user.key(), AWAITING_WALLET_ADDRESS, Map::new())
            .await;
        Ok(HandlerResponse::Reply(WALLET_PROMPT.to_string()))
    }
}

/// `/cancel`: drops any pending multi-step flow.
pub struct CancelCommand {
    states: Arc<StateStore>,
}

impl CancelCommand {
    pub fn new(states: Arc<StateStore>) -> Self {
        Self { states }
    }
}

#[async_trait]
impl Command for CancelCommand {
    fn name(&self) -> &str {
        "/cancel"
    }

    fn aliases(&self) -> &[&str] {
        &["cancel"]
    }

    fn description(&self) -> &str {
        "Cancel the current operation"
    }

    async fn execute(&self, message: &Message) -> Result<HandlerResponse> {
        let user_id = message.user.key();
        let text = if self.states.get_state(&user_id).await.is_some() {
            self.states.clear_state(&user_id).await;
            "Operation cancelled."
        } else {
            "Nothing to cancel."
        };
        Ok(HandlerResponse::Reply(text.to_string()))
    }
}

/// `/clear`: forgets conversation state and empties the stored session.
pub struct ClearCommand {
    states: Arc<StateStore>,
    sessions: SessionService,
}

impl ClearCommand {
    pub fn new(states: Arc<StateStore>, sessions: SessionService) -> Self {
        Self { states, sessions }
    }
}

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &str {
        "/clear"
    }

    fn aliases(&self) -> &[&str] {
        &["/privacy"]
    }

    fn description(&self) -> &str {
        "Clear your session data"
    }

    async fn execute(&self, message: &Message) -> Result<HandlerResponse> {
        let user_id = message.user.key();
        self.states.clear_state(&user_id).await;
        self.sessions.clear_session(&user_id).await?;
        info!(user_id = %user_id, "user data cleared on request");
        Ok(HandlerResponse::Reply(
            "🧹 Your session data has been cleared.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;
    use chrono::Duration;
    use serde_json::json;
    use storage::{JsonRepository, SessionRecord};
    use tempfile::TempDir;

    fn states() -> Arc<StateStore> {
        Arc::new(StateStore::new(Duration::minutes(30)))
    }

    #[tokio::test]
    async fn test_wallet_sets_awaiting_state() {
        let states = states();
        let reply = WalletCommand::new(states.clone())
            .execute(&message(7, "/wallet"))
            .await
            .unwrap();

        assert!(matches!(reply, HandlerResponse::Reply(ref t) if t.contains("wallet address")));
        assert!(states.get_state("7").await.unwrap().is(AWAITING_WALLET_ADDRESS));
    }

    #[tokio::test]
    async fn test_cancel_clears_state() {
        let states = states();
        states.set_state("7", AWAITING_WALLET_ADDRESS, Map::new()).await;
        let cancel = CancelCommand::new(states.clone());

        let first = cancel.execute(&message(7, "/cancel")).await.unwrap();
        let second = cancel.execute(&message(7, "/cancel")).await.unwrap();

        assert_eq!(first, HandlerResponse::Reply("Operation cancelled.".to_string()));
        assert_eq!(second, HandlerResponse::Reply("Nothing to cancel.".to_string()));
        assert!(states.get_state("7").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_empties_session_and_state() {
        let dir = TempDir::new().unwrap();
        let repo = JsonRepository::<SessionRecord>::new(dir.path().join("s.json"))
            .await
            .unwrap();
        let sessions = SessionService::new(Arc::new(repo));
        sessions
            .update_session_data("7", json!({"k": "v"}).as_object().cloned().unwrap())
            .await
            .unwrap();
        let states = states();
        states.set_state("7", AWAITING_WALLET_ADDRESS, Map::new()).await;

        ClearCommand::new(states.clone(), sessions.clone())
            .execute(&message(7, "/clear"))
            .await
            .unwrap();

        assert!(states.get_state("7").await.is_none());
        let record = sessions.get_session("7").await.unwrap().unwrap();
        assert!(record.session_data.is_empty());
    }
}
