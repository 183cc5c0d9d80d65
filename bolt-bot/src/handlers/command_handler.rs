//! Terminal handler: resolves commands and continues multi-step flows.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::commands::{Dispatcher, AWAITING_WALLET_ADDRESS};
use crate::core::{BotError, Handler, HandlerResponse, Message, Result};
use crate::services::{SessionService, WalletReporter};
use crate::state::StateStore;
use crate::ton::is_valid_address;

const INVALID_ADDRESS: &str = "Invalid TON address. Send a wallet address or /cancel.";
const ACCOUNT_NOT_FOUND: &str = "❌ Invalid address or account not found.";

/// Commands take priority over pending flows, so `/cancel` works mid-flow. Text that is neither
/// a command nor part of a flow passes through as Continue.
pub struct CommandHandler {
    dispatcher: Dispatcher,
    states: Arc<StateStore>,
    sessions: SessionService,
    wallets: WalletReporter,
}

impl CommandHandler {
    pub fn new(
        dispatcher: Dispatcher,
        states: Arc<StateStore>,
        sessions: SessionService,
        wallets: WalletReporter,
    ) -> Self {
        Self {
            dispatcher,
            states,
            sessions,
            wallets,
        }
    }

    /// Invalid input keeps the flow open; any lookup ends it.
    async fn answer_wallet_query(&self, user_id: &str, input: &str) -> Result<HandlerResponse> {
        if !is_valid_address(input) {
            return Err(BotError::Validation(INVALID_ADDRESS.to_string()));
        }
        self.states.clear_state(user_id).await;

        let Some(report) = self.wallets.report(input).await? else {
            return Ok(HandlerResponse::Reply(ACCOUNT_NOT_FOUND.to_string()));
        };

        let mut touched = Map::new();
        touched.insert(
            "last_wallet_query_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.sessions.update_session_data(user_id, touched).await?;
        Ok(HandlerResponse::Reply(report))
    }
}

#[async_trait]
impl Handler for CommandHandler {
    fn name(&self) -> &str {
        "CommandHandler"
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let text = message.content.trim();
        if text.is_empty() {
            return Ok(HandlerResponse::Continue);
        }

        if let Some(command) = self.dispatcher.resolve(text) {
            info!(command = %command.name(), "command dispatched");
            return command.execute(message).await;
        }

        let user_id = message.user.key();
        match self.states.get_state(&user_id).await {
            Some(state) if state.is(AWAITING_WALLET_ADDRESS) => {
                debug!(flow = %state.state, "continuing flow");
                self.answer_wallet_query(&user_id, text).await
            }
            Some(state) => {
                debug!(flow = %state.state, "no step for state, ignoring");
                Ok(HandlerResponse::Continue)
            }
            None => Ok(HandlerResponse::Continue),
        }
    }
}
