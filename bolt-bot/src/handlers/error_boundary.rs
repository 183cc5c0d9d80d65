//! Turns handler errors into chat replies.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, instrument, warn};

use crate::core::{BotError, Handler, HandlerResponse, Message, Result};

/// Wraps a handler so that a failed `handle` replies `❌ <message>` instead of failing the chain.
/// `before` and `after` are passed through unchanged.
pub struct ErrorBoundary {
    inner: Arc<dyn Handler>,
}

impl ErrorBoundary {
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self { inner }
    }
}

fn error_reply(err: &BotError) -> HandlerResponse {
    HandlerResponse::Reply(format!("❌ {}", err.user_message()))
}

#[async_trait]
impl Handler for ErrorBoundary {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn before(&self, message: &Message) -> Result<bool> {
        self.inner.before(message).await
    }

    #[instrument(skip(self, message), fields(handler = %self.inner.name()))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match self.inner.handle(message).await {
            Ok(response) => Ok(response),
            Err(e @ BotError::Validation(_)) => {
                warn!(user_id = message.user.id, error = %e, "input rejected");
                Ok(error_reply(&e))
            }
            Err(e) => {
                error!(user_id = message.user.id, error = %e, "handler failed");
                Ok(error_reply(&e))
            }
        }
    }

    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        self.inner.after(message, response).await
    }
}
