//! Bot abstraction for sending messages.
//!
//! [`Bot`] is transport-agnostic; `TelegramBotAdapter` implements it via teloxide.

use async_trait::async_trait;

use super::error::Result;
use super::types::{Chat, Message};

/// Abstraction for sending replies. Text is HTML-formatted (`<b>`, `<i>`, `<a>`, `<code>`).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
}
