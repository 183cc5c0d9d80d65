//! REPL runner: converts teloxide messages to core::Message, runs the HandlerChain and sends
//! any Reply back through the core [`Bot`].

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;
use crate::chain::HandlerChain;
use crate::core::{Bot as CoreBot, HandlerResponse, Message as CoreMessage, ToCoreMessage};

/// Runs the chain for one message and delivers the reply, if any. Errors are logged, not
/// returned; one bad message must not stop the REPL.
pub async fn process_message(chain: &HandlerChain, bot: &dyn CoreBot, message: &CoreMessage) {
    match chain.handle(message).await {
        Ok(HandlerResponse::Reply(text)) => {
            if let Err(e) = bot.reply_to(message, &text).await {
                error!(error = %e, chat_id = message.chat.id, "Failed to send reply");
            }
        }
        Ok(_) => {}
        Err(e) => {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
        }
    }
}

/// Starts the teloxide REPL. Each text message is handled in its own task so the REPL returns
/// immediately. Returns when the REPL stops (Ctrl-C).
#[instrument(skip(bot, handler_chain, reply_bot))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    reply_bot: Arc<dyn CoreBot>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Connected to Telegram"),
        Err(e) => error!(error = %e, "get_me failed, starting anyway"),
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        let reply_bot = reply_bot.clone();

        async move {
            if msg.text().is_none() {
                return Ok(());
            }
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            tokio::spawn(async move {
                process_message(&chain, reply_bot.as_ref(), &core_msg).await;
            });

            Ok(())
        }
    })
    .await;

    info!("Telegram REPL stopped");
    Ok(())
}
