//! # BOLT Telegram bot
//!
//! Token prices and public TON wallet lookups over Telegram. Loads config from env and runs the
//! REPL.
//!
//! - [`state`]: per-user conversation state with lazy TTL expiry
//! - [`prices`]: background-refreshed price cache over a [`prices::MarketDataFetcher`]
//! - [`commands`]: command registry and the bot's commands
//! - [`handlers`]: chain handlers (session touch, dispatch, error boundary)
//! - Session records persist through the `storage` crate.

pub mod chain;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod core;
pub mod handlers;
pub mod prices;
pub mod runner;
pub mod services;
pub mod state;
pub mod telegram;
pub mod ton;

#[cfg(test)]
mod test_support;

pub use cli::{load_config, Cli, Commands};

pub use crate::core::{
    init_tracing, Bot, BotError, Chat, Handler, HandlerResponse, Message, Result, ToCoreMessage,
    ToCoreUser, User,
};

pub use chain::HandlerChain;

pub use telegram::{
    process_message, run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper,
};

pub use config::{BaseConfig, BotConfig, MarketConfig};
pub use runner::run_bot;

pub use commands::{Command, Dispatcher};
pub use components::{
    build_bot_components, build_dispatcher, build_handler_chain, build_services, BotComponents,
    BotServices,
};
pub use handlers::{CommandHandler, ErrorBoundary, LoggingHandler, SessionHandler};
pub use prices::{MarketDataFetcher, PriceCache, PricePolicy, PriceSnapshot};
pub use services::{SessionService, WalletReporter};
pub use state::{Clock, ConversationState, StateStore, SystemClock};
pub use ton::{AccountInfo, JettonBalance, JettonInfo, WalletDataSource};
