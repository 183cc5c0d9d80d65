//! Bot configuration: BaseConfig (Telegram + log + sessions) + MarketConfig (prices, TON API, TTL).

mod base;
mod bot_config;
mod market;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use market::MarketConfig;
