//! BotConfig: BaseConfig + MarketConfig. Use load() for env-based loading.

use anyhow::Result;

use super::{BaseConfig, MarketConfig};

/// Bot config: BaseConfig (Telegram, log, sessions) + MarketConfig (upstream APIs, cadence).
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub market: MarketConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let market = MarketConfig::from_env()?;
        Ok(Self { base, market })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.market.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn market(&self) -> &MarketConfig {
        &self.market
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn session_store_path(&self) -> &str {
        &self.base.session_store_path
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
