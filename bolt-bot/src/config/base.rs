//! Base config: Telegram connection, logging, session storage. Loaded from env.

use anyhow::{anyhow, Result};
use std::env;

const DEFAULT_LOG_FILE: &str = "logs/bot.log";
const DEFAULT_SESSION_STORE_PATH: &str = "data/user_data.json";

/// Base config: Telegram-related, logging and the session document path.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// SESSION_STORE_PATH
    pub session_store_path: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let session_store_path = env::var("SESSION_STORE_PATH")
            .unwrap_or_else(|_| DEFAULT_SESSION_STORE_PATH.to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            session_store_path,
        })
    }

    /// Validate config (token present, telegram_api_url a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.session_store_path.trim().is_empty() {
            anyhow::bail!("SESSION_STORE_PATH is empty");
        }
        Ok(())
    }
}
