//! Market-data config: upstream APIs, price refresh cadence, conversation TTL.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::prices::{PricePolicy, DEFAULT_PRICE_API_BASE_URL};
use crate::ton::DEFAULT_TON_API_BASE_URL;

/// Reads `key`, falling back to `default` when unset. A set but unparsable value is an error.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// TON_API_KEY; empty sends no Authorization header.
    pub ton_api_key: String,
    /// TON_API_BASE_URL
    pub ton_api_base_url: String,
    /// PRICE_API_BASE_URL
    pub price_api_base_url: String,
    /// PRICE_UPDATE_INTERVAL, seconds
    pub price_update_interval_secs: u64,
    /// PRICE_FAILURE_BACKOFF, seconds; longer than the update interval
    pub price_failure_backoff_secs: u64,
    /// STATE_EXPIRY_MINUTES
    pub state_expiry_minutes: i64,
    /// REQUEST_TIMEOUT, seconds
    pub request_timeout_secs: u64,
    /// ENABLE_PRICE_TRACKING
    pub enable_price_tracking: bool,
}

impl MarketConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ton_api_key: env::var("TON_API_KEY").unwrap_or_default(),
            ton_api_base_url: env::var("TON_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TON_API_BASE_URL.to_string()),
            price_api_base_url: env::var("PRICE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_API_BASE_URL.to_string()),
            price_update_interval_secs: env_parse("PRICE_UPDATE_INTERVAL", 60)?,
            price_failure_backoff_secs: env_parse("PRICE_FAILURE_BACKOFF", 120)?,
            state_expiry_minutes: env_parse("STATE_EXPIRY_MINUTES", 30)?,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT", 10)?,
            enable_price_tracking: env_parse("ENABLE_PRICE_TRACKING", true)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("TON_API_BASE_URL", &self.ton_api_base_url),
            ("PRICE_API_BASE_URL", &self.price_api_base_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("{} is not a valid URL: {}", name, url);
            }
        }
        if self.price_update_interval_secs == 0 {
            anyhow::bail!("PRICE_UPDATE_INTERVAL must be greater than 0");
        }
        if self.price_failure_backoff_secs <= self.price_update_interval_secs {
            anyhow::bail!(
                "PRICE_FAILURE_BACKOFF ({}s) must be longer than PRICE_UPDATE_INTERVAL ({}s)",
                self.price_failure_backoff_secs,
                self.price_update_interval_secs
            );
        }
        if self.state_expiry_minutes <= 0 {
            anyhow::bail!("STATE_EXPIRY_MINUTES must be greater than 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT must be greater than 0");
        }
        Ok(())
    }

    pub fn price_policy(&self) -> PricePolicy {
        PricePolicy::ton_bolt(
            Duration::from_secs(self.price_update_interval_secs),
            Duration::from_secs(self.price_failure_backoff_secs),
        )
    }

    pub fn state_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.state_expiry_minutes)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
