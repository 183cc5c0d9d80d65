//! tonapi.io v2 client.
//!
//! Non-success statuses (unknown account, rate limit) yield `Ok(None)`; transport and decode
//! failures are errors. Retries are left to the caller.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::models::{AccountInfo, JettonBalance, JettonsResponse};

pub const DEFAULT_TON_API_BASE_URL: &str = "https://tonapi.io/v2";

/// Wallet data the bot needs. [`TonApiClient`] is the production source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletDataSource: Send + Sync {
    /// `None` when the account is unknown to the API.
    async fn account_info(&self, address: &str) -> anyhow::Result<Option<AccountInfo>>;
    /// Jetton balances; empty when the API has none or declined the request.
    async fn jettons(&self, address: &str) -> anyhow::Result<Vec<JettonBalance>>;
}

#[derive(Debug, Clone)]
pub struct TonApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TonApiClient {
    /// Creates a client for `base_url`. An empty `api_key` sends no Authorization header.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("TON API base URL cannot be a base: {}", base_url));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_account_info(&self, address: &str) -> anyhow::Result<Option<AccountInfo>> {
        let url = self.account_url(address, &[])?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    pub async fn get_jettons(&self, address: &str) -> anyhow::Result<Option<Vec<JettonBalance>>> {
        let url = self.account_url(address, &["jettons"])?;
        let response: Option<JettonsResponse> = self.get_json(url).await?;
        Ok(response.map(|r| r.balances))
    }

    fn account_url(&self, address: &str, tail: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("TON API base URL cannot be a base"))?
            .pop_if_empty()
            .push("accounts")
            .push(address)
            .extend(tail);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<Option<T>> {
        let mut request = self.client.get(url.clone());
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "TON API returned non-success status");
            return Ok(None);
        }

        let body = response.json::<T>().await?;
        debug!(url = %url, "TON API responded");
        Ok(Some(body))
    }
}

#[async_trait]
impl WalletDataSource for TonApiClient {
    async fn account_info(&self, address: &str) -> anyhow::Result<Option<AccountInfo>> {
        self.get_account_info(address).await
    }

    async fn jettons(&self, address: &str) -> anyhow::Result<Vec<JettonBalance>> {
        Ok(self.get_jettons(address).await?.unwrap_or_default())
    }
}
