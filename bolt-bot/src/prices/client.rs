//! CoinGecko simple-price client.
//!
//! `GET {base}/simple/price?ids=<coin>&vs_currencies=<currency>` returns
//! `{"<coin>": {"<currency>": <price>}}`. A non-success status yields `Ok(None)`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::fetcher::MarketDataFetcher;

pub const DEFAULT_PRICE_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const TON_COIN_ID: &str = "the-open-network";
const USD: &str = "usd";

type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Fetches the TON/USD price.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Creates a client for `base_url`. `timeout` bounds each request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Current TON price in USD.
    #[instrument(skip(self), fields(coin = TON_COIN_ID))]
    pub async fn get_price(&self) -> anyhow::Result<Option<f64>> {
        let response = self
            .client
            .get(format!("{}/simple/price", self.base_url))
            .query(&[("ids", TON_COIN_ID), ("vs_currencies", USD)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Price API returned non-success status");
            return Ok(None);
        }

        let body: SimplePriceResponse = response.json().await?;
        let price = body
            .get(TON_COIN_ID)
            .and_then(|quotes| quotes.get(USD))
            .copied();
        debug!(price = ?price, "Price API responded");
        Ok(price)
    }
}

#[async_trait]
impl MarketDataFetcher for CoinGeckoClient {
    async fn fetch_primary_price(&self) -> anyhow::Result<Option<f64>> {
        self.get_price().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> CoinGeckoClient {
        CoinGeckoClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    fn price_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("ids".into(), "the-open-network".into()),
            Matcher::UrlEncoded("vs_currencies".into(), "usd".into()),
        ])
    }

    #[tokio::test]
    async fn test_get_price_parses_quote() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/simple/price")
            .match_query(price_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"the-open-network":{"usd":5.42}}"#)
            .create_async()
            .await;

        let price = client_for(&server).fetch_primary_price().await.unwrap();

        assert_eq!(price, Some(5.42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_price_non_success_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(price_query())
            .with_status(429)
            .create_async()
            .await;

        let price = client_for(&server).get_price().await.unwrap();
        assert_eq!(price, None);
    }

    #[tokio::test]
    async fn test_get_price_missing_coin_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(price_query())
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let price = client_for(&server).get_price().await.unwrap();
        assert_eq!(price, None);
    }

    #[tokio::test]
    async fn test_get_price_malformed_body_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(price_query())
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        assert!(client_for(&server).get_price().await.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            CoinGeckoClient::new("https://example.com/api/v3/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "https://example.com/api/v3");
    }
}
