use async_trait::async_trait;

/// Upstream source of the primary asset's price. Called once per refresh cycle.
///
/// `Ok(None)` means the upstream answered without a usable price; the cache treats it the same
/// as an error.
#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    async fn fetch_primary_price(&self) -> anyhow::Result<Option<f64>>;
}
