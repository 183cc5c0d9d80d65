//! Market prices: upstream fetcher, CoinGecko client, and the background-refreshed cache.

mod cache;
mod client;
mod fetcher;

pub use cache::{DerivedPrice, PriceCache, PricePolicy, PriceSnapshot};
pub use client::{CoinGeckoClient, DEFAULT_PRICE_API_BASE_URL};
pub use fetcher::MarketDataFetcher;
