//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::{Chat, Message, User};
use crate::prices::{MarketDataFetcher, PriceCache, PricePolicy};

pub const ADDRESS: &str = "EQD0vdSA_NedR9uvbgN9EikRX-suesDxGeFg69XQMavfLqIw";

pub fn message(user_id: i64, content: &str) -> Message {
    Message {
        id: "1".to_string(),
        user: User {
            id: user_id,
            username: Some("tester".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: user_id,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

struct FixedPrice(Option<f64>);

#[async_trait]
impl MarketDataFetcher for FixedPrice {
    async fn fetch_primary_price(&self) -> anyhow::Result<Option<f64>> {
        Ok(self.0)
    }
}

/// Cache holding one refresh of `ton` (TON and BOLT), or empty when `None`.
pub async fn price_cache(ton: Option<f64>) -> Arc<PriceCache> {
    let cache = Arc::new(PriceCache::new(
        Arc::new(FixedPrice(ton)),
        PricePolicy::default(),
    ));
    cache.refresh_now().await;
    cache
}
