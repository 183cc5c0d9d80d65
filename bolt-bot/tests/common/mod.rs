//! Shared fixtures for integration tests: in-memory repository, recording bot, stub upstreams.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bolt_bot::{
    AccountInfo, BaseConfig, Bot, BotConfig, Chat, JettonBalance, MarketConfig, MarketDataFetcher,
    Message, User, WalletDataSource,
};
use chrono::Utc;
use storage::{Repository, StorageError, Update};
use tokio::sync::Mutex;

pub const ADDRESS: &str = "EQD0vdSA_NedR9uvbgN9EikRX-suesDxGeFg69XQMavfLqIw";

/// Map-backed [`Repository`]; `list` is ordered by id.
pub struct InMemoryRepository<T> {
    records: Mutex<BTreeMap<String, T>>,
    fail: bool,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            fail: false,
        }
    }

    /// Every operation fails with a storage IO error.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            fail: true,
        }
    }

    fn check(&self) -> storage::Result<()> {
        if self.fail {
            return Err(StorageError::Io {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> storage::Result<Option<T>> {
        self.check()?;
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn save(&self, id: &str, entity: T) -> storage::Result<T> {
        self.check()?;
        self.records
            .lock()
            .await
            .insert(id.to_string(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &str) -> storage::Result<bool> {
        self.check()?;
        Ok(self.records.lock().await.remove(id).is_some())
    }

    async fn list(&self) -> storage::Result<Vec<T>> {
        self.check()?;
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn update(&self, id: &str, f: Update<T>) -> storage::Result<Option<T>> {
        self.check()?;
        let mut records = self.records.lock().await;
        let next = f(records.get(id).cloned());
        if let Some(entity) = &next {
            records.insert(id.to_string(), entity.clone());
        }
        Ok(next)
    }
}

/// One message sent through [`RecordingBot`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

/// [`Bot`] that records sends instead of calling Telegram.
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Text of the last message sent, if any.
    pub async fn last_text(&self) -> Option<String> {
        self.sent.lock().await.last().map(|m| m.text.clone())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> bolt_bot::Result<()> {
        self.sent.lock().await.push(SentMessage {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Always returns the same primary price.
pub struct FixedPrice(pub Option<f64>);

#[async_trait]
impl MarketDataFetcher for FixedPrice {
    async fn fetch_primary_price(&self) -> anyhow::Result<Option<f64>> {
        Ok(self.0)
    }
}

/// Wallet data keyed by address; unknown addresses have no account.
#[derive(Default)]
pub struct StubWallets {
    pub accounts: HashMap<String, AccountInfo>,
    pub jettons: HashMap<String, Vec<JettonBalance>>,
}

impl StubWallets {
    pub fn with_account(address: &str, nanotons: u64) -> Self {
        let mut stub = Self::default();
        stub.accounts.insert(
            address.to_string(),
            AccountInfo {
                address: address.to_string(),
                balance: nanotons,
                status: Some("active".to_string()),
            },
        );
        stub
    }
}

#[async_trait]
impl WalletDataSource for StubWallets {
    async fn account_info(&self, address: &str) -> anyhow::Result<Option<AccountInfo>> {
        Ok(self.accounts.get(address).cloned())
    }

    async fn jettons(&self, address: &str) -> anyhow::Result<Vec<JettonBalance>> {
        Ok(self.jettons.get(address).cloned().unwrap_or_default())
    }
}

pub fn message(user_id: i64, content: &str) -> Message {
    Message {
        id: format!("{}-{}", user_id, content.len()),
        user: User {
            id: user_id,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 1000 + user_id,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// Default config with the session document under `dir`.
pub fn bot_config(dir: &Path) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "test_token".to_string(),
            telegram_api_url: None,
            log_file: dir.join("bot.log").to_string_lossy().into_owned(),
            session_store_path: dir
                .join("data")
                .join("user_data.json")
                .to_string_lossy()
                .into_owned(),
        },
        market: MarketConfig {
            ton_api_key: String::new(),
            ton_api_base_url: "https://tonapi.io/v2".to_string(),
            price_api_base_url: "https://api.coingecko.com/api/v3".to_string(),
            price_update_interval_secs: 60,
            price_failure_backoff_secs: 120,
            state_expiry_minutes: 30,
            request_timeout_secs: 10,
            enable_price_tracking: true,
        },
    }
}
