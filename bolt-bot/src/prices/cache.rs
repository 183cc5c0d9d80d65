//! Background-refreshed price cache.
//!
//! One refresh loop fetches the primary asset's price, derives the secondary prices from it and
//! publishes a new [`PriceSnapshot`] as a whole. Readers clone the current `Arc` out of a
//! `watch` channel and never wait on the fetch. A failed cycle publishes nothing, so the last
//! good snapshot stays readable, and the next attempt waits the longer failure backoff.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::fetcher::MarketDataFetcher;

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_FAILURE_BACKOFF: Duration = Duration::from_secs(120);
const BOLT_PER_TON: f64 = 0.012;

/// A price computed from the primary price instead of fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPrice {
    pub symbol: String,
    pub multiplier: f64,
}

/// What to fetch, what to derive, and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePolicy {
    pub primary_symbol: String,
    pub derived: Vec<DerivedPrice>,
    pub refresh_interval: Duration,
    /// Wait after a failed fetch; longer than `refresh_interval`.
    pub failure_backoff: Duration,
}

impl PricePolicy {
    /// TON fetched, BOLT = TON × 0.012.
    pub fn ton_bolt(refresh_interval: Duration, failure_backoff: Duration) -> Self {
        Self {
            primary_symbol: "TON".to_string(),
            derived: vec![DerivedPrice {
                symbol: "BOLT".to_string(),
                multiplier: BOLT_PER_TON,
            }],
            refresh_interval,
            failure_backoff,
        }
    }
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self::ton_bolt(DEFAULT_REFRESH_INTERVAL, DEFAULT_FAILURE_BACKOFF)
    }
}

/// Immutable symbol → price map from one or more successful cycles. Symbols are uppercase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot {
    prices: HashMap<String, f64>,
    updated_at: Option<DateTime<Utc>>,
}

impl PriceSnapshot {
    /// Price for `symbol`, case-insensitive.
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.prices.get(&symbol.to_uppercase()).copied()
    }

    /// Time of the last successful refresh; `None` before the first one.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn with_prices<I>(&self, entries: I, updated_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut prices = self.prices.clone();
        prices.extend(entries.into_iter().map(|(s, p)| (s.to_uppercase(), p)));
        Self {
            prices,
            updated_at: Some(updated_at),
        }
    }
}

struct Shared {
    fetcher: Arc<dyn MarketDataFetcher>,
    policy: PricePolicy,
    snapshot: watch::Sender<Arc<PriceSnapshot>>,
}

impl Shared {
    /// Derives the secondary prices and swaps in the new snapshot inside one `send_modify`.
    fn publish(&self, primary_price: f64) {
        let derived = self
            .policy
            .derived
            .iter()
            .map(|d| (d.symbol.clone(), primary_price * d.multiplier));
        let entries: Vec<(String, f64)> =
            std::iter::once((self.policy.primary_symbol.clone(), primary_price))
                .chain(derived)
                .collect();
        let now = Utc::now();
        self.snapshot
            .send_modify(|current| *current = Arc::new(current.with_prices(entries, now)));
    }

    /// Runs one fetch. Returns whether a new snapshot was published.
    async fn refresh_once(&self) -> bool {
        let fetched = AssertUnwindSafe(self.fetcher.fetch_primary_price())
            .catch_unwind()
            .await;
        let Ok(result) = fetched else {
            error!("price fetch panicked, keeping previous snapshot");
            return false;
        };

        match result {
            Ok(Some(price)) if price.is_finite() && price > 0.0 => {
                self.publish(price);
                debug!(
                    symbol = %self.policy.primary_symbol,
                    price,
                    "price snapshot published"
                );
                true
            }
            Ok(Some(price)) => {
                warn!(price, "upstream returned unusable price, keeping previous snapshot");
                false
            }
            Ok(None) => {
                warn!("upstream returned no price, keeping previous snapshot");
                false
            }
            Err(e) => {
                warn!(error = %e, "price fetch failed, keeping previous snapshot");
                false
            }
        }
    }
}

async fn refresh_loop(shared: Arc<Shared>, cancel: CancellationToken) {
    info!(
        symbol = %shared.policy.primary_symbol,
        interval_secs = shared.policy.refresh_interval.as_secs(),
        backoff_secs = shared.policy.failure_backoff.as_secs(),
        "price refresh loop started"
    );

    loop {
        let delay = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            published = shared.refresh_once() => {
                if published {
                    shared.policy.refresh_interval
                } else {
                    shared.policy.failure_backoff
                }
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    info!("price refresh loop stopped");
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Cached market prices kept fresh by one background task. `start`/`stop` may be called any
/// number of times; at most one refresh loop runs at a time.
pub struct PriceCache {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
}

impl PriceCache {
    pub fn new(fetcher: Arc<dyn MarketDataFetcher>, policy: PricePolicy) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(PriceSnapshot::default()));
        Self {
            shared: Arc::new(Shared {
                fetcher,
                policy,
                snapshot,
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> &PricePolicy {
        &self.shared.policy
    }

    /// Launches the refresh loop unless one is already running.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        let mut worker = self.worker.lock().await;
        if let Some(active) = worker.as_ref() {
            if !active.handle.is_finished() {
                debug!("price refresh loop already running");
                return;
            }
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(self.shared.clone(), cancel.clone()));
        *worker = Some(Worker { cancel, handle });
    }

    /// Cancels the refresh loop and waits for it to exit. No-op when not running. Prices
    /// published so far stay readable.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let mut worker = self.worker.lock().await;
        let Some(active) = worker.take() else {
            debug!("price refresh loop not running");
            return;
        };

        active.cancel.cancel();
        match active.handle.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => debug!("price refresh task cancelled"),
            Err(e) => error!(error = %e, "price refresh task panicked"),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.worker
            .lock()
            .await
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// Runs one fetch outside the loop, e.g. to warm the cache. Returns whether a new snapshot
    /// was published.
    pub async fn refresh_now(&self) -> bool {
        self.shared.refresh_once().await
    }

    /// Last published price for `symbol`; `None` until a refresh has succeeded. Never fetches.
    pub fn get_price(&self, symbol: &str) -> Option<f64> {
        self.snapshot().get(symbol)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<PriceSnapshot> {
        self.shared.snapshot.borrow().clone()
    }
}

impl Drop for PriceCache {
    fn drop(&mut self) {
        if let Some(active) = self.worker.get_mut().take() {
            active.cancel.cancel();
        }
    }
}
