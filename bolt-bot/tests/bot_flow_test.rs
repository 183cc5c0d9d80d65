//! End-to-end tests: services and handler chain as assembled by the component factory, driven
//! through `process_message` with a recording bot instead of Telegram.

mod common;

use std::sync::Arc;

use bolt_bot::{
    build_handler_chain, build_services, process_message, BotServices, CommandHandler,
    ErrorBoundary, HandlerChain, SessionHandler, SessionService,
};
use common::{bot_config, message, FixedPrice, InMemoryRepository, RecordingBot, StubWallets, ADDRESS};
use storage::{Repository, SessionRecord};
use tempfile::TempDir;

struct Harness {
    services: BotServices,
    chain: HandlerChain,
    bot: Arc<RecordingBot>,
    _dir: TempDir,
}

impl Harness {
    async fn new(price: Option<f64>, wallets: StubWallets) -> Self {
        let dir = TempDir::new().unwrap();
        let config = bot_config(dir.path());
        let services = build_services(&config, Arc::new(FixedPrice(price)), Arc::new(wallets))
            .await
            .unwrap();
        services.price_cache.refresh_now().await;
        let chain = build_handler_chain(&services);
        Self {
            services,
            chain,
            bot: RecordingBot::new(),
            _dir: dir,
        }
    }

    /// Sends `text` as `user_id` and returns the reply, if one was sent.
    async fn send(&self, user_id: i64, text: &str) -> Option<String> {
        let before = self.bot.sent().await.len();
        process_message(&self.chain, self.bot.as_ref(), &message(user_id, text)).await;
        let sent = self.bot.sent().await;
        (sent.len() > before).then(|| sent[sent.len() - 1].text.clone())
    }
}

/// **Test: Menu, price panel and quotes answer from the cache.**
///
/// **Setup:** Cache refreshed once with TON = 2.5.
/// **Action:** Send `/start`, `prices`, `!тон`, `!BOLT`.
/// **Expected:** Each gets a reply; BOLT is derived as 0.03.
#[tokio::test]
async fn test_commands_reply_from_cache() {
    let h = Harness::new(Some(2.5), StubWallets::default()).await;

    let menu = h.send(1, "/start").await.unwrap();
    assert!(menu.contains("/wallet"));

    let prices = h.send(1, "prices").await.unwrap();
    assert!(prices.contains("$2.500"));
    assert!(prices.contains("$0.030000"));

    assert!(h.send(1, "!тон").await.unwrap().contains("$2.5000"));
    assert!(h.send(1, "!BOLT").await.unwrap().contains("$0.0300"));

    let sent = h.bot.sent().await;
    assert!(sent.iter().all(|m| m.chat_id == 1001));
}

/// **Test: Text that is not a command and not part of a flow gets no reply.**
#[tokio::test]
async fn test_unrelated_text_is_ignored() {
    let h = Harness::new(Some(2.5), StubWallets::default()).await;

    assert!(h.send(1, "good morning").await.is_none());
    assert!(h.bot.sent().await.is_empty());
}

/// **Test: Wallet query flow from prompt to report.**
///
/// **Setup:** Stub wallet with 3 TON; TON = 2.0.
/// **Action:** `/wallet`, then an invalid address, then the real address.
/// **Expected:** invalid input gets a ❌ validation reply and the flow stays open; the address
/// gets a valued report; the session records the query time; the flow is closed.
#[tokio::test]
async fn test_wallet_query_flow() {
    let h = Harness::new(Some(2.0), StubWallets::with_account(ADDRESS, 3_000_000_000)).await;

    let prompt = h.send(7, "/wallet").await.unwrap();
    assert!(prompt.contains("wallet address"));

    let rejected = h.send(7, "hello wallet").await.unwrap();
    assert!(rejected.starts_with("❌ Invalid TON address"));

    let report = h.send(7, ADDRESS).await.unwrap();
    assert!(report.contains("💎 <b>3.00 TON</b> ($6.00)"));
    assert!(report.contains(&format!("https://tonviewer.com/{}", ADDRESS)));

    let session = h.services.sessions.get_session("7").await.unwrap().unwrap();
    assert!(session.session_data.contains_key("last_wallet_query_at"));
    assert!(h.services.states.get_state("7").await.is_none());
    assert!(h.send(7, ADDRESS).await.is_none());
}

/// **Test: Unknown account ends the flow with the not-found reply.**
#[tokio::test]
async fn test_wallet_query_unknown_account() {
    let h = Harness::new(None, StubWallets::default()).await;

    h.send(7, "/query").await.unwrap();
    let reply = h.send(7, ADDRESS).await.unwrap();

    assert_eq!(reply, "❌ Invalid address or account not found.");
    assert!(h.services.states.get_state("7").await.is_none());
}

/// **Test: `/clear` empties the session but keeps the record.**
#[tokio::test]
async fn test_privacy_clear() {
    let h = Harness::new(Some(2.0), StubWallets::with_account(ADDRESS, 1)).await;
    h.send(7, "/wallet").await;
    h.send(7, ADDRESS).await;

    let reply = h.send(7, "/privacy").await.unwrap();

    assert!(reply.contains("cleared"));
    let session = h.services.sessions.get_session("7").await.unwrap().unwrap();
    assert!(session.session_data.is_empty());
}

/// **Test: Every message touches the sender's session.**
#[tokio::test]
async fn test_session_created_on_any_message() {
    let h = Harness::new(None, StubWallets::default()).await;

    h.send(5, "anything").await;

    assert_eq!(
        h.services.sessions.get_session("5").await.unwrap(),
        Some(SessionRecord::new("5"))
    );
}

/// **Test: Session document survives reopening.**
///
/// **Setup:** Send a message so the session exists, then build services again on the same dir.
/// **Expected:** The second instance sees the record.
#[tokio::test]
async fn test_sessions_persist_across_restarts() {
    let dir = TempDir::new().unwrap();
    let config = bot_config(dir.path());
    {
        let services = build_services(&config, Arc::new(FixedPrice(None)), Arc::new(StubWallets::default()))
            .await
            .unwrap();
        let chain = build_handler_chain(&services);
        process_message(&chain, RecordingBot::new().as_ref(), &message(9, "hi")).await;
    }

    let services = build_services(&config, Arc::new(FixedPrice(None)), Arc::new(StubWallets::default()))
        .await
        .unwrap();
    assert!(services.sessions.get_session("9").await.unwrap().is_some());
}

/// **Test: A corrupt session document aborts startup.**
#[tokio::test]
async fn test_corrupt_session_store_fails_build() {
    let dir = TempDir::new().unwrap();
    let config = bot_config(dir.path());
    let path = std::path::Path::new(config.session_store_path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "[1, 2").unwrap();

    let result = build_services(&config, Arc::new(FixedPrice(None)), Arc::new(StubWallets::default())).await;

    assert!(result.is_err());
}

/// **Test: Storage failure inside the boundary becomes a generic ❌ reply.**
///
/// **Setup:** Chain with the command handler over a failing repository (no session touch).
/// **Action:** `/clear`.
/// **Expected:** reply is the generic error text; no internal detail leaks.
#[tokio::test]
async fn test_storage_failure_reported_generically() {
    let h = Harness::new(None, StubWallets::default()).await;
    let failing: Arc<dyn Repository<SessionRecord>> = Arc::new(InMemoryRepository::failing());
    let mut services = h.services.clone();
    services.sessions = SessionService::new(failing);

    let chain = HandlerChain::new().add_handler(Arc::new(ErrorBoundary::new(Arc::new(
        CommandHandler::new(
            bolt_bot::build_dispatcher(&services),
            services.states.clone(),
            services.sessions.clone(),
            services.wallets.clone(),
        ),
    ))));
    let bot = RecordingBot::new();

    process_message(&chain, bot.as_ref(), &message(1, "/clear")).await;

    assert_eq!(
        bot.last_text().await.as_deref(),
        Some("❌ An error occurred. Please try again.")
    );
}

/// **Test: Session touch failure fails the chain; nothing is sent.**
#[tokio::test]
async fn test_session_touch_failure_sends_nothing() {
    let failing: Arc<dyn Repository<SessionRecord>> = Arc::new(InMemoryRepository::failing());
    let chain = HandlerChain::new().add_handler(Arc::new(SessionHandler::new(SessionService::new(failing))));
    let bot = RecordingBot::new();

    process_message(&chain, bot.as_ref(), &message(1, "/start")).await;

    assert!(bot.sent().await.is_empty());
}
