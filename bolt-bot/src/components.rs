//! Component factory: builds services and the handler chain from config. Isolates assembly
//! logic from the runner.

use std::sync::Arc;

use anyhow::{Context, Result};
use storage::{JsonRepository, Repository, SessionRecord};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::commands::{
    CancelCommand, ClearCommand, CommunityCommand, Dispatcher, PriceCommand, QuoteCommand,
    StartCommand, WalletCommand,
};
use crate::config::BotConfig;
use crate::core::Bot as CoreBot;
use crate::handlers::{CommandHandler, ErrorBoundary, LoggingHandler, SessionHandler};
use crate::prices::{CoinGeckoClient, MarketDataFetcher, PriceCache};
use crate::services::{SessionService, WalletReporter};
use crate::state::StateStore;
use crate::telegram::TelegramBotAdapter;
use crate::ton::{TonApiClient, WalletDataSource};

/// Transport-independent services shared by commands and handlers.
#[derive(Clone)]
pub struct BotServices {
    pub sessions: SessionService,
    pub states: Arc<StateStore>,
    pub price_cache: Arc<PriceCache>,
    pub wallets: WalletReporter,
}

/// Everything `run_bot` needs: the Telegram client and the services.
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub reply_bot: Arc<dyn CoreBot>,
    pub services: BotServices,
}

/// Builds the services over the given upstream sources. The price cache is created stopped.
#[instrument(skip(config, fetcher, wallet_source))]
pub async fn build_services(
    config: &BotConfig,
    fetcher: Arc<dyn MarketDataFetcher>,
    wallet_source: Arc<dyn WalletDataSource>,
) -> Result<BotServices> {
    let path = config.session_store_path();
    let repo = JsonRepository::<SessionRecord>::new(path).await.map_err(|e| {
        if e.is_corrupt() {
            error!(error = %e, path = %path, "Session store is corrupt; fix or move the file");
        } else {
            error!(error = %e, path = %path, "Failed to open session store");
        }
        anyhow::anyhow!("Failed to open session store {}: {}", path, e)
    })?;
    let repo: Arc<dyn Repository<SessionRecord>> = Arc::new(repo);
    info!(path = %path, "Session store opened");

    let price_cache = Arc::new(PriceCache::new(fetcher, config.market().price_policy()));
    Ok(BotServices {
        sessions: SessionService::new(repo),
        states: Arc::new(StateStore::new(config.market().state_ttl())),
        wallets: WalletReporter::new(wallet_source, price_cache.clone()),
        price_cache,
    })
}

/// Creates the HTTP clients and the Telegram bot, then the services.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let market = config.market();
    let fetcher = CoinGeckoClient::new(market.price_api_base_url.clone(), market.request_timeout())
        .context("Failed to build price API client")?;
    let ton = TonApiClient::new(
        &market.ton_api_base_url,
        market.ton_api_key.clone(),
        market.request_timeout(),
    )
    .context("Failed to build TON API client")?;

    let services = build_services(config, Arc::new(fetcher), Arc::new(ton)).await?;

    let teloxide_bot = {
        let bot = Bot::new(config.bot_token());
        match config.telegram_api_url() {
            Some(url_str) => {
                let url = reqwest::Url::parse(url_str)
                    .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url_str))?;
                info!(url = %url, "Using custom Telegram API URL");
                bot.set_api_url(url)
            }
            None => bot,
        }
    };
    let reply_bot: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    Ok(BotComponents {
        teloxide_bot,
        reply_bot,
        services,
    })
}

/// Registers the bot's commands. Order matters: the first matching command wins.
pub fn build_dispatcher(services: &BotServices) -> Dispatcher {
    let prices = services.price_cache.clone();
    let states = services.states.clone();
    Dispatcher::new()
        .with(Arc::new(StartCommand))
        .with(Arc::new(PriceCommand::new(prices.clone())))
        .with(Arc::new(QuoteCommand::ton(prices.clone())))
        .with(Arc::new(QuoteCommand::bolt(prices)))
        .with(Arc::new(WalletCommand::new(states.clone())))
        .with(Arc::new(CommunityCommand))
        .with(Arc::new(CancelCommand::new(states.clone())))
        .with(Arc::new(ClearCommand::new(states, services.sessions.clone())))
}

/// Builds the handler chain (logging → session touch → command dispatch behind the error boundary).
pub fn build_handler_chain(services: &BotServices) -> HandlerChain {
    let command_handler = Arc::new(CommandHandler::new(
        build_dispatcher(services),
        services.states.clone(),
        services.sessions.clone(),
        services.wallets.clone(),
    ));
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(SessionHandler::new(services.sessions.clone())))
        .add_handler(Arc::new(ErrorBoundary::new(command_handler)))
}
