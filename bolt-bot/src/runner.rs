use anyhow::Result;
use tracing::{info, instrument, warn};

use crate::core::init_tracing;
use crate::telegram::run_repl;

use super::components::{build_bot_components, build_handler_chain};
use super::config::BotConfig;

/// Main entry: validate config, init logging, build components, warm and start the price cache,
/// then run the REPL. The price cache is stopped once the REPL returns.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        session_store_path = %config.session_store_path(),
        price_tracking = config.market().enable_price_tracking,
        state_expiry_minutes = config.market().state_expiry_minutes,
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let handler_chain = build_handler_chain(&components.services);
    let price_cache = components.services.price_cache.clone();

    if config.market().enable_price_tracking {
        if !price_cache.refresh_now().await {
            warn!("Initial price fetch failed; prices will appear after the next refresh");
        }
        price_cache.start().await;
    } else {
        info!("Price tracking disabled; price commands will report no data");
    }

    info!("Bot started successfully");
    let result = run_repl(components.teloxide_bot, handler_chain, components.reply_bot).await;

    price_cache.stop().await;
    info!("Bot stopped");
    result
}
