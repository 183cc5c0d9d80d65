//! Public wallet report: TON balance and jettons valued with cached prices.

use std::fmt::Write as _;
use std::sync::Arc;

use teloxide::utils::html;
use tracing::{error, info, instrument};

use crate::core::{BotError, Result};
use crate::prices::PriceCache;
use crate::ton::WalletDataSource;

const EXPLORER_URL: &str = "https://tonviewer.com";
const FETCH_FAILED: &str = "Error fetching wallet information.";

/// Builds the wallet report shown after the user sends an address.
#[derive(Clone)]
pub struct WalletReporter {
    source: Arc<dyn WalletDataSource>,
    prices: Arc<PriceCache>,
}

impl WalletReporter {
    pub fn new(source: Arc<dyn WalletDataSource>, prices: Arc<PriceCache>) -> Self {
        Self { source, prices }
    }

    /// HTML report for `address`, or `None` when the account is unknown.
    ///
    /// Upstream failures become [`BotError::Api`] with a message fit for the chat.
    #[instrument(skip(self))]
    pub async fn report(&self, address: &str) -> Result<Option<String>> {
        let account = self.source.account_info(address).await.map_err(|e| {
            error!(error = %e, address = %address, "account lookup failed");
            BotError::Api(FETCH_FAILED.to_string())
        })?;
        let Some(account) = account else {
            info!(address = %address, "account not found");
            return Ok(None);
        };

        let jettons = self.source.jettons(address).await.map_err(|e| {
            error!(error = %e, address = %address, "jetton lookup failed");
            BotError::Api(FETCH_FAILED.to_string())
        })?;

        let mut text = String::from("<b>Public Wallet Information</b>\n\n");
        let ton = account.balance_ton();
        match self.prices.get_price("TON") {
            Some(price) => {
                let _ = writeln!(text, "💎 <b>{:.2} TON</b> (${:.2})", ton, ton * price);
            }
            None => {
                let _ = writeln!(text, "💎 <b>{:.2} TON</b>", ton);
            }
        }

        if !jettons.is_empty() {
            text.push_str("\n<b>Jetton Balances:</b>\n");
            for jetton in &jettons {
                let symbol = jetton.symbol();
                let amount = jetton.amount();
                let _ = match self.prices.get_price(&symbol) {
                    Some(price) => writeln!(
                        text,
                        "• {}: <b>{:.2}</b> (${:.2})",
                        html::escape(&symbol),
                        amount,
                        amount * price
                    ),
                    None => writeln!(text, "• {}: <b>{:.2}</b>", html::escape(&symbol), amount),
                };
            }
        }

        let address = html::escape(address);
        let _ = write!(
            text,
            "\n<b>Wallet Address:</b>\n<code>{address}</code>\n\
             <a href=\"{EXPLORER_URL}/{address}\">View on Explorer</a>\n\n\
             <i>This is public blockchain data. No personal information is stored.</i>"
        );

        Ok(Some(text))
    }
}
