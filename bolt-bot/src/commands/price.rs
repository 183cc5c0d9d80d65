//! Price panel and quick quotes, read from the [`PriceCache`]. Never fetches.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use super::Command;
use crate::core::{HandlerResponse, Message, Result};
use crate::prices::PriceCache;

/// `/price`: every known price, TON to 3 decimals and BOLT to 6.
pub struct PriceCommand {
    prices: Arc<PriceCache>,
}

impl PriceCommand {
    pub fn new(prices: Arc<PriceCache>) -> Self {
        Self { prices }
    }
}

#[async_trait]
impl Command for PriceCommand {
    fn name(&self) -> &str {
        "/price"
    }

    fn aliases(&self) -> &[&str] {
        &["price", "prices", "/prices"]
    }

    fn description(&self) -> &str {
        "Current token prices"
    }

    async fn execute(&self, _message: &Message) -> Result<HandlerResponse> {
        let snapshot = self.prices.snapshot();
        let mut text = String::from("<b>💰 Current Token Prices</b>\n\n");
        if let Some(ton) = snapshot.get("TON") {
            let _ = writeln!(text, "💎 <b>TON</b>: ${:.3}", ton);
        }
        if let Some(bolt) = snapshot.get("BOLT") {
            let _ = writeln!(text, "🔩 <b>BOLT</b>: ${:.6}", bolt);
        }
        if snapshot.is_empty() {
            text.push_str("Prices are not available yet. Please try again shortly.");
        }
        Ok(HandlerResponse::Reply(text.trim_end().to_string()))
    }
}

/// `!тон` / `!болт`: one price to 4 decimals with a trade link.
pub struct QuoteCommand {
    prices: Arc<PriceCache>,
    name: &'static str,
    aliases: &'static [&'static str],
    symbol: &'static str,
    icon: &'static str,
    trade_url: &'static str,
}

impl QuoteCommand {
    pub fn ton(prices: Arc<PriceCache>) -> Self {
        Self {
            prices,
            name: "!тон",
            aliases: &["!ton"],
            symbol: "TON",
            icon: "💎",
            trade_url: "https://dedust.io/swap/USDT/TON",
        }
    }

    pub fn bolt(prices: Arc<PriceCache>) -> Self {
        Self {
            prices,
            name: "!болт",
            aliases: &["!bolt"],
            symbol: "BOLT",
            icon: "🔩",
            trade_url: "https://dedust.io/swap/TON/BOLT",
        }
    }
}

#[async_trait]
impl Command for QuoteCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn aliases(&self) -> &[&str] {
        self.aliases
    }

    fn description(&self) -> &str {
        "Quick price quote"
    }

    async fn execute(&self, _message: &Message) -> Result<HandlerResponse> {
        let text = match self.prices.get_price(self.symbol) {
            Some(price) => format!(
                "{} {}: <b>${:.4}</b>\n<a href=\"{}\">💱 TRADE</a>",
                self.icon, self.symbol, price, self.trade_url
            ),
            None => format!("{} {} price is not available yet.", self.icon, self.symbol),
        };
        Ok(HandlerResponse::Reply(text))
    }
}
