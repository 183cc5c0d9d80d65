//! Static menus: main menu and community links.

use async_trait::async_trait;

use super::Command;
use crate::core::{HandlerResponse, Message, Result};

const MAIN_MENU: &str = "<b>⚡ Welcome to BOLT Bot</b>\n\n\
Choose an option:\n\
💰 /price - Current token prices\n\
🔍 /wallet - Query a TON wallet\n\
🌐 /community - Community links\n\
🧹 /clear - Clear your session data\n\n\
Quick quotes: <code>!тон</code> <code>!болт</code>";

const COMMUNITY_LINKS: &str = "<b>🌐 BOLT Community Links</b>\n\n\
<b>📢 Official Channels:</b>\n\
• <a href=\"https://t.me/boltfoundation\">BOLT Foundation</a>\n\
• <a href=\"https://t.me/daitebolt\">Daite BOLT</a>\n\
• <a href=\"https://t.me/boltoshi\">Boltoshi</a>\n\n\
<b>💬 Community Chats:</b>\n\
• <a href=\"https://t.me/daiteboltchat\">Daite BOLT Chat</a>\n\
• <a href=\"https://t.me/this_is_bolt\">This is BOLT</a>\n\n\
<b>📊 Trading &amp; Analytics:</b>\n\
• <a href=\"https://dedust.io/swap/TON/BOLT\">DeDust</a>\n\
• <a href=\"https://tonwhales.com/explorer/token/BOLT\">TON Whales</a>\n\n\
<b>📱 Social Media:</b>\n\
• <a href=\"https://twitter.com/bolt_ton\">Twitter</a>\n\
• <a href=\"https://medium.com/@bolt_ton\">Medium</a>\n\
• <a href=\"https://github.com/bolt-ton\">GitHub</a>";

pub struct StartCommand;

#[async_trait]
impl Command for StartCommand {
    fn name(&self) -> &str {
        "/start"
    }

    fn aliases(&self) -> &[&str] {
        &["start", "/menu", "menu"]
    }

    fn description(&self) -> &str {
        "Main menu"
    }

    async fn execute(&self, _message: &Message) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Reply(MAIN_MENU.to_string()))
    }
}

pub struct CommunityCommand;

#[async_trait]
impl Command for CommunityCommand {
    fn name(&self) -> &str {
        "/community"
    }

    fn aliases(&self) -> &[&str] {
        &["community", "/links"]
    }

    fn description(&self) -> &str {
        "Community links"
    }

    async fn execute(&self, _message: &Message) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Reply(COMMUNITY_LINKS.to_string()))
    }
}
