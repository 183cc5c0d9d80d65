//! Chat commands and the [`Dispatcher`] that resolves them from message text.

mod conversation;
mod dispatcher;
mod menu;
mod price;

pub use conversation::{CancelCommand, ClearCommand, WalletCommand, AWAITING_WALLET_ADDRESS};
pub use dispatcher::{Command, Dispatcher};
pub use menu::{CommunityCommand, StartCommand};
pub use price::{PriceCommand, QuoteCommand};
