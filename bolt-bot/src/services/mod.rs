//! Application services over storage and upstream clients.

mod session;
mod wallet;

pub use session::SessionService;
pub use wallet::WalletReporter;
