//! TON blockchain data: tonapi.io client, response models and address checks.

mod address;
mod client;
mod models;

pub use address::is_valid_address;
pub use client::{TonApiClient, WalletDataSource, DEFAULT_TON_API_BASE_URL};
pub use models::{AccountInfo, JettonBalance, JettonInfo};

#[cfg(test)]
pub use client::MockWalletDataSource;
