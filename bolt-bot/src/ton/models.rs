//! tonapi.io v2 response models (only the fields the bot reads).

use serde::{Deserialize, Serialize};

const TON_DECIMALS: i32 = 9;

fn default_decimals() -> u32 {
    9
}

/// `GET /accounts/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    /// Balance in nanotons.
    pub balance: u64,
    #[serde(default)]
    pub status: Option<String>,
}

impl AccountInfo {
    pub fn balance_ton(&self) -> f64 {
        self.balance as f64 / 10f64.powi(TON_DECIMALS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JettonInfo {
    #[serde(default)]
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

/// One entry of `GET /accounts/{address}/jettons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JettonBalance {
    /// Raw integer amount as a decimal string.
    pub balance: String,
    pub jetton: JettonInfo,
}

impl JettonBalance {
    /// Amount in whole tokens; 0 if the raw balance does not parse.
    pub fn amount(&self) -> f64 {
        let raw: f64 = self.balance.parse().unwrap_or(0.0);
        raw / 10f64.powi(self.jetton.decimals as i32)
    }

    pub fn symbol(&self) -> String {
        self.jetton.symbol.to_uppercase()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JettonsResponse {
    #[serde(default)]
    pub balances: Vec<JettonBalance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_balance_in_ton() {
        let info: AccountInfo =
            serde_json::from_str(r#"{"address":"0:ab","balance":12500000000,"status":"active"}"#)
                .unwrap();
        assert!((info.balance_ton() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_jetton_amount_uses_decimals() {
        let json = r#"{"balances":[
            {"balance":"1500000000","jetton":{"name":"Bolt","symbol":"bolt","decimals":9}},
            {"balance":"2500","jetton":{"symbol":"USDT","decimals":3}},
            {"balance":"oops","jetton":{"symbol":"X"}}
        ]}"#;
        let parsed: JettonsResponse = serde_json::from_str(json).unwrap();

        assert!((parsed.balances[0].amount() - 1.5).abs() < 1e-9);
        assert_eq!(parsed.balances[0].symbol(), "BOLT");
        assert!((parsed.balances[1].amount() - 2.5).abs() < 1e-9);
        assert_eq!(parsed.balances[2].amount(), 0.0);
        assert_eq!(parsed.balances[2].jetton.decimals, 9);
    }
}
