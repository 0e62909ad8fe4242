use chrono::{DateTime, Utc};
use serde::Serialize;

/// Merchant wallet balance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub balance: Option<f64>,
    pub response_time: Option<DateTime<Utc>>,
}

/// Result of looking up another wallet by its gateway id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletCheck {
    pub exists: bool,
    pub wallet_gateway_id: Option<String>,
    pub wallet_name: Option<String>,
    pub user_account_name: Option<String>,
    pub can_receive_money: bool,
    pub response_time: Option<DateTime<Utc>>,
}

impl WalletCheck {
    /// Wallet exists and accepts incoming transfers
    pub fn is_payable(&self) -> bool {
        self.exists && self.can_receive_money
    }
}
