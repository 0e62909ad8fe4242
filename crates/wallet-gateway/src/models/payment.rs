use chrono::{DateTime, Utc};
use serde::Serialize;

/// A payment request created on behalf of the merchant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub requester_username: Option<String>,
    pub request_id: Option<String>,
    pub request_time: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub reference_no: Option<String>,
    pub response_time: Option<DateTime<Utc>>,
}

/// Current state of a payment request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentStatus {
    pub request_id: Option<String>,
    /// Set once the request has been paid
    pub transaction_id: Option<String>,
    pub amount: Option<f64>,
    pub payment_time: Option<DateTime<Utc>>,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub is_paid: bool,
    pub response_time: Option<DateTime<Utc>>,
}

/// Outcome of a transfer to another wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMoneyResult {
    pub amount: Option<f64>,
    pub sender_fee: Option<f64>,
    pub transaction_id: Option<String>,
    pub old_balance: Option<f64>,
    pub new_balance: Option<f64>,
    pub transaction_time: Option<DateTime<Utc>>,
    pub reference_no: Option<String>,
    pub response_time: Option<DateTime<Utc>>,
}

impl SendMoneyResult {
    /// Amount plus fee, when both are known
    pub fn total_debited(&self) -> Option<f64> {
        Some(self.amount? + self.sender_fee.unwrap_or(0.0))
    }
}
