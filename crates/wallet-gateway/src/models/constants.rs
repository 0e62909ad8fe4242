//! Gateway Constants
//!
//! Numeric codes the gateway uses for operation kinds and transaction states,
//! with lookups in both directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of wallet operation behind a statement or outstanding entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    PaymentRequest,
    SendMoney,
    ReceiveMoney,
    Deposit,
    Withdrawal,
    Refund,
}

impl OperationType {
    pub fn all() -> &'static [OperationType] {
        &[
            OperationType::PaymentRequest,
            OperationType::SendMoney,
            OperationType::ReceiveMoney,
            OperationType::Deposit,
            OperationType::Withdrawal,
            OperationType::Refund,
        ]
    }

    /// Wire code, 1 through 6
    pub fn code(&self) -> u8 {
        match self {
            OperationType::PaymentRequest => 1,
            OperationType::SendMoney => 2,
            OperationType::ReceiveMoney => 3,
            OperationType::Deposit => 4,
            OperationType::Withdrawal => 5,
            OperationType::Refund => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperationType::PaymentRequest => "PAYMENT_REQUEST",
            OperationType::SendMoney => "SEND_MONEY",
            OperationType::ReceiveMoney => "RECEIVE_MONEY",
            OperationType::Deposit => "DEPOSIT",
            OperationType::Withdrawal => "WITHDRAWAL",
            OperationType::Refund => "REFUND",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settlement state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn all() -> &'static [TransactionStatus] {
        &[
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
        ]
    }

    /// Wire code, 0 through 2
    pub fn code(&self) -> u8 {
        match self {
            TransactionStatus::Pending => 0,
            TransactionStatus::Completed => 1,
            TransactionStatus::Failed => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Funds have moved and will not move back
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
