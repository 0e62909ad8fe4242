use super::{OperationType, TransactionStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Daily statement with running totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub available_balance: Option<f64>,
    pub outstanding_credit: Option<f64>,
    pub outstanding_debit: Option<f64>,
    pub day_balance: Option<f64>,
    pub day_total_in: Option<f64>,
    pub day_total_out: Option<f64>,
    pub transactions: Vec<StatementTransaction>,
    pub response_time: Option<DateTime<Utc>>,
}

/// One row of `day_statement`. Rows are not covered by the response signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementTransaction {
    pub transaction_id: Option<String>,
    pub operation_type: Option<OperationType>,
    pub amount: Option<f64>,
    pub fee: Option<f64>,
    pub balance: Option<f64>,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub counterparty: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Credits and debits not yet settled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutstandingTransactions {
    pub outstanding_credit: Option<f64>,
    pub outstanding_debit: Option<f64>,
    pub transactions: Vec<OutstandingTransaction>,
    pub response_time: Option<DateTime<Utc>>,
}

impl OutstandingTransactions {
    /// Credit minus debit, treating unknown totals as zero
    pub fn net_outstanding(&self) -> f64 {
        self.outstanding_credit.unwrap_or(0.0) - self.outstanding_debit.unwrap_or(0.0)
    }
}

/// One row of `outstanding_transactions`. Not covered by the response signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutstandingTransaction {
    pub transaction_id: Option<String>,
    pub operation_type: Option<OperationType>,
    pub status: Option<TransactionStatus>,
    pub amount: Option<f64>,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// When the funds are due to settle
    pub release_time: Option<DateTime<Utc>>,
}
