//! Response Decoding
//!
//! Pure functions from a verified JSON body to a result record. The gateway
//! is loose with types: amounts arrive as numbers or numeric strings,
//! timestamps as epoch milliseconds in either form, flags as booleans or 0/1.

use crate::error::GatewayError;
use crate::models::*;
use crate::params::canonical_value;
use crate::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

// ============================================================================
// RECORDS
// ============================================================================

pub fn parse_balance(body: &Value) -> Result<Balance> {
    let obj = object(body)?;
    Ok(Balance {
        balance: number(obj, "balance")?,
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_payment_request(body: &Value) -> Result<PaymentRequest> {
    let obj = object(body)?;
    Ok(PaymentRequest {
        requester_username: string(obj, "requester_username"),
        request_id: string(obj, "request_id"),
        request_time: timestamp(obj, "request_time")?,
        amount: number(obj, "amount")?,
        reference_no: string(obj, "reference_no"),
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_payment_status(body: &Value) -> Result<PaymentStatus> {
    let obj = object(body)?;
    Ok(PaymentStatus {
        request_id: string(obj, "request_id"),
        transaction_id: string(obj, "transaction_id"),
        amount: number(obj, "amount")?,
        payment_time: timestamp(obj, "payment_timestamp")?,
        reference_no: string(obj, "reference_no"),
        description: string(obj, "description"),
        is_paid: boolean(obj, "is_paid")?,
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_send_money(body: &Value) -> Result<SendMoneyResult> {
    let obj = object(body)?;
    Ok(SendMoneyResult {
        amount: number(obj, "amount")?,
        sender_fee: number(obj, "sender_fee")?,
        transaction_id: string(obj, "transaction_id"),
        old_balance: number(obj, "old_balance")?,
        new_balance: number(obj, "new_balance")?,
        transaction_time: timestamp(obj, "timestamp")?,
        reference_no: string(obj, "reference_no"),
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_statement(body: &Value) -> Result<Statement> {
    let obj = object(body)?;
    let transactions = rows(obj, "day_statement")?
        .iter()
        .map(parse_statement_transaction)
        .collect::<Result<Vec<_>>>()?;

    Ok(Statement {
        available_balance: number(obj, "available_balance")?,
        outstanding_credit: number(obj, "outstanding_credit")?,
        outstanding_debit: number(obj, "outstanding_debit")?,
        day_balance: number(obj, "day_balance")?,
        day_total_in: number(obj, "day_total_in")?,
        day_total_out: number(obj, "day_total_out")?,
        transactions,
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_statement_transaction(row: &Value) -> Result<StatementTransaction> {
    let obj = object(row)?;
    Ok(StatementTransaction {
        transaction_id: string(obj, "transaction_id"),
        operation_type: operation_type(obj, "operation_type"),
        amount: number(obj, "amount")?,
        fee: number(obj, "fee")?,
        balance: number(obj, "balance")?,
        reference_no: string(obj, "reference_no"),
        description: string(obj, "description"),
        counterparty: string(obj, "counterparty"),
        timestamp: timestamp(obj, "timestamp")?,
    })
}

pub fn parse_wallet_check(body: &Value) -> Result<WalletCheck> {
    let obj = object(body)?;
    Ok(WalletCheck {
        exists: boolean(obj, "exists")?,
        wallet_gateway_id: string(obj, "wallet_gateway_id"),
        wallet_name: string(obj, "wallet_name"),
        user_account_name: string(obj, "user_account_name"),
        can_receive_money: boolean(obj, "can_receive_money")?,
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_outstanding_transactions(body: &Value) -> Result<OutstandingTransactions> {
    let obj = object(body)?;
    let transactions = rows(obj, "outstanding_transactions")?
        .iter()
        .map(parse_outstanding_transaction)
        .collect::<Result<Vec<_>>>()?;

    Ok(OutstandingTransactions {
        outstanding_credit: number(obj, "outstanding_credit")?,
        outstanding_debit: number(obj, "outstanding_debit")?,
        transactions,
        response_time: timestamp(obj, "response_timestamp")?,
    })
}

pub fn parse_outstanding_transaction(row: &Value) -> Result<OutstandingTransaction> {
    let obj = object(row)?;
    Ok(OutstandingTransaction {
        transaction_id: string(obj, "transaction_id"),
        operation_type: operation_type(obj, "operation_type"),
        status: transaction_status(obj, "status"),
        amount: number(obj, "amount")?,
        reference_no: string(obj, "reference_no"),
        description: string(obj, "description"),
        timestamp: timestamp(obj, "timestamp")?,
        release_time: timestamp(obj, "release_timestamp")?,
    })
}

// ============================================================================
// FIELD COERCION
// ============================================================================

fn object(value: &Value) -> Result<&Object> {
    value
        .as_object()
        .ok_or_else(|| GatewayError::malformed("expected a JSON object"))
}

/// Number or numeric string. `null`, absent and `""` are `None`.
pub fn number(obj: &Object, key: &str) -> Result<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| GatewayError::malformed(format!("field '{}' is not a number: {:?}", key, s))),
        Some(other) => Err(GatewayError::malformed(format!(
            "field '{}' is not a number: {}",
            key, other
        ))),
    }
}

/// Epoch milliseconds as number or string
pub fn timestamp(obj: &Object, key: &str) -> Result<Option<DateTime<Utc>>> {
    let millis = match obj.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(Some)
        .ok_or_else(|| GatewayError::malformed(format!("field '{}' is not an epoch-millisecond timestamp", key)))
}

/// `true`/`false`, `1`/`0`, or their string forms. Absent or `null` is `false`.
pub fn boolean(obj: &Object, key: &str) -> Result<bool> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            _ => Err(GatewayError::malformed(format!("field '{}' is not a boolean: {:?}", key, s))),
        },
        Some(other) => Err(GatewayError::malformed(format!(
            "field '{}' is not a boolean: {}",
            key, other
        ))),
    }
}

/// Strings as-is, numeric ids stringified the same way they are signed
pub fn string(obj: &Object, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        value @ Value::Number(_) => Some(canonical_value(value)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn rows<'a>(obj: &'a Object, key: &str) -> Result<&'a [Value]> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(GatewayError::malformed(format!("field '{}' is not an array", key))),
    }
}

fn small_code(obj: &Object, key: &str) -> Option<u8> {
    match obj.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|c| u8::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Unknown codes are dropped rather than failing the whole record.
fn operation_type(obj: &Object, key: &str) -> Option<OperationType> {
    small_code(obj, key).and_then(OperationType::from_code).or_else(|| {
        obj.get(key)
            .and_then(Value::as_str)
            .and_then(OperationType::from_name)
    })
}

fn transaction_status(obj: &Object, key: &str) -> Option<TransactionStatus> {
    small_code(obj, key).and_then(TransactionStatus::from_code).or_else(|| {
        obj.get(key)
            .and_then(Value::as_str)
            .and_then(TransactionStatus::from_name)
    })
}
