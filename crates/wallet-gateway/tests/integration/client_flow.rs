//! Integration Tests: Gateway Operations
//!
//! Each operation against the mock gateway: request shape, request
//! signature, response verification and decoding into the record.

use super::mock_gateway::{client, MockGateway, Reply, API_KEY};
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use wallet_gateway::{
    Balance, Endpoint, OperationType, TransactionStatus, WalletGatewayClient, HASH_HEADER,
    SALT_HEADER,
};

const RESPONSE_TS: u64 = 1_700_000_000_000;

fn response_time() -> Option<chrono::DateTime<Utc>> {
    Utc.timestamp_millis_opt(RESPONSE_TS as i64).single()
}

fn body_keys(body: &serde_json::Value) -> Vec<String> {
    let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

fn sorted_fields(endpoint: Endpoint) -> Vec<String> {
    let mut fields: Vec<String> = endpoint
        .signed_request_fields()
        .iter()
        .map(|f| f.to_string())
        .collect();
    fields.sort();
    fields
}

/// Test: balance end to end, including request headers
#[tokio::test]
async fn test_get_balance() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "balance": 100,
        "response_timestamp": RESPONSE_TS.to_string(),
    })));
    let client = client(gateway);

    let balance = client.get_balance().await.expect("balance");
    assert_eq!(
        balance,
        Balance {
            balance: Some(100.0),
            response_time: response_time(),
        }
    );

    let request = client.transport().last_request();
    assert_eq!(request.url, "https://gateway.test/api/info/balance");
    assert!(request.signature_valid);
    assert_eq!(request.headers[AUTHORIZATION], format!("Bearer {}", API_KEY).as_str());
    assert_eq!(request.headers[ACCEPT_LANGUAGE], "en");
    assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    assert!(request.headers.contains_key(SALT_HEADER));
    assert!(request.headers.contains_key(HASH_HEADER));
    assert_eq!(body_keys(&request.body), sorted_fields(Endpoint::Balance));

    let sent_at = request.body["request_timestamp"].as_i64().unwrap();
    assert!((Utc::now().timestamp_millis() - sent_at).abs() < 60_000);
}

/// Test: payment request with string-typed amount in the reply
#[tokio::test]
async fn test_create_payment_request() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "requester_username": "coffee-shop",
        "request_id": "PR-7781",
        "request_time": "1699999999000",
        "amount": "49.90",
        "reference_no": "INV-42",
        "response_timestamp": RESPONSE_TS,
        "qr_payload": "not part of the signature",
    })));
    let client = client(gateway);

    let request = client
        .create_payment_request(49.9, "INV-42", "Two flat whites")
        .await
        .expect("payment request");

    assert_eq!(request.request_id.as_deref(), Some("PR-7781"));
    assert_eq!(request.requester_username.as_deref(), Some("coffee-shop"));
    assert_eq!(request.amount, Some(49.9));
    assert_eq!(
        request.request_time,
        Utc.timestamp_millis_opt(1_699_999_999_000).single()
    );
    assert_eq!(request.response_time, response_time());

    let sent = client.transport().last_request();
    assert!(sent.signature_valid);
    assert_eq!(sent.body["amount"], json!(49.9));
    assert_eq!(sent.body["description"], "Two flat whites");
    assert_eq!(body_keys(&sent.body), sorted_fields(Endpoint::CreatePaymentRequest));
}

/// Test: unpaid request keeps nulls as `None`
#[tokio::test]
async fn test_check_payment_status_unpaid() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "request_id": "PR-7781",
        "transaction_id": null,
        "amount": null,
        "payment_timestamp": null,
        "reference_no": "INV-42",
        "description": "Two flat whites",
        "is_paid": false,
        "response_timestamp": RESPONSE_TS,
    })));
    let client = client(gateway);

    let status = client.check_payment_status("PR-7781").await.expect("status");
    assert!(!status.is_paid);
    assert_eq!(status.amount, None);
    assert_eq!(status.payment_time, None);
    assert_eq!(status.transaction_id, None);
    assert_eq!(status.description.as_deref(), Some("Two flat whites"));

    let sent = client.transport().last_request();
    assert_eq!(sent.body["request_id"], "PR-7781");
    assert_eq!(body_keys(&sent.body), sorted_fields(Endpoint::CheckPaymentStatus));
}

/// Test: paid request
#[tokio::test]
async fn test_check_payment_status_paid() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "request_id": "PR-7781",
        "transaction_id": 5531,
        "amount": 49.9,
        "payment_timestamp": "1700000100000",
        "reference_no": "INV-42",
        "description": "Two flat whites",
        "is_paid": true,
        "response_timestamp": RESPONSE_TS,
    })));
    let client = client(gateway);

    let status = client.check_payment_status("PR-7781").await.expect("status");
    assert!(status.is_paid);
    assert_eq!(status.transaction_id.as_deref(), Some("5531"));
    assert_eq!(status.amount, Some(49.9));
    assert!(status.payment_time.is_some());
}

/// Test: transfer to another wallet
#[tokio::test]
async fn test_send_money() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "amount": "25.00",
        "sender_fee": "0.25",
        "transaction_id": "TX-1",
        "old_balance": "100.00",
        "new_balance": "74.75",
        "timestamp": "1700000000500",
        "reference_no": "PAYOUT-9",
        "response_timestamp": RESPONSE_TS,
    })));
    let client = client(gateway);

    let result = client
        .send_money(25.0, "WG-123456", "PAYOUT-9", "Weekly payout")
        .await
        .expect("send money");

    assert_eq!(result.amount, Some(25.0));
    assert_eq!(result.sender_fee, Some(0.25));
    assert_eq!(result.new_balance, Some(74.75));
    assert_eq!(result.total_debited(), Some(25.25));
    assert_eq!(result.transaction_id.as_deref(), Some("TX-1"));

    let sent = client.transport().last_request();
    assert!(sent.signature_valid);
    assert_eq!(sent.url, "https://gateway.test/api/payment/send-money");
    assert_eq!(sent.body["wallet_gateway_id"], "WG-123456");
    assert_eq!(body_keys(&sent.body), sorted_fields(Endpoint::SendMoney));
}

/// Test: statement rows are decoded but not part of the signature
#[tokio::test]
async fn test_get_statement() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "available_balance": "74.75",
        "outstanding_credit": "10",
        "outstanding_debit": "0",
        "day_balance": "74.75",
        "day_total_in": "49.90",
        "day_total_out": "25.25",
        "response_timestamp": RESPONSE_TS,
        "day_statement": [
            {
                "transaction_id": "TX-0",
                "operation_type": 1,
                "amount": "49.90",
                "fee": "0",
                "balance": "149.90",
                "description": "Two flat whites",
                "timestamp": "1699990000000"
            },
            {
                "transaction_id": "TX-1",
                "operation_type": "2",
                "amount": "-25.00",
                "fee": "0.25",
                "counterparty": "WG-123456",
                "timestamp": "1700000000500"
            }
        ],
    })));
    let client = client(gateway);

    let date = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
    let statement = client.get_statement(date).await.expect("statement");

    assert_eq!(statement.available_balance, Some(74.75));
    assert_eq!(statement.day_total_in, Some(49.9));
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(
        statement.transactions[0].operation_type,
        Some(OperationType::PaymentRequest)
    );
    assert_eq!(statement.transactions[1].amount, Some(-25.0));
    assert_eq!(
        statement.transactions[1].counterparty.as_deref(),
        Some("WG-123456")
    );

    let sent = client.transport().last_request();
    assert_eq!(sent.body["date"], "2023-11-14");
    assert_eq!(body_keys(&sent.body), sorted_fields(Endpoint::Statement));
}

/// Test: wallet lookup
#[tokio::test]
async fn test_check_wallet() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "exists": true,
        "wallet_gateway_id": "WG-123456",
        "wallet_name": "Corner Bakery",
        "user_account_name": "Sam Baker",
        "can_receive_money": 1,
        "response_timestamp": RESPONSE_TS,
    })));
    let client = client(gateway);

    let wallet = client.check_wallet("WG-123456").await.expect("wallet");
    assert!(wallet.exists);
    assert!(wallet.can_receive_money);
    assert!(wallet.is_payable());
    assert_eq!(wallet.wallet_name.as_deref(), Some("Corner Bakery"));
    assert_eq!(wallet.response_time, response_time());
}

/// Test: unknown wallet
#[tokio::test]
async fn test_check_wallet_missing() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "exists": false,
        "wallet_gateway_id": "WG-000000",
        "wallet_name": null,
        "user_account_name": null,
        "can_receive_money": false,
        "response_timestamp": RESPONSE_TS,
    })));
    let client = client(gateway);

    let wallet = client.check_wallet("WG-000000").await.expect("wallet");
    assert!(!wallet.exists);
    assert!(!wallet.is_payable());
    assert_eq!(wallet.wallet_name, None);
}

/// Test: outstanding transactions with row statuses
#[tokio::test]
async fn test_get_outstanding_transactions() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "outstanding_credit": 10,
        "outstanding_debit": "2.5",
        "response_timestamp": RESPONSE_TS,
        "outstanding_transactions": [
            {
                "transaction_id": "TX-7",
                "operation_type": 3,
                "status": 0,
                "amount": "10",
                "timestamp": "1700000000000",
                "release_timestamp": "1700086400000"
            }
        ],
    })));
    let client = client(gateway);

    let outstanding = client
        .get_outstanding_transactions()
        .await
        .expect("outstanding");

    assert_eq!(outstanding.net_outstanding(), 7.5);
    assert_eq!(outstanding.transactions.len(), 1);
    let row = &outstanding.transactions[0];
    assert_eq!(row.status, Some(TransactionStatus::Pending));
    assert_eq!(row.operation_type, Some(OperationType::ReceiveMoney));
    assert_eq!(
        row.release_time,
        Utc.timestamp_millis_opt(1_700_086_400_000).single()
    );
}

/// Test: one client serves concurrent calls
#[tokio::test]
async fn test_concurrent_calls() {
    let gateway = MockGateway::new()
        .reply(Reply::Signed(json!({"balance": 1, "response_timestamp": RESPONSE_TS})))
        .reply(Reply::Signed(json!({"balance": 1, "response_timestamp": RESPONSE_TS})));
    let client = client(gateway);

    let (a, b) = tokio::join!(client.get_balance(), client.get_balance());
    assert_eq!(a.unwrap().balance, Some(1.0));
    assert_eq!(b.unwrap().balance, Some(1.0));

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].headers[SALT_HEADER], requests[1].headers[SALT_HEADER]);
}

/// Test: language setting reaches the wire
#[tokio::test]
async fn test_language_header() {
    let gateway = MockGateway::new().reply(Reply::Signed(json!({
        "balance": 0,
        "response_timestamp": RESPONSE_TS,
    })));
    let config = super::mock_gateway::test_config().with_language("ar");
    let client = WalletGatewayClient::with_transport(config, gateway).unwrap();

    client.get_balance().await.unwrap();
    assert_eq!(client.transport().last_request().headers[ACCEPT_LANGUAGE], "ar");
}
