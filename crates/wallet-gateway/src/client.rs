// ============================================================================
// WALLET-GATEWAY - Client
// ============================================================================
// One method per gateway operation. Every call runs the same linear path:
//
//   build params -> sign -> POST -> parse JSON -> error envelope?
//                -> verify signed response fields -> decode record
//
// Nothing is retried and nothing is kept between calls.
// ============================================================================

use crate::config::GatewayConfig;
use crate::decode;
use crate::error::GatewayError;
use crate::models::*;
use crate::params::ParameterMap;
use crate::signature::Signer;
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::Result;
use chrono::{NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Request field carrying the client clock in epoch milliseconds
pub const REQUEST_TIMESTAMP: &str = "request_timestamp";

// ============================================================================
// ENDPOINTS
// ============================================================================

/// The seven gateway operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Balance,
    CreatePaymentRequest,
    CheckPaymentStatus,
    SendMoney,
    Statement,
    CheckWallet,
    OutstandingTransactions,
}

impl Endpoint {
    pub fn all() -> &'static [Endpoint] {
        &[
            Endpoint::Balance,
            Endpoint::CreatePaymentRequest,
            Endpoint::CheckPaymentStatus,
            Endpoint::SendMoney,
            Endpoint::Statement,
            Endpoint::CheckWallet,
            Endpoint::OutstandingTransactions,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Balance => "/info/balance",
            Endpoint::CreatePaymentRequest => "/payment/create-payment-request",
            Endpoint::CheckPaymentStatus => "/payment/check-payment-status",
            Endpoint::SendMoney => "/payment/send-money",
            Endpoint::Statement => "/info/statement",
            Endpoint::CheckWallet => "/info/check-wallet",
            Endpoint::OutstandingTransactions => "/info/outstanding-transactions",
        }
    }

    /// Fields the client sends and signs
    pub fn signed_request_fields(&self) -> &'static [&'static str] {
        match self {
            Endpoint::Balance => &["request_timestamp"],
            Endpoint::CreatePaymentRequest => {
                &["amount", "reference_no", "description", "request_timestamp"]
            }
            Endpoint::CheckPaymentStatus => &["request_id", "request_timestamp"],
            Endpoint::SendMoney => &[
                "amount",
                "wallet_gateway_id",
                "reference_no",
                "description",
                "request_timestamp",
            ],
            Endpoint::Statement => &["date", "request_timestamp"],
            Endpoint::CheckWallet => &["wallet_gateway_id", "request_timestamp"],
            Endpoint::OutstandingTransactions => &["request_timestamp"],
        }
    }

    /// Response fields the gateway covers with its signature
    pub fn signed_response_fields(&self) -> &'static [&'static str] {
        match self {
            Endpoint::Balance => &["balance", "response_timestamp"],
            Endpoint::CreatePaymentRequest => &[
                "requester_username",
                "request_id",
                "request_time",
                "amount",
                "reference_no",
                "response_timestamp",
            ],
            Endpoint::CheckPaymentStatus => &[
                "request_id",
                "transaction_id",
                "amount",
                "payment_timestamp",
                "reference_no",
                "description",
                "is_paid",
                "response_timestamp",
            ],
            Endpoint::SendMoney => &[
                "amount",
                "sender_fee",
                "transaction_id",
                "old_balance",
                "new_balance",
                "timestamp",
                "reference_no",
                "response_timestamp",
            ],
            Endpoint::Statement => &[
                "available_balance",
                "outstanding_credit",
                "outstanding_debit",
                "day_balance",
                "day_total_in",
                "day_total_out",
                "response_timestamp",
            ],
            Endpoint::CheckWallet => &[
                "exists",
                "wallet_gateway_id",
                "wallet_name",
                "user_account_name",
                "can_receive_money",
                "response_timestamp",
            ],
            Endpoint::OutstandingTransactions => {
                &["outstanding_credit", "outstanding_debit", "response_timestamp"]
            }
        }
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// Signed client for the wallet gateway.
///
/// Credentials are fixed at construction and only read afterwards, so one
/// client can serve concurrent calls without locking.
pub struct WalletGatewayClient<T = HttpTransport> {
    config: GatewayConfig,
    signer: Signer,
    base_headers: HeaderMap,
    transport: T,
}

impl WalletGatewayClient<HttpTransport> {
    /// Create a client over HTTPS
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout())?;
        Self::with_transport(config, transport)
    }

    /// Create a staging client
    pub fn staging(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::new(GatewayConfig::staging(api_key, secret_key, password))
    }

    /// Create a production client
    pub fn production(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::new(GatewayConfig::production(api_key, secret_key, password))
    }

    /// Create a client from `WALLET_GATEWAY_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env()?)
    }
}

impl<T: Transport> WalletGatewayClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: GatewayConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let base_headers = base_headers(&config)?;
        let signer = Signer::new(config.secret_key.clone(), config.password.clone());

        Ok(Self {
            config,
            signer,
            base_headers,
            transport,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ==================== Info Operations ====================

    /// Current merchant wallet balance
    pub async fn get_balance(&self) -> Result<Balance> {
        let body = self.call(Endpoint::Balance, ParameterMap::new()).await?;
        decode::parse_balance(&body)
    }

    /// Statement for one calendar day
    pub async fn get_statement(&self, date: NaiveDate) -> Result<Statement> {
        let params = ParameterMap::new().with("date", date.format("%Y-%m-%d").to_string());
        let body = self.call(Endpoint::Statement, params).await?;
        decode::parse_statement(&body)
    }

    /// Look up a wallet before sending money to it
    pub async fn check_wallet(&self, wallet_gateway_id: &str) -> Result<WalletCheck> {
        let params = ParameterMap::new().with("wallet_gateway_id", wallet_gateway_id);
        let body = self.call(Endpoint::CheckWallet, params).await?;
        decode::parse_wallet_check(&body)
    }

    /// Credits and debits still waiting to settle
    pub async fn get_outstanding_transactions(&self) -> Result<OutstandingTransactions> {
        let body = self
            .call(Endpoint::OutstandingTransactions, ParameterMap::new())
            .await?;
        decode::parse_outstanding_transactions(&body)
    }

    // ==================== Payment Operations ====================

    /// Ask a customer to pay `amount`
    pub async fn create_payment_request(
        &self,
        amount: f64,
        reference_no: &str,
        description: &str,
    ) -> Result<PaymentRequest> {
        let params = ParameterMap::new()
            .with("amount", amount)
            .with("reference_no", reference_no)
            .with("description", description);
        let body = self.call(Endpoint::CreatePaymentRequest, params).await?;
        decode::parse_payment_request(&body)
    }

    /// Poll a payment request created earlier
    pub async fn check_payment_status(&self, request_id: &str) -> Result<PaymentStatus> {
        let params = ParameterMap::new().with("request_id", request_id);
        let body = self.call(Endpoint::CheckPaymentStatus, params).await?;
        decode::parse_payment_status(&body)
    }

    /// Transfer `amount` to another wallet
    pub async fn send_money(
        &self,
        amount: f64,
        wallet_gateway_id: &str,
        reference_no: &str,
        description: &str,
    ) -> Result<SendMoneyResult> {
        let params = ParameterMap::new()
            .with("amount", amount)
            .with("wallet_gateway_id", wallet_gateway_id)
            .with("reference_no", reference_no)
            .with("description", description);
        let body = self.call(Endpoint::SendMoney, params).await?;
        decode::parse_send_money(&body)
    }

    // ==================== Dispatch ====================

    /// Run one signed round trip and return the verified body
    async fn call(&self, endpoint: Endpoint, params: ParameterMap) -> Result<Value> {
        let params = params.with(REQUEST_TIMESTAMP, Utc::now().timestamp_millis());
        debug_assert!(params
            .iter()
            .map(|(k, _)| k.as_str())
            .eq(sorted(endpoint.signed_request_fields())));
        params.ensure_unambiguous()?;

        let signed = self.signer.sign(&params);
        let mut headers = self.base_headers.clone();
        headers.extend(signed.headers());

        let url = self.config.endpoint_url(endpoint.path());
        debug!("Calling {:?} at {}", endpoint, url);

        let response = self.transport.post(&url, headers, &params.to_json()).await?;
        let body = response_object(endpoint, &response)?;

        let fields = ParameterMap::from_fields(&body, endpoint.signed_response_fields());
        self.signer.verify(&response.headers, fields).map_err(|e| {
            warn!("{:?} response rejected: {}", endpoint, e);
            e
        })?;

        Ok(Value::Object(body))
    }
}

fn sorted(fields: &'static [&'static str]) -> Vec<&'static str> {
    let mut fields = fields.to_vec();
    fields.sort_unstable();
    fields
}

fn base_headers(config: &GatewayConfig) -> Result<HeaderMap> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|_| GatewayError::config("api key is not a valid header value"))?;
    authorization.set_sensitive(true);

    let language = HeaderValue::from_str(&config.language)
        .map_err(|_| GatewayError::config("language is not a valid header value"))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(ACCEPT_LANGUAGE, language);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Parse the body, surface error envelopes, and insist on a JSON object
fn response_object(endpoint: Endpoint, response: &RawResponse) -> Result<Map<String, Value>> {
    let http_failure = || GatewayError::Transport(format!("HTTP {}", response.status));

    if response.body.trim().is_empty() {
        return Err(if response.is_success() {
            GatewayError::malformed("empty response body")
        } else {
            http_failure()
        });
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) if response.is_success() => return Err(e.into()),
        Err(_) => return Err(http_failure()),
    };

    if let Some((code, message)) = body.get("error").and_then(error_envelope) {
        warn!("{:?} returned remote error {}: {}", endpoint, code, message);
        return Err(GatewayError::Remote { code, message });
    }

    if !response.is_success() {
        return Err(http_failure());
    }

    match body {
        Value::Object(obj) => Ok(obj),
        _ => Err(GatewayError::malformed("response body is not a JSON object")),
    }
}

/// An error envelope is a `{"code", "message"}` object or a non-empty string.
/// Anything else under `error` (`false`, `0`, `""`, `{}`) is not one.
fn error_envelope(error: &Value) -> Option<(String, String)> {
    let text = |v: Option<&Value>| match v {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    match error {
        Value::Object(obj) => {
            let code = text(obj.get("code"));
            let message = text(obj.get("message"));
            if code.is_none() && message.is_none() {
                return None;
            }
            Some((
                code.unwrap_or_else(|| "UNKNOWN".to_string()),
                message.unwrap_or_default(),
            ))
        }
        Value::String(message) if !message.trim().is_empty() => {
            Some(("UNKNOWN".to_string(), message.clone()))
        }
        _ => None,
    }
}
