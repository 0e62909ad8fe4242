// ============================================================================
// WALLET-GATEWAY - Error Types
// ============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    // ==================== Client Errors ====================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    // ==================== Network Errors ====================
    #[error("Transport error: {0}")]
    Transport(String),

    // ==================== Response Errors ====================
    #[error("Remote error {code}: {message}")]
    Remote { code: String, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ==================== Signature Errors ====================
    #[error("Missing signature header: {0}")]
    MissingSignature(&'static str),

    #[error("Response signature mismatch")]
    SignatureMismatch,
}

impl GatewayError {
    /// Create a malformed-response error with context
    pub fn malformed(msg: impl Into<String>) -> Self {
        GatewayError::MalformedResponse(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GatewayError::Configuration(msg.into())
    }

    /// Stable machine-readable code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Configuration(_) => "CONFIGURATION_ERROR",
            GatewayError::InvalidParameter { .. } => "INVALID_PARAMETER",
            GatewayError::Transport(_) => "TRANSPORT_ERROR",
            GatewayError::Remote { .. } => "REMOTE_ERROR",
            GatewayError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            GatewayError::MissingSignature(_) => "MISSING_SIGNATURE",
            GatewayError::SignatureMismatch => "SIGNATURE_MISMATCH",
        }
    }

    /// True when the response was rejected by signature verification
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingSignature(_) | GatewayError::SignatureMismatch
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::MalformedResponse(err.to_string())
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        GatewayError::Configuration(format!("invalid base URL: {}", err))
    }
}
