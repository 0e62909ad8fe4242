// ============================================================================
// WALLET-GATEWAY - Signed Gateway Client
// ============================================================================
// Client for the wallet/payment gateway HTTP API.
//
// Every request is signed with HMAC-SHA256 over a salted, canonicalized
// parameter set, and every response is checked with the same scheme before
// it becomes a typed record. Unverified data never reaches the caller.
//
// Operations:
// - Balance, daily statement, outstanding transactions
// - Create and poll payment requests
// - Send money, look up recipient wallets
// ============================================================================

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod models;
pub mod params;
pub mod signature;
pub mod transport;

pub use client::{Endpoint, WalletGatewayClient, REQUEST_TIMESTAMP};
pub use config::{BaseUrl, GatewayConfig};
pub use error::GatewayError;
pub use models::*;
pub use params::ParameterMap;
pub use signature::{sign, sign_with_salt, verify, SignedParameters, Signer, HASH_HEADER, SALT_HEADER};
pub use transport::{HttpTransport, RawResponse, Transport};

/// Re-export for convenience
pub type Result<T> = std::result::Result<T, GatewayError>;
