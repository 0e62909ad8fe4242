//! Request Signing and Response Verification
//!
//! Both directions use the same scheme:
//!
//! ```text
//! salt       = base64(32 random bytes)
//! hash_token = salt ++ password
//! signature  = base64(HMAC-SHA256(secret_key, hash_token ++ canonical_query_string))
//! ```
//!
//! Outgoing requests carry a fresh salt and the signature in the
//! `X-Signature-Salt` / `X-Signature-Hash` headers. The gateway answers with its
//! own salt and signature computed over a fixed subset of the response body.

use crate::error::GatewayError;
use crate::params::ParameterMap;
use crate::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use reqwest::header::{HeaderMap, HeaderValue};
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the salt, lowercase as stored in [`HeaderMap`]
pub const SALT_HEADER: &str = "x-signature-salt";

/// Header carrying the base64 signature
pub const HASH_HEADER: &str = "x-signature-hash";

/// Raw salt length before base64 encoding
pub const SALT_LEN: usize = 32;

/// Output of signing one parameter set
#[derive(Clone, PartialEq, Eq)]
pub struct SignedParameters {
    pub salt: String,
    /// `salt ++ password`; never transmitted
    pub hash_token: String,
    pub signature: String,
}

impl SignedParameters {
    /// Salt and signature as request headers
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        // base64 output is always a valid header value
        if let Ok(salt) = HeaderValue::from_str(&self.salt) {
            headers.insert(SALT_HEADER, salt);
        }
        if let Ok(hash) = HeaderValue::from_str(&self.signature) {
            headers.insert(HASH_HEADER, hash);
        }
        headers
    }
}

impl fmt::Debug for SignedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedParameters")
            .field("salt", &self.salt)
            .field("hash_token", &"<redacted>")
            .field("signature", &self.signature)
            .finish()
    }
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Fresh base64 salt from the OS CSPRNG
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// `salt ++ password`
pub fn hash_token(salt: &str, password: &str) -> String {
    let mut token = String::with_capacity(salt.len() + password.len());
    token.push_str(salt);
    token.push_str(password);
    token
}

/// `base64(HMAC-SHA256(secret_key, hash_token ++ canonical))`
pub fn compute_signature(secret_key: &str, hash_token: &str, canonical: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(hash_token.as_bytes());
    mac.update(canonical.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

// ============================================================================
// SIGNER
// ============================================================================

/// Sign `params` with a fresh salt
pub fn sign(params: &ParameterMap, password: &str, secret_key: &str) -> SignedParameters {
    sign_with_salt(params, &generate_salt(), password, secret_key)
}

/// Sign `params` with a caller-chosen salt. Deterministic.
pub fn sign_with_salt(
    params: &ParameterMap,
    salt: &str,
    password: &str,
    secret_key: &str,
) -> SignedParameters {
    let hash_token = hash_token(salt, password);
    let signature = compute_signature(secret_key, &hash_token, &params.canonical_query_string());

    SignedParameters {
        salt: salt.to_string(),
        hash_token,
        signature,
    }
}

// ============================================================================
// VERIFIER
// ============================================================================

/// Check a response signature against the signed field subset.
///
/// Returns the verified fields on success. Header lookup is
/// case-insensitive because [`HeaderMap`] normalizes names.
pub fn verify(
    headers: &HeaderMap,
    fields: ParameterMap,
    password: &str,
    secret_key: &str,
) -> Result<ParameterMap> {
    let salt = header_str(headers, SALT_HEADER)?;
    let received = header_str(headers, HASH_HEADER)?;

    let expected = sign_with_salt(&fields, salt, password, secret_key).signature;

    if bool::from(expected.as_bytes().ct_eq(received.as_bytes())) {
        debug!("Response signature verified over {} fields", fields.len());
        Ok(fields)
    } else {
        warn!("Response signature mismatch");
        Err(GatewayError::SignatureMismatch)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str> {
    let value = headers
        .get(name)
        .ok_or(GatewayError::MissingSignature(name))?;
    let value = value.to_str().map_err(|_| GatewayError::SignatureMismatch)?;
    if value.is_empty() {
        return Err(GatewayError::MissingSignature(name));
    }
    Ok(value)
}

/// Signer bound to one set of credentials
#[derive(Clone)]
pub struct Signer {
    secret_key: String,
    password: String,
}

impl Signer {
    pub fn new(secret_key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            password: password.into(),
        }
    }

    /// Sign outgoing parameters with a fresh salt
    pub fn sign(&self, params: &ParameterMap) -> SignedParameters {
        sign(params, &self.password, &self.secret_key)
    }

    /// Verify an inbound signature over `fields`
    pub fn verify(&self, headers: &HeaderMap, fields: ParameterMap) -> Result<ParameterMap> {
        verify(headers, fields, &self.password, &self.secret_key)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}
