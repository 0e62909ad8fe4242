//! Transport
//!
//! The single network seam of the client: POST a JSON body, get status,
//! headers and raw body text back. [`HttpTransport`] is the reqwest-backed
//! implementation; tests plug in their own.

use crate::error::GatewayError;
use crate::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Unparsed HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url` with `headers`
    async fn post(&self, url: &str, headers: HeaderMap, body: &serde_json::Value)
        -> Result<RawResponse>;
}

/// HTTPS transport over a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Wrap an existing client
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<RawResponse> {
        let response = self
            .http
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!("POST {} -> HTTP {} ({} bytes)", url, status, body.len());

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
