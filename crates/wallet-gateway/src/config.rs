// ============================================================================
// WALLET-GATEWAY - Configuration
// ============================================================================
// Gateway environments and the credentials a client is built from.

use crate::error::GatewayError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseUrl {
    Staging,
    Production,
}

impl BaseUrl {
    /// Every environment, in declaration order
    pub fn all() -> &'static [BaseUrl] {
        &[BaseUrl::Staging, BaseUrl::Production]
    }

    /// API root for this environment
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseUrl::Staging => "https://staging-api.walletgateway.dev",
            BaseUrl::Production => "https://api.walletgateway.dev",
        }
    }

    /// Constant name (`STAGING`, `PRODUCTION`)
    pub fn name(&self) -> &'static str {
        match self {
            BaseUrl::Staging => "STAGING",
            BaseUrl::Production => "PRODUCTION",
        }
    }

    /// Look up an environment by constant name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Reverse lookup from an API root
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim_end_matches('/');
        Self::all().iter().copied().find(|b| b.as_str() == url)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials and transport settings for a gateway client.
///
/// Immutable once handed to [`WalletGatewayClient`](crate::WalletGatewayClient).
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Merchant API key, sent as a bearer token
    pub api_key: String,

    /// HMAC key for request and response signatures
    pub secret_key: String,

    /// Account password, mixed into every signature with the salt
    pub password: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Value of the `Accept-Language` header.
    ///
    /// Default: `"en"`
    #[serde(default = "default_language")]
    pub language: String,

    /// Whole-request timeout in seconds.
    ///
    /// Default: `30`
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

const ENV_API_KEY: &str = "WALLET_GATEWAY_API_KEY";
const ENV_SECRET_KEY: &str = "WALLET_GATEWAY_SECRET_KEY";
const ENV_PASSWORD: &str = "WALLET_GATEWAY_PASSWORD";
const ENV_BASE_URL: &str = "WALLET_GATEWAY_BASE_URL";
const ENV_ENVIRONMENT: &str = "WALLET_GATEWAY_ENV";
const ENV_LANGUAGE: &str = "WALLET_GATEWAY_LANGUAGE";
const ENV_TIMEOUT: &str = "WALLET_GATEWAY_TIMEOUT_SECONDS";

impl GatewayConfig {
    /// Create a configuration against an arbitrary API root
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            password: password.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Create a staging configuration
    pub fn staging(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(api_key, secret_key, password, BaseUrl::Staging.as_str())
    }

    /// Create a production configuration
    pub fn production(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(api_key, secret_key, password, BaseUrl::Production.as_str())
    }

    /// Load from `WALLET_GATEWAY_*` environment variables.
    ///
    /// `WALLET_GATEWAY_BASE_URL` wins over `WALLET_GATEWAY_ENV`; with neither
    /// set the staging environment is used.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same rules as [`GatewayConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| GatewayError::config(format!("{} is not set", name)))
        };

        let base_url = match lookup(ENV_BASE_URL) {
            Some(url) => url,
            None => match lookup(ENV_ENVIRONMENT) {
                Some(name) => BaseUrl::from_name(&name)
                    .ok_or_else(|| {
                        GatewayError::config(format!("{} must be STAGING or PRODUCTION, got '{}'", ENV_ENVIRONMENT, name))
                    })?
                    .as_str()
                    .to_string(),
                None => BaseUrl::Staging.as_str().to_string(),
            },
        };

        let mut config = Self::new(
            require(ENV_API_KEY)?,
            require(ENV_SECRET_KEY)?,
            lookup(ENV_PASSWORD).unwrap_or_default(),
            base_url,
        );

        if let Some(language) = lookup(ENV_LANGUAGE) {
            config.language = language;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            config.timeout_seconds = timeout.trim().parse().map_err(|_| {
                GatewayError::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the `Accept-Language` value
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs();
        self
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Known environment for this base URL, if any
    pub fn environment(&self) -> Option<BaseUrl> {
        BaseUrl::from_url(&self.base_url)
    }

    /// Full URL for an endpoint path
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(GatewayError::config(format!(
                "base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(GatewayError::config("base URL has no host"));
        }
        if self.api_key.trim().is_empty() {
            return Err(GatewayError::config("api key is empty"));
        }
        if self.secret_key.is_empty() {
            return Err(GatewayError::config("secret key is empty"));
        }
        if self.timeout_seconds == 0 {
            return Err(GatewayError::config("timeout must be at least one second"));
        }
        Ok(())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
