use crate::models::transaction::CustomerDetails;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";
const TRANSACTIONS_PATH: &str = "/snap/v1/transactions";
const SNAP_JS_PATH: &str = "/snap/snap.js";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_ORDER_PREFIX: &str = "order-csb-";
const DEFAULT_GROSS_AMOUNT: u64 = 10000;
const DEFAULT_CLIENT_KEY: &str = "YOUR_CLIENT_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SERVER_KEY is not set; export it or add it to the .env file")]
    MissingServerKey,
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Secret gateway key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerKey(String);

impl ServerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerKey(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    fn base_url(self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => SANDBOX_BASE_URL,
            GatewayEnvironment::Production => PRODUCTION_BASE_URL,
        }
    }

    pub fn transactions_url(self) -> String {
        format!("{}{}", self.base_url(), TRANSACTIONS_PATH)
    }

    pub fn snap_js_url(self) -> String {
        format!("{}{}", self.base_url(), SNAP_JS_PATH)
    }
}

/// Optional settings file. `SERVER_KEY` only ever comes from the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub gateway: GatewaySection,
    pub transaction: TransactionSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySection {
    pub production: Option<bool>,
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub client_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransactionSection {
    pub order_prefix: Option<String>,
    pub gross_amount: Option<u64>,
    pub customer: Option<CustomerDetails>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub server_port: u16,
    pub server_key: ServerKey,
    pub client_key: String,
    pub environment: GatewayEnvironment,
    pub gateway_url: Url,
    pub gateway_timeout: Duration,
    pub order_prefix: String,
    pub gross_amount: u64,
    pub customer: CustomerDetails,
}

impl Config {
    pub fn from_env(file: FileConfig) -> Result<Self, ConfigError> {
        Self::from_sources(file, |key| env::var(key).ok())
    }

    /// Defaults, then `file`, then whatever `lookup` returns for each variable.
    pub fn from_sources<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_key = non_blank(lookup("SERVER_KEY")).ok_or(ConfigError::MissingServerKey)?;

        let production = match lookup("MIDTRANS_PRODUCTION") {
            Some(value) => parse_var("MIDTRANS_PRODUCTION", &value)?,
            None => file.gateway.production.unwrap_or(false),
        };
        let environment = if production {
            GatewayEnvironment::Production
        } else {
            GatewayEnvironment::Sandbox
        };

        let (url_key, raw_url) = match lookup("SNAP_API_URL") {
            Some(url) => ("SNAP_API_URL", url),
            None => (
                "gateway.api_url",
                file.gateway
                    .api_url
                    .unwrap_or_else(|| environment.transactions_url()),
            ),
        };
        let gateway_url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            key: url_key,
            value: raw_url.clone(),
            reason: e.to_string(),
        })?;

        let timeout_ms = match lookup("GATEWAY_TIMEOUT_MS") {
            Some(value) => parse_var("GATEWAY_TIMEOUT_MS", &value)?,
            None => file.gateway.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        };
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "GATEWAY_TIMEOUT_MS",
                value: timeout_ms.to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }

        let server_port = match lookup("PORT") {
            Some(value) => parse_var("PORT", &value)?,
            None => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        let gross_amount = file.transaction.gross_amount.unwrap_or(DEFAULT_GROSS_AMOUNT);
        if gross_amount == 0 {
            return Err(ConfigError::Invalid {
                key: "transaction.gross_amount",
                value: gross_amount.to_string(),
                reason: "amount must be positive".to_string(),
            });
        }

        Ok(Self {
            host: lookup("SERVER_HOST")
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            server_port,
            server_key: ServerKey::new(server_key),
            client_key: non_blank(lookup("CLIENT_KEY"))
                .or_else(|| non_blank(file.gateway.client_key))
                .unwrap_or_else(|| DEFAULT_CLIENT_KEY.to_string()),
            environment,
            gateway_url,
            gateway_timeout: Duration::from_millis(timeout_ms),
            order_prefix: file
                .transaction
                .order_prefix
                .unwrap_or_else(|| DEFAULT_ORDER_PREFIX.to_string()),
            gross_amount,
            customer: file.transaction.customer.unwrap_or_default(),
        })
    }
}

/// Trimmed value, `None` when unset or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
