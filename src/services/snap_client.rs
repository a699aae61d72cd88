use crate::app::config::{Config, ServerKey};
use crate::models::transaction::{SnapTransaction, TransactionRequest};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_DETAIL_LEN: usize = 512;
/// Largest gateway body read into memory. A Snap answer is a few hundred bytes.
const MAX_RESPONSE_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("failed to encode transaction request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("gateway responded with {status}: {detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error("gateway response exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },
    #[error("gateway returned malformed JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("gateway response has no usable token: {0}")]
    InvalidTransaction(#[source] serde_json::Error),
}

/// Creates Snap transactions.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<SnapTransaction, SnapError>;
}

pub struct SnapClient {
    client: Client,
    endpoint: Url,
    authorization: String,
}

impl SnapClient {
    pub fn new(endpoint: Url, server_key: &ServerKey, timeout: Duration) -> Result<Self, SnapError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            authorization: basic_authorization(server_key),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SnapError> {
        Self::new(
            config.gateway_url.clone(),
            &config.server_key,
            config.gateway_timeout,
        )
    }
}

#[async_trait]
impl TokenIssuer for SnapClient {
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<SnapTransaction, SnapError> {
        let body = serde_json::to_vec(request).map_err(SnapError::Encode)?;
        debug!("Creating transaction {} at {}", request.order_id(), self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let payload = read_capped(response, MAX_RESPONSE_BYTES).await?;

        if !status.is_success() {
            let detail = describe_rejection(&payload);
            warn!("Gateway rejected transaction {}: {} {}", request.order_id(), status, detail);
            return Err(SnapError::Rejected { status, detail });
        }

        let transaction = parse_transaction(&payload)?;
        info!("Snap token issued for order {}", request.order_id());
        Ok(transaction)
    }
}

/// Reads at most `limit` bytes of body. The response is dropped on every
/// return path, which releases the connection.
async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, SnapError> {
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(SnapError::ResponseTooLarge { limit });
    }

    let mut payload = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if payload.len() + chunk.len() > limit {
            return Err(SnapError::ResponseTooLarge { limit });
        }
        payload.extend_from_slice(&chunk);
    }
    Ok(payload)
}

/// `Basic base64(server_key + ":")`, the key is the username and the password is empty.
pub fn basic_authorization(server_key: &ServerKey) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", server_key.expose())))
}

fn parse_transaction(payload: &[u8]) -> Result<SnapTransaction, SnapError> {
    let document: Value = serde_json::from_slice(payload).map_err(SnapError::Decode)?;
    serde_json::from_value(document).map_err(SnapError::InvalidTransaction)
}

fn describe_rejection(payload: &[u8]) -> String {
    if let Ok(document) = serde_json::from_slice::<Value>(payload) {
        if let Some(messages) = document.get("error_messages").and_then(Value::as_array) {
            let joined: Vec<&str> = messages.iter().filter_map(Value::as_str).collect();
            if !joined.is_empty() {
                return joined.join("; ");
            }
        }
    }

    let text = String::from_utf8_lossy(payload);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    text.chars().take(MAX_DETAIL_LEN).collect()
}
