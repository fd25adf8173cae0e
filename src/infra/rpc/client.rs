//! JSON-RPC node client implementation.
//!
//! A thin marshalling layer over the node's HTTP endpoint: basic auth,
//! bounded retries, and envelope decoding. Everything of substance happens
//! on the node.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::config::NodeOptions;
use crate::domain::{
    Address, AssetBalance, AssetInfo, AssetRequest, ClientError, NodeRpc, RpcError, TransactionId,
    methods,
};

/// Configuration for the RPC client
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// HTTP JSON-RPC client for a MultiChain-style node.
pub struct HttpNodeClient {
    http_client: Client,
    endpoint: String,
    username: String,
    password: SecretString,
    chain: String,
    config: RpcClientConfig,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    id: u64,
    method: &'a str,
    params: &'a [Value],
    chain_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl HttpNodeClient {
    /// Create a new node client with custom configuration.
    pub fn new(options: &NodeOptions, config: RpcClientConfig) -> Result<Self, ClientError> {
        options.validate().map_err(ClientError::from)?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Rpc(RpcError::Connection(e.to_string())))?;

        let endpoint = options.endpoint();
        info!(endpoint = %endpoint, chain = %options.chain_name, "Created node client");

        Ok(Self {
            http_client,
            endpoint,
            username: options.username.clone(),
            password: options.password.clone(),
            chain: options.chain_name.clone(),
            config,
        })
    }

    /// Create a new node client with default configuration.
    pub fn with_defaults(options: &NodeOptions) -> Result<Self, ClientError> {
        Self::new(options, RpcClientConfig::default())
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make an RPC call with retries
    #[instrument(skip(self, params))]
    async fn rpc_call<R: for<'de> Deserialize<'de>>(
        &self,
        chain: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R, ClientError> {
        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay).await;
            }
            match self.do_rpc_call(chain, method, &params).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!(attempt = attempt, error = ?e, method = %method, "RPC call failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| ClientError::Rpc(RpcError::Connection("Unknown error".to_string()))))
    }

    /// Execute a single RPC call
    async fn do_rpc_call<R: for<'de> Deserialize<'de>>(
        &self,
        chain: &str,
        method: &str,
        params: &[Value],
    ) -> Result<R, ClientError> {
        let request = JsonRpcRequest {
            id: 1,
            method,
            params,
            chain_name: chain,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Rpc(RpcError::Timeout(e.to_string()))
                } else {
                    ClientError::Rpc(RpcError::Connection(e.to_string()))
                }
            })?;

        // The node reports call failures in the envelope body, with a
        // non-200 status; decode the body before looking at the status.
        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| ClientError::Rpc(RpcError::Connection(e.to_string())))?;

        if let Some(error) = rpc_response.error {
            if error.message.to_lowercase().contains("insufficient") {
                return Err(ClientError::Rpc(RpcError::InsufficientFunds));
            }
            return Err(ClientError::Rpc(RpcError::Call {
                code: error.code,
                message: error.message,
            }));
        }

        rpc_response
            .result
            .ok_or_else(|| ClientError::Rpc(RpcError::EmptyResult))
    }
}

/// Positional parameters for an `issue` call.
fn issue_params(address: &str, asset: &AssetRequest) -> Vec<Value> {
    let mut params = vec![
        json!(address),
        json!({ "name": asset.name, "open": asset.open }),
        json!(asset.quantity),
        json!(asset.units),
    ];
    if !asset.custom_fields.is_empty() {
        // Custom fields ride in position six, after the native amount.
        params.push(json!(0));
        params.push(json!(asset.custom_fields));
    }
    params
}

#[async_trait]
impl NodeRpc for HttpNodeClient {
    fn chain_name(&self) -> &str {
        &self.chain
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), ClientError> {
        let _: Value = self.rpc_call(&self.chain, methods::GET_INFO, vec![]).await?;
        Ok(())
    }

    #[instrument(skip(self, asset), fields(asset_name = %asset.name))]
    async fn issue_on(
        &self,
        chain: &str,
        address: &str,
        asset: &AssetRequest,
    ) -> Result<TransactionId, ClientError> {
        info!(chain = %chain, address = %address, "Issuing asset");

        let txid: String = self
            .rpc_call(chain, methods::ISSUE, issue_params(address, asset))
            .await?;

        info!(txid = %txid, "Asset issued");
        Ok(txid)
    }

    #[instrument(skip(self))]
    async fn asset_info_on(
        &self,
        chain: &str,
        asset: &str,
        verbose: bool,
    ) -> Result<AssetInfo, ClientError> {
        self.rpc_call(
            chain,
            methods::GET_ASSET_INFO,
            vec![json!(asset), json!(verbose)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn address_balances_on(
        &self,
        chain: &str,
        address: &str,
    ) -> Result<Vec<AssetBalance>, ClientError> {
        self.rpc_call(chain, methods::GET_ADDRESS_BALANCES, vec![json!(address)])
            .await
    }

    #[instrument(skip(self))]
    async fn new_address_on(&self, chain: &str) -> Result<Address, ClientError> {
        self.rpc_call(chain, methods::GET_NEW_ADDRESS, vec![]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> NodeOptions {
        NodeOptions::new("localhost", 7208, "multichainrpc", "s3cret", "currencies")
    }

    #[test]
    fn test_client_creation() {
        let client = HttpNodeClient::with_defaults(&options());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_options() {
        let bad = NodeOptions::new("", 7208, "u", "p", "main");
        let client = HttpNodeClient::with_defaults(&bad);
        assert!(matches!(client, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_client_uses_configured_chain_and_endpoint() {
        let client = HttpNodeClient::with_defaults(&options()).unwrap();
        assert_eq!(client.chain_name(), "currencies");
        assert_eq!(client.endpoint(), "http://localhost:7208");
    }

    #[test]
    fn test_ssl_endpoint() {
        let client = HttpNodeClient::with_defaults(&options().with_ssl()).unwrap();
        assert_eq!(client.endpoint(), "https://localhost:7208");
    }

    #[test]
    fn test_rpc_client_config_default() {
        let config = RpcClientConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_issue_params_basic() {
        let asset = AssetRequest::new("bond", 100, 0.1);
        let params = issue_params("1Addr", &asset);

        assert_eq!(params.len(), 4);
        assert_eq!(params[0], json!("1Addr"));
        assert_eq!(params[1], json!({ "name": "bond", "open": false }));
        assert_eq!(params[2], json!(100));
        assert_eq!(params[3], json!(0.1));
    }

    #[test]
    fn test_issue_params_with_custom_fields() {
        let asset = AssetRequest::new("bond", 100, 0.1)
            .open()
            .with_field("issuer", "treasury");
        let params = issue_params("1Addr", &asset);

        assert_eq!(params.len(), 6);
        assert_eq!(params[1], json!({ "name": "bond", "open": true }));
        assert_eq!(params[4], json!(0));
        assert_eq!(params[5], json!({ "issuer": "treasury" }));
    }

    #[test]
    fn test_error_envelope_decoding() {
        let raw = r#"{"result": null, "error": {"code": -708, "message": "Entity with this name not found"}, "id": 1}"#;
        let decoded: JsonRpcResponse<String> = serde_json::from_str(raw).unwrap();

        assert!(decoded.result.is_none());
        let error = decoded.error.unwrap();
        assert_eq!(error.code, -708);
        assert_eq!(error.message, "Entity with this name not found");
    }

    #[test]
    fn test_result_envelope_decoding() {
        let raw = r#"{"result": "3f0a9c", "error": null, "id": 1}"#;
        let decoded: JsonRpcResponse<String> = serde_json::from_str(raw).unwrap();

        assert_eq!(decoded.result.as_deref(), Some("3f0a9c"));
        assert!(decoded.error.is_none());
    }
}
