use crate::chain::abi::{from_hex, to_hex};
use crate::core::{Address, ClientError, ClientResult};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Minimal Ethereum JSON-RPC client over HTTP.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };
        trace!("RPC request #{} {} to {}", id, method, self.url);

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            debug!("RPC #{} {} failed: {} ({})", id, method, error.message, error.code);
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        Ok(serde_json::from_value(result)?)
    }

    pub async fn chain_id(&self) -> ClientResult<u64> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&raw)
    }

    pub async fn accounts(&self) -> ClientResult<Vec<Address>> {
        let raw: Vec<String> = self.request("eth_accounts", json!([])).await?;
        raw.iter().map(|a| a.parse()).collect()
    }

    /// `eth_call` against the latest block, returning raw return data.
    pub async fn call(&self, to: &Address, data: &[u8]) -> ClientResult<Vec<u8>> {
        let raw: String = self
            .request(
                "eth_call",
                json!([{ "to": to.as_str(), "data": to_hex(data) }, "latest"]),
            )
            .await?;
        from_hex(&raw)
    }

    /// Asks the wallet behind this endpoint to sign and send a transaction.
    /// Returns the transaction hash.
    pub async fn send_transaction(&self, from: &Address, to: &Address, data: &[u8]) -> ClientResult<String> {
        self.request(
            "eth_sendTransaction",
            json!([{ "from": from.as_str(), "to": to.as_str(), "data": to_hex(data) }]),
        )
        .await
    }
}

/// Parses a `0x`-prefixed hex quantity.
pub fn parse_quantity(raw: &str) -> ClientResult<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ClientError::AbiDecode(format!("invalid quantity {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x38").unwrap(), 56);
        assert_eq!(parse_quantity("0x1").unwrap(), 1);
        assert!(parse_quantity("0xnope").is_err());
    }

    #[tokio::test]
    async fn test_chain_id_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(json!({ "method": "eth_chainId" })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x38"}"#)
            .create_async()
            .await;

        let client = RpcClient::new(server.url(), 5).unwrap();
        assert_eq!(client.chain_id().await.unwrap(), 56);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rpc_error_carries_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#)
            .create_async()
            .await;

        let client = RpcClient::new(server.url(), 5).unwrap();
        let from: Address = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18".parse().unwrap();
        let err = client.send_transaction(&from, &from, &[0x01]).await.unwrap_err();
        assert_eq!(err.code(), Some(4001));
        assert!(err.to_string().contains("User rejected"));
    }

    #[tokio::test]
    async fn test_call_decodes_hex_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(json!({ "method": "eth_call" })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x0012"}"#)
            .create_async()
            .await;

        let client = RpcClient::new(server.url(), 5).unwrap();
        let to: Address = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18".parse().unwrap();
        assert_eq!(client.call(&to, &[0x31]).await.unwrap(), vec![0x00, 0x12]);
    }
}
