//! Blocking JSON-RPC client for an Abelian node.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use abel_wallet::chain::{BlockSource, ChainBlock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::{Error, Result, RpcError};
use crate::json::{Block, ChainInfo, Tx};

/// Default request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 3000;

/// Connection settings for a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// PEM file with the CA certificate that signed the node's certificate.
    pub ca_file: Option<PathBuf>,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            ca_file: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_tls(mut self, ca_file: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(ca_file.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a [Value],
    id: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Decode a JSON-RPC response body into the result of `method`.
///
/// An error object takes precedence over any result; a `null` result is only
/// accepted when `T` itself deserializes from `null`.
pub fn parse_response<T: DeserializeOwned>(method: &str, body: &[u8]) -> Result<T> {
    let response: Response = serde_json::from_slice(body)?;
    if let Some(e) = response.error {
        return Err(Error::Rpc(e));
    }
    match response.result {
        Some(result) if !result.is_null() => Ok(serde_json::from_value(result)?),
        _ => serde_json::from_value(Value::Null).map_err(|_| Error::EmptyResult(method.to_string())),
    }
}

/// Client for the node's JSON-RPC 1.0 interface.
///
/// Every call is a single blocking POST carrying a fresh request id and Basic
/// credentials when configured.
#[derive(Debug)]
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    next_id: AtomicU64,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().timeout(Duration::from_secs(config.timeout));
        if let Some(ca_file) = &config.ca_file {
            let pem = fs::read(ca_file)?;
            let certificate = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| Error::Tls(format!("{}: {}", ca_file.display(), e)))?;
            builder = builder.add_root_certificate(certificate).https_only(true);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config,
            next_id: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one JSON-RPC call and decode its result.
    pub fn call<T: DeserializeOwned>(&self, method: &str, params: &[Value]) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let request = Request {
            jsonrpc: "1.0",
            method,
            params,
            id,
        };

        let mut builder = self.http.post(&self.config.endpoint).json(&request);
        if let Some(username) = &self.config.username {
            builder = builder.basic_auth(username, self.config.password.as_ref());
        }
        let body = builder.send().map_err(|e| {
            error!(method, "request failed: {}", e);
            Error::Transport(e)
        })?;
        let body = body.bytes()?;

        parse_response(method, &body).inspect_err(|e| {
            error!(method, ?params, "call failed: {}", e);
        })
    }

    pub fn get_chain_info(&self) -> Result<ChainInfo> {
        self.call("getinfo", &[])
    }

    /// Txids currently in the node's mempool.
    pub fn get_raw_mempool(&self) -> Result<Vec<String>> {
        self.call("getrawmempool", &[json!(false)])
    }

    pub fn get_block_hash(&self, height: u64) -> Result<String> {
        self.call("getblockhash", &[json!(height)])
    }

    /// Block summary with transaction hashes only.
    pub fn get_block(&self, hash: &str) -> Result<Block> {
        self.call("getblockabe", &[json!(hash), json!(1)])
    }

    /// Block including its decoded transactions.
    pub fn get_block_with_txs(&self, hash: &str) -> Result<Block> {
        self.call("getblockabe", &[json!(hash), json!(2)])
    }

    /// Serialized block bytes.
    pub fn get_block_bytes(&self, hash: &str) -> Result<Vec<u8>> {
        let hex_block: String = self.call("getblockabe", &[json!(hash), json!(0)])?;
        Ok(hex::decode(hex_block)?)
    }

    /// Serialized transaction bytes.
    pub fn get_tx_bytes(&self, txid: &str) -> Result<Vec<u8>> {
        let hex_tx: String = self.call("getrawtransaction", &[json!(txid), json!(false)])?;
        Ok(hex::decode(hex_tx)?)
    }

    pub fn get_raw_tx(&self, txid: &str) -> Result<Tx> {
        self.call("getrawtransaction", &[json!(txid), json!(true)])
    }

    pub fn get_block_by_height(&self, height: u64) -> Result<Block> {
        let hash = self.get_block_hash(height)?;
        self.get_block(&hash)
    }

    pub fn get_block_bytes_by_height(&self, height: u64) -> Result<Vec<u8>> {
        let hash = self.get_block_hash(height)?;
        self.get_block_bytes(&hash)
    }

    /// The block at `height` in the wallet's chain view.
    pub fn get_chain_block(&self, height: u64) -> Result<ChainBlock> {
        let hash = self.get_block_hash(height)?;
        let block = self.get_block_with_txs(&hash)?;
        debug!(height, txs = block.tx_hashes.len(), "fetched block");
        ChainBlock::try_from(&block)
    }

    /// Broadcast a serialized transaction; returns its txid.
    pub fn send_raw_tx(&self, tx: &[u8]) -> Result<String> {
        self.call("sendrawtransactionabe", &[json!(hex::encode(tx))])
    }
}

impl BlockSource for Client {
    type Error = Error;

    fn block_bytes_by_height(&self, height: u64) -> Result<Vec<u8>> {
        self.get_block_bytes_by_height(height)
    }
}
