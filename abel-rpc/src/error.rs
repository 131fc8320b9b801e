//! Error types for the chain client

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error object returned by the node inside a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Errors that can occur while talking to a node
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The node answered with an error object
    #[error("RPC error {0}")]
    Rpc(RpcError),

    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A response could not be turned into a wallet type
    #[error("conversion error: {0}")]
    Conversion(String),

    /// The node returned neither a result nor an error
    #[error("empty result for {0}")]
    EmptyResult(String),
}

impl From<RpcError> for Error {
    fn from(e: RpcError) -> Self {
        Error::Rpc(e)
    }
}

impl From<abel_wallet::Error> for Error {
    fn from(e: abel_wallet::Error) -> Self {
        Error::Conversion(e.to_string())
    }
}
