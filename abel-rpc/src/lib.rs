//! Abel RPC
//!
//! Blocking JSON-RPC client for an Abelian full node, the JSON types of its
//! responses, and their conversion into the chain view consumed by
//! [`abel_wallet::CoinTracker`].

pub mod client;
pub mod error;
pub mod json;

pub use client::{parse_response, Client, ClientConfig, DEFAULT_REQUEST_TIMEOUT};
pub use error::{Error, Result, RpcError};
pub use json::{Block, ChainInfo, OutPoint, Tx, TxVin, TxVout, TxoRing};
