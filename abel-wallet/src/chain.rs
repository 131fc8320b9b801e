//! Chain parameters and the read-only view of chain data the tracker consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::coin::CoinId;
use crate::error::{Error, Result};
use crate::hash_types::{BlockHash, TxId};

/// Blocks a coinbase output must wait before it can be spent.
pub const COINBASE_MATURITY: u64 = 200;

/// Consecutive blocks whose outputs are grouped into rings.
pub const BLOCK_NUM_PER_RING_GROUP: u8 = 3;

/// Maximum number of members in a ring.
pub const TXO_RING_SIZE: u8 = 7;

/// Neutrino per ABEL.
pub const NEUTRINO_PER_ABEL: i64 = 10_000_000;

/// Flat fee estimate, in Neutrino.
pub const ESTIMATED_TX_FEE: u64 = 1_000_000;

/// Network identifier, carried in the low four bits of address prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NetworkId {
    MainNet = 0,
    RegressionNet = 1,
    TestNet = 2,
    SimNet = 3,
}

impl NetworkId {
    pub fn name(self) -> &'static str {
        match self {
            NetworkId::MainNet => "mainnet",
            NetworkId::RegressionNet => "regressionnet",
            NetworkId::TestNet => "testnet",
            NetworkId::SimNet => "simnet",
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(NetworkId::MainNet),
            1 => Ok(NetworkId::RegressionNet),
            2 => Ok(NetworkId::TestNet),
            3 => Ok(NetworkId::SimNet),
            other => Err(Error::InvalidParameter(format!("unknown network id {}", other))),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet" => Ok(NetworkId::MainNet),
            "regressionnet" | "regtest" => Ok(NetworkId::RegressionNet),
            "testnet" => Ok(NetworkId::TestNet),
            "simnet" => Ok(NetworkId::SimNet),
            _ => Err(Error::InvalidParameter(format!("unknown network name {}", s))),
        }
    }
}

/// Consensus constants the tracker depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    pub coinbase_maturity: u64,
    pub block_num_per_ring_group: u8,
    pub txo_ring_size: u8,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            coinbase_maturity: COINBASE_MATURITY,
            block_num_per_ring_group: BLOCK_NUM_PER_RING_GROUP,
            txo_ring_size: TXO_RING_SIZE,
        }
    }
}

impl ChainParams {
    pub fn validate(&self) -> Result<()> {
        if self.coinbase_maturity == 0 {
            return Err(Error::Config("coinbase_maturity must be > 0".into()));
        }
        if self.block_num_per_ring_group == 0 {
            return Err(Error::Config("block_num_per_ring_group must be > 0".into()));
        }
        if self.txo_ring_size == 0 {
            return Err(Error::Config("txo_ring_size must be > 0".into()));
        }
        Ok(())
    }

    /// First height of the ring-group window containing `height`.
    pub fn ring_group_start(&self, height: u64) -> u64 {
        let n = u64::from(self.block_num_per_ring_group.max(1));
        height - height % n
    }

    /// Heights of the ring-group window containing `height`, ascending.
    pub fn ring_block_heights(&self, height: u64) -> Vec<u64> {
        let start = self.ring_group_start(height);
        (start..start + u64::from(self.block_num_per_ring_group.max(1))).collect()
    }

    /// Whether `height` is the last block of its ring-group window.
    pub fn is_ring_group_end(&self, height: u64) -> bool {
        let n = u64::from(self.block_num_per_ring_group.max(1));
        height % n == n - 1
    }

    /// Highest coinbase height that is mature at `current_height`.
    pub fn mature_coinbase_height(&self, current_height: u64) -> Option<u64> {
        current_height.checked_sub(self.coinbase_maturity)
    }
}

/// Neutrino to ABEL.
pub fn neutrino_to_abel(neutrino: i64) -> f64 {
    neutrino as f64 / NEUTRINO_PER_ABEL as f64
}

/// ABEL to Neutrino, rounded to the nearest unit.
pub fn abel_to_neutrino(abel: f64) -> i64 {
    (abel * NEUTRINO_PER_ABEL as f64).round() as i64
}

/// Fee to attach to a transaction; the node accepts a flat fee.
pub fn estimate_tx_fee() -> u64 {
    ESTIMATED_TX_FEE
}

/// A transaction input as seen on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTxIn {
    pub serial_number: Vec<u8>,
    /// Ring members the input declares it spends from.
    pub ring: Vec<CoinId>,
    pub ring_block_hashes: Vec<BlockHash>,
}

/// A transaction as seen on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTx {
    pub txid: TxId,
    pub version: u32,
    pub inputs: Vec<ChainTxIn>,
    /// Serialized outputs, by index.
    pub outputs: Vec<Vec<u8>>,
}

impl ChainTx {
    pub fn coin_id(&self, index: u8) -> CoinId {
        CoinId::new(self.txid, index)
    }
}

/// A block as seen on chain. The first transaction is the coinbase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    pub height: u64,
    pub hash: BlockHash,
    pub prev_hash: Option<BlockHash>,
    pub txs: Vec<ChainTx>,
}

/// Source of serialized blocks for ring construction.
pub trait BlockSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn block_bytes_by_height(&self, height: u64) -> std::result::Result<Vec<u8>, Self::Error>;
}

/// Fetch every block of the ring-group window containing `height`.
pub fn fetch_ring_block_group<B: BlockSource + ?Sized>(
    source: &B,
    params: &ChainParams,
    height: u64,
) -> Result<Vec<Vec<u8>>> {
    params
        .ring_block_heights(height)
        .into_iter()
        .map(|h| {
            source.block_bytes_by_height(h).map_err(|e| {
                Error::Provider(crate::error::ProviderError::with_source(
                    format!("block at height {} unavailable", h),
                    e,
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_window() {
        let params = ChainParams::default();
        assert_eq!(params.ring_block_heights(0), vec![0, 1, 2]);
        assert_eq!(params.ring_block_heights(5), vec![3, 4, 5]);
        assert_eq!(params.ring_block_heights(302), vec![300, 301, 302]);
        assert!(params.is_ring_group_end(2));
        assert!(params.is_ring_group_end(302));
        assert!(!params.is_ring_group_end(300));
    }

    #[test]
    fn coinbase_maturity_height() {
        let params = ChainParams::default();
        assert_eq!(params.mature_coinbase_height(199), None);
        assert_eq!(params.mature_coinbase_height(200), Some(0));
        assert_eq!(params.mature_coinbase_height(350), Some(150));
    }

    #[test]
    fn amounts() {
        assert_eq!(abel_to_neutrino(1.5), 15_000_000);
        assert_eq!(neutrino_to_abel(25_000_000), 2.5);
        assert_eq!(estimate_tx_fee(), 1_000_000);
    }

    #[test]
    fn network_names() {
        for id in [NetworkId::MainNet, NetworkId::RegressionNet, NetworkId::TestNet, NetworkId::SimNet] {
            assert_eq!(id.name().parse::<NetworkId>().unwrap(), id);
            assert_eq!(NetworkId::try_from(id.as_u8()).unwrap(), id);
        }
        assert!(NetworkId::try_from(4).is_err());
        assert_eq!(serde_json::to_string(&NetworkId::TestNet).unwrap(), "2");
    }

    #[test]
    fn invalid_params() {
        let params = ChainParams {
            block_num_per_ring_group: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(ChainParams::default().validate().is_ok());
    }
}
