//! Response types of the node's JSON-RPC interface.
//!
//! Hashes travel as hex strings and are only parsed when a response is turned
//! into the wallet's chain view.

use abel_wallet::chain::{ChainBlock, ChainTx, ChainTxIn, NetworkId};
use abel_wallet::coin::CoinId;
use abel_wallet::hash_types::{BlockHash, TxId};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Result of `getinfo`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChainInfo {
    #[serde(rename = "blocks")]
    pub num_blocks: i64,
    #[serde(rename = "testnet", default)]
    pub is_testnet: bool,
    #[serde(default)]
    pub version: i64,
    #[serde(rename = "protocolversion", default)]
    pub protocol_version: i64,
    #[serde(rename = "relayfee", default)]
    pub relay_fee: f64,
    #[serde(rename = "netid", default)]
    pub net_id: u8,
}

impl ChainInfo {
    pub fn network_id(&self) -> Result<NetworkId> {
        Ok(NetworkId::try_from(self.net_id)?)
    }

    /// Height of the chain tip.
    pub fn tip_height(&self) -> Result<u64> {
        u64::try_from(self.num_blocks).map_err(|_| Error::Conversion(format!("negative block count {}", self.num_blocks)))
    }
}

/// Result of `getblockabe` at verbosity 1 or 2.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    pub height: i64,
    pub confirmations: i64,
    pub version: i64,
    #[serde(rename = "versionHex")]
    pub version_hex: String,
    pub time: i64,
    pub nonce: u64,
    pub size: i64,
    #[serde(rename = "fullsize")]
    pub full_size: i64,
    pub difficulty: f64,
    #[serde(rename = "hash")]
    pub block_hash: String,
    #[serde(rename = "previousblockhash")]
    pub prev_block_hash: String,
    #[serde(rename = "nextblockhash")]
    pub next_block_hash: String,
    #[serde(rename = "contenthash")]
    pub content_hash: String,
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,
    pub bits: String,
    #[serde(rename = "sealhash")]
    pub seal_hash: String,
    pub mixdigest: String,
    #[serde(rename = "tx")]
    pub tx_hashes: Vec<String>,
    /// Full transactions; only present at verbosity 2.
    #[serde(rename = "rawTx", skip_serializing_if = "Option::is_none")]
    pub raw_txs: Option<Vec<Tx>>,
}

/// A transaction input: the ring it spends from and its serial number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxVin {
    #[serde(rename = "prevutxoring")]
    pub txo_ring: TxoRing,
    #[serde(rename = "serialnumber")]
    pub serial_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutPoint {
    #[serde(rename = "txid")]
    pub tx_hash: String,
    pub index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxoRing {
    pub version: i64,
    #[serde(rename = "blockhashs")]
    pub block_hashes: Vec<String>,
    #[serde(rename = "outpoints")]
    pub out_points: Vec<OutPoint>,
}

/// A transaction output; `script` is the hex of the serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxVout {
    pub n: i64,
    pub script: String,
}

/// Result of `getrawtransaction` in verbose mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tx {
    pub hex: String,
    #[serde(rename = "txid")]
    pub tx_id: String,
    #[serde(rename = "hash")]
    pub tx_hash: String,
    pub time: i64,
    #[serde(rename = "blockhash")]
    pub block_hash: String,
    #[serde(rename = "blocktime")]
    pub block_time: i64,
    pub confirmations: i64,
    pub version: u32,
    pub size: i64,
    #[serde(rename = "fullsize")]
    pub full_size: i64,
    pub memo: String,
    pub fee: f64,
    pub witness: String,
    pub vin: Vec<TxVin>,
    pub vout: Vec<TxVout>,
}

impl TryFrom<&TxVin> for ChainTxIn {
    type Error = Error;

    fn try_from(vin: &TxVin) -> Result<Self> {
        let ring = vin
            .txo_ring
            .out_points
            .iter()
            .map(|out_point| Ok(CoinId::new(out_point.tx_hash.parse::<TxId>()?, out_point.index)))
            .collect::<Result<Vec<_>>>()?;
        let ring_block_hashes =
            vin.txo_ring.block_hashes.iter().map(|hash| Ok(hash.parse::<BlockHash>()?)).collect::<Result<Vec<_>>>()?;
        Ok(ChainTxIn {
            serial_number: hex::decode(&vin.serial_number)?,
            ring,
            ring_block_hashes,
        })
    }
}

impl TryFrom<&Tx> for ChainTx {
    type Error = Error;

    fn try_from(tx: &Tx) -> Result<Self> {
        let mut vout: Vec<&TxVout> = tx.vout.iter().collect();
        vout.sort_by_key(|out| out.n);
        if let Some((pos, out)) = vout.iter().enumerate().find(|(pos, out)| out.n != *pos as i64) {
            return Err(Error::Conversion(format!("tx {} output {} has index {}", tx.tx_id, pos, out.n)));
        }
        Ok(ChainTx {
            txid: tx.tx_id.parse()?,
            version: tx.version,
            inputs: tx.vin.iter().map(ChainTxIn::try_from).collect::<Result<_>>()?,
            outputs: vout.iter().map(|out| hex::decode(&out.script)).collect::<std::result::Result<_, _>>()?,
        })
    }
}

impl TryFrom<&Block> for ChainBlock {
    type Error = Error;

    /// Needs a block fetched with its transactions (verbosity 2).
    fn try_from(block: &Block) -> Result<Self> {
        let raw_txs = block
            .raw_txs
            .as_ref()
            .ok_or_else(|| Error::Conversion(format!("block {} was fetched without transactions", block.block_hash)))?;
        let height =
            u64::try_from(block.height).map_err(|_| Error::Conversion(format!("negative height {}", block.height)))?;
        let prev_hash = match block.prev_block_hash.as_str() {
            "" => None,
            hash => Some(hash.parse()?),
        };
        Ok(ChainBlock {
            height,
            hash: block.block_hash.parse()?,
            prev_hash,
            txs: raw_txs.iter().map(ChainTx::try_from).collect::<Result<_>>()?,
        })
    }
}
