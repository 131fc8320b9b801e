//! Coins owned by wallet accounts and the rings they are spent from.

mod ring;

pub use ring::{CoinIdRing, CoinRing, COIN_RING_VERSION};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::account::AccountId;
use crate::hash_types::{BlockHash, RingId, TxId};

/// Identifies one transaction output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoinId {
    pub txid: TxId,
    pub index: u8,
}

impl CoinId {
    pub fn new(txid: TxId, index: u8) -> Self {
        Self {
            txid,
            index,
        }
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

impl fmt::Debug for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoinId({})", self)
    }
}

/// Lifecycle of a tracked coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum CoinStatus {
    Immature = 0,
    Spendable = 1,
    Spent = 2,
    Confirmed = 3,
    Invalid = 4,
}

impl CoinStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CoinStatus::Confirmed | CoinStatus::Invalid)
    }

    pub fn can_transition_to(self, next: CoinStatus) -> bool {
        use CoinStatus::*;
        matches!(
            (self, next),
            (Immature, Spendable) | (Spendable, Spent) | (Spent, Confirmed)
        ) || (next == Invalid && !self.is_terminal())
    }
}

/// A coin detected for one of the wallet's accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub coin_id: CoinId,
    pub account_id: AccountId,
    pub block_hash: BlockHash,
    pub block_height: u64,
    pub tx_version: u32,
    /// Serialized output.
    #[serde(with = "hex::serde")]
    pub txo: Vec<u8>,
    pub value: u64,
    pub is_coinbase: bool,
    pub status: CoinStatus,
    pub ring_id: Option<RingId>,
    pub ring_index: Option<u8>,
    pub serial_number: Option<Vec<u8>>,
}

impl Coin {
    pub fn is_ring_resolved(&self) -> bool {
        self.ring_id.is_some() && self.ring_index.is_some() && self.serial_number.as_ref().is_some_and(|sn| !sn.is_empty())
    }
}
