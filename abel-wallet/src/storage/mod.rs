//! Storage abstraction for tracked coins, rings and pending transactions.

mod memory;

pub use memory::MemoryCoinStore;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::account::AccountId;
use crate::coin::{Coin, CoinId, CoinRing, CoinStatus};
use crate::error::StorageResult;
use crate::hash_types::{RingId, TxId};

/// Ring linkage computed for one immature coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingResolution {
    pub coin_id: CoinId,
    pub ring_id: RingId,
    pub ring_index: u8,
    pub serial_number: Vec<u8>,
    /// Flip the coin to spendable in the same commit.
    pub mark_spendable: bool,
}

/// Everything learned from one ring-group window, committed as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingResolutionBatch {
    /// Rings every resolution refers to; members are indexed as siblings.
    pub rings: Vec<CoinRing>,
    pub resolutions: Vec<RingResolution>,
}

impl RingResolutionBatch {
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty() && self.resolutions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum PendingTxStatus {
    Pending = 0,
    Confirmed = 1,
    Failed = 2,
}

/// A transaction the wallet submitted and waits to see on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTx {
    pub txid: TxId,
    #[serde(with = "hex::serde")]
    pub raw_tx: Vec<u8>,
    pub spent_coins: Vec<CoinId>,
    pub status: PendingTxStatus,
    pub confirmed_height: Option<u64>,
}

/// Lookups the tracker needs from persistence.
///
/// [`CoinStore::commit_ring_resolution`] must be all-or-nothing: on error no
/// part of the batch is visible.
pub trait CoinStore {
    /// Insert a newly detected coin. Returns `false` if the coin was already tracked.
    fn insert_coin(&mut self, coin: Coin) -> StorageResult<bool>;

    fn coin(&self, coin_id: &CoinId) -> StorageResult<Option<Coin>>;

    fn coins_by_serial_number(&self, serial_number: &[u8]) -> StorageResult<Vec<Coin>>;

    fn coins_by_account(&self, account_id: AccountId, status: Option<CoinStatus>) -> StorageResult<Vec<Coin>>;

    /// Immature coins at or below `max_height` that have no ring yet.
    fn unresolved_coins(&self, max_height: u64) -> StorageResult<Vec<Coin>>;

    /// Immature coinbase coins at or below `max_height`.
    fn immature_coinbase_coins(&self, max_height: u64) -> StorageResult<Vec<Coin>>;

    fn set_coin_status(&mut self, coin_id: &CoinId, status: CoinStatus) -> StorageResult<()>;

    fn ring(&self, ring_id: &RingId) -> StorageResult<Option<CoinRing>>;

    /// Ring a coin (owned or not) is a member of.
    fn ring_id_of(&self, coin_id: &CoinId) -> StorageResult<Option<RingId>>;

    fn commit_ring_resolution(&mut self, batch: RingResolutionBatch) -> StorageResult<()>;

    fn insert_pending_tx(&mut self, tx: PendingTx) -> StorageResult<()>;

    /// Transactions still waiting for confirmation.
    fn pending_txs(&self) -> StorageResult<Vec<PendingTx>>;

    fn set_pending_tx_status(&mut self, txid: &TxId, status: PendingTxStatus, height: Option<u64>) -> StorageResult<()>;
}
