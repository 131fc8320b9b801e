//! In-memory storage implementation.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{CoinStore, PendingTx, PendingTxStatus, RingResolutionBatch};
use crate::account::AccountId;
use crate::coin::{Coin, CoinId, CoinRing, CoinStatus};
use crate::error::{StorageError, StorageResult};
use crate::hash_types::{RingId, TxId};

/// In-memory coin store.
#[derive(Debug, Default, Clone)]
pub struct MemoryCoinStore {
    coins: BTreeMap<CoinId, Coin>,
    // Reverse index for serial number lookups
    serial_number_index: HashMap<Vec<u8>, Vec<CoinId>>,
    rings: HashMap<RingId, CoinRing>,
    // Ring membership of every candidate output, owned or not
    ring_members: HashMap<CoinId, RingId>,
    pending_txs: BTreeMap<TxId, PendingTx>,
}

impl MemoryCoinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    fn validate_batch(&self, batch: &RingResolutionBatch) -> StorageResult<()> {
        let mut rings: HashMap<RingId, &CoinRing> = batch.rings.iter().map(|ring| (ring.ring_id(), ring)).collect();
        for resolution in &batch.resolutions {
            let coin = self
                .coins
                .get(&resolution.coin_id)
                .ok_or_else(|| StorageError::InconsistentBatch(format!("unknown coin {}", resolution.coin_id)))?;
            if coin.status != CoinStatus::Immature {
                return Err(StorageError::InconsistentBatch(format!(
                    "coin {} is {:?}, not immature",
                    resolution.coin_id, coin.status
                )));
            }
            if resolution.serial_number.is_empty() {
                return Err(StorageError::InconsistentBatch(format!(
                    "empty serial number for coin {}",
                    resolution.coin_id
                )));
            }
            if !rings.contains_key(&resolution.ring_id) {
                let stored = self.rings.get(&resolution.ring_id).ok_or_else(|| {
                    StorageError::InconsistentBatch(format!("ring {} missing from batch", resolution.ring_id))
                })?;
                rings.insert(resolution.ring_id, stored);
            }
            let ring = rings[&resolution.ring_id];
            if ring.index_of(&resolution.coin_id) != Some(resolution.ring_index) {
                return Err(StorageError::InconsistentBatch(format!(
                    "coin {} is not member {} of ring {}",
                    resolution.coin_id, resolution.ring_index, resolution.ring_id
                )));
            }
        }
        Ok(())
    }
}

impl CoinStore for MemoryCoinStore {
    fn insert_coin(&mut self, coin: Coin) -> StorageResult<bool> {
        if self.coins.contains_key(&coin.coin_id) {
            return Ok(false);
        }
        if let Some(sn) = coin.serial_number.clone() {
            self.serial_number_index.entry(sn).or_default().push(coin.coin_id);
        }
        self.coins.insert(coin.coin_id, coin);
        Ok(true)
    }

    fn coin(&self, coin_id: &CoinId) -> StorageResult<Option<Coin>> {
        Ok(self.coins.get(coin_id).cloned())
    }

    fn coins_by_serial_number(&self, serial_number: &[u8]) -> StorageResult<Vec<Coin>> {
        Ok(self
            .serial_number_index
            .get(serial_number)
            .into_iter()
            .flatten()
            .filter_map(|id| self.coins.get(id).cloned())
            .collect())
    }

    fn coins_by_account(&self, account_id: AccountId, status: Option<CoinStatus>) -> StorageResult<Vec<Coin>> {
        Ok(self
            .coins
            .values()
            .filter(|coin| coin.account_id == account_id && status.map_or(true, |s| coin.status == s))
            .cloned()
            .collect())
    }

    fn unresolved_coins(&self, max_height: u64) -> StorageResult<Vec<Coin>> {
        Ok(self
            .coins
            .values()
            .filter(|coin| {
                coin.status == CoinStatus::Immature && coin.ring_id.is_none() && coin.block_height <= max_height
            })
            .cloned()
            .collect())
    }

    fn immature_coinbase_coins(&self, max_height: u64) -> StorageResult<Vec<Coin>> {
        Ok(self
            .coins
            .values()
            .filter(|coin| coin.status == CoinStatus::Immature && coin.is_coinbase && coin.block_height <= max_height)
            .cloned()
            .collect())
    }

    fn set_coin_status(&mut self, coin_id: &CoinId, status: CoinStatus) -> StorageResult<()> {
        let coin = self
            .coins
            .get_mut(coin_id)
            .ok_or_else(|| StorageError::CoinNotFound(coin_id.to_string()))?;
        coin.status = status;
        Ok(())
    }

    fn ring(&self, ring_id: &RingId) -> StorageResult<Option<CoinRing>> {
        Ok(self.rings.get(ring_id).cloned())
    }

    fn ring_id_of(&self, coin_id: &CoinId) -> StorageResult<Option<RingId>> {
        Ok(self.ring_members.get(coin_id).copied())
    }

    fn commit_ring_resolution(&mut self, batch: RingResolutionBatch) -> StorageResult<()> {
        // Nothing below can fail once validation passes.
        self.validate_batch(&batch)?;

        for ring in batch.rings {
            let ring_id = ring.ring_id();
            for coin_id in ring.coin_ids() {
                self.ring_members.insert(*coin_id, ring_id);
            }
            self.rings.entry(ring_id).or_insert(ring);
        }
        for resolution in batch.resolutions {
            if let Some(coin) = self.coins.get_mut(&resolution.coin_id) {
                coin.ring_id = Some(resolution.ring_id);
                coin.ring_index = Some(resolution.ring_index);
                coin.serial_number = Some(resolution.serial_number.clone());
                if resolution.mark_spendable {
                    coin.status = CoinStatus::Spendable;
                }
                self.serial_number_index.entry(resolution.serial_number).or_default().push(resolution.coin_id);
            }
        }
        debug!(rings = self.rings.len(), "committed ring resolution");
        Ok(())
    }

    fn insert_pending_tx(&mut self, tx: PendingTx) -> StorageResult<()> {
        self.pending_txs.insert(tx.txid, tx);
        Ok(())
    }

    fn pending_txs(&self) -> StorageResult<Vec<PendingTx>> {
        Ok(self.pending_txs.values().filter(|tx| tx.status == PendingTxStatus::Pending).cloned().collect())
    }

    fn set_pending_tx_status(&mut self, txid: &TxId, status: PendingTxStatus, height: Option<u64>) -> StorageResult<()> {
        let tx = self
            .pending_txs
            .get_mut(txid)
            .ok_or_else(|| StorageError::TransactionNotFound(txid.to_string()))?;
        tx.status = status;
        tx.confirmed_height = height;
        Ok(())
    }
}
