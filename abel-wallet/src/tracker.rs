//! Coin tracking
//!
//! The tracker scans blocks for outputs owned by registered view accounts and
//! moves each coin through `Immature -> Spendable -> Spent -> Confirmed`:
//!
//! - a transfer coin becomes spendable when the ring-group window containing it
//!   is complete and its ring, ring index and serial number are committed;
//! - a coinbase coin is ring-resolved the same way but only becomes spendable
//!   once it is `coinbase_maturity` blocks deep;
//! - a coin is spent when a transaction declares its serial number, and
//!   confirmed when that input's ring lists the coin.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::account::{AccountId, ViewAccount};
use crate::chain::{fetch_ring_block_group, BlockSource, ChainBlock, ChainParams, ChainTx};
use crate::coin::{Coin, CoinId, CoinStatus};
use crate::crypto::{RingContext, SchemeProvider};
use crate::error::{Error, ProviderError, Result};
use crate::hash_types::{BlockHash, TxId};
use crate::storage::{CoinStore, PendingTx, PendingTxStatus, RingResolution, RingResolutionBatch};
use crate::tx::SignedRawTx;

/// Coins touched while processing one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockScanReport {
    pub height: u64,
    pub received: Vec<CoinId>,
    pub spent: Vec<CoinId>,
    pub confirmed: Vec<CoinId>,
    pub invalidated: Vec<CoinId>,
    pub ring_resolved: Vec<CoinId>,
    pub matured: Vec<CoinId>,
    pub confirmed_txs: Vec<TxId>,
}

/// Result of spend tracking for one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendReport {
    pub spent: Vec<CoinId>,
    pub confirmed: Vec<CoinId>,
    pub invalidated: Vec<CoinId>,
}

/// Result of maturity handling at one height.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaturityReport {
    pub ring_resolved: Vec<CoinId>,
    pub matured: Vec<CoinId>,
}

/// Tracks coins of registered accounts over a store.
pub struct CoinTracker<S: CoinStore> {
    provider: Arc<dyn SchemeProvider>,
    params: ChainParams,
    store: S,
    accounts: BTreeMap<AccountId, Arc<dyn ViewAccount>>,
}

impl<S: CoinStore> CoinTracker<S> {
    pub fn new(store: S, provider: Arc<dyn SchemeProvider>, params: ChainParams) -> Self {
        Self {
            provider,
            params,
            store,
            accounts: BTreeMap::new(),
        }
    }

    pub fn register_account(&mut self, account_id: AccountId, account: Arc<dyn ViewAccount>) {
        info!(%account_id, kind = ?account.kind(), level = %account.privacy_level(), "registered account");
        self.accounts.insert(account_id, account);
    }

    pub fn remove_account(&mut self, account_id: AccountId) -> Option<Arc<dyn ViewAccount>> {
        self.accounts.remove(&account_id)
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Record every output of `tx` owned by a registered account as an immature coin.
    pub fn scan_transaction(
        &mut self,
        tx: &ChainTx,
        is_coinbase: bool,
        block_hash: BlockHash,
        height: u64,
    ) -> Result<Vec<CoinId>> {
        let mut received = Vec::new();
        for (index, txo) in tx.outputs.iter().enumerate() {
            let index = u8::try_from(index)
                .map_err(|_| Error::InvalidParameter(format!("transaction {} has too many outputs", tx.txid)))?;
            let coin_id = tx.coin_id(index);
            for (account_id, account) in &self.accounts {
                let Some(value) = account.receive_coin(tx.version, txo)? else {
                    continue;
                };
                let coin = Coin {
                    coin_id,
                    account_id: *account_id,
                    block_hash,
                    block_height: height,
                    tx_version: tx.version,
                    txo: txo.clone(),
                    value,
                    is_coinbase,
                    status: CoinStatus::Immature,
                    ring_id: None,
                    ring_index: None,
                    serial_number: None,
                };
                if self.store.insert_coin(coin)? {
                    info!(%coin_id, %account_id, value, height, is_coinbase, "received coin");
                    received.push(coin_id);
                }
                break;
            }
        }
        Ok(received)
    }

    /// Match the inputs of `tx` against tracked serial numbers.
    pub fn track_spends(&mut self, tx: &ChainTx) -> Result<SpendReport> {
        let mut report = SpendReport::default();
        for input in &tx.inputs {
            for coin in self.store.coins_by_serial_number(&input.serial_number)? {
                let mut status = coin.status;
                if status == CoinStatus::Spendable {
                    self.store.set_coin_status(&coin.coin_id, CoinStatus::Spent)?;
                    status = CoinStatus::Spent;
                    report.spent.push(coin.coin_id);
                }
                if status != CoinStatus::Spent {
                    debug!(coin_id = %coin.coin_id, ?status, txid = %tx.txid, "serial number seen for coin not awaiting confirmation");
                    continue;
                }
                if input.ring.contains(&coin.coin_id) {
                    self.store.set_coin_status(&coin.coin_id, CoinStatus::Confirmed)?;
                    info!(coin_id = %coin.coin_id, txid = %tx.txid, "spend confirmed");
                    report.confirmed.push(coin.coin_id);
                } else {
                    warn!(coin_id = %coin.coin_id, txid = %tx.txid, "serial number matched but ring does not list the coin");
                    self.store.set_coin_status(&coin.coin_id, CoinStatus::Invalid)?;
                    report.invalidated.push(coin.coin_id);
                }
            }
        }
        Ok(report)
    }

    /// Mark coins spent by a transaction this wallet broadcast.
    ///
    /// Either every coin moves to spent or none does.
    pub fn mark_coins_spent(&mut self, coin_ids: &[CoinId]) -> Result<()> {
        for coin_id in coin_ids {
            let coin = self
                .store
                .coin(coin_id)?
                .ok_or_else(|| Error::InvalidParameter(format!("unknown coin {}", coin_id)))?;
            if !coin.status.can_transition_to(CoinStatus::Spent) {
                return Err(Error::InvalidStateTransition {
                    coin: *coin_id,
                    from: coin.status,
                    to: CoinStatus::Spent,
                });
            }
        }
        for coin_id in coin_ids {
            self.store.set_coin_status(coin_id, CoinStatus::Spent)?;
        }
        Ok(())
    }

    /// Remember a submitted transaction and mark the coins it spends.
    pub fn record_submitted_tx(&mut self, tx: &SignedRawTx, spent_coins: &[CoinId]) -> Result<()> {
        self.mark_coins_spent(spent_coins)?;
        self.store.insert_pending_tx(PendingTx {
            txid: tx.txid,
            raw_tx: tx.data.clone(),
            spent_coins: spent_coins.to_vec(),
            status: PendingTxStatus::Pending,
            confirmed_height: None,
        })?;
        info!(txid = %tx.txid, inputs = spent_coins.len(), "recorded submitted transaction");
        Ok(())
    }

    /// Confirm pending transactions included in `block`.
    pub fn track_pending_txs(&mut self, block: &ChainBlock) -> Result<Vec<TxId>> {
        let pending = self.store.pending_txs()?;
        if pending.is_empty() {
            return Ok(Vec::new());
        }
        let included: HashSet<TxId> = block.txs.iter().map(|tx| tx.txid).collect();
        let mut confirmed = Vec::new();
        for tx in pending.into_iter().filter(|tx| included.contains(&tx.txid)) {
            self.store.set_pending_tx_status(&tx.txid, PendingTxStatus::Confirmed, Some(block.height))?;
            info!(txid = %tx.txid, height = block.height, "pending transaction included");
            confirmed.push(tx.txid);
        }
        Ok(confirmed)
    }

    /// Resolve rings at the end of a ring-group window and mature coinbase coins.
    pub fn handle_maturity<B: BlockSource + ?Sized>(&mut self, height: u64, source: &B) -> Result<MaturityReport> {
        let mut report = MaturityReport::default();
        if self.params.is_ring_group_end(height) {
            let resolved = self.resolve_ring_group(height, source)?;
            for (coin_id, is_coinbase) in resolved {
                if !is_coinbase {
                    report.matured.push(coin_id);
                }
                report.ring_resolved.push(coin_id);
            }
        }

        if let Some(max_height) = self.params.mature_coinbase_height(height) {
            for coin in self.store.immature_coinbase_coins(max_height)? {
                if !coin.is_ring_resolved() {
                    warn!(coin_id = %coin.coin_id, height = coin.block_height, "coinbase coin deep enough but ring unresolved");
                    continue;
                }
                self.store.set_coin_status(&coin.coin_id, CoinStatus::Spendable)?;
                info!(coin_id = %coin.coin_id, height, "coinbase coin matured");
                report.matured.push(coin.coin_id);
            }
        }
        Ok(report)
    }

    /// Build the rings of the window ending at `height` and commit ring linkage for
    /// every unresolved coin inside it.
    ///
    /// Coins of accounts that are no longer registered are skipped and stay
    /// unresolved. Any other failure aborts the whole window; nothing is committed.
    pub fn resolve_ring_group<B: BlockSource + ?Sized>(
        &mut self,
        height: u64,
        source: &B,
    ) -> Result<Vec<(CoinId, bool)>> {
        let start = self.params.ring_group_start(height);
        let (pending, stale): (Vec<Coin>, Vec<Coin>) =
            self.store.unresolved_coins(height)?.into_iter().partition(|coin| coin.block_height >= start);
        for coin in &stale {
            warn!(coin_id = %coin.coin_id, height = coin.block_height, "coin from an earlier ring group is still unresolved");
        }
        let (pending, orphaned): (Vec<Coin>, Vec<Coin>) =
            pending.into_iter().partition(|coin| self.accounts.contains_key(&coin.account_id));
        for coin in &orphaned {
            warn!(coin_id = %coin.coin_id, account_id = %coin.account_id, "skipping coin of unregistered account");
        }
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let blocks = fetch_ring_block_group(source, &self.params, height)?;
        let rings = self.provider.build_rings_from_blocks(&blocks)?;
        debug!(height, blocks = blocks.len(), rings = rings.len(), "built ring group");

        let mut ring_by_coin: HashMap<CoinId, usize> = HashMap::new();
        for (i, ring) in rings.iter().enumerate() {
            for coin_id in ring.coin_ids() {
                ring_by_coin.insert(*coin_id, i);
            }
        }

        let mut used_rings = BTreeSet::new();
        let mut resolutions = Vec::with_capacity(pending.len());
        for coin in &pending {
            let ring_pos = *ring_by_coin.get(&coin.coin_id).ok_or(Error::RingNotFound(coin.coin_id))?;
            let ring = &rings[ring_pos];
            let ring_index = ring.index_of(&coin.coin_id).ok_or(Error::RingNotFound(coin.coin_id))?;
            let account = self.accounts.get(&coin.account_id).ok_or(Error::UnknownAccount(coin.account_id))?;

            let serialized = ring.serialize();
            let serial_number = account
                .generate_serial_numbers(&[coin.coin_id], RingContext::SerializedRing(&serialized))?
                .into_iter()
                .next()
                .filter(|sn| !sn.is_empty())
                .ok_or_else(|| ProviderError::new(format!("no serial number for coin {}", coin.coin_id)))?;

            used_rings.insert(ring_pos);
            resolutions.push(RingResolution {
                coin_id: coin.coin_id,
                ring_id: ring.ring_id(),
                ring_index,
                serial_number,
                mark_spendable: !coin.is_coinbase,
            });
        }

        let resolved = pending.iter().map(|coin| (coin.coin_id, coin.is_coinbase)).collect();
        let batch = RingResolutionBatch {
            rings: used_rings.iter().map(|&i| rings[i].clone()).collect(),
            resolutions,
        };
        self.store.commit_ring_resolution(batch)?;
        info!(height, coins = pending.len(), "resolved ring group");
        Ok(resolved)
    }

    /// Scan outputs, track spends and pending transactions, then handle maturity.
    pub fn process_block<B: BlockSource + ?Sized>(&mut self, block: &ChainBlock, source: &B) -> Result<BlockScanReport> {
        let mut report = BlockScanReport {
            height: block.height,
            ..Default::default()
        };
        for (i, tx) in block.txs.iter().enumerate() {
            let is_coinbase = i == 0;
            report.received.extend(self.scan_transaction(tx, is_coinbase, block.hash, block.height)?);
            if !is_coinbase {
                let spends = self.track_spends(tx)?;
                report.spent.extend(spends.spent);
                report.confirmed.extend(spends.confirmed);
                report.invalidated.extend(spends.invalidated);
            }
        }
        report.confirmed_txs = self.track_pending_txs(block)?;

        let maturity = self.handle_maturity(block.height, source)?;
        report.ring_resolved = maturity.ring_resolved;
        report.matured = maturity.matured;
        debug!(height = block.height, received = report.received.len(), matured = report.matured.len(), "processed block");
        Ok(report)
    }

    pub fn spendable_coins(&self, account_id: AccountId) -> Result<Vec<Coin>> {
        Ok(self.store.coins_by_account(account_id, Some(CoinStatus::Spendable))?)
    }

    pub fn balance(&self, account_id: AccountId) -> Result<u64> {
        Ok(self.spendable_coins(account_id)?.iter().map(|coin| coin.value).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountPrivacyLevel, SpendAccount};
    use crate::chain::ChainTxIn;
    use crate::crypto::PrivacyLevel;
    use crate::storage::MemoryCoinStore;
    use crate::test_utils::{mock_txo, MockChain, MockSchemeProvider, MockTx, RecordingSource};
    use assert_matches::assert_matches;

    const OWNER: AccountId = AccountId(1);

    struct Fixture {
        provider: Arc<MockSchemeProvider>,
        account: Account,
        tracker: CoinTracker<MemoryCoinStore>,
        chain: MockChain,
    }

    impl Fixture {
        fn new(level: AccountPrivacyLevel) -> Self {
            let provider = Arc::new(MockSchemeProvider::new());
            let (account, _) = Account::new(level, provider.clone()).unwrap();
            let mut tracker = CoinTracker::new(MemoryCoinStore::new(), provider.clone(), ChainParams::default());
            tracker.register_account(OWNER, account.view_account());
            Self {
                provider,
                account,
                tracker,
                chain: MockChain::new(),
            }
        }

        fn pay(&self, value: u64) -> Vec<u8> {
            let address = self.account.generate_address().unwrap();
            mock_txo(address.privacy_level(), address.coin_address().as_bytes(), value)
        }

        fn stranger(&self) -> Vec<u8> {
            let bytes = self.provider.random_crypto_address(PrivacyLevel::RingCt);
            let (_, coin) = self.provider.split_crypto_address(&bytes).unwrap();
            mock_txo(PrivacyLevel::RingCt, &coin, 5)
        }

        fn mine(&mut self, coinbase: Vec<Vec<u8>>, txs: Vec<MockTx>) -> Result<BlockScanReport> {
            let block = self.chain.push_block(coinbase, txs);
            self.tracker.process_block(&block, &self.chain)
        }

        fn mine_empty(&mut self) -> BlockScanReport {
            self.mine(Vec::new(), Vec::new()).unwrap()
        }

        fn coin(&self, coin_id: &CoinId) -> Coin {
            self.tracker.store().coin(coin_id).unwrap().unwrap()
        }

        fn spend_input(&self, coin: &Coin) -> ChainTxIn {
            let ring = self.tracker.store().ring(&coin.ring_id.unwrap()).unwrap().unwrap();
            ChainTxIn {
                serial_number: coin.serial_number.clone().unwrap(),
                ring: ring.coin_ids().to_vec(),
                ring_block_hashes: ring.id_ring().block_hashes.clone(),
            }
        }
    }

    #[test]
    fn transfer_coin_becomes_spendable_at_ring_group_end() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        let paid = vec![fx.stranger(), fx.pay(1_000), fx.stranger()];
        let report = fx.mine(Vec::new(), vec![MockTx::outputs(paid)]).unwrap();
        assert_eq!(report.received.len(), 1);
        let coin_id = report.received[0];
        assert_eq!(coin_id.index, 1);
        assert_eq!(fx.coin(&coin_id).status, CoinStatus::Immature);

        assert!(fx.mine_empty().ring_resolved.is_empty());
        let report = fx.mine_empty();
        assert_eq!(report.ring_resolved, vec![coin_id]);
        assert_eq!(report.matured, vec![coin_id]);

        let coin = fx.coin(&coin_id);
        assert_eq!(coin.status, CoinStatus::Spendable);
        assert!(coin.is_ring_resolved());
        assert_eq!(coin.value, 1_000);
        let ring = fx.tracker.store().ring(&coin.ring_id.unwrap()).unwrap().unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.index_of(&coin_id), coin.ring_index);
        assert_eq!(fx.tracker.balance(OWNER).unwrap(), 1_000);
    }

    #[test]
    fn coinbase_matures_after_maturity_window() {
        let mut fx = Fixture::new(AccountPrivacyLevel::Pseudonym);
        let coinbase = fx.pay(50);
        let report = fx.mine(vec![coinbase], Vec::new()).unwrap();
        let coin_id = report.received[0];
        assert!(fx.coin(&coin_id).is_coinbase);

        fx.mine_empty();
        let report = fx.mine_empty();
        assert_eq!(report.ring_resolved, vec![coin_id]);
        assert!(report.matured.is_empty());
        assert!(fx.coin(&coin_id).is_ring_resolved());

        while fx.chain.next_height() < 200 {
            fx.mine_empty();
        }
        assert_eq!(fx.coin(&coin_id).status, CoinStatus::Immature);

        let report = fx.mine_empty();
        assert_eq!(report.height, 200);
        assert_eq!(report.matured, vec![coin_id]);
        assert_eq!(fx.coin(&coin_id).status, CoinStatus::Spendable);
    }

    #[test]
    fn spend_is_confirmed_when_ring_lists_coin() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        let coin_id = fx.mine(Vec::new(), vec![MockTx::outputs(vec![fx.pay(10)])]).unwrap().received[0];
        fx.mine_empty();
        fx.mine_empty();

        let input = fx.spend_input(&fx.coin(&coin_id));
        let report = fx.mine(Vec::new(), vec![MockTx::spending(vec![input], vec![fx.stranger()])]).unwrap();
        assert_eq!(report.spent, vec![coin_id]);
        assert_eq!(report.confirmed, vec![coin_id]);
        assert_eq!(fx.coin(&coin_id).status, CoinStatus::Confirmed);
        assert_eq!(fx.tracker.balance(OWNER).unwrap(), 0);
    }

    #[test]
    fn serial_number_outside_declared_ring_invalidates() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        let coin_id = fx.mine(Vec::new(), vec![MockTx::outputs(vec![fx.pay(10)])]).unwrap().received[0];
        fx.mine_empty();
        fx.mine_empty();

        let mut input = fx.spend_input(&fx.coin(&coin_id));
        input.ring.retain(|id| *id != coin_id);
        let report = fx.mine(Vec::new(), vec![MockTx::spending(vec![input], Vec::new())]).unwrap();
        assert_eq!(report.invalidated, vec![coin_id]);
        assert_eq!(fx.coin(&coin_id).status, CoinStatus::Invalid);
    }

    #[test]
    fn submitted_transaction_is_confirmed_on_inclusion() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        let coin_id = fx.mine(Vec::new(), vec![MockTx::outputs(vec![fx.pay(10)])]).unwrap().received[0];
        fx.mine_empty();
        fx.mine_empty();

        let input = fx.spend_input(&fx.coin(&coin_id));
        let block = fx.chain.push_block(Vec::new(), vec![MockTx::spending(vec![input], Vec::new())]);
        let signed = SignedRawTx {
            data: vec![1, 2, 3],
            txid: block.txs[1].txid,
        };
        fx.tracker.record_submitted_tx(&signed, &[coin_id]).unwrap();
        assert_eq!(fx.coin(&coin_id).status, CoinStatus::Spent);
        assert_eq!(fx.tracker.store().pending_txs().unwrap().len(), 1);

        let report = fx.tracker.process_block(&block, &fx.chain).unwrap();
        assert_eq!(report.confirmed_txs, vec![signed.txid]);
        assert!(report.spent.is_empty());
        assert_eq!(report.confirmed, vec![coin_id]);
        assert!(fx.tracker.store().pending_txs().unwrap().is_empty());
    }

    #[test]
    fn immature_coin_cannot_be_marked_spent() {
        let mut fx = Fixture::new(AccountPrivacyLevel::Pseudonym);
        let coin_id = fx.mine(Vec::new(), vec![MockTx::outputs(vec![fx.pay(10)])]).unwrap().received[0];
        assert_matches!(
            fx.tracker.mark_coins_spent(&[coin_id]),
            Err(Error::InvalidStateTransition {
                from: CoinStatus::Immature,
                to: CoinStatus::Spent,
                ..
            })
        );
        assert_matches!(fx.tracker.mark_coins_spent(&[CoinId::new(TxId::default(), 0)]), Err(Error::InvalidParameter(_)));
    }

    #[test]
    fn failed_serial_numbers_commit_nothing() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        let outputs = vec![fx.pay(1), fx.pay(2)];
        let received = fx.mine(Vec::new(), vec![MockTx::outputs(outputs)]).unwrap().received;
        assert_eq!(received.len(), 2);
        fx.mine_empty();

        fx.provider.set_fail_serial_numbers(true);
        assert_matches!(fx.mine(Vec::new(), Vec::new()), Err(Error::Provider(_)));
        for coin_id in &received {
            let coin = fx.coin(coin_id);
            assert_eq!(coin.status, CoinStatus::Immature);
            assert!(coin.ring_id.is_none());
        }
        assert_eq!(fx.tracker.store().ring_count(), 0);

        fx.provider.set_fail_serial_numbers(false);
        let report = fx.tracker.handle_maturity(2, &fx.chain).unwrap();
        assert_eq!(report.matured.len(), 2);
        assert!(received.iter().all(|id| fx.coin(id).status == CoinStatus::Spendable));
    }

    #[test]
    fn coin_received_at_group_end_resolves_in_same_block() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        fx.chain.push_empty_blocks(5);
        assert_eq!(fx.chain.next_height(), 5);

        let block = fx.chain.push_block(Vec::new(), vec![MockTx::outputs(vec![fx.stranger(), fx.pay(7)])]);
        assert_eq!(block.height % 3, 2);
        let source = RecordingSource::new(&fx.chain);
        let report = fx.tracker.process_block(&block, &source).unwrap();

        assert_eq!(report.received.len(), 1);
        assert_eq!(report.ring_resolved, report.received);
        assert_eq!(report.matured, report.received);
        assert_eq!(source.requested(), vec![3, 4, 5]);
        assert_eq!(fx.tracker.balance(OWNER).unwrap(), 7);
    }

    #[test]
    fn ring_group_fetches_nothing_without_pending_coins() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        fx.mine_empty();
        let block = fx.chain.push_block(Vec::new(), vec![MockTx::outputs(vec![fx.stranger()])]);
        fx.tracker.process_block(&block, &fx.chain).unwrap();
        let block = fx.chain.push_block(Vec::new(), Vec::new());
        let source = RecordingSource::new(&fx.chain);
        assert!(fx.tracker.process_block(&block, &source).unwrap().ring_resolved.is_empty());
        assert!(source.requested().is_empty());
    }

    #[test]
    fn removed_account_does_not_block_ring_group() {
        const OTHER: AccountId = AccountId(2);
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        let (other, _) = Account::new(AccountPrivacyLevel::FullPrivacy, fx.provider.clone()).unwrap();
        fx.tracker.register_account(OTHER, other.view_account());
        let address = other.generate_address().unwrap();
        let other_txo = mock_txo(address.privacy_level(), address.coin_address().as_bytes(), 30);

        let received = fx.mine(Vec::new(), vec![MockTx::outputs(vec![fx.pay(10), other_txo])]).unwrap().received;
        assert_eq!(received.len(), 2);
        let (owner_coin, other_coin) = (received[0], received[1]);
        assert_eq!(fx.coin(&other_coin).account_id, OTHER);

        assert!(fx.tracker.remove_account(OWNER).is_some());
        fx.mine_empty();
        let report = fx.mine(Vec::new(), Vec::new()).unwrap();
        assert_eq!(report.ring_resolved, vec![other_coin]);
        assert_eq!(fx.tracker.balance(OTHER).unwrap(), 30);

        let coin = fx.coin(&owner_coin);
        assert_eq!(coin.status, CoinStatus::Immature);
        assert!(coin.ring_id.is_none());

        fx.tracker.register_account(OWNER, fx.account.view_account());
        let resolved = fx.tracker.resolve_ring_group(2, &fx.chain).unwrap();
        assert_eq!(resolved, vec![(owner_coin, false)]);
        assert_eq!(fx.tracker.balance(OWNER).unwrap(), 10);
    }

    #[test]
    fn coins_of_unregistered_accounts_are_ignored() {
        let mut fx = Fixture::new(AccountPrivacyLevel::FullPrivacy);
        assert!(fx.tracker.remove_account(OWNER).is_some());
        let report = fx.mine(Vec::new(), vec![MockTx::outputs(vec![fx.pay(10)])]).unwrap();
        assert!(report.received.is_empty());
        assert_eq!(fx.tracker.store().coin_count(), 0);
    }
}
