use std::cell::RefCell;

use thiserror::Error;

use super::hash;
use crate::chain::{BlockSource, ChainBlock, ChainTx, ChainTxIn};
use crate::crypto::provider::ProviderResult;
use crate::error::ProviderError;
use crate::hash_types::{BlockHash, TxId};

/// Transaction version stamped on every mock transaction.
pub const MOCK_TX_VERSION: u32 = 1;

/// A transaction to append with [`MockChain::push_block`].
#[derive(Debug, Clone, Default)]
pub struct MockTx {
    pub inputs: Vec<ChainTxIn>,
    pub outputs: Vec<Vec<u8>>,
}

impl MockTx {
    pub fn outputs(outputs: Vec<Vec<u8>>) -> Self {
        Self {
            inputs: Vec::new(),
            outputs,
        }
    }

    pub fn spending(inputs: Vec<ChainTxIn>, outputs: Vec<Vec<u8>>) -> Self {
        Self {
            inputs,
            outputs,
        }
    }
}

#[derive(Debug, Error)]
#[error("no block at height {0}")]
pub struct MissingBlock(pub u64);

/// An in-memory chain starting at height 0.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    blocks: Vec<ChainBlock>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height the next pushed block will get.
    pub fn next_height(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn tip(&self) -> Option<&ChainBlock> {
        self.blocks.last()
    }

    pub fn block(&self, height: u64) -> Option<&ChainBlock> {
        usize::try_from(height).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[ChainBlock] {
        &self.blocks
    }

    /// Append a block whose coinbase pays `coinbase_outputs`, followed by `txs`.
    pub fn push_block(&mut self, coinbase_outputs: Vec<Vec<u8>>, txs: Vec<MockTx>) -> ChainBlock {
        let height = self.next_height();
        let prev_hash = self.tip().map(|block| block.hash);
        let txs = std::iter::once(MockTx::outputs(coinbase_outputs))
            .chain(txs)
            .enumerate()
            .map(|(i, tx)| ChainTx {
                txid: TxId::from_byte_array(hash(b"txid", &[&height.to_le_bytes()[..], &(i as u32).to_le_bytes()[..]])),
                version: MOCK_TX_VERSION,
                inputs: tx.inputs,
                outputs: tx.outputs,
            })
            .collect();
        let prev = prev_hash.map(BlockHash::to_byte_array).unwrap_or_default();
        let block = ChainBlock {
            height,
            hash: BlockHash::from_byte_array(hash(b"block", &[&height.to_le_bytes()[..], &prev[..]])),
            prev_hash,
            txs,
        };
        self.blocks.push(block.clone());
        block
    }

    pub fn push_empty_blocks(&mut self, count: u64) {
        for _ in 0..count {
            self.push_block(Vec::new(), Vec::new());
        }
    }
}

impl BlockSource for MockChain {
    type Error = MissingBlock;

    fn block_bytes_by_height(&self, height: u64) -> Result<Vec<u8>, MissingBlock> {
        self.block(height).map(encode_block).ok_or(MissingBlock(height))
    }
}

/// Wraps a [`BlockSource`] and records every height requested from it.
#[derive(Debug)]
pub struct RecordingSource<'a, B: ?Sized> {
    inner: &'a B,
    requested: RefCell<Vec<u64>>,
}

impl<'a, B: BlockSource + ?Sized> RecordingSource<'a, B> {
    pub fn new(inner: &'a B) -> Self {
        Self {
            inner,
            requested: RefCell::new(Vec::new()),
        }
    }

    /// Heights requested so far, in request order.
    pub fn requested(&self) -> Vec<u64> {
        self.requested.borrow().clone()
    }
}

impl<B: BlockSource + ?Sized> BlockSource for RecordingSource<'_, B> {
    type Error = B::Error;

    fn block_bytes_by_height(&self, height: u64) -> Result<Vec<u8>, B::Error> {
        self.requested.borrow_mut().push(height);
        self.inner.block_bytes_by_height(height)
    }
}

/// Serialize a block in the layout the mock provider reads:
///
/// ```text
/// height(u64 LE) || hash(32) || n_tx(u16 LE)
/// || (txid(32) || n_out(u8) || (len(u32 LE) || txo)*)*
/// ```
///
/// Inputs are not encoded; rings only need outputs.
pub fn encode_block(block: &ChainBlock) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&block.height.to_le_bytes());
    out.extend_from_slice(block.hash.as_bytes());
    out.extend_from_slice(&(block.txs.len() as u16).to_le_bytes());
    for tx in &block.txs {
        out.extend_from_slice(tx.txid.as_bytes());
        out.push(tx.outputs.len() as u8);
        for txo in &tx.outputs {
            out.extend_from_slice(&(txo.len() as u32).to_le_bytes());
            out.extend_from_slice(txo);
        }
    }
    out
}

pub(crate) struct DecodedBlock {
    pub height: u64,
    pub hash: BlockHash,
    pub txs: Vec<(TxId, Vec<Vec<u8>>)>,
}

pub(crate) fn decode_block(data: &[u8]) -> ProviderResult<DecodedBlock> {
    let mut reader = Reader {
        data,
        pos: 0,
    };
    let height = u64::from_le_bytes(reader.array()?);
    let hash = BlockHash::from_byte_array(reader.array()?);
    let tx_count = u16::from_le_bytes(reader.array()?);
    let mut txs = Vec::with_capacity(usize::from(tx_count));
    for _ in 0..tx_count {
        let txid = TxId::from_byte_array(reader.array()?);
        let [out_count] = reader.array()?;
        let mut outputs = Vec::with_capacity(usize::from(out_count));
        for _ in 0..out_count {
            let len = u32::from_le_bytes(reader.array()?) as usize;
            outputs.push(reader.take(len)?.to_vec());
        }
        txs.push((txid, outputs));
    }
    Ok(DecodedBlock {
        height,
        hash,
        txs,
    })
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> ProviderResult<&'a [u8]> {
        let slice = self
            .data
            .get(self.pos..self.pos.saturating_add(len))
            .ok_or_else(|| ProviderError::new(format!("block truncated at byte {}", self.pos)))?;
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> ProviderResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
