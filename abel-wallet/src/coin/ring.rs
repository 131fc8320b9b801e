use crate::coin::CoinId;
use crate::error::{Error, Result};
use crate::hash_types::{sha256, BlockHash, RingId, TxId};

/// Version written at the head of every serialized ring.
pub const COIN_RING_VERSION: u32 = 1;

/// The members of one ring and the window of blocks they were drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinIdRing {
    pub version: u32,
    /// Height of the first block of the window.
    pub ring_block_height: u64,
    pub block_hashes: Vec<BlockHash>,
    pub coin_ids: Vec<CoinId>,
}

impl CoinIdRing {
    pub fn index_of(&self, coin_id: &CoinId) -> Option<u8> {
        self.coin_ids.iter().position(|id| id == coin_id).and_then(|i| u8::try_from(i).ok())
    }

    pub fn contains(&self, coin_id: &CoinId) -> bool {
        self.coin_ids.contains(coin_id)
    }
}

/// A ring together with the serialized outputs of its members.
///
/// Canonical serialization:
///
/// ```text
/// version(u32 LE) || ring_block_height(u64 LE) || is_coinbase(u8)
/// || n_blocks(u8) || block_hash(32)*
/// || n_members(u8) || (txid(32) || index(u8) || txo_len(u32 LE) || txo)*
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRing {
    id_ring: CoinIdRing,
    txos: Vec<Vec<u8>>,
    is_coinbase: bool,
}

impl CoinRing {
    pub fn new(id_ring: CoinIdRing, txos: Vec<Vec<u8>>, is_coinbase: bool) -> Result<Self> {
        if id_ring.coin_ids.is_empty() {
            return Err(Error::InvalidParameter("ring has no members".into()));
        }
        if id_ring.coin_ids.len() != txos.len() {
            return Err(Error::InvalidParameter(format!(
                "ring has {} members but {} outputs",
                id_ring.coin_ids.len(),
                txos.len()
            )));
        }
        if id_ring.coin_ids.len() > usize::from(u8::MAX) || id_ring.block_hashes.len() > usize::from(u8::MAX) {
            return Err(Error::InvalidParameter("ring too large".into()));
        }
        if txos.iter().any(|txo| u32::try_from(txo.len()).is_err()) {
            return Err(Error::InvalidParameter("ring member output too large".into()));
        }
        Ok(Self {
            id_ring,
            txos,
            is_coinbase,
        })
    }

    pub fn id_ring(&self) -> &CoinIdRing {
        &self.id_ring
    }

    pub fn coin_ids(&self) -> &[CoinId] {
        &self.id_ring.coin_ids
    }

    pub fn txos(&self) -> &[Vec<u8>] {
        &self.txos
    }

    pub fn is_coinbase(&self) -> bool {
        self.is_coinbase
    }

    pub fn len(&self) -> usize {
        self.txos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txos.is_empty()
    }

    pub fn index_of(&self, coin_id: &CoinId) -> Option<u8> {
        self.id_ring.index_of(coin_id)
    }

    /// Members paired with their serialized outputs, in ring order.
    pub fn members(&self) -> impl Iterator<Item = (&CoinId, &[u8])> {
        self.id_ring.coin_ids.iter().zip(self.txos.iter().map(Vec::as_slice))
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.id_ring.version.to_le_bytes());
        out.extend_from_slice(&self.id_ring.ring_block_height.to_le_bytes());
        out.push(u8::from(self.is_coinbase));
        // Counts were bounded in `new`.
        out.push(self.id_ring.block_hashes.len() as u8);
        for hash in &self.id_ring.block_hashes {
            out.extend_from_slice(hash.as_bytes());
        }
        out.push(self.id_ring.coin_ids.len() as u8);
        for (coin_id, txo) in self.members() {
            out.extend_from_slice(coin_id.txid.as_bytes());
            out.push(coin_id.index);
            out.extend_from_slice(&(txo.len() as u32).to_le_bytes());
            out.extend_from_slice(txo);
        }
        out
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut reader = Reader {
            data,
            pos: 0,
        };
        let version = u32::from_le_bytes(reader.array()?);
        let ring_block_height = u64::from_le_bytes(reader.array()?);
        let is_coinbase = match reader.byte()? {
            0 => false,
            1 => true,
            other => return Err(Error::InvalidParameter(format!("invalid coinbase flag {}", other))),
        };
        let block_count = reader.byte()?;
        let block_hashes = (0..block_count)
            .map(|_| reader.array().map(BlockHash::from_byte_array))
            .collect::<Result<Vec<_>>>()?;
        let member_count = reader.byte()?;
        let mut coin_ids = Vec::with_capacity(usize::from(member_count));
        let mut txos = Vec::with_capacity(usize::from(member_count));
        for _ in 0..member_count {
            let txid = TxId::from_byte_array(reader.array()?);
            let index = reader.byte()?;
            let len = u32::from_le_bytes(reader.array()?) as usize;
            coin_ids.push(CoinId::new(txid, index));
            txos.push(reader.take(len)?.to_vec());
        }
        if reader.pos != data.len() {
            return Err(Error::InvalidParameter(format!(
                "{} trailing bytes after serialized ring",
                data.len() - reader.pos
            )));
        }
        Self::new(
            CoinIdRing {
                version,
                ring_block_height,
                block_hashes,
                coin_ids,
            },
            txos,
            is_coinbase,
        )
    }

    /// SHA-256 of the canonical serialization.
    pub fn ring_id(&self) -> RingId {
        RingId::from_byte_array(sha256(&self.serialize()))
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len()).ok_or_else(|| {
            Error::InvalidParameter(format!("serialized ring truncated at byte {}", self.pos))
        })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
