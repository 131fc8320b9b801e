//! Deterministic stand-ins for the scheme provider and the chain.
//!
//! The mock provider replaces lattice cryptography with SHA-256 constructions
//! that preserve the properties the wallet relies on: addresses have the real
//! lengths, root seeds yield fresh addresses, re-derivation from `publicRand`
//! is deterministic and serial numbers do not depend on how the ring was
//! supplied.

mod chain;
mod provider;

pub use chain::{encode_block, MissingBlock, MockChain, MockTx, RecordingSource, MOCK_TX_VERSION};
pub use provider::{mock_txo, MockSchemeProvider};

use sha2::{Digest, Sha256};

/// SHA-256 over a domain label followed by `parts`.
pub(crate) fn hash(label: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(label);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Counter-mode SHA-256 stream of `len` bytes.
pub(crate) fn expand(label: &[u8], parts: &[&[u8]], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + 32);
    let mut counter = 0u32;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(label);
        hasher.update(counter.to_le_bytes());
        for part in parts {
            hasher.update(part);
        }
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(len);
    out
}
