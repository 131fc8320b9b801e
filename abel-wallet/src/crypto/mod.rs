//! Crypto scheme identifiers, privacy levels and seed material.
//!
//! The lattice primitives themselves live behind [`SchemeProvider`]; this module
//! only knows the outer envelope of the material it hands to the provider.

pub mod provider;
pub mod seed;

use std::fmt;

use serde_repr::{Deserialize_repr, Serialize_repr};
use zeroize::Zeroize;

use crate::error::{Error, Result};

pub use provider::{
    CryptoKeysAndAddress, RingContext, SchemeProvider, SerialNumberKey, SignerMaterial,
};
pub use seed::{generate_seed, CryptoSeed, KeySeeds, RandomizedSeed, RootSeed, SeedKind, SeedParts};

/// Length in bytes of every seed field under both schemes.
pub const SEED_BYTES_LEN: usize = 64;

/// Length in bytes of the `publicRand` nonce carried by randomized seeds.
pub const PUBLIC_RAND_BYTES_LEN: usize = 64;

/// Crypto scheme a key hierarchy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr)]
#[repr(u32)]
pub enum CryptoScheme {
    /// The legacy scheme: full privacy only, no detector key, single-use keys.
    PqRingCt = 0,
    /// The current scheme with root seeds and pseudonymous accounts.
    PqRingCtX = 1,
}

impl CryptoScheme {
    /// Width of the serialized scheme tag.
    pub const SERIALIZE_SIZE: usize = 4;

    /// Serialize as a little-endian `u32` tag.
    pub fn to_bytes(self) -> [u8; Self::SERIALIZE_SIZE] {
        (self as u32).to_le_bytes()
    }

    /// Parse the tag from the first four bytes of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let tag: [u8; Self::SERIALIZE_SIZE] = data
            .get(..Self::SERIALIZE_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::InvalidCryptoScheme)?;
        Self::try_from(u32::from_le_bytes(tag))
    }

    pub fn seed_len(self) -> usize {
        SEED_BYTES_LEN
    }

    /// Length of `publicRand`, or `None` when the scheme has no randomized derivation.
    pub fn public_rand_len(self) -> Option<usize> {
        match self {
            CryptoScheme::PqRingCt => None,
            CryptoScheme::PqRingCtX => Some(PUBLIC_RAND_BYTES_LEN),
        }
    }

    /// Whether the serialized form of this scheme's material carries a privacy level byte.
    pub fn has_privacy_level_byte(self) -> bool {
        matches!(self, CryptoScheme::PqRingCtX)
    }

    /// Whether `level` is one of the levels defined under this scheme.
    pub fn supports(self, level: PrivacyLevel) -> bool {
        matches!(
            (self, level),
            (CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre)
                | (CryptoScheme::PqRingCtX, PrivacyLevel::RingCt)
                | (CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym)
        )
    }
}

impl TryFrom<u32> for CryptoScheme {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(CryptoScheme::PqRingCt),
            1 => Ok(CryptoScheme::PqRingCtX),
            _ => Err(Error::InvalidCryptoScheme),
        }
    }
}

impl fmt::Display for CryptoScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoScheme::PqRingCt => write!(f, "pqringct"),
            CryptoScheme::PqRingCtX => write!(f, "pqringctx"),
        }
    }
}

/// Privacy level of keys, addresses and outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum PrivacyLevel {
    /// Full privacy under the legacy scheme.
    RingCtPre = 0,
    /// Full privacy: unlinkable spends and hidden values.
    RingCt = 1,
    /// Transparent values and linkable spends.
    Pseudonym = 2,
}

impl PrivacyLevel {
    pub fn is_full_privacy(self) -> bool {
        !matches!(self, PrivacyLevel::Pseudonym)
    }

    pub fn is_pseudonym(self) -> bool {
        matches!(self, PrivacyLevel::Pseudonym)
    }
}

impl TryFrom<u8> for PrivacyLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PrivacyLevel::RingCtPre),
            1 => Ok(PrivacyLevel::RingCt),
            2 => Ok(PrivacyLevel::Pseudonym),
            _ => Err(Error::InvalidPrivacyLevel),
        }
    }
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivacyLevel::RingCtPre => write!(f, "full-privacy-pre"),
            PrivacyLevel::RingCt => write!(f, "full-privacy"),
            PrivacyLevel::Pseudonym => write!(f, "pseudonym"),
        }
    }
}

/// Secret key or seed bytes, wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes(***{} bytes***)", self.0.len())
    }
}
