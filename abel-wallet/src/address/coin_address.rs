use std::fmt;

use super::coin_address_len;
use crate::crypto::PrivacyLevel;
use crate::error::{Error, Result};
use crate::hash_types::sha256;

/// Length of a coin address fingerprint.
pub const FINGERPRINT_LEN: usize = 32;

/// The innermost address, identified purely by its length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CoinAddress {
    FullPrivacyPre(Vec<u8>),
    FullPrivacy(Vec<u8>),
    Pseudonym(Vec<u8>),
}

impl CoinAddress {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let len = data.len();
        if len == coin_address_len(PrivacyLevel::RingCtPre) {
            Ok(CoinAddress::FullPrivacyPre(data.to_vec()))
        } else if len == coin_address_len(PrivacyLevel::RingCt) {
            Ok(CoinAddress::FullPrivacy(data.to_vec()))
        } else if len == coin_address_len(PrivacyLevel::Pseudonym) {
            Ok(CoinAddress::Pseudonym(data.to_vec()))
        } else {
            Err(Error::InvalidAddress(format!("coin address of unknown length {}", len)))
        }
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        match self {
            CoinAddress::FullPrivacyPre(_) => PrivacyLevel::RingCtPre,
            CoinAddress::FullPrivacy(_) => PrivacyLevel::RingCt,
            CoinAddress::Pseudonym(_) => PrivacyLevel::Pseudonym,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CoinAddress::FullPrivacyPre(data)
            | CoinAddress::FullPrivacy(data)
            | CoinAddress::Pseudonym(data) => data,
        }
    }

    /// SHA-256 of the address bytes.
    pub fn fingerprint(&self) -> [u8; FINGERPRINT_LEN] {
        sha256(self.as_bytes())
    }
}

impl fmt::Debug for CoinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoinAddress({}, {})", self.privacy_level(), hex::encode(self.fingerprint()))
    }
}
