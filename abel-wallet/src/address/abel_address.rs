use std::fmt;

use tracing::debug;

use super::{abel_address_len, CryptoAddress};
use crate::chain::NetworkId;
use crate::crypto::{CryptoScheme, PrivacyLevel, SchemeProvider};
use crate::error::{Error, Result};
use crate::hash_types::sha3_256;

/// Length of the trailing checksum of an application address.
pub const ABEL_ADDRESS_CHECKSUM_LEN: usize = 32;

/// Network-qualified, checksummed address shown to users.
///
/// Layout: `networkId(1) || cryptoAddress || SHA3-256(networkId || cryptoAddress)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AbelAddress {
    data: Vec<u8>,
    network: NetworkId,
    crypto_address: CryptoAddress,
}

impl AbelAddress {
    pub fn new(network: NetworkId, crypto_address: CryptoAddress) -> Self {
        let mut data = Vec::with_capacity(1 + crypto_address.as_bytes().len() + ABEL_ADDRESS_CHECKSUM_LEN);
        data.push(network.as_u8());
        data.extend_from_slice(crypto_address.as_bytes());
        let checksum = sha3_256(&data);
        data.extend_from_slice(&checksum);
        Self {
            data,
            network,
            crypto_address,
        }
    }

    /// Parse and fully validate an application address.
    ///
    /// Length, network and checksum are checked locally; the embedded crypto
    /// address is then parsed and checked for cryptographic well-formedness by the
    /// provider.
    pub fn parse(data: &[u8], provider: &dyn SchemeProvider) -> Result<Self> {
        let min_len = 1 + CryptoScheme::SERIALIZE_SIZE + ABEL_ADDRESS_CHECKSUM_LEN;
        if data.len() < min_len {
            return Err(Error::InvalidAddress(format!("address too short: {} bytes", data.len())));
        }
        let network = NetworkId::try_from(data[0])
            .map_err(|_| Error::InvalidAddress(format!("unknown network id {}", data[0])))?;
        let scheme = CryptoScheme::from_bytes(&data[1..])?;
        let plausible = [PrivacyLevel::RingCtPre, PrivacyLevel::RingCt, PrivacyLevel::Pseudonym]
            .into_iter()
            .any(|level| abel_address_len(scheme, level) == Some(data.len()));
        if !plausible {
            return Err(Error::InvalidAddress(format!(
                "address of length {} is not valid for scheme {}",
                data.len(),
                scheme
            )));
        }

        let (body, checksum) = data.split_at(data.len() - ABEL_ADDRESS_CHECKSUM_LEN);
        if sha3_256(body) != checksum {
            return Err(Error::InvalidAddress("checksum mismatch".into()));
        }

        let crypto_address = CryptoAddress::parse(&body[1..], provider)?;
        if !provider.validate_crypto_address(crypto_address.as_bytes())? {
            debug!(%network, "crypto address failed provider validation");
            return Err(Error::InvalidAddress("malformed crypto address".into()));
        }

        Ok(Self {
            data: data.to_vec(),
            network,
            crypto_address,
        })
    }

    pub fn from_hex(s: &str, provider: &dyn SchemeProvider) -> Result<Self> {
        Self::parse(&hex::decode(s)?, provider)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn crypto_address(&self) -> &CryptoAddress {
        &self.crypto_address
    }

    pub fn crypto_scheme(&self) -> CryptoScheme {
        self.crypto_address.crypto_scheme()
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        self.crypto_address.privacy_level()
    }

    pub fn checksum(&self) -> &[u8] {
        &self.data[self.data.len() - ABEL_ADDRESS_CHECKSUM_LEN..]
    }
}

impl fmt::Debug for AbelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbelAddress")
            .field("network", &self.network)
            .field("crypto_address", &self.crypto_address)
            .finish()
    }
}
