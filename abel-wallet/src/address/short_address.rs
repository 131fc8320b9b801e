use std::fmt;

use super::{AbelAddress, FINGERPRINT_LEN};
use crate::chain::NetworkId;
use crate::crypto::{CryptoScheme, PrivacyLevel};
use crate::error::{Error, Result};
use crate::hash_types::sha256;

const MAGIC: u8 = 0xAB;
const V1_NETWORK_BASE: u8 = 0xE1;
const V2_MARKER: u8 = 0xE0;
const METADATA_VERSION: u8 = 1;
const HASH_LEN: usize = 32;

/// Metadata packed into the two bytes that follow the v2 prefix.
///
/// ```text
/// byte 0: version (bits 0-3) | network id (bits 4-7)
/// byte 1: reserved (bits 0-3) | scheme (bits 4-5) | privacy level (bits 6-7)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortAddressMetadata {
    pub version: u8,
    pub network: NetworkId,
    pub crypto_scheme: CryptoScheme,
    pub privacy_level: PrivacyLevel,
}

impl ShortAddressMetadata {
    pub fn to_bytes(self) -> [u8; 2] {
        [
            (self.version & 0x0F) | ((self.network.as_u8() & 0x0F) << 4),
            (((self.crypto_scheme as u32 as u8) & 0x03) << 4) | (((self.privacy_level as u8) & 0x03) << 6),
        ]
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self> {
        let version = bytes[0] & 0x0F;
        if version != METADATA_VERSION {
            return Err(Error::InvalidAddress(format!("unsupported short address version {}", version)));
        }
        if bytes[1] & 0x0F != 0 {
            return Err(Error::InvalidAddress("reserved short address bits are set".into()));
        }
        let network = NetworkId::try_from(bytes[0] >> 4)
            .map_err(|_| Error::InvalidAddress(format!("unknown network id {}", bytes[0] >> 4)))?;
        let crypto_scheme = CryptoScheme::try_from(u32::from((bytes[1] >> 4) & 0x03))?;
        let privacy_level = PrivacyLevel::try_from(bytes[1] >> 6)?;
        if !crypto_scheme.supports(privacy_level) {
            return Err(Error::InvalidCryptoScheme);
        }
        Ok(Self {
            version,
            network,
            crypto_scheme,
            privacy_level,
        })
    }
}

/// Header of a short address, which depends on its format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortAddressPayload {
    /// 66 bytes; the network is folded into the second prefix byte.
    V1 {
        network: NetworkId,
    },
    /// 68 bytes with explicit metadata.
    V2(ShortAddressMetadata),
    /// 68 bytes whose metadata holds only a version. Older encoders shifted the
    /// packed fields out of their bytes, leaving `[version, 0x00]`.
    V2Unspecified {
        version: u8,
    },
}

impl ShortAddressPayload {
    fn from_v2_metadata(bytes: [u8; 2]) -> Result<Self> {
        // The current encoder never writes a zero second byte: v2 is only
        // rendered for the current scheme, whose bits are non-zero.
        if bytes[1] == 0 {
            let version = bytes[0] & 0x0F;
            if version != METADATA_VERSION || bytes[0] >> 4 != 0 {
                return Err(Error::InvalidAddress(format!("invalid short address metadata {:02x?}", bytes)));
            }
            return Ok(ShortAddressPayload::V2Unspecified {
                version,
            });
        }
        Ok(ShortAddressPayload::V2(ShortAddressMetadata::from_bytes(bytes)?))
    }
}

/// Compact reference to an [`AbelAddress`]: `fingerprint(coinAddress) || SHA-256(address)`
/// behind a small header.
///
/// The v1 layout is only produced for legacy-scheme addresses; both layouts
/// are accepted when parsing, told apart by their total length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortAbelAddress {
    data: Vec<u8>,
    payload: ShortAddressPayload,
}

impl ShortAbelAddress {
    pub const V1_LEN: usize = 2 + FINGERPRINT_LEN + HASH_LEN;
    pub const V2_LEN: usize = 4 + FINGERPRINT_LEN + HASH_LEN;

    pub fn from_abel_address(address: &AbelAddress) -> Self {
        match address.crypto_scheme() {
            CryptoScheme::PqRingCt => Self::v1(address),
            CryptoScheme::PqRingCtX => Self::v2(address),
        }
    }

    pub fn v1(address: &AbelAddress) -> Self {
        let mut data = Vec::with_capacity(Self::V1_LEN);
        data.push(MAGIC);
        data.push(V1_NETWORK_BASE + address.network().as_u8());
        data.extend_from_slice(&address.crypto_address().fingerprint());
        data.extend_from_slice(&sha256(address.as_bytes()));
        Self {
            data,
            payload: ShortAddressPayload::V1 {
                network: address.network(),
            },
        }
    }

    pub fn v2(address: &AbelAddress) -> Self {
        let metadata = ShortAddressMetadata {
            version: METADATA_VERSION,
            network: address.network(),
            crypto_scheme: address.crypto_scheme(),
            privacy_level: address.privacy_level(),
        };
        let mut data = Vec::with_capacity(Self::V2_LEN);
        data.push(MAGIC);
        data.push(V2_MARKER);
        data.extend_from_slice(&metadata.to_bytes());
        data.extend_from_slice(&address.crypto_address().fingerprint());
        data.extend_from_slice(&sha256(address.as_bytes()));
        Self {
            data,
            payload: ShortAddressPayload::V2(metadata),
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.first() != Some(&MAGIC) {
            return Err(Error::InvalidAddress("missing short address prefix".into()));
        }
        let payload = match data.len() {
            Self::V1_LEN => {
                let network = data[1]
                    .checked_sub(V1_NETWORK_BASE)
                    .and_then(|id| NetworkId::try_from(id).ok())
                    .ok_or_else(|| Error::InvalidAddress(format!("invalid v1 network byte {:#04x}", data[1])))?;
                ShortAddressPayload::V1 {
                    network,
                }
            }
            Self::V2_LEN => {
                if data[1] != V2_MARKER {
                    return Err(Error::InvalidAddress(format!("invalid v2 marker {:#04x}", data[1])));
                }
                ShortAddressPayload::from_v2_metadata([data[2], data[3]])?
            }
            len => return Err(Error::InvalidAddress(format!("short address of unknown length {}", len))),
        };
        Ok(Self {
            data: data.to_vec(),
            payload,
        })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn payload(&self) -> ShortAddressPayload {
        self.payload
    }

    /// Network the short address was rendered for, if its header records one.
    pub fn network(&self) -> Option<NetworkId> {
        match self.payload {
            ShortAddressPayload::V1 {
                network,
            } => Some(network),
            ShortAddressPayload::V2(metadata) => Some(metadata.network),
            ShortAddressPayload::V2Unspecified {
                ..
            } => None,
        }
    }

    fn header_len(&self) -> usize {
        self.data.len() - FINGERPRINT_LEN - HASH_LEN
    }

    pub fn fingerprint(&self) -> &[u8] {
        let start = self.header_len();
        &self.data[start..start + FINGERPRINT_LEN]
    }

    /// SHA-256 of the full application address.
    pub fn address_hash(&self) -> &[u8] {
        &self.data[self.data.len() - HASH_LEN..]
    }

    /// Whether this short address refers to `address`.
    ///
    /// Without a recorded network only the fingerprint and hash are compared.
    pub fn matches(&self, address: &AbelAddress) -> bool {
        self.network().filter(|network| *network != address.network()).is_none()
            && self.fingerprint() == address.crypto_address().fingerprint()
            && self.address_hash() == sha256(address.as_bytes())
    }
}

impl fmt::Display for ShortAbelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ShortAbelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortAbelAddress({:?}, {})", self.payload, self.to_hex())
    }
}
