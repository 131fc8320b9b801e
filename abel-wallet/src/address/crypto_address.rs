use std::fmt;

use super::{crypto_address_len, CoinAddress, FINGERPRINT_LEN};
use crate::crypto::{CryptoScheme, PrivacyLevel, SchemeProvider};
use crate::error::{Error, Result};

/// A coin address in its scheme context.
///
/// Valid combinations:
///
/// | scheme    | privacy level | length |
/// |-----------|---------------|--------|
/// | PqRingCt  | RingCtPre     | 10696  |
/// | PqRingCtX | RingCt        | 10826  |
/// | PqRingCtX | Pseudonym     | 198    |
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CryptoAddress {
    data: Vec<u8>,
    scheme: CryptoScheme,
    coin_address: CoinAddress,
}

impl CryptoAddress {
    /// Parse and validate serialized crypto address bytes.
    ///
    /// The scheme tag and total length are checked before the provider is asked to
    /// split out the privacy level and the inner coin address.
    pub fn parse(data: &[u8], provider: &dyn SchemeProvider) -> Result<Self> {
        let scheme = CryptoScheme::from_bytes(data)?;
        let plausible = [PrivacyLevel::RingCtPre, PrivacyLevel::RingCt, PrivacyLevel::Pseudonym]
            .into_iter()
            .any(|level| crypto_address_len(scheme, level) == Some(data.len()));
        if !plausible {
            return Err(Error::InvalidAddress(format!(
                "crypto address of length {} is not valid for scheme {}",
                data.len(),
                scheme
            )));
        }

        let (level, coin_bytes) = provider.split_crypto_address(data)?;
        let coin_address = CoinAddress::from_bytes(&coin_bytes)?;
        if coin_address.privacy_level() != level {
            return Err(Error::InvalidAddress(format!(
                "coin address is {} but crypto address declares {}",
                coin_address.privacy_level(),
                level
            )));
        }
        match crypto_address_len(scheme, level) {
            None => Err(Error::InvalidCryptoScheme),
            Some(expected) if expected != data.len() => Err(Error::InvalidAddress(format!(
                "{} {} crypto address must be {} bytes, got {}",
                scheme,
                level,
                expected,
                data.len()
            ))),
            Some(_) => Ok(Self {
                data: data.to_vec(),
                scheme,
                coin_address,
            }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn crypto_scheme(&self) -> CryptoScheme {
        self.scheme
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        self.coin_address.privacy_level()
    }

    pub fn coin_address(&self) -> &CoinAddress {
        &self.coin_address
    }

    pub fn fingerprint(&self) -> [u8; FINGERPRINT_LEN] {
        self.coin_address.fingerprint()
    }
}

impl fmt::Debug for CryptoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoAddress")
            .field("scheme", &self.scheme)
            .field("privacy_level", &self.privacy_level())
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .finish()
    }
}
