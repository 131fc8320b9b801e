//! Address codec.
//!
//! Addresses nest: a [`CoinAddress`] is wrapped by a [`CryptoAddress`] that adds
//! the scheme context, which is wrapped by an [`AbelAddress`] adding the network
//! and a checksum. A [`ShortAbelAddress`] is a compact fingerprint of the latter.

mod abel_address;
mod coin_address;
mod crypto_address;
mod short_address;

pub use abel_address::{AbelAddress, ABEL_ADDRESS_CHECKSUM_LEN};
pub use coin_address::{CoinAddress, FINGERPRINT_LEN};
pub use crypto_address::CryptoAddress;
pub use short_address::{ShortAbelAddress, ShortAddressMetadata, ShortAddressPayload};

use crate::crypto::{CryptoScheme, PrivacyLevel};

/// Length of a coin address per privacy level.
pub const fn coin_address_len(level: PrivacyLevel) -> usize {
    match level {
        PrivacyLevel::RingCtPre => 9504,
        PrivacyLevel::RingCt => 9633,
        PrivacyLevel::Pseudonym => 193,
    }
}

/// Length of a crypto address for a supported (scheme, privacy level) pair.
pub fn crypto_address_len(scheme: CryptoScheme, level: PrivacyLevel) -> Option<usize> {
    match (scheme, level) {
        (CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre) => Some(10696),
        (CryptoScheme::PqRingCtX, PrivacyLevel::RingCt) => Some(10826),
        (CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym) => Some(198),
        _ => None,
    }
}

/// Length of an application address for a supported (scheme, privacy level) pair.
pub fn abel_address_len(scheme: CryptoScheme, level: PrivacyLevel) -> Option<usize> {
    crypto_address_len(scheme, level).map(|len| 1 + len + ABEL_ADDRESS_CHECKSUM_LEN)
}
