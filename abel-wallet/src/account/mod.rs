//! Accounts
//!
//! An account is a view capability ([`ViewAccount`]: coin detection and serial
//! numbers) optionally extended with a spend capability ([`SpendAccount`]:
//! signing material and address generation). Two backings exist:
//!
//! - seed-backed accounts hold a [`RootSeed`](crate::crypto::RootSeed) and can derive any number of
//!   one-time addresses;
//! - key-backed accounts hold materialized keys for exactly one address.

mod crypto_keys;
mod root_seed;

pub use crypto_keys::{CryptoKeysAccount, CryptoKeysViewAccount};
pub use root_seed::{RootSeedAccount, RootSeedViewAccount};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::info;

use crate::address::{AbelAddress, CryptoAddress};
use crate::chain::NetworkId;
use crate::coin::CoinId;
use crate::crypto::{
    generate_seed, CryptoScheme, CryptoSeed, PrivacyLevel, RingContext, SchemeProvider, SignerMaterial,
};
use crate::error::{Error, Result};

/// Wallet-assigned account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Privacy level chosen when an account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum AccountPrivacyLevel {
    /// Legacy single-address full privacy account.
    FullPrivacyOld = 0,
    FullPrivacy = 1,
    Pseudonym = 2,
}

impl AccountPrivacyLevel {
    pub fn crypto_scheme(self) -> CryptoScheme {
        match self {
            AccountPrivacyLevel::FullPrivacyOld => CryptoScheme::PqRingCt,
            AccountPrivacyLevel::FullPrivacy | AccountPrivacyLevel::Pseudonym => CryptoScheme::PqRingCtX,
        }
    }

    pub fn privacy_level(self) -> PrivacyLevel {
        match self {
            AccountPrivacyLevel::FullPrivacyOld => PrivacyLevel::RingCtPre,
            AccountPrivacyLevel::FullPrivacy => PrivacyLevel::RingCt,
            AccountPrivacyLevel::Pseudonym => PrivacyLevel::Pseudonym,
        }
    }
}

impl TryFrom<u8> for AccountPrivacyLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(AccountPrivacyLevel::FullPrivacyOld),
            1 => Ok(AccountPrivacyLevel::FullPrivacy),
            2 => Ok(AccountPrivacyLevel::Pseudonym),
            _ => Err(Error::InvalidPrivacyLevel),
        }
    }
}

/// Backing of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    SeedBacked,
    KeyBacked,
}

/// View key material of an account.
#[derive(Clone, Copy)]
pub enum ViewKeyMaterial<'a> {
    RootSeeds {
        serial_number_key_seed: Option<&'a [u8]>,
        value_key_seed: Option<&'a [u8]>,
        detector_key: &'a [u8],
    },
    Keys {
        serial_no_secret_key: &'a [u8],
        view_secret_key: &'a [u8],
        detector_key: Option<&'a [u8]>,
    },
}

impl fmt::Debug for ViewKeyMaterial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKeyMaterial::RootSeeds { .. } => write!(f, "ViewKeyMaterial::RootSeeds(***)"),
            ViewKeyMaterial::Keys { .. } => write!(f, "ViewKeyMaterial::Keys(***)"),
        }
    }
}

/// Detection and serial number capability, usable watch-only.
pub trait ViewAccount: Send + Sync {
    fn kind(&self) -> AccountKind;

    fn crypto_scheme(&self) -> CryptoScheme;

    fn privacy_level(&self) -> PrivacyLevel;

    /// Check whether a serialized output belongs to this account.
    ///
    /// `Ok(Some(value))` for an owned output, `Ok(None)` for an output that is
    /// definitely not owned, and `Err` when ownership could not be evaluated.
    fn receive_coin(&self, tx_version: u32, txo: &[u8]) -> Result<Option<u64>>;

    /// One serial number per coin, in order. An empty batch yields an empty result.
    fn generate_serial_numbers(&self, coin_ids: &[CoinId], ring: RingContext<'_>) -> Result<Vec<Vec<u8>>>;

    fn view_key_material(&self) -> ViewKeyMaterial<'_>;
}

/// Spend capability on top of [`ViewAccount`].
pub trait SpendAccount: ViewAccount {
    fn spend_key_material(&self) -> &[u8];

    /// A crypto address to receive coins at.
    ///
    /// Seed-backed accounts produce a fresh address on every call; key-backed
    /// accounts always return their single address.
    fn generate_address(&self) -> Result<CryptoAddress>;

    /// The durable secret: serialized seed bytes from which the account is rebuilt.
    fn dump(&self) -> Vec<u8>;
}

/// An account of either backing.
#[derive(Debug, Clone)]
pub enum Account {
    SeedBacked(RootSeedAccount),
    KeyBacked(CryptoKeysAccount),
}

impl Account {
    /// Create an account with fresh seed material.
    ///
    /// Returns the account together with the serialized seed the caller must persist.
    pub fn new(level: AccountPrivacyLevel, provider: Arc<dyn SchemeProvider>) -> Result<(Self, Vec<u8>)> {
        let seed = generate_seed(level.crypto_scheme(), level.privacy_level())?;
        let bytes = seed.serialize();
        let account = Self::from_seed(seed, provider)?;
        info!(?level, kind = ?account.kind(), "created account");
        Ok((account, bytes))
    }

    pub fn from_seed(seed: CryptoSeed, provider: Arc<dyn SchemeProvider>) -> Result<Self> {
        match seed {
            CryptoSeed::Root(root) => Ok(Account::SeedBacked(RootSeedAccount::new(root, provider)?)),
            CryptoSeed::Randomized(randomized) => {
                Ok(Account::KeyBacked(CryptoKeysAccount::from_randomized_seed(randomized, provider)?))
            }
        }
    }

    /// Rebuild an account from bytes previously returned by [`Account::new`] or [`SpendAccount::dump`].
    pub fn from_seed_bytes(bytes: &[u8], provider: Arc<dyn SchemeProvider>) -> Result<Self> {
        Self::from_seed(CryptoSeed::deserialize(bytes)?, provider)
    }

    pub fn generate_abel_address(&self, network: NetworkId) -> Result<AbelAddress> {
        Ok(AbelAddress::new(network, self.generate_address()?))
    }

    /// A shareable watch-only handle.
    pub fn view_account(&self) -> Arc<dyn ViewAccount> {
        match self {
            Account::SeedBacked(account) => Arc::new(account.view().clone()),
            Account::KeyBacked(account) => Arc::new(account.view().clone()),
        }
    }

    fn as_spend(&self) -> &dyn SpendAccount {
        match self {
            Account::SeedBacked(account) => account,
            Account::KeyBacked(account) => account,
        }
    }

    /// Signing material for a batch of signers that must all share one backing.
    pub(crate) fn signer_material<'a>(signers: &[&'a Account]) -> Result<SignerMaterial<'a>> {
        let first = signers
            .first()
            .ok_or_else(|| Error::InvalidParameter("no signer accounts".into()))?;
        match first {
            Account::SeedBacked(_) => signers
                .iter()
                .copied()
                .map(|signer| match signer {
                    Account::SeedBacked(account) => Ok(account.root_seed()),
                    Account::KeyBacked(_) => Err(Error::InvalidAccountType),
                })
                .collect::<Result<Vec<_>>>()
                .map(SignerMaterial::RootSeeds),
            Account::KeyBacked(_) => signers
                .iter()
                .copied()
                .map(|signer| match signer {
                    Account::KeyBacked(account) => Ok(account.keys()),
                    Account::SeedBacked(_) => Err(Error::InvalidAccountType),
                })
                .collect::<Result<Vec<_>>>()
                .map(SignerMaterial::Keys),
        }
    }
}

impl ViewAccount for Account {
    fn kind(&self) -> AccountKind {
        self.as_spend().kind()
    }

    fn crypto_scheme(&self) -> CryptoScheme {
        self.as_spend().crypto_scheme()
    }

    fn privacy_level(&self) -> PrivacyLevel {
        self.as_spend().privacy_level()
    }

    fn receive_coin(&self, tx_version: u32, txo: &[u8]) -> Result<Option<u64>> {
        self.as_spend().receive_coin(tx_version, txo)
    }

    fn generate_serial_numbers(&self, coin_ids: &[CoinId], ring: RingContext<'_>) -> Result<Vec<Vec<u8>>> {
        self.as_spend().generate_serial_numbers(coin_ids, ring)
    }

    fn view_key_material(&self) -> ViewKeyMaterial<'_> {
        self.as_spend().view_key_material()
    }
}

impl SpendAccount for Account {
    fn spend_key_material(&self) -> &[u8] {
        self.as_spend().spend_key_material()
    }

    fn generate_address(&self) -> Result<CryptoAddress> {
        self.as_spend().generate_address()
    }

    fn dump(&self) -> Vec<u8> {
        self.as_spend().dump()
    }
}

/// Serial numbers must come back one per coin.
pub(crate) fn check_serial_numbers(coin_ids: &[CoinId], serial_numbers: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>> {
    if serial_numbers.len() != coin_ids.len() {
        return Err(Error::Provider(crate::error::ProviderError::new(format!(
            "expected {} serial numbers, got {}",
            coin_ids.len(),
            serial_numbers.len()
        ))));
    }
    if let Some(pos) = serial_numbers.iter().position(Vec::is_empty) {
        return Err(Error::Provider(crate::error::ProviderError::new(format!(
            "empty serial number for coin {}",
            coin_ids[pos]
        ))));
    }
    Ok(serial_numbers)
}
