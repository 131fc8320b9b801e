use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{check_serial_numbers, AccountKind, SpendAccount, ViewAccount, ViewKeyMaterial};
use crate::address::CryptoAddress;
use crate::coin::CoinId;
use crate::crypto::{
    CryptoKeysAndAddress, CryptoScheme, CryptoSeed, PrivacyLevel, RingContext, RootSeed, SchemeProvider,
    SecretBytes, SerialNumberKey,
};
use crate::error::{Error, Result};

/// Watch-only half of a seed-backed account.
#[derive(Clone)]
pub struct RootSeedViewAccount {
    provider: Arc<dyn SchemeProvider>,
    privacy_level: PrivacyLevel,
    serial_number_key_seed: Option<SecretBytes>,
    value_key_seed: Option<SecretBytes>,
    detector_key: SecretBytes,
}

impl RootSeedViewAccount {
    /// Build from exported view material.
    ///
    /// Full privacy requires both the serial number and value seeds; pseudonymous
    /// accounts must carry neither.
    pub fn new(
        provider: Arc<dyn SchemeProvider>,
        privacy_level: PrivacyLevel,
        serial_number_key_seed: Option<&[u8]>,
        value_key_seed: Option<&[u8]>,
        detector_key: &[u8],
    ) -> Result<Self> {
        let scheme = CryptoScheme::PqRingCtX;
        if !scheme.supports(privacy_level) {
            return Err(Error::InvalidPrivacyLevel);
        }
        let full = privacy_level.is_full_privacy();
        if serial_number_key_seed.is_some() != full || value_key_seed.is_some() != full {
            return Err(Error::MismatchedSchemePrivacyLevel);
        }
        let check = |field: &[u8]| {
            if field.len() == scheme.seed_len() {
                Ok(SecretBytes::from_slice(field))
            } else {
                Err(Error::CorruptedSeed)
            }
        };
        Ok(Self {
            provider,
            privacy_level,
            serial_number_key_seed: serial_number_key_seed.map(check).transpose()?,
            value_key_seed: value_key_seed.map(check).transpose()?,
            detector_key: check(detector_key)?,
        })
    }

    pub fn from_root_seed(seed: &RootSeed, provider: Arc<dyn SchemeProvider>) -> Result<Self> {
        let keys = seed.keys();
        let detector_key = keys.detector_key().ok_or(Error::MismatchedSeedType)?;
        Self::new(
            provider,
            seed.privacy_level(),
            keys.serial_number_key_seed(),
            keys.value_key_seed(),
            detector_key,
        )
    }
}

impl ViewAccount for RootSeedViewAccount {
    fn kind(&self) -> AccountKind {
        AccountKind::SeedBacked
    }

    fn crypto_scheme(&self) -> CryptoScheme {
        CryptoScheme::PqRingCtX
    }

    fn privacy_level(&self) -> PrivacyLevel {
        self.privacy_level
    }

    fn receive_coin(&self, tx_version: u32, txo: &[u8]) -> Result<Option<u64>> {
        let txo_level = self.provider.txo_privacy_level(tx_version, txo)?;
        if txo_level != self.privacy_level {
            trace!(%txo_level, account_level = %self.privacy_level, "privacy level mismatch");
            return Ok(None);
        }
        if !self.provider.detect_coin(tx_version, txo, self.detector_key.as_slice())? {
            return Ok(None);
        }
        let value = self.provider.recover_value_by_root_seeds(
            tx_version,
            txo,
            self.value_key_seed.as_ref().map(SecretBytes::as_slice),
            self.detector_key.as_slice(),
        )?;
        if value.is_none() {
            debug!("detector matched but value recovery rejected the output");
        }
        Ok(value)
    }

    fn generate_serial_numbers(&self, coin_ids: &[CoinId], ring: RingContext<'_>) -> Result<Vec<Vec<u8>>> {
        if coin_ids.is_empty() {
            return Ok(Vec::new());
        }
        let key = SerialNumberKey::RootSeed(self.serial_number_key_seed.as_ref().map(SecretBytes::as_slice));
        let serial_numbers = self.provider.generate_serial_numbers(coin_ids, ring, key)?;
        check_serial_numbers(coin_ids, serial_numbers)
    }

    fn view_key_material(&self) -> ViewKeyMaterial<'_> {
        ViewKeyMaterial::RootSeeds {
            serial_number_key_seed: self.serial_number_key_seed.as_ref().map(SecretBytes::as_slice),
            value_key_seed: self.value_key_seed.as_ref().map(SecretBytes::as_slice),
            detector_key: self.detector_key.as_slice(),
        }
    }
}

impl fmt::Debug for RootSeedViewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootSeedViewAccount").field("privacy_level", &self.privacy_level).finish_non_exhaustive()
    }
}

/// Account backed by a root seed.
#[derive(Clone)]
pub struct RootSeedAccount {
    seed: RootSeed,
    view: RootSeedViewAccount,
    provider: Arc<dyn SchemeProvider>,
}

impl RootSeedAccount {
    pub fn new(seed: RootSeed, provider: Arc<dyn SchemeProvider>) -> Result<Self> {
        let view = RootSeedViewAccount::from_root_seed(&seed, provider.clone())?;
        Ok(Self {
            seed,
            view,
            provider,
        })
    }

    pub fn view(&self) -> &RootSeedViewAccount {
        &self.view
    }

    pub fn root_seed(&self) -> &RootSeed {
        &self.seed
    }

    /// Re-derive the one-time keys behind an address this account generated.
    ///
    /// The `publicRand` embedded in the address is the only per-address state.
    pub fn regenerate_keys_for_address(&self, address: &CryptoAddress) -> Result<CryptoKeysAndAddress> {
        if address.crypto_scheme() != self.seed.crypto_scheme() || address.privacy_level() != self.seed.privacy_level()
        {
            return Err(Error::MismatchedSchemePrivacyLevel);
        }
        let public_rand = self.provider.extract_public_rand(address.as_bytes())?;
        let keys = self.provider.derive_keys_and_address_from_public_rand(&self.seed, &public_rand)?;
        if keys.crypto_address != address.as_bytes() {
            return Err(Error::InvalidAddress("address was not derived from this account".into()));
        }
        Ok(keys)
    }
}

impl ViewAccount for RootSeedAccount {
    fn kind(&self) -> AccountKind {
        self.view.kind()
    }

    fn crypto_scheme(&self) -> CryptoScheme {
        self.view.crypto_scheme()
    }

    fn privacy_level(&self) -> PrivacyLevel {
        self.view.privacy_level()
    }

    fn receive_coin(&self, tx_version: u32, txo: &[u8]) -> Result<Option<u64>> {
        self.view.receive_coin(tx_version, txo)
    }

    fn generate_serial_numbers(&self, coin_ids: &[CoinId], ring: RingContext<'_>) -> Result<Vec<Vec<u8>>> {
        self.view.generate_serial_numbers(coin_ids, ring)
    }

    fn view_key_material(&self) -> ViewKeyMaterial<'_> {
        self.view.view_key_material()
    }
}

impl SpendAccount for RootSeedAccount {
    fn spend_key_material(&self) -> &[u8] {
        self.seed.keys().spend_key_seed()
    }

    fn generate_address(&self) -> Result<CryptoAddress> {
        let keys = self.provider.derive_keys_and_address(&CryptoSeed::Root(self.seed.clone()))?;
        let address = CryptoAddress::parse(&keys.crypto_address, self.provider.as_ref())?;
        if address.privacy_level() != self.seed.privacy_level() {
            return Err(Error::MismatchedSchemePrivacyLevel);
        }
        Ok(address)
    }

    fn dump(&self) -> Vec<u8> {
        CryptoSeed::Root(self.seed.clone()).serialize()
    }
}

impl fmt::Debug for RootSeedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootSeedAccount").field("seed", &self.seed).finish_non_exhaustive()
    }
}
