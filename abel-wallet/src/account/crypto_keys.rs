use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::{check_serial_numbers, AccountKind, SpendAccount, ViewAccount, ViewKeyMaterial};
use crate::address::CryptoAddress;
use crate::coin::CoinId;
use crate::crypto::{
    CryptoKeysAndAddress, CryptoScheme, CryptoSeed, PrivacyLevel, RandomizedSeed, RingContext, SchemeProvider,
    SecretBytes, SerialNumberKey,
};
use crate::error::{Error, Result};

/// Watch-only half of a key-backed account.
#[derive(Clone)]
pub struct CryptoKeysViewAccount {
    provider: Arc<dyn SchemeProvider>,
    crypto_address: CryptoAddress,
    serial_no_secret_key: SecretBytes,
    view_secret_key: SecretBytes,
    detector_key: Option<SecretBytes>,
}

impl CryptoKeysViewAccount {
    pub fn new(
        provider: Arc<dyn SchemeProvider>,
        crypto_address: CryptoAddress,
        serial_no_secret_key: &[u8],
        view_secret_key: &[u8],
        detector_key: Option<&[u8]>,
    ) -> Result<Self> {
        if serial_no_secret_key.is_empty() || view_secret_key.is_empty() {
            return Err(Error::InvalidParameter("empty view key material".into()));
        }
        Ok(Self {
            provider,
            crypto_address,
            serial_no_secret_key: SecretBytes::from_slice(serial_no_secret_key),
            view_secret_key: SecretBytes::from_slice(view_secret_key),
            detector_key: detector_key.map(SecretBytes::from_slice),
        })
    }

    pub fn crypto_address(&self) -> &CryptoAddress {
        &self.crypto_address
    }
}

impl ViewAccount for CryptoKeysViewAccount {
    fn kind(&self) -> AccountKind {
        AccountKind::KeyBacked
    }

    fn crypto_scheme(&self) -> CryptoScheme {
        self.crypto_address.crypto_scheme()
    }

    fn privacy_level(&self) -> PrivacyLevel {
        self.crypto_address.privacy_level()
    }

    fn receive_coin(&self, tx_version: u32, txo: &[u8]) -> Result<Option<u64>> {
        let txo_level = self.provider.txo_privacy_level(tx_version, txo)?;
        if txo_level != self.privacy_level() {
            trace!(%txo_level, account_level = %self.privacy_level(), "privacy level mismatch");
            return Ok(None);
        }
        let coin_address = self.provider.extract_coin_address_from_txo(tx_version, txo)?;
        if coin_address != self.crypto_address.coin_address().as_bytes() {
            return Ok(None);
        }
        Ok(self.provider.recover_value_by_keys(
            tx_version,
            txo,
            self.crypto_address.as_bytes(),
            self.view_secret_key.as_slice(),
        )?)
    }

    fn generate_serial_numbers(&self, coin_ids: &[CoinId], ring: RingContext<'_>) -> Result<Vec<Vec<u8>>> {
        if coin_ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys = vec![self.serial_no_secret_key.as_slice(); coin_ids.len()];
        let serial_numbers = self.provider.generate_serial_numbers(coin_ids, ring, SerialNumberKey::SecretKeys(keys))?;
        check_serial_numbers(coin_ids, serial_numbers)
    }

    fn view_key_material(&self) -> ViewKeyMaterial<'_> {
        ViewKeyMaterial::Keys {
            serial_no_secret_key: self.serial_no_secret_key.as_slice(),
            view_secret_key: self.view_secret_key.as_slice(),
            detector_key: self.detector_key.as_ref().map(SecretBytes::as_slice),
        }
    }
}

impl fmt::Debug for CryptoKeysViewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKeysViewAccount").field("crypto_address", &self.crypto_address).finish_non_exhaustive()
    }
}

/// Account backed by materialized keys for a single address.
#[derive(Clone)]
pub struct CryptoKeysAccount {
    seed: RandomizedSeed,
    keys: CryptoKeysAndAddress,
    view: CryptoKeysViewAccount,
}

impl CryptoKeysAccount {
    pub fn from_randomized_seed(seed: RandomizedSeed, provider: Arc<dyn SchemeProvider>) -> Result<Self> {
        let keys = provider.derive_keys_and_address(&CryptoSeed::Randomized(seed.clone()))?;
        let crypto_address = CryptoAddress::parse(&keys.crypto_address, provider.as_ref())?;
        if crypto_address.crypto_scheme() != seed.crypto_scheme() || crypto_address.privacy_level() != seed.privacy_level() {
            return Err(Error::MismatchedSchemePrivacyLevel);
        }
        let view = CryptoKeysViewAccount::new(
            provider,
            crypto_address,
            keys.serial_no_secret_key.as_slice(),
            keys.view_secret_key.as_slice(),
            keys.detector_key.as_ref().map(SecretBytes::as_slice),
        )?;
        Ok(Self {
            seed,
            keys,
            view,
        })
    }

    pub fn view(&self) -> &CryptoKeysViewAccount {
        &self.view
    }

    pub fn keys(&self) -> &CryptoKeysAndAddress {
        &self.keys
    }

    pub fn crypto_address(&self) -> &CryptoAddress {
        self.view.crypto_address()
    }
}

impl ViewAccount for CryptoKeysAccount {
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

impl SpendAccount for CryptoKeysAccount {
    fn spend_key_material(&self) -> &[u8] {
        self.keys.spend_secret_key.as_slice()
    }

    fn generate_address(&self) -> Result<CryptoAddress> {
        Ok(self.view.crypto_address().clone())
    }

    fn dump(&self) -> Vec<u8> {
        CryptoSeed::Randomized(self.seed.clone()).serialize()
    }
}

impl fmt::Debug for CryptoKeysAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKeysAccount").field("crypto_address", self.crypto_address()).finish_non_exhaustive()
    }
}
