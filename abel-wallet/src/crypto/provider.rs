//! The scheme provider capability.
//!
//! Key generation, address derivation, coin detection, serial numbers and
//! transaction proofs are performed by an external implementation of the
//! lattice-based scheme. This crate validates everything it can locally and
//! hands the rest to a [`SchemeProvider`].

use crate::coin::{CoinId, CoinRing};
use crate::crypto::seed::{CryptoSeed, KeySeeds, RootSeed};
use crate::crypto::{PrivacyLevel, SecretBytes};
use crate::error::ProviderError;
use crate::tx::{SignedRawTx, TxDesc, UnsignedRawTx};

/// Result type for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Key material and the crypto address it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoKeysAndAddress {
    pub spend_secret_key: SecretBytes,
    pub serial_no_secret_key: SecretBytes,
    pub view_secret_key: SecretBytes,
    /// Absent under the legacy scheme.
    pub detector_key: Option<SecretBytes>,
    pub crypto_address: Vec<u8>,
}

/// The ring a serial number is computed against.
#[derive(Debug, Clone, Copy)]
pub enum RingContext<'a> {
    /// Serialized blocks covering the whole ring-group window, in height order.
    Blocks(&'a [Vec<u8>]),
    /// A ring in its canonical serialization (see [`CoinRing::serialize`]).
    SerializedRing(&'a [u8]),
}

/// Serial number key material.
#[derive(Debug, Clone)]
pub enum SerialNumberKey<'a> {
    /// Root seed material; `None` for pseudonymous accounts.
    RootSeed(Option<&'a [u8]>),
    /// One materialized serial number secret key per outpoint.
    SecretKeys(Vec<&'a [u8]>),
}

/// Signing material for a batch of inputs. All signers share one kind.
#[derive(Debug, Clone)]
pub enum SignerMaterial<'a> {
    RootSeeds(Vec<&'a RootSeed>),
    Keys(Vec<&'a CryptoKeysAndAddress>),
}

impl SignerMaterial<'_> {
    pub fn len(&self) -> usize {
        match self {
            SignerMaterial::RootSeeds(seeds) => seeds.len(),
            SignerMaterial::Keys(keys) => keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cryptographic operations of the underlying scheme.
///
/// Every method is a self-contained computation; implementations must be safe to
/// call concurrently from several threads.
pub trait SchemeProvider: Send + Sync {
    /// Materialize keys and a crypto address from a seed.
    ///
    /// Root seeds yield a fresh one-time key set on every call; randomized seeds
    /// are deterministic.
    fn derive_keys_and_address(&self, seed: &CryptoSeed) -> ProviderResult<CryptoKeysAndAddress>;

    /// Re-derive the one-time key set bound to `public_rand`.
    fn derive_keys_and_address_from_public_rand(
        &self,
        root: &RootSeed,
        public_rand: &[u8],
    ) -> ProviderResult<CryptoKeysAndAddress>;

    /// The randomized key seeds bound to `public_rand`.
    fn derive_randomized_seeds(&self, root: &RootSeed, public_rand: &[u8]) -> ProviderResult<KeySeeds>;

    /// Extract the `publicRand` embedded in a current-scheme crypto address.
    fn extract_public_rand(&self, crypto_address: &[u8]) -> ProviderResult<Vec<u8>>;

    /// Split a crypto address into its privacy level and inner coin address bytes.
    fn split_crypto_address(&self, crypto_address: &[u8]) -> ProviderResult<(PrivacyLevel, Vec<u8>)>;

    /// Check the cryptographic well-formedness of a crypto address.
    fn validate_crypto_address(&self, crypto_address: &[u8]) -> ProviderResult<bool>;

    /// Privacy level embedded in a serialized output.
    fn txo_privacy_level(&self, tx_version: u32, txo: &[u8]) -> ProviderResult<PrivacyLevel>;

    /// Coin address embedded in a serialized output.
    fn extract_coin_address_from_txo(&self, tx_version: u32, txo: &[u8]) -> ProviderResult<Vec<u8>>;

    /// Detector-key ownership check.
    fn detect_coin(&self, tx_version: u32, txo: &[u8], detector_key: &[u8]) -> ProviderResult<bool>;

    /// Recover the value of an output addressed to a root seed.
    ///
    /// `Ok(None)` when the output does not belong to the seed.
    fn recover_value_by_root_seeds(
        &self,
        tx_version: u32,
        txo: &[u8],
        value_key_seed: Option<&[u8]>,
        detector_key: &[u8],
    ) -> ProviderResult<Option<u64>>;

    /// Recover the value of an output addressed to materialized keys.
    fn recover_value_by_keys(
        &self,
        tx_version: u32,
        txo: &[u8],
        crypto_address: &[u8],
        view_secret_key: &[u8],
    ) -> ProviderResult<Option<u64>>;

    /// One serial number per outpoint, in order.
    fn generate_serial_numbers(
        &self,
        outpoints: &[CoinId],
        ring: RingContext<'_>,
        key: SerialNumberKey<'_>,
    ) -> ProviderResult<Vec<Vec<u8>>>;

    /// Every ring that can be formed from a complete ring-group window.
    fn build_rings_from_blocks(&self, blocks: &[Vec<u8>]) -> ProviderResult<Vec<CoinRing>>;

    fn generate_unsigned_raw_tx(&self, desc: &TxDesc) -> ProviderResult<UnsignedRawTx>;

    fn sign_raw_tx(
        &self,
        unsigned: &UnsignedRawTx,
        signers: SignerMaterial<'_>,
    ) -> ProviderResult<SignedRawTx>;
}
