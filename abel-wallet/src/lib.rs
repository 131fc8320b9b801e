//! Abel Wallet Library
//!
//! This library provides the client-side wallet core for the Abelian
//! post-quantum ledger: seed material for the legacy and current crypto
//! schemes, the address codec, seed- and key-backed accounts, and a coin
//! tracker that follows owned outputs through ring formation, maturity and
//! spending.
//!
//! Lattice cryptography is not implemented here. Every operation that needs it
//! goes through a [`SchemeProvider`](crypto::SchemeProvider) supplied by the
//! host application.

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub mod account;
pub mod address;
pub mod chain;
pub mod coin;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hash_types;
#[cfg(feature = "logging")]
pub mod logging;
pub mod storage;
pub mod tracker;
pub mod tx;

pub use account::{
    Account, AccountId, AccountKind, AccountPrivacyLevel, CryptoKeysAccount, CryptoKeysViewAccount,
    RootSeedAccount, RootSeedViewAccount, SpendAccount, ViewAccount, ViewKeyMaterial,
};
pub use address::{AbelAddress, CoinAddress, CryptoAddress, ShortAbelAddress};
pub use chain::{BlockSource, ChainBlock, ChainParams, ChainTx, ChainTxIn, NetworkId};
pub use coin::{Coin, CoinId, CoinIdRing, CoinRing, CoinStatus};
pub use config::{HeightRange, WalletConfig};
pub use crypto::{
    generate_seed, CryptoKeysAndAddress, CryptoScheme, CryptoSeed, KeySeeds, PrivacyLevel, RandomizedSeed,
    RingContext, RootSeed, SchemeProvider, SecretBytes, SeedKind, SeedParts,
};
pub use error::{Error, ProviderError, Result, StorageError};
pub use hash_types::{BlockHash, RingId, TxId};
pub use storage::{CoinStore, MemoryCoinStore, PendingTx, PendingTxStatus};
pub use tracker::{BlockScanReport, CoinTracker, MaturityReport, SpendReport};
pub use tx::{
    generate_signed_raw_tx, generate_unsigned_raw_tx, sort_tx_in_descs, sort_tx_out_descs, SignedRawTx, TxDesc,
    TxInDesc, TxOutDesc, UnsignedRawTx,
};

#[cfg(feature = "logging")]
pub use tracing::level_filters::LevelFilter;

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        AbelAddress, Account, AccountId, AccountPrivacyLevel, CoinId, CoinStatus, CoinStore, CoinTracker,
        CryptoAddress, CryptoScheme, CryptoSeed, Error, NetworkId, PrivacyLevel, Result, SchemeProvider,
        SpendAccount, ViewAccount,
    };
}
