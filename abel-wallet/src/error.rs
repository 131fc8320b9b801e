//! Error types for the wallet library

use std::fmt;
use std::io;

use thiserror::Error;

use crate::account::AccountId;
use crate::coin::{CoinId, CoinStatus};

/// Result type alias for wallet operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur in wallet operations
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown or unsupported crypto scheme tag
    #[error("invalid crypto scheme")]
    InvalidCryptoScheme,

    /// Privacy level not valid for the requested operation or scheme
    #[error("invalid privacy level")]
    InvalidPrivacyLevel,

    /// A field required by the declared privacy level is missing
    #[error("mismatched crypto scheme and privacy level")]
    MismatchedSchemePrivacyLevel,

    /// Root material used where randomized material is required, or vice versa
    #[error("mismatched seed type")]
    MismatchedSeedType,

    /// A seed field is present but does not carry usable bytes
    #[error("corrupted seed")]
    CorruptedSeed,

    /// Serialized seed length does not match any layout for its header
    #[error("invalid seed length: got {got}, expected one of {expected:?}")]
    InvalidSeedLength {
        got: usize,
        expected: Vec<usize>,
    },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Account kinds cannot be combined for this operation
    #[error("invalid account type")]
    InvalidAccountType,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No ring in the resolved window contains the coin
    #[error("no ring found for coin {0}")]
    RingNotFound(CoinId),

    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    #[error("coin {coin} cannot move from {from:?} to {to:?}")]
    InvalidStateTransition {
        coin: CoinId,
        from: CoinStatus,
        to: CoinStatus,
    },

    #[error("scheme provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Opaque failure reported by a [`SchemeProvider`](crate::crypto::SchemeProvider)
/// implementation.
#[derive(Debug)]
pub struct ProviderError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Storage-related errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("coin {0} not found")]
    CoinNotFound(String),

    #[error("transaction {0} not found")]
    TransactionNotFound(String),

    #[error("inconsistent batch: {0}")]
    InconsistentBatch(String),
}

/// Type alias for storage operation results.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Logging-related errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("subscriber initialization failed: {0}")]
    SubscriberInit(String),
}
