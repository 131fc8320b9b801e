//! Wallet configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chain::{ChainParams, NetworkId};
use crate::error::{Error, Result};

/// An inclusive range of block heights. An absent end means "up to the tip".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeightRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl HeightRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self {
            start,
            end,
        }
    }

    pub fn contains(&self, height: u64) -> bool {
        height >= self.start && self.end.map_or(true, |end| height <= end)
    }

    fn validate(&self, name: &str) -> Result<()> {
        match self.end {
            Some(end) if end < self.start => {
                Err(Error::Config(format!("{} range ends at {} before it starts at {}", name, end, self.start)))
            }
            _ => Ok(()),
        }
    }
}

/// Configuration of a wallet instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network the wallet's addresses belong to.
    pub network_id: NetworkId,

    pub chain: ChainParams,

    /// Heights scanned for incoming coins.
    pub coin_scan: HeightRange,

    /// Heights scanned for spends of tracked coins.
    pub tx_track: HeightRange,

    /// Database file for persistent stores. Unused by the in-memory store.
    pub db_file_name: PathBuf,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network_id: NetworkId::MainNet,
            chain: ChainParams::default(),
            coin_scan: HeightRange::default(),
            tx_track: HeightRange::default(),
            db_file_name: PathBuf::from("abel-wallet.db"),
        }
    }
}

impl WalletConfig {
    /// Create a configuration for the given network.
    pub fn new(network_id: NetworkId) -> Self {
        Self {
            network_id,
            ..Self::default()
        }
    }

    pub fn mainnet() -> Self {
        Self::new(NetworkId::MainNet)
    }

    pub fn testnet() -> Self {
        Self::new(NetworkId::TestNet)
    }

    pub fn regtest() -> Self {
        Self::new(NetworkId::RegressionNet)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_chain_params(mut self, chain: ChainParams) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_coin_scan(mut self, range: HeightRange) -> Self {
        self.coin_scan = range;
        self
    }

    pub fn with_tx_track(mut self, range: HeightRange) -> Self {
        self.tx_track = range;
        self
    }

    pub fn with_db_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_file_name = path.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.chain.validate()?;
        self.coin_scan.validate("coin_scan")?;
        self.tx_track.validate("tx_track")?;
        if self.db_file_name.as_os_str().is_empty() {
            return Err(Error::Config("db_file_name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = WalletConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain.coinbase_maturity, 200);
        assert!(config.coin_scan.contains(u64::MAX));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "network_id": 2,
                "coin_scan": {{ "start": 10, "end": 20 }},
                "tx_track": {{ "start": 10, "end": null }},
                "db_file_name": "wallet.db"
            }}"#
        )
        .unwrap();

        let config = WalletConfig::from_file(file.path()).unwrap();
        assert_eq!(config.network_id, NetworkId::TestNet);
        assert_eq!(config.chain, ChainParams::default());
        assert!(config.coin_scan.contains(20));
        assert!(!config.coin_scan.contains(21));
        assert_eq!(config.db_file_name, PathBuf::from("wallet.db"));
    }

    #[test]
    fn json_round_trip() {
        let config = WalletConfig::regtest().with_coin_scan(HeightRange::new(5, Some(9))).with_db_file_name("x.db");
        assert_eq!(WalletConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
    }

    #[test]
    fn invalid_configurations() {
        let inverted = WalletConfig::default().with_tx_track(HeightRange::new(10, Some(5)));
        assert_matches!(inverted.validate(), Err(Error::Config(_)));

        let zero_ring = WalletConfig::default().with_chain_params(ChainParams {
            txo_ring_size: 0,
            ..Default::default()
        });
        assert_matches!(zero_ring.validate(), Err(Error::Config(_)));

        assert_matches!(WalletConfig::from_json("{ \"network_id\": 9 }"), Err(Error::Config(_)));
        assert_matches!(WalletConfig::from_file("/nonexistent/abel.json"), Err(Error::Io(_)));
    }
}
