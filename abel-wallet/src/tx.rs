//! Transaction descriptors and assembly.
//!
//! Inputs and outputs are ordered so that every pseudonymous entry follows all
//! privacy-preserving entries; the order within each group is preserved. The
//! proof construction itself is delegated to the scheme provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::Account;
use crate::address::AbelAddress;
use crate::coin::{Coin, CoinId};
use crate::crypto::{PrivacyLevel, SchemeProvider};
use crate::error::{Error, Result};
use crate::hash_types::{BlockHash, TxId};

/// An input to spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInDesc {
    pub block_height: u64,
    pub block_hash: BlockHash,
    pub tx_version: u32,
    pub coin_id: CoinId,
    pub txo: Vec<u8>,
    pub value: u64,
    pub serial_number: Vec<u8>,
}

impl TxInDesc {
    /// Describe a resolved coin as an input. Fails if the coin has no serial number yet.
    pub fn from_coin(coin: &Coin) -> Result<Self> {
        let serial_number = coin
            .serial_number
            .clone()
            .filter(|sn| !sn.is_empty())
            .ok_or_else(|| Error::InvalidParameter(format!("coin {} has no serial number", coin.coin_id)))?;
        Ok(Self {
            block_height: coin.block_height,
            block_hash: coin.block_hash,
            tx_version: coin.tx_version,
            coin_id: coin.coin_id,
            txo: coin.txo.clone(),
            value: coin.value,
            serial_number,
        })
    }
}

/// An output to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutDesc {
    pub address: AbelAddress,
    pub value: u64,
}

impl TxOutDesc {
    pub fn privacy_level(&self) -> PrivacyLevel {
        self.address.privacy_level()
    }
}

/// Everything the provider needs to build an unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxDesc {
    pub inputs: Vec<TxInDesc>,
    pub outputs: Vec<TxOutDesc>,
    pub fee: u64,
    pub memo: Vec<u8>,
    /// Serialized blocks of the ring windows the inputs were drawn from, by height.
    pub ring_blocks: BTreeMap<u64, Vec<u8>>,
}

impl TxDesc {
    pub fn input_total(&self) -> Result<u64> {
        checked_total(self.inputs.iter().map(|i| i.value), "input")
    }

    pub fn output_total(&self) -> Result<u64> {
        checked_total(self.outputs.iter().map(|o| o.value), "output")
    }
}

fn checked_total(mut values: impl Iterator<Item = u64>, what: &str) -> Result<u64> {
    values
        .try_fold(0u64, |total, value| total.checked_add(value))
        .ok_or_else(|| Error::InvalidParameter(format!("{} total overflows", what)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedRawTx {
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRawTx {
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
    pub txid: TxId,
}

/// Move pseudonymous inputs behind the private ones, keeping relative order.
pub fn sort_tx_in_descs(inputs: &mut Vec<TxInDesc>, provider: &dyn SchemeProvider) -> Result<()> {
    let mut keyed = inputs
        .drain(..)
        .map(|input| {
            let level = provider.txo_privacy_level(input.tx_version, &input.txo)?;
            Ok((level.is_pseudonym(), input))
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(pseudonym, _)| *pseudonym);
    inputs.extend(keyed.into_iter().map(|(_, input)| input));
    Ok(())
}

/// Move pseudonymous outputs behind the private ones, keeping relative order.
pub fn sort_tx_out_descs(outputs: &mut [TxOutDesc]) {
    outputs.sort_by_key(|output| output.privacy_level().is_pseudonym());
}

/// Validate and order a descriptor, then have the provider build the unsigned transaction.
pub fn generate_unsigned_raw_tx(mut desc: TxDesc, provider: &dyn SchemeProvider) -> Result<UnsignedRawTx> {
    if desc.inputs.is_empty() {
        return Err(Error::InvalidParameter("transaction has no inputs".into()));
    }
    if desc.outputs.is_empty() {
        return Err(Error::InvalidParameter("transaction has no outputs".into()));
    }
    let required =
        desc.output_total()?.checked_add(desc.fee).ok_or_else(|| Error::InvalidParameter("output total overflows".into()))?;
    let available = desc.input_total()?;
    if available != required {
        return Err(Error::InvalidParameter(format!(
            "inputs {} do not balance outputs plus fee {}",
            available, required
        )));
    }
    sort_tx_in_descs(&mut desc.inputs, provider)?;
    sort_tx_out_descs(&mut desc.outputs);
    debug!(inputs = desc.inputs.len(), outputs = desc.outputs.len(), fee = desc.fee, "building unsigned transaction");
    Ok(provider.generate_unsigned_raw_tx(&desc)?)
}

/// Sign an unsigned transaction with accounts that all share one backing kind.
pub fn generate_signed_raw_tx(
    unsigned: &UnsignedRawTx,
    signers: &[&Account],
    provider: &dyn SchemeProvider,
) -> Result<SignedRawTx> {
    let material = Account::signer_material(signers)?;
    let signed = provider.sign_raw_tx(unsigned, material)?;
    debug!(txid = %signed.txid, signers = signers.len(), "signed transaction");
    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountPrivacyLevel;
    use crate::address::CryptoAddress;
    use crate::chain::NetworkId;
    use crate::test_utils::{mock_txo, MockSchemeProvider};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn input(n: u8, level: PrivacyLevel) -> TxInDesc {
        TxInDesc {
            block_height: 1,
            block_hash: BlockHash::from_byte_array([0; 32]),
            tx_version: 1,
            coin_id: CoinId::new(TxId::from_byte_array([n; 32]), 0),
            txo: mock_txo(level, &[n; 193], 10),
            value: 10,
            serial_number: vec![n],
        }
    }

    fn output(provider: &MockSchemeProvider, level: PrivacyLevel, value: u64) -> TxOutDesc {
        let crypto = CryptoAddress::parse(&provider.random_crypto_address(level), provider).unwrap();
        TxOutDesc {
            address: AbelAddress::new(NetworkId::MainNet, crypto),
            value,
        }
    }

    #[test]
    fn inputs_sort_pseudonymous_last_and_stable() {
        let provider = MockSchemeProvider::new();
        let mut inputs = vec![
            input(1, PrivacyLevel::Pseudonym),
            input(2, PrivacyLevel::RingCt),
            input(3, PrivacyLevel::Pseudonym),
            input(4, PrivacyLevel::RingCt),
        ];
        sort_tx_in_descs(&mut inputs, &provider).unwrap();
        let order: Vec<u8> = inputs.iter().map(|i| i.coin_id.txid.as_bytes()[0]).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn outputs_sort_pseudonymous_last_and_stable() {
        let provider = MockSchemeProvider::new();
        let mut outputs = vec![
            output(&provider, PrivacyLevel::Pseudonym, 1),
            output(&provider, PrivacyLevel::RingCt, 2),
            output(&provider, PrivacyLevel::Pseudonym, 3),
            output(&provider, PrivacyLevel::RingCt, 4),
        ];
        sort_tx_out_descs(&mut outputs);
        let order: Vec<u64> = outputs.iter().map(|o| o.value).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn unbalanced_descriptor_is_rejected() {
        let provider = MockSchemeProvider::new();
        let desc = TxDesc {
            inputs: vec![input(1, PrivacyLevel::RingCt)],
            outputs: vec![output(&provider, PrivacyLevel::RingCt, 5)],
            fee: 1,
            memo: Vec::new(),
            ring_blocks: BTreeMap::new(),
        };
        assert_matches!(generate_unsigned_raw_tx(desc, &provider), Err(Error::InvalidParameter(_)));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let provider = MockSchemeProvider::new();
        let mut big = input(2, PrivacyLevel::RingCt);
        big.value = u64::MAX;
        let desc = TxDesc {
            inputs: vec![input(1, PrivacyLevel::RingCt), big],
            outputs: vec![output(&provider, PrivacyLevel::RingCt, u64::MAX), output(&provider, PrivacyLevel::RingCt, 1)],
            fee: 0,
            memo: Vec::new(),
            ring_blocks: BTreeMap::new(),
        };
        assert_matches!(desc.input_total(), Err(Error::InvalidParameter(msg)) if msg.contains("input"));
        assert_matches!(desc.output_total(), Err(Error::InvalidParameter(msg)) if msg.contains("output"));
        assert_matches!(generate_unsigned_raw_tx(desc, &provider), Err(Error::InvalidParameter(_)));

        let balanced = TxDesc {
            inputs: vec![input(1, PrivacyLevel::RingCt), input(2, PrivacyLevel::RingCt)],
            outputs: vec![output(&provider, PrivacyLevel::RingCt, 15)],
            fee: 5,
            memo: Vec::new(),
            ring_blocks: BTreeMap::new(),
        };
        assert_eq!(balanced.input_total().unwrap(), 20);
        assert_eq!(balanced.output_total().unwrap(), 15);
    }

    #[test]
    fn signing_requires_uniform_signers() {
        let provider = Arc::new(MockSchemeProvider::new());
        let unsigned = UnsignedRawTx {
            data: vec![1, 2, 3],
        };
        assert_matches!(
            generate_signed_raw_tx(&unsigned, &[], provider.as_ref()),
            Err(Error::InvalidParameter(_))
        );

        let (seed_backed, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider.clone()).unwrap();
        let (key_backed, _) = Account::new(AccountPrivacyLevel::FullPrivacyOld, provider.clone()).unwrap();
        assert_matches!(
            generate_signed_raw_tx(&unsigned, &[&seed_backed, &key_backed], provider.as_ref()),
            Err(Error::InvalidAccountType)
        );
        assert_matches!(
            generate_signed_raw_tx(&unsigned, &[&key_backed, &seed_backed], provider.as_ref()),
            Err(Error::InvalidAccountType)
        );

        let (other, _) = Account::new(AccountPrivacyLevel::Pseudonym, provider.clone()).unwrap();
        let signed = generate_signed_raw_tx(&unsigned, &[&seed_backed, &other], provider.as_ref()).unwrap();
        assert!(signed.data.starts_with(&unsigned.data));
    }
}
