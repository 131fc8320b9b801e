//! Account tests

use std::sync::Arc;

use abel_wallet::account::{Account, AccountKind, AccountPrivacyLevel, RootSeedViewAccount, ViewKeyMaterial};
use abel_wallet::chain::BlockSource;
use abel_wallet::coin::{CoinId, CoinRing};
use abel_wallet::crypto::{CryptoSeed, PrivacyLevel, RingContext, SchemeProvider, SeedKind};
use abel_wallet::test_utils::{mock_txo, MockChain, MockSchemeProvider, MockTx};
use abel_wallet::{Error, SpendAccount, ViewAccount};
use assert_matches::assert_matches;

fn provider() -> Arc<MockSchemeProvider> {
    Arc::new(MockSchemeProvider::new())
}

fn pay(account: &Account, value: u64) -> Vec<u8> {
    let address = account.generate_address().unwrap();
    mock_txo(address.privacy_level(), address.coin_address().as_bytes(), value)
}

/// A complete ring-group window whose first block pays `txo` in its second transaction.
fn window_paying(txo: Vec<u8>) -> (MockChain, CoinId, Vec<Vec<u8>>) {
    let mut chain = MockChain::new();
    let block = chain.push_block(Vec::new(), vec![MockTx::outputs(vec![txo])]);
    chain.push_empty_blocks(2);
    let blocks = (0..3).map(|h| chain.block_bytes_by_height(h).unwrap()).collect();
    (chain, block.txs[1].coin_id(0), blocks)
}

fn ring_containing(provider: &MockSchemeProvider, blocks: &[Vec<u8>], coin_id: &CoinId) -> CoinRing {
    provider
        .build_rings_from_blocks(blocks)
        .unwrap()
        .into_iter()
        .find(|ring| ring.index_of(coin_id).is_some())
        .unwrap()
}

#[test]
fn test_account_kinds_per_privacy_level() {
    let provider = provider();
    let cases = [
        (AccountPrivacyLevel::FullPrivacyOld, AccountKind::KeyBacked, SeedKind::Randomized, 132),
        (AccountPrivacyLevel::FullPrivacy, AccountKind::SeedBacked, SeedKind::Root, 261),
        (AccountPrivacyLevel::Pseudonym, AccountKind::SeedBacked, SeedKind::Root, 133),
    ];
    for (level, kind, seed_kind, seed_len) in cases {
        let (account, seed) = Account::new(level, provider.clone()).unwrap();
        assert_eq!(account.kind(), kind);
        assert_eq!(account.privacy_level(), level.privacy_level());
        assert_eq!(seed.len(), seed_len);
        assert_eq!(CryptoSeed::deserialize(&seed).unwrap().kind(), seed_kind);
        assert_eq!(account.dump(), seed);
    }
}

#[test]
fn test_seed_backed_addresses_are_fresh_and_key_backed_fixed() {
    let provider = provider();
    let (seed_backed, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider.clone()).unwrap();
    let a = seed_backed.generate_address().unwrap();
    let b = seed_backed.generate_address().unwrap();
    assert_ne!(a, b);
    assert_ne!(a.fingerprint(), b.fingerprint());

    let (key_backed, _) = Account::new(AccountPrivacyLevel::FullPrivacyOld, provider.clone()).unwrap();
    assert_eq!(key_backed.generate_address().unwrap(), key_backed.generate_address().unwrap());
}

#[test]
fn test_restored_account_receives_coins() {
    let provider = provider();
    for level in [AccountPrivacyLevel::FullPrivacyOld, AccountPrivacyLevel::FullPrivacy, AccountPrivacyLevel::Pseudonym] {
        let (account, seed) = Account::new(level, provider.clone()).unwrap();
        let txo = pay(&account, 77);
        let restored = Account::from_seed_bytes(&seed, provider.clone()).unwrap();
        assert_eq!(restored.kind(), account.kind());
        assert_eq!(restored.receive_coin(1, &txo).unwrap(), Some(77));
    }
}

#[test]
fn test_receive_coin_filters_by_privacy_level() {
    let provider = provider();
    let (full, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider.clone()).unwrap();
    let (pseudo, _) = Account::new(AccountPrivacyLevel::Pseudonym, provider.clone()).unwrap();

    let to_pseudo = pay(&pseudo, 5);
    let calls = provider.call_count();
    assert_eq!(full.receive_coin(1, &to_pseudo).unwrap(), None);
    // Only the privacy level was read.
    assert_eq!(provider.call_count(), calls + 1);

    let (other, _) = Account::new(AccountPrivacyLevel::Pseudonym, provider.clone()).unwrap();
    assert_eq!(other.receive_coin(1, &to_pseudo).unwrap(), None);
    assert_eq!(pseudo.receive_coin(1, &to_pseudo).unwrap(), Some(5));
    assert_matches!(pseudo.receive_coin(1, &[]), Err(Error::Provider(_)));
}

#[test]
fn test_view_account_from_exported_material() {
    let provider = provider();
    let (account, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider.clone()).unwrap();
    let ViewKeyMaterial::RootSeeds {
        serial_number_key_seed,
        value_key_seed,
        detector_key,
    } = account.view_key_material()
    else {
        panic!("seed-backed account exports root seed material");
    };
    let view = RootSeedViewAccount::new(
        provider.clone(),
        PrivacyLevel::RingCt,
        serial_number_key_seed,
        value_key_seed,
        detector_key,
    )
    .unwrap();
    assert_eq!(view.receive_coin(1, &pay(&account, 9)).unwrap(), Some(9));

    assert_matches!(
        RootSeedViewAccount::new(provider.clone(), PrivacyLevel::Pseudonym, serial_number_key_seed, None, detector_key),
        Err(Error::MismatchedSchemePrivacyLevel)
    );
    assert_matches!(
        RootSeedViewAccount::new(provider, PrivacyLevel::RingCtPre, None, None, detector_key),
        Err(Error::InvalidPrivacyLevel)
    );
}

#[test]
fn test_serial_numbers_agree_for_blocks_and_serialized_ring() {
    let provider = provider();
    for level in [AccountPrivacyLevel::FullPrivacyOld, AccountPrivacyLevel::FullPrivacy, AccountPrivacyLevel::Pseudonym] {
        let (account, _) = Account::new(level, provider.clone()).unwrap();
        let (_chain, coin_id, blocks) = window_paying(pay(&account, 1));
        let ring = ring_containing(&provider, &blocks, &coin_id);

        let from_blocks = account.generate_serial_numbers(&[coin_id], RingContext::Blocks(&blocks)).unwrap();
        let serialized = ring.serialize();
        let from_ring =
            account.generate_serial_numbers(&[coin_id], RingContext::SerializedRing(&serialized)).unwrap();
        assert_eq!(from_blocks, from_ring);
        assert_eq!(from_blocks.len(), 1);
        assert!(!from_blocks[0].is_empty());

        assert!(account.generate_serial_numbers(&[], RingContext::Blocks(&blocks)).unwrap().is_empty());
    }
}

#[test]
fn test_public_rand_rederivation_matches_original_address() {
    let provider = provider();
    let (account, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider.clone()).unwrap();
    let Account::SeedBacked(seed_backed) = &account else {
        panic!("full privacy accounts are seed-backed");
    };
    let address = account.generate_address().unwrap();

    let keys = seed_backed.regenerate_keys_for_address(&address).unwrap();
    assert_eq!(keys.crypto_address, address.as_bytes());

    let public_rand = provider.extract_public_rand(address.as_bytes()).unwrap();
    let randomized = seed_backed.root_seed().rederive_randomized(&public_rand, provider.as_ref()).unwrap();
    assert_eq!(randomized.public_rand(), Some(&public_rand[..]));
    let derived = provider.derive_keys_and_address(&CryptoSeed::Randomized(randomized.clone())).unwrap();
    assert_eq!(derived, keys);

    // The one-time key set spends the same coin with the same serial number.
    let one_time = Account::from_seed(CryptoSeed::Randomized(randomized), provider.clone()).unwrap();
    assert_eq!(one_time.kind(), AccountKind::KeyBacked);
    assert_eq!(one_time.generate_address().unwrap(), address);
    let txo = mock_txo(address.privacy_level(), address.coin_address().as_bytes(), 3);
    assert_eq!(one_time.receive_coin(1, &txo).unwrap(), Some(3));

    let (_chain, coin_id, blocks) = window_paying(txo);
    let ring = RingContext::Blocks(&blocks);
    assert_eq!(
        account.generate_serial_numbers(&[coin_id], ring).unwrap(),
        one_time.generate_serial_numbers(&[coin_id], ring).unwrap()
    );
}

#[test]
fn test_foreign_address_is_not_regenerated() {
    let provider = provider();
    let (account, _) = Account::new(AccountPrivacyLevel::Pseudonym, provider.clone()).unwrap();
    let (other, _) = Account::new(AccountPrivacyLevel::Pseudonym, provider.clone()).unwrap();
    let Account::SeedBacked(seed_backed) = &account else {
        panic!("pseudonymous accounts are seed-backed");
    };

    let foreign = other.generate_address().unwrap();
    assert_matches!(seed_backed.regenerate_keys_for_address(&foreign), Err(Error::InvalidAddress(_)));

    let (full, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider).unwrap();
    let wrong_level = full.generate_address().unwrap();
    assert_matches!(seed_backed.regenerate_keys_for_address(&wrong_level), Err(Error::MismatchedSchemePrivacyLevel));
}

#[test]
fn test_corrupted_seed_bytes_are_rejected() {
    let provider = provider();
    let (_, seed) = Account::new(AccountPrivacyLevel::FullPrivacy, provider.clone()).unwrap();
    assert_matches!(
        Account::from_seed_bytes(&seed[..seed.len() - 1], provider.clone()),
        Err(Error::InvalidSeedLength { got: 260, .. })
    );
    assert_matches!(Account::from_seed_bytes(&[], provider), Err(Error::InvalidCryptoScheme));
}
