//! Address codec tests against accounts.

use std::sync::Arc;

use abel_wallet::account::{Account, AccountPrivacyLevel};
use abel_wallet::address::{ShortAddressPayload, ABEL_ADDRESS_CHECKSUM_LEN};
use abel_wallet::crypto::{CryptoScheme, PrivacyLevel};
use abel_wallet::test_utils::MockSchemeProvider;
use abel_wallet::{AbelAddress, CryptoAddress, Error, NetworkId, ShortAbelAddress};
use assert_matches::assert_matches;

fn abel_address(level: AccountPrivacyLevel, network: NetworkId) -> (Arc<MockSchemeProvider>, AbelAddress) {
    let provider = Arc::new(MockSchemeProvider::new());
    let (account, _) = Account::new(level, provider.clone()).unwrap();
    let address = account.generate_abel_address(network).unwrap();
    (provider, address)
}

#[test]
fn test_abel_address_lengths_and_parse() {
    let cases = [
        (AccountPrivacyLevel::FullPrivacyOld, CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre, 10729),
        (AccountPrivacyLevel::FullPrivacy, CryptoScheme::PqRingCtX, PrivacyLevel::RingCt, 10859),
        (AccountPrivacyLevel::Pseudonym, CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym, 231),
    ];
    for (level, scheme, privacy_level, len) in cases {
        let (provider, address) = abel_address(level, NetworkId::TestNet);
        assert_eq!(address.as_bytes().len(), len);
        assert_eq!(address.crypto_scheme(), scheme);
        assert_eq!(address.privacy_level(), privacy_level);
        assert_eq!(address.as_bytes()[0], NetworkId::TestNet.as_u8());

        let parsed = AbelAddress::from_hex(&address.to_hex(), provider.as_ref()).unwrap();
        assert_eq!(parsed, address);
        assert_eq!(parsed.network(), NetworkId::TestNet);
        assert_eq!(parsed.checksum().len(), ABEL_ADDRESS_CHECKSUM_LEN);

        let inner = CryptoAddress::parse(address.crypto_address().as_bytes(), provider.as_ref()).unwrap();
        assert_eq!(&inner, address.crypto_address());
    }
}

#[test]
fn test_abel_address_rejects_corruption() {
    let (provider, address) = abel_address(AccountPrivacyLevel::Pseudonym, NetworkId::MainNet);
    let bytes = address.as_bytes().to_vec();

    let mut bad_checksum = bytes.clone();
    *bad_checksum.last_mut().unwrap() ^= 1;
    assert_matches!(AbelAddress::parse(&bad_checksum, provider.as_ref()), Err(Error::InvalidAddress(_)));

    let mut bad_network = bytes.clone();
    bad_network[0] = 9;
    assert_matches!(AbelAddress::parse(&bad_network, provider.as_ref()), Err(Error::InvalidAddress(_)));

    assert_matches!(AbelAddress::parse(&bytes[..bytes.len() - 1], provider.as_ref()), Err(Error::InvalidAddress(_)));
    assert_matches!(AbelAddress::parse(&bytes[..10], provider.as_ref()), Err(Error::InvalidAddress(_)));
    assert_matches!(AbelAddress::from_hex("zz", provider.as_ref()), Err(Error::Hex(_)));
}

#[test]
fn test_short_address_v1_for_legacy_scheme() {
    let (_, address) = abel_address(AccountPrivacyLevel::FullPrivacyOld, NetworkId::RegressionNet);
    let short = ShortAbelAddress::from_abel_address(&address);

    assert_eq!(short.as_bytes().len(), ShortAbelAddress::V1_LEN);
    assert_eq!(short.as_bytes().len(), 66);
    assert_eq!(short.as_bytes()[0], 0xAB);
    assert_eq!(short.as_bytes()[1], 0xE1 + NetworkId::RegressionNet.as_u8());
    assert_eq!(
        short.payload(),
        ShortAddressPayload::V1 {
            network: NetworkId::RegressionNet,
        }
    );
    assert_eq!(short.fingerprint(), address.crypto_address().fingerprint());
    assert!(short.matches(&address));

    let parsed = ShortAbelAddress::from_hex(&short.to_hex()).unwrap();
    assert_eq!(parsed, short);
}

#[test]
fn test_short_address_v2_for_current_scheme() {
    for level in [AccountPrivacyLevel::FullPrivacy, AccountPrivacyLevel::Pseudonym] {
        let (_, address) = abel_address(level, NetworkId::MainNet);
        let short = ShortAbelAddress::from_abel_address(&address);

        assert_eq!(short.as_bytes().len(), ShortAbelAddress::V2_LEN);
        assert_eq!(short.as_bytes().len(), 68);
        assert_eq!(&short.as_bytes()[..2], &[0xABu8, 0xE0]);
        let ShortAddressPayload::V2(metadata) = short.payload() else {
            panic!("current scheme addresses use the v2 layout");
        };
        assert_eq!(metadata.network, NetworkId::MainNet);
        assert_eq!(metadata.crypto_scheme, CryptoScheme::PqRingCtX);
        assert_eq!(metadata.privacy_level, level.privacy_level());
        assert!(short.matches(&address));
        assert_eq!(ShortAbelAddress::parse(short.as_bytes()).unwrap(), short);
    }
}

#[test]
fn test_short_address_does_not_match_other_addresses() {
    let provider = Arc::new(MockSchemeProvider::new());
    let (account, _) = Account::new(AccountPrivacyLevel::FullPrivacy, provider).unwrap();
    let first = account.generate_abel_address(NetworkId::MainNet).unwrap();
    let second = account.generate_abel_address(NetworkId::MainNet).unwrap();
    let short = ShortAbelAddress::from_abel_address(&first);

    assert!(!short.matches(&second));
    let same_keys_other_network = AbelAddress::new(NetworkId::TestNet, first.crypto_address().clone());
    assert!(!short.matches(&same_keys_other_network));
}

#[test]
fn test_short_address_rejects_malformed_input() {
    let (_, address) = abel_address(AccountPrivacyLevel::Pseudonym, NetworkId::MainNet);
    let bytes = ShortAbelAddress::from_abel_address(&address).as_bytes().to_vec();

    let mut bad_prefix = bytes.clone();
    bad_prefix[0] = 0;
    assert_matches!(ShortAbelAddress::parse(&bad_prefix), Err(Error::InvalidAddress(_)));

    let mut bad_marker = bytes.clone();
    bad_marker[1] = 0xE1;
    assert_matches!(ShortAbelAddress::parse(&bad_marker), Err(Error::InvalidAddress(_)));

    assert_matches!(ShortAbelAddress::parse(&bytes[..67]), Err(Error::InvalidAddress(_)));
    assert_matches!(ShortAbelAddress::parse(&[]), Err(Error::InvalidAddress(_)));
}
