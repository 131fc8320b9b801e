//! Seed model
//!
//! A seed is either a long-term [`RootSeed`] or a one-time [`RandomizedSeed`].
//! Which key fields exist is fixed by the (scheme, privacy level) pair and is
//! carried by [`KeySeeds`], so a constructed seed is always complete.
//!
//! Serialized layout:
//!
//! ```text
//! scheme(4) || [privacy level(1)] || spend || [serial number || value] || [detector] || [publicRand]
//! ```
//!
//! The legacy scheme has no privacy level byte and no detector key, and its
//! seeds are always randomized without a `publicRand`.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use super::{CryptoScheme, PrivacyLevel, SchemeProvider, SecretBytes};
use crate::error::{Error, Result};

/// Root or randomized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedKind {
    Root,
    Randomized,
}

/// The key seed fields of one key hierarchy, per privacy level.
///
/// Variants cannot be built outside this crate; use the checked constructors.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySeeds {
    /// Legacy full privacy keys: spend and value seeds only.
    #[non_exhaustive]
    Legacy {
        coin_spend_key_seed: SecretBytes,
        coin_value_key_seed: SecretBytes,
    },
    #[non_exhaustive]
    FullPrivacy {
        coin_spend_key_seed: SecretBytes,
        coin_serial_number_key_seed: SecretBytes,
        coin_value_key_seed: SecretBytes,
        coin_detector_key: SecretBytes,
    },
    #[non_exhaustive]
    Pseudonym {
        coin_spend_key_seed: SecretBytes,
        coin_detector_key: SecretBytes,
    },
}

fn checked_field(scheme: CryptoScheme, field: &[u8]) -> Result<SecretBytes> {
    if field.len() != scheme.seed_len() {
        return Err(Error::CorruptedSeed);
    }
    Ok(SecretBytes::from_slice(field))
}

impl KeySeeds {
    pub fn legacy(spend: &[u8], value: &[u8]) -> Result<Self> {
        let scheme = CryptoScheme::PqRingCt;
        Ok(KeySeeds::Legacy {
            coin_spend_key_seed: checked_field(scheme, spend)?,
            coin_value_key_seed: checked_field(scheme, value)?,
        })
    }

    pub fn full_privacy(spend: &[u8], serial_number: &[u8], value: &[u8], detector: &[u8]) -> Result<Self> {
        let scheme = CryptoScheme::PqRingCtX;
        Ok(KeySeeds::FullPrivacy {
            coin_spend_key_seed: checked_field(scheme, spend)?,
            coin_serial_number_key_seed: checked_field(scheme, serial_number)?,
            coin_value_key_seed: checked_field(scheme, value)?,
            coin_detector_key: checked_field(scheme, detector)?,
        })
    }

    pub fn pseudonym(spend: &[u8], detector: &[u8]) -> Result<Self> {
        let scheme = CryptoScheme::PqRingCtX;
        Ok(KeySeeds::Pseudonym {
            coin_spend_key_seed: checked_field(scheme, spend)?,
            coin_detector_key: checked_field(scheme, detector)?,
        })
    }

    /// Build from optional fields, as found in loosely structured input.
    ///
    /// Missing required fields and fields the level does not allow both fail with
    /// [`Error::MismatchedSchemePrivacyLevel`]; present but empty or mis-sized fields
    /// fail with [`Error::CorruptedSeed`].
    pub fn from_parts(
        scheme: CryptoScheme,
        level: PrivacyLevel,
        spend: Option<&[u8]>,
        serial_number: Option<&[u8]>,
        value: Option<&[u8]>,
        detector: Option<&[u8]>,
    ) -> Result<Self> {
        if !scheme.supports(level) {
            return Err(Error::InvalidPrivacyLevel);
        }
        match (level, spend, serial_number, value, detector) {
            (PrivacyLevel::RingCtPre, Some(spend), None, Some(value), None) => Self::legacy(spend, value),
            (PrivacyLevel::RingCt, Some(spend), Some(sn), Some(value), Some(detector)) => {
                Self::full_privacy(spend, sn, value, detector)
            }
            (PrivacyLevel::Pseudonym, Some(spend), None, None, Some(detector)) => {
                Self::pseudonym(spend, detector)
            }
            _ => Err(Error::MismatchedSchemePrivacyLevel),
        }
    }

    pub fn generate<R: RngCore + CryptoRng>(
        scheme: CryptoScheme,
        level: PrivacyLevel,
        rng: &mut R,
    ) -> Result<Self> {
        if !scheme.supports(level) {
            return Err(Error::InvalidPrivacyLevel);
        }
        let mut draw = || {
            let mut field = vec![0u8; scheme.seed_len()];
            rng.fill_bytes(&mut field);
            field
        };
        match level {
            PrivacyLevel::RingCtPre => Self::legacy(&draw(), &draw()),
            PrivacyLevel::RingCt => Self::full_privacy(&draw(), &draw(), &draw(), &draw()),
            PrivacyLevel::Pseudonym => Self::pseudonym(&draw(), &draw()),
        }
    }

    pub fn crypto_scheme(&self) -> CryptoScheme {
        match self {
            KeySeeds::Legacy { .. } => CryptoScheme::PqRingCt,
            KeySeeds::FullPrivacy { .. } | KeySeeds::Pseudonym { .. } => CryptoScheme::PqRingCtX,
        }
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        match self {
            KeySeeds::Legacy { .. } => PrivacyLevel::RingCtPre,
            KeySeeds::FullPrivacy { .. } => PrivacyLevel::RingCt,
            KeySeeds::Pseudonym { .. } => PrivacyLevel::Pseudonym,
        }
    }

    pub fn spend_key_seed(&self) -> &[u8] {
        match self {
            KeySeeds::Legacy { coin_spend_key_seed, .. }
            | KeySeeds::FullPrivacy { coin_spend_key_seed, .. }
            | KeySeeds::Pseudonym { coin_spend_key_seed, .. } => coin_spend_key_seed.as_slice(),
        }
    }

    pub fn serial_number_key_seed(&self) -> Option<&[u8]> {
        match self {
            KeySeeds::FullPrivacy { coin_serial_number_key_seed, .. } => {
                Some(coin_serial_number_key_seed.as_slice())
            }
            KeySeeds::Legacy { .. } | KeySeeds::Pseudonym { .. } => None,
        }
    }

    pub fn value_key_seed(&self) -> Option<&[u8]> {
        match self {
            KeySeeds::Legacy { coin_value_key_seed, .. }
            | KeySeeds::FullPrivacy { coin_value_key_seed, .. } => Some(coin_value_key_seed.as_slice()),
            KeySeeds::Pseudonym { .. } => None,
        }
    }

    pub fn detector_key(&self) -> Option<&[u8]> {
        match self {
            KeySeeds::FullPrivacy { coin_detector_key, .. } | KeySeeds::Pseudonym { coin_detector_key, .. } => {
                Some(coin_detector_key.as_slice())
            }
            KeySeeds::Legacy { .. } => None,
        }
    }

    /// Header plus key fields, without any `publicRand`.
    fn write_to(&self, out: &mut Vec<u8>) {
        let scheme = self.crypto_scheme();
        out.extend_from_slice(&scheme.to_bytes());
        if scheme.has_privacy_level_byte() {
            out.push(self.privacy_level() as u8);
        }
        out.extend_from_slice(self.spend_key_seed());
        if let Some(sn) = self.serial_number_key_seed() {
            out.extend_from_slice(sn);
        }
        if let Some(value) = self.value_key_seed() {
            out.extend_from_slice(value);
        }
        if let Some(detector) = self.detector_key() {
            out.extend_from_slice(detector);
        }
    }

    fn field_count(level: PrivacyLevel) -> usize {
        match level {
            PrivacyLevel::RingCtPre => 2,
            PrivacyLevel::RingCt => 4,
            PrivacyLevel::Pseudonym => 2,
        }
    }

    /// Split `body` into key fields for `level`. `body` must be exactly sized.
    fn read_fields(scheme: CryptoScheme, level: PrivacyLevel, body: &[u8]) -> Result<Self> {
        let fields: Vec<&[u8]> = body.chunks(scheme.seed_len()).collect();
        match (level, fields.as_slice()) {
            (PrivacyLevel::RingCtPre, [spend, value]) => Self::legacy(spend, value),
            (PrivacyLevel::RingCt, [spend, sn, value, detector]) => {
                Self::full_privacy(spend, sn, value, detector)
            }
            (PrivacyLevel::Pseudonym, [spend, detector]) => Self::pseudonym(spend, detector),
            _ => Err(Error::CorruptedSeed),
        }
    }
}

impl fmt::Debug for KeySeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySeeds")
            .field("scheme", &self.crypto_scheme())
            .field("privacy_level", &self.privacy_level())
            .finish_non_exhaustive()
    }
}

/// Long-term seed from which any number of one-time key sets are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSeed {
    keys: KeySeeds,
}

impl RootSeed {
    pub fn new(keys: KeySeeds) -> Result<Self> {
        if matches!(keys, KeySeeds::Legacy { .. }) {
            return Err(Error::MismatchedSeedType);
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &KeySeeds {
        &self.keys
    }

    pub fn crypto_scheme(&self) -> CryptoScheme {
        self.keys.crypto_scheme()
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        self.keys.privacy_level()
    }

    /// Derive the randomized seed bound to `public_rand`.
    ///
    /// The derivation itself is performed by the provider and is deterministic in
    /// `(self, public_rand)`.
    pub fn rederive_randomized(
        &self,
        public_rand: &[u8],
        provider: &dyn SchemeProvider,
    ) -> Result<RandomizedSeed> {
        let expected = self.crypto_scheme().public_rand_len().ok_or(Error::MismatchedSeedType)?;
        if public_rand.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "publicRand must be {} bytes, got {}",
                expected,
                public_rand.len()
            )));
        }
        let keys = provider.derive_randomized_seeds(self, public_rand)?;
        if keys.crypto_scheme() != self.crypto_scheme() || keys.privacy_level() != self.privacy_level() {
            return Err(Error::MismatchedSchemePrivacyLevel);
        }
        RandomizedSeed::new(keys, Some(public_rand.to_vec()))
    }
}

/// One-time seed, tied to a `publicRand` for the current scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomizedSeed {
    keys: KeySeeds,
    public_rand: Option<Vec<u8>>,
}

impl RandomizedSeed {
    pub fn new(keys: KeySeeds, public_rand: Option<Vec<u8>>) -> Result<Self> {
        match (keys.crypto_scheme().public_rand_len(), &public_rand) {
            (None, None) => {}
            (None, Some(_)) => return Err(Error::MismatchedSeedType),
            (Some(_), None) => return Err(Error::MismatchedSchemePrivacyLevel),
            (Some(len), Some(rand)) if rand.len() != len => return Err(Error::CorruptedSeed),
            (Some(_), Some(_)) => {}
        }
        Ok(Self { keys, public_rand })
    }

    pub fn keys(&self) -> &KeySeeds {
        &self.keys
    }

    pub fn public_rand(&self) -> Option<&[u8]> {
        self.public_rand.as_deref()
    }

    pub fn crypto_scheme(&self) -> CryptoScheme {
        self.keys.crypto_scheme()
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        self.keys.privacy_level()
    }
}

/// A validated seed of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoSeed {
    Root(RootSeed),
    Randomized(RandomizedSeed),
}

impl CryptoSeed {
    pub fn kind(&self) -> SeedKind {
        match self {
            CryptoSeed::Root(_) => SeedKind::Root,
            CryptoSeed::Randomized(_) => SeedKind::Randomized,
        }
    }

    pub fn keys(&self) -> &KeySeeds {
        match self {
            CryptoSeed::Root(seed) => seed.keys(),
            CryptoSeed::Randomized(seed) => seed.keys(),
        }
    }

    pub fn crypto_scheme(&self) -> CryptoScheme {
        self.keys().crypto_scheme()
    }

    pub fn privacy_level(&self) -> PrivacyLevel {
        self.keys().privacy_level()
    }

    pub fn public_rand(&self) -> Option<&[u8]> {
        match self {
            CryptoSeed::Root(_) => None,
            CryptoSeed::Randomized(seed) => seed.public_rand(),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::serialized_len(
            self.crypto_scheme(),
            self.privacy_level(),
            self.public_rand().is_some(),
        ));
        self.keys().write_to(&mut out);
        if let Some(public_rand) = self.public_rand() {
            out.extend_from_slice(public_rand);
        }
        out
    }

    /// Exact serialized length for a layout.
    pub fn serialized_len(scheme: CryptoScheme, level: PrivacyLevel, with_public_rand: bool) -> usize {
        let header = CryptoScheme::SERIALIZE_SIZE + usize::from(scheme.has_privacy_level_byte());
        let body = KeySeeds::field_count(level) * scheme.seed_len();
        let rand = match (with_public_rand, scheme.public_rand_len()) {
            (true, Some(len)) => len,
            _ => 0,
        };
        header + body + rand
    }

    /// Parse a serialized seed.
    ///
    /// Legacy seeds parse as randomized seeds without `publicRand`. Current-scheme
    /// seeds parse as root or randomized depending on whether the trailing
    /// `publicRand` is present; no other length is accepted.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let scheme = CryptoScheme::from_bytes(data)?;
        let mut offset = CryptoScheme::SERIALIZE_SIZE;
        let level = if scheme.has_privacy_level_byte() {
            let byte = *data.get(offset).ok_or(Error::InvalidSeedLength {
                got: data.len(),
                expected: vec![offset + 1],
            })?;
            offset += 1;
            PrivacyLevel::try_from(byte)?
        } else {
            PrivacyLevel::RingCtPre
        };
        if !scheme.supports(level) {
            return Err(Error::InvalidPrivacyLevel);
        }

        let root_len = Self::serialized_len(scheme, level, false);
        let body_end = root_len;
        match scheme.public_rand_len() {
            None if data.len() == root_len => {
                let keys = KeySeeds::read_fields(scheme, level, &data[offset..body_end])?;
                Ok(CryptoSeed::Randomized(RandomizedSeed::new(keys, None)?))
            }
            Some(_) if data.len() == root_len => {
                let keys = KeySeeds::read_fields(scheme, level, &data[offset..body_end])?;
                Ok(CryptoSeed::Root(RootSeed::new(keys)?))
            }
            Some(rand_len) if data.len() == root_len + rand_len => {
                let keys = KeySeeds::read_fields(scheme, level, &data[offset..body_end])?;
                let public_rand = data[body_end..].to_vec();
                Ok(CryptoSeed::Randomized(RandomizedSeed::new(keys, Some(public_rand))?))
            }
            rand_len => Err(Error::InvalidSeedLength {
                got: data.len(),
                expected: match rand_len {
                    None => vec![root_len],
                    Some(len) => vec![root_len, root_len + len],
                },
            }),
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::deserialize(&hex::decode(s)?)
    }
}

/// Loosely structured seed fields, as read from an external record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedParts {
    pub kind: SeedKind,
    pub crypto_scheme: CryptoScheme,
    pub privacy_level: PrivacyLevel,
    pub coin_spend_key_seed: Option<Vec<u8>>,
    pub coin_serial_number_key_seed: Option<Vec<u8>>,
    pub coin_value_key_seed: Option<Vec<u8>>,
    pub coin_detector_key: Option<Vec<u8>>,
    pub public_rand: Option<Vec<u8>>,
}

impl SeedParts {
    pub fn into_seed(self) -> Result<CryptoSeed> {
        let keys = KeySeeds::from_parts(
            self.crypto_scheme,
            self.privacy_level,
            self.coin_spend_key_seed.as_deref(),
            self.coin_serial_number_key_seed.as_deref(),
            self.coin_value_key_seed.as_deref(),
            self.coin_detector_key.as_deref(),
        )?;
        match self.kind {
            SeedKind::Root if self.public_rand.is_some() => Err(Error::MismatchedSeedType),
            SeedKind::Root => Ok(CryptoSeed::Root(RootSeed::new(keys)?)),
            SeedKind::Randomized => Ok(CryptoSeed::Randomized(RandomizedSeed::new(keys, self.public_rand)?)),
        }
    }

    /// Validate and serialize.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(self.clone().into_seed()?.serialize())
    }
}

impl From<&CryptoSeed> for SeedParts {
    fn from(seed: &CryptoSeed) -> Self {
        let keys = seed.keys();
        Self {
            kind: seed.kind(),
            crypto_scheme: keys.crypto_scheme(),
            privacy_level: keys.privacy_level(),
            coin_spend_key_seed: Some(keys.spend_key_seed().to_vec()),
            coin_serial_number_key_seed: keys.serial_number_key_seed().map(<[u8]>::to_vec),
            coin_value_key_seed: keys.value_key_seed().map(<[u8]>::to_vec),
            coin_detector_key: keys.detector_key().map(<[u8]>::to_vec),
            public_rand: seed.public_rand().map(<[u8]>::to_vec),
        }
    }
}

/// Draw a fresh seed from the operating system RNG.
///
/// The legacy scheme yields a randomized seed without `publicRand`; the current
/// scheme yields a root seed.
pub fn generate_seed(scheme: CryptoScheme, level: PrivacyLevel) -> Result<CryptoSeed> {
    generate_seed_with_rng(scheme, level, &mut OsRng)
}

pub fn generate_seed_with_rng<R: RngCore + CryptoRng>(
    scheme: CryptoScheme,
    level: PrivacyLevel,
    rng: &mut R,
) -> Result<CryptoSeed> {
    let keys = KeySeeds::generate(scheme, level, rng)?;
    debug!(%scheme, %level, "generated seed");
    match scheme {
        CryptoScheme::PqRingCt => Ok(CryptoSeed::Randomized(RandomizedSeed::new(keys, None)?)),
        CryptoScheme::PqRingCtX => Ok(CryptoSeed::Root(RootSeed::new(keys)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{PUBLIC_RAND_BYTES_LEN, SEED_BYTES_LEN};
    use assert_matches::assert_matches;

    const SUPPORTED: [(CryptoScheme, PrivacyLevel); 3] = [
        (CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre),
        (CryptoScheme::PqRingCtX, PrivacyLevel::RingCt),
        (CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym),
    ];

    #[test]
    fn serialized_lengths() {
        let l = SEED_BYTES_LEN;
        let r = PUBLIC_RAND_BYTES_LEN;
        assert_eq!(CryptoSeed::serialized_len(CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre, false), 4 + 2 * l);
        assert_eq!(CryptoSeed::serialized_len(CryptoScheme::PqRingCtX, PrivacyLevel::RingCt, false), 5 + 4 * l);
        assert_eq!(CryptoSeed::serialized_len(CryptoScheme::PqRingCtX, PrivacyLevel::RingCt, true), 5 + 4 * l + r);
        assert_eq!(CryptoSeed::serialized_len(CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym, true), 5 + 2 * l + r);
    }

    #[test]
    fn generated_seeds_round_trip() {
        for (scheme, level) in SUPPORTED {
            let seed = generate_seed(scheme, level).unwrap();
            assert_eq!(seed.crypto_scheme(), scheme);
            assert_eq!(seed.privacy_level(), level);
            let bytes = seed.serialize();
            assert_eq!(bytes.len(), CryptoSeed::serialized_len(scheme, level, false));
            assert_eq!(CryptoSeed::deserialize(&bytes).unwrap(), seed);
        }
    }

    #[test]
    fn legacy_seed_is_randomized_and_current_is_root() {
        let legacy = generate_seed(CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre).unwrap();
        assert_eq!(legacy.kind(), SeedKind::Randomized);
        assert!(legacy.public_rand().is_none());
        assert!(legacy.keys().detector_key().is_none());

        let pseudo = generate_seed(CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym).unwrap();
        assert_eq!(pseudo.kind(), SeedKind::Root);
        assert!(pseudo.keys().serial_number_key_seed().is_none());
        assert!(pseudo.keys().value_key_seed().is_none());
    }

    #[test]
    fn unsupported_pair_is_rejected() {
        assert_matches!(
            generate_seed(CryptoScheme::PqRingCt, PrivacyLevel::Pseudonym),
            Err(Error::InvalidPrivacyLevel)
        );
        assert_matches!(
            generate_seed(CryptoScheme::PqRingCtX, PrivacyLevel::RingCtPre),
            Err(Error::InvalidPrivacyLevel)
        );
    }

    #[test]
    fn randomized_seed_round_trips_with_public_rand() {
        let keys = KeySeeds::full_privacy(&[1; 64], &[2; 64], &[3; 64], &[4; 64]).unwrap();
        let seed = CryptoSeed::Randomized(RandomizedSeed::new(keys, Some(vec![9; 64])).unwrap());
        let bytes = seed.serialize();
        assert_eq!(&bytes[..5], &[1, 0, 0, 0, 1]);
        assert_eq!(&bytes[bytes.len() - 64..], &[9; 64][..]);

        let parsed = CryptoSeed::deserialize(&bytes).unwrap();
        assert_eq!(parsed.kind(), SeedKind::Randomized);
        assert_eq!(parsed, seed);

        let root = CryptoSeed::deserialize(&bytes[..bytes.len() - 64]).unwrap();
        assert_eq!(root.kind(), SeedKind::Root);
        assert_eq!(root.keys(), seed.keys());
    }

    #[test]
    fn deserialize_rejects_other_lengths() {
        let seed = generate_seed(CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym).unwrap();
        let mut bytes = seed.serialize();
        bytes.push(0);
        assert_matches!(
            CryptoSeed::deserialize(&bytes),
            Err(Error::InvalidSeedLength { got: 134, ref expected }) if expected == &vec![133, 197]
        );

        let legacy = generate_seed(CryptoScheme::PqRingCt, PrivacyLevel::RingCtPre).unwrap().serialize();
        assert_matches!(CryptoSeed::deserialize(&legacy[..legacy.len() - 1]), Err(Error::InvalidSeedLength { .. }));
        assert_matches!(CryptoSeed::deserialize(&[1, 0]), Err(Error::InvalidCryptoScheme));
        assert_matches!(CryptoSeed::deserialize(&[1, 0, 0, 0, 7]), Err(Error::InvalidPrivacyLevel));
    }

    #[test]
    fn incomplete_parts_fail_to_serialize() {
        let seed = generate_seed(CryptoScheme::PqRingCtX, PrivacyLevel::RingCt).unwrap();
        let parts = SeedParts::from(&seed);
        assert_eq!(parts.serialize().unwrap(), seed.serialize());

        let mut missing = parts.clone();
        missing.coin_value_key_seed = None;
        assert_matches!(missing.serialize(), Err(Error::MismatchedSchemePrivacyLevel));

        let mut empty = parts.clone();
        empty.coin_detector_key = Some(Vec::new());
        assert_matches!(empty.serialize(), Err(Error::CorruptedSeed));

        let mut rand_on_root = parts;
        rand_on_root.public_rand = Some(vec![0; 64]);
        assert_matches!(rand_on_root.serialize(), Err(Error::MismatchedSeedType));
    }

    #[test]
    fn randomized_invariants() {
        let legacy = KeySeeds::legacy(&[1; 64], &[2; 64]).unwrap();
        assert_matches!(RootSeed::new(legacy.clone()), Err(Error::MismatchedSeedType));
        assert_matches!(RandomizedSeed::new(legacy, Some(vec![0; 64])), Err(Error::MismatchedSeedType));

        let pseudo = KeySeeds::pseudonym(&[1; 64], &[2; 64]).unwrap();
        assert_matches!(RandomizedSeed::new(pseudo.clone(), None), Err(Error::MismatchedSchemePrivacyLevel));
        assert_matches!(RandomizedSeed::new(pseudo, Some(vec![0; 3])), Err(Error::CorruptedSeed));
    }

    #[test]
    fn hex_round_trip() {
        let seed = generate_seed(CryptoScheme::PqRingCtX, PrivacyLevel::Pseudonym).unwrap();
        assert_eq!(CryptoSeed::from_hex(&seed.to_hex()).unwrap(), seed);
    }
}
