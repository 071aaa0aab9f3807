//! Ledger identities and the entity id checksum.
//!
//! The checksum is a five-letter suffix that binds an entity id to the network it was issued
//! on, so `0.0.123` renders as `0.0.123-vfmkw` on mainnet and `0.0.123-esxsf` on testnet.
//! The algorithm must match every other client byte for byte.
//!
//! # Algorithm
//!
//! ```text
//! d[i]  = digit value of address char i ('.' counts as 10)
//! sd0   = sum of d at even positions        mod 11
//! sd1   = sum of d at odd positions         mod 11
//! sd    = fold(w·acc + d[i])                mod 26^3
//! sh    = fold(w·acc + h[i])                mod 26^5   (h = ledger bytes ++ 6 zero bytes)
//! c     = ((((len mod 5)·11 + sd0)·11 + sd1)·26^3 + sd + sh) mod 26^5
//! cp    = c·1_000_003 mod 26^5
//! out   = cp written as five base-26 letters, most significant first
//! ```

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdError;

/// Length of a rendered checksum.
pub const CHECKSUM_LEN: usize = 5;

/// Weight of each digit in the positional sums. Coprime to 26^5.
const WEIGHT: u64 = 31;

/// 26^3, three base-26 digits.
const P3: u64 = 26 * 26 * 26;

/// 26^5, five base-26 digits.
const P5: u64 = 26 * 26 * 26 * 26 * 26;

/// Smallest prime above one million, used for the final permutation.
const PERMUTATION: u64 = 1_000_003;

/// Zero bytes appended to the ledger identity before hashing.
const LEDGER_PADDING: usize = 6;

/// Identity of a ledger network, mixed into checksum computation.
///
/// # Display
///
/// Known networks render as their name (`mainnet`, `testnet`, `previewnet`);
/// anything else renders as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerId(Cow<'static, [u8]>);

impl LedgerId {
    /// The production network.
    pub const MAINNET: Self = Self(Cow::Borrowed(&[0x00]));

    /// The public test network.
    pub const TESTNET: Self = Self(Cow::Borrowed(&[0x01]));

    /// The preview network.
    pub const PREVIEWNET: Self = Self(Cow::Borrowed(&[0x02]));

    /// Returns the mainnet ledger id.
    #[must_use]
    pub const fn mainnet() -> Self {
        Self::MAINNET
    }

    /// Returns the testnet ledger id.
    #[must_use]
    pub const fn testnet() -> Self {
        Self::TESTNET
    }

    /// Returns the previewnet ledger id.
    #[must_use]
    pub const fn previewnet() -> Self {
        Self::PREVIEWNET
    }

    /// Creates a ledger id from raw identity bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Cow::Owned(bytes.into()))
    }

    /// Returns the raw identity bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the network name for the well-known ledgers.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        match self.as_bytes() {
            [0x00] => Some("mainnet"),
            [0x01] => Some("testnet"),
            [0x02] => Some("previewnet"),
            _ => None,
        }
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&hex::encode(self.as_bytes())),
        }
    }
}

impl FromStr for LedgerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::MAINNET),
            "testnet" => Ok(Self::TESTNET),
            "previewnet" => Ok(Self::PREVIEWNET),
            _ => {
                let bytes = hex::decode(s).map_err(|_| IdError::UnknownLedger { input: s.to_owned() })?;
                if bytes.is_empty() {
                    return Err(IdError::UnknownLedger { input: s.to_owned() });
                }
                Ok(Self::from_bytes(bytes))
            },
        }
    }
}

impl Serialize for LedgerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LedgerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A five-letter lowercase checksum suffix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; CHECKSUM_LEN]);

impl Checksum {
    /// Returns the checksum letters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Constructors only admit ASCII lowercase letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.as_str())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Checksum {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; CHECKSUM_LEN] =
            s.as_bytes().try_into().map_err(|_| IdError::MalformedEntityId {
                input: s.to_owned(),
                reason: format!("checksum must be {CHECKSUM_LEN} characters"),
            })?;

        if !bytes.iter().all(u8::is_ascii_lowercase) {
            return Err(IdError::MalformedEntityId {
                input: s.to_owned(),
                reason: "checksum must be lowercase letters".to_owned(),
            });
        }

        Ok(Self(bytes))
    }
}

/// Computes the checksum of `shard.realm.num` for the given ledger.
#[must_use]
pub fn compute(ledger: &LedgerId, shard: u64, realm: u64, num: u64) -> Checksum {
    let address = format!("{shard}.{realm}.{num}");
    let digits = address.bytes().map(|b| if b == b'.' { 10 } else { u64::from(b - b'0') });

    let (mut sd0, mut sd1, mut sd) = (0u64, 0u64, 0u64);
    for (i, digit) in digits.enumerate() {
        sd = (WEIGHT * sd + digit) % P3;
        if i % 2 == 0 {
            sd0 = (sd0 + digit) % 11;
        } else {
            sd1 = (sd1 + digit) % 11;
        }
    }

    let sh = ledger
        .as_bytes()
        .iter()
        .copied()
        .chain(std::iter::repeat_n(0, LEDGER_PADDING))
        .fold(0u64, |acc, byte| (WEIGHT * acc + u64::from(byte)) % P5);

    let len = address.len() as u64;
    let c = ((((len % 5) * 11 + sd0) * 11 + sd1) * P3 + sd + sh) % P5;
    let mut cp = (c * PERMUTATION) % P5;

    let mut out = [0u8; CHECKSUM_LEN];
    for slot in out.iter_mut().rev() {
        *slot = b'a' + (cp % 26) as u8;
        cp /= 26;
    }
    Checksum(out)
}
