//! Signing capability.
//!
//! The engine never sees private key material. It names the keys a request needs as
//! [`KeyRef`]s and asks a [`Signer`] to produce a signature for each one over the frozen
//! body bytes.

use std::fmt;

use hiero_proto::proto;
use snafu::Snafu;

/// Signature scheme of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyAlgorithm {
    /// Ed25519.
    Ed25519,
    /// ECDSA over secp256k1.
    EcdsaSecp256k1,
}

/// Reference to a public key whose holder must sign.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyRef {
    algorithm: KeyAlgorithm,
    public_key: Vec<u8>,
}

impl KeyRef {
    /// Creates an Ed25519 key reference from raw public key bytes.
    #[must_use]
    pub fn ed25519(public_key: impl Into<Vec<u8>>) -> Self {
        Self { algorithm: KeyAlgorithm::Ed25519, public_key: public_key.into() }
    }

    /// Creates a secp256k1 key reference from compressed public key bytes.
    #[must_use]
    pub fn ecdsa_secp256k1(public_key: impl Into<Vec<u8>>) -> Self {
        Self { algorithm: KeyAlgorithm::EcdsaSecp256k1, public_key: public_key.into() }
    }

    /// Returns the signature scheme.
    #[must_use]
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Returns the public key as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.public_key)
    }
}

impl fmt::Debug for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyRef({:?}, {})", self.algorithm, self.to_hex())
    }
}

impl fmt::Display for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Failure reported by a [`Signer`].
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("{message}"))]
pub struct SignerError {
    /// Failure description.
    pub message: String,
}

/// Produces signatures for keys it holds.
pub trait Signer: Send + Sync + fmt::Debug {
    /// Returns true if this signer can sign for `key`.
    fn has_key(&self, key: &KeyRef) -> bool;

    /// Signs `message` with the private half of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError`] if the key is not held or signing fails.
    fn sign(&self, message: &[u8], key: &KeyRef) -> Result<Vec<u8>, SignerError>;
}

/// One signature over a frozen body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePair {
    /// Key that signed.
    pub key: KeyRef,
    /// Signature bytes.
    pub signature: Vec<u8>,
}

impl From<&SignaturePair> for proto::SignaturePair {
    fn from(pair: &SignaturePair) -> Self {
        let signature = match pair.key.algorithm {
            KeyAlgorithm::Ed25519 => proto::signature_pair::Signature::Ed25519(pair.signature.clone()),
            KeyAlgorithm::EcdsaSecp256k1 => {
                proto::signature_pair::Signature::EcdsaSecp256k1(pair.signature.clone())
            },
        };
        Self { pub_key_prefix: pair.key.public_key.clone(), signature: Some(signature) }
    }
}

/// Builds the wire signature map for a set of signatures.
#[must_use]
pub fn signature_map(signatures: &[SignaturePair]) -> proto::SignatureMap {
    proto::SignatureMap { sig_pair: signatures.iter().map(proto::SignaturePair::from).collect() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ref_hex() {
        let key = KeyRef::ed25519(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(key.to_string(), "deadbeef");
        assert_eq!(format!("{key:?}"), "KeyRef(Ed25519, deadbeef)");
    }

    #[test]
    fn test_signature_pair_uses_algorithm_slot() {
        let pair = SignaturePair { key: KeyRef::ecdsa_secp256k1(vec![2, 1]), signature: vec![9; 4] };
        let wire = proto::SignaturePair::from(&pair);
        assert_eq!(wire.pub_key_prefix, vec![2, 1]);
        assert_eq!(wire.signature, Some(proto::signature_pair::Signature::EcdsaSecp256k1(vec![9; 4])));
    }

    #[test]
    fn test_signature_map_preserves_order() {
        let a = SignaturePair { key: KeyRef::ed25519(vec![1]), signature: vec![0xa] };
        let b = SignaturePair { key: KeyRef::ed25519(vec![2]), signature: vec![0xb] };
        let map = signature_map(&[a, b]);
        assert_eq!(map.sig_pair.len(), 2);
        assert_eq!(map.sig_pair[0].pub_key_prefix, vec![1]);
        assert_eq!(map.sig_pair[1].pub_key_prefix, vec![2]);
    }
}
