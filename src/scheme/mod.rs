//! Signature scheme dispatch.
//!
//! `sign` and `verify` branch strictly on the key's algorithm tag; the
//! matches over [`PrivateKey`] and [`PublicKey`] are exhaustive, so adding a
//! key family without a scheme backend fails to compile.
//!
//! Every backend is handed the artifact digest marked as already hashed and
//! must not hash again. Signer and verifier sides of each backend use the
//! identical hash algorithm and the identical prehashed signing mode; a
//! mismatch there produces verification failures that look like forgeries
//! but are implementation bugs.

mod ecdsa_p256;
mod ed25519;
mod rsa_pss;

use crate::digest::{ArtifactDigest, HashAlgorithm};
use crate::error::{Error, Result};
use crate::key::{Key, KeyRole, PrivateKey, PublicKey};

/// The hash every scheme backend expects the digest to carry.
const SCHEME_HASH: HashAlgorithm = HashAlgorithm::Sha256;

/// Outcome of a cryptographic signature check.
///
/// All cryptographic failures (bad signature bytes, wrong key, tampered
/// artifact) collapse into `Invalid`; the reason string is diagnostic only
/// and must not drive control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid { reason: String },
}

impl Verdict {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Sign an artifact digest with a private key.
///
/// Signature encoding is scheme-dependent: raw 64 bytes for Ed25519, a
/// PSS-encoded block for RSA, DER (r,s) for ECDSA. The bytes carry no
/// algorithm tag.
pub fn sign(key: &Key, digest: &ArtifactDigest) -> Result<Vec<u8>> {
    let private = match key {
        Key::Signing(private) => private,
        Key::Verification(_) => {
            return Err(Error::RoleMismatch {
                expected: KeyRole::Signing,
                actual: KeyRole::Verification,
            })
        }
    };
    check_digest_hash(digest)?;

    match private {
        PrivateKey::Ed25519(key) => Ok(ed25519::sign(key, digest)),
        PrivateKey::Rsa(key) => rsa_pss::sign(key, digest),
        PrivateKey::Ecdsa(key) => ecdsa_p256::sign(key, digest),
    }
}

/// Check a signature over an artifact digest with a public key.
///
/// Returns `Ok(Verdict)` for every well-formed invocation, however hostile
/// the signature bytes; `Err` is reserved for structural problems (wrong
/// key role, digest hash mismatch).
pub fn verify(key: &Key, digest: &ArtifactDigest, signature: &[u8]) -> Result<Verdict> {
    let public = match key {
        Key::Verification(public) => public,
        Key::Signing(_) => {
            return Err(Error::RoleMismatch {
                expected: KeyRole::Verification,
                actual: KeyRole::Signing,
            })
        }
    };
    check_digest_hash(digest)?;

    Ok(match public {
        PublicKey::Ed25519(key) => ed25519::verify(key, digest, signature),
        PublicKey::Rsa(key) => rsa_pss::verify(key, digest, signature),
        PublicKey::Ecdsa(key) => ecdsa_p256::verify(key, digest, signature),
    })
}

fn check_digest_hash(digest: &ArtifactDigest) -> Result<()> {
    if digest.algorithm() != SCHEME_HASH {
        return Err(Error::Crypto(format!(
            "schemes sign {} digests, got {}",
            SCHEME_HASH,
            digest.algorithm()
        )));
    }
    Ok(())
}
