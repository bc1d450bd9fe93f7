//! RSASSA-PSS backend.
//!
//! The digest is passed to the primitive as an already-hashed message; PSS
//! MGF1 runs over the same SHA-256 that produced the digest. Salt length is
//! the maximum the modulus permits, and the verifier computes the same
//! length from the public modulus, so both sides agree without a salt
//! length ever being transmitted.

use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::digest::ArtifactDigest;
use crate::error::{Error, Result};
use crate::scheme::Verdict;

/// Maximum PSS salt for a modulus of `modulus_len` bytes:
/// emLen - hLen - 2 per RFC 8017 §9.1.1. `None` when the modulus is too
/// small to hold a SHA-256 PSS encoding at all.
fn max_salt_len(modulus_len: usize) -> Option<usize> {
    modulus_len.checked_sub(Sha256::output_size() + 2)
}

pub(crate) fn sign(key: &RsaPrivateKey, digest: &ArtifactDigest) -> Result<Vec<u8>> {
    let salt_len = max_salt_len(key.size()).ok_or_else(|| {
        Error::Crypto("RSA modulus too small for PSS with SHA-256".to_string())
    })?;
    let padding = Pss::new_with_salt::<Sha256>(salt_len);
    key.sign_with_rng(&mut rand::thread_rng(), padding, digest.as_bytes())
        .map_err(|e| Error::Crypto(format!("RSA-PSS signing failed: {}", e)))
}

pub(crate) fn verify(key: &RsaPublicKey, digest: &ArtifactDigest, signature: &[u8]) -> Verdict {
    let Some(salt_len) = max_salt_len(key.size()) else {
        return Verdict::invalid("RSA modulus too small for PSS with SHA-256");
    };
    let padding = Pss::new_with_salt::<Sha256>(salt_len);
    match key.verify(padding, digest.as_bytes(), signature) {
        Ok(()) => Verdict::Valid,
        Err(e) => Verdict::invalid(format!("RSA-PSS signature check failed: {}", e)),
    }
}
