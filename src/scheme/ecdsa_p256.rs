//! ECDSA P-256 backend.
//!
//! Prehash signing over the digest bytes with RFC 6979 deterministic
//! nonces; signatures travel as DER-encoded (r,s).

use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use signature::hazmat::{PrehashSigner, PrehashVerifier};

use crate::digest::ArtifactDigest;
use crate::error::{Error, Result};
use crate::scheme::Verdict;

pub(crate) fn sign(key: &SigningKey, digest: &ArtifactDigest) -> Result<Vec<u8>> {
    let signature: Signature = key
        .sign_prehash(digest.as_bytes())
        .map_err(|e| Error::Crypto(format!("ECDSA signing failed: {}", e)))?;
    Ok(signature.to_der().as_bytes().to_vec())
}

pub(crate) fn verify(key: &VerifyingKey, digest: &ArtifactDigest, signature: &[u8]) -> Verdict {
    let signature = match Signature::from_der(signature) {
        Ok(signature) => signature,
        Err(e) => return Verdict::invalid(format!("malformed ECDSA signature: {}", e)),
    };
    match key.verify_prehash(digest.as_bytes(), &signature) {
        Ok(()) => Verdict::Valid,
        Err(_) => Verdict::invalid("ECDSA signature check failed"),
    }
}
