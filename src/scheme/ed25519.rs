//! Ed25519 backend.
//!
//! EdDSA signs the 32 digest bytes as its message. The artifact was already
//! hashed by the digest engine, so this is not a hash-of-a-hash surprise:
//! both sides sign and verify the same digest bytes.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::digest::ArtifactDigest;
use crate::scheme::Verdict;

pub(crate) fn sign(key: &SigningKey, digest: &ArtifactDigest) -> Vec<u8> {
    key.sign(digest.as_bytes()).to_bytes().to_vec()
}

pub(crate) fn verify(key: &VerifyingKey, digest: &ArtifactDigest, signature: &[u8]) -> Verdict {
    let signature = match Signature::from_slice(signature) {
        Ok(signature) => signature,
        Err(e) => return Verdict::invalid(format!("malformed Ed25519 signature: {}", e)),
    };
    match key.verify(digest.as_bytes(), &signature) {
        Ok(()) => Verdict::Valid,
        Err(_) => Verdict::invalid("Ed25519 signature check failed"),
    }
}
