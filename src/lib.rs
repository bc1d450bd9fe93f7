//! detsig - detached signing and verification of artifact digests
//!
//! This crate computes a SHA-256 digest of an artifact file and produces or
//! verifies a detached signature over that digest with an Ed25519, RSA-PSS,
//! or ECDSA P-256 key loaded from PEM. The key's algorithm family is read
//! from the key structure itself; signature files are raw scheme bytes with
//! no envelope, so the verifier must already hold the matching public key.

pub mod digest;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod scheme;

pub use digest::{digest_file, digest_reader, ArtifactDigest, HashAlgorithm, DIGEST_LEN};
pub use error::{Error, Result};
pub use key::{Key, KeyAlgorithm, KeyRole, PrivateKey, PublicKey};
pub use pipeline::{run_sign, run_verify, SignOutcome, VerifyOutcome};
pub use scheme::{sign, verify, Verdict};
