//! Sign/verify orchestration.
//!
//! Glues the digest engine, key model, and scheme dispatch into the two
//! whole-file operations the CLI exposes. Each call is stateless and
//! self-contained: nothing is cached across invocations, every file handle
//! is scoped, and a batch caller may run many of these in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use crate::digest::digest_file;
use crate::error::Result;
use crate::key::{Key, KeyAlgorithm, KeyRole};
use crate::scheme::{self, Verdict};

/// What a successful sign run produced, for the status line.
#[derive(Debug)]
pub struct SignOutcome {
    pub algorithm: KeyAlgorithm,
    pub digest_hex: String,
    pub signature_len: usize,
    pub signature_path: PathBuf,
}

/// Outcome of a verify run.
///
/// Structural failures (unreadable files, bad PEM, unsupported or
/// wrong-role keys) travel as `Err` from [`run_verify`]; `Invalid` is
/// reserved for a well-formed invocation whose signature fails its
/// cryptographic check. The CLI collapses both to the same exit code, but
/// callers can tell them apart.
#[derive(Debug)]
pub enum VerifyOutcome {
    Valid {
        algorithm: KeyAlgorithm,
        digest_hex: String,
    },
    Invalid {
        reason: String,
    },
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Digest `artifact`, sign the digest with the private key at `key_path`,
/// and write the detached signature to `out_path`.
///
/// The output file is written only after signing succeeds; no failure path
/// creates or truncates it, so a present signature file is never a stub.
pub fn run_sign(
    artifact: &Path,
    key_path: &Path,
    out_path: &Path,
    passphrase: Option<&[u8]>,
) -> Result<SignOutcome> {
    let digest = digest_file(artifact)?;
    let key = Key::from_pem_file(key_path, KeyRole::Signing, passphrase)?;
    let signature = scheme::sign(&key, &digest)?;

    fs::write(out_path, &signature)?;

    Ok(SignOutcome {
        algorithm: key.algorithm(),
        digest_hex: digest.to_hex(),
        signature_len: signature.len(),
        signature_path: out_path.to_path_buf(),
    })
}

/// Digest `artifact` and check the detached signature at `signature_path`
/// against the public key at `key_path`.
pub fn run_verify(
    artifact: &Path,
    signature_path: &Path,
    key_path: &Path,
) -> Result<VerifyOutcome> {
    let digest = digest_file(artifact)?;
    let key = Key::from_pem_file(key_path, KeyRole::Verification, None)?;
    let signature = fs::read(signature_path)?;

    match scheme::verify(&key, &digest, &signature)? {
        Verdict::Valid => Ok(VerifyOutcome::Valid {
            algorithm: key.algorithm(),
            digest_hex: digest.to_hex(),
        }),
        Verdict::Invalid { reason } => Ok(VerifyOutcome::Invalid { reason }),
    }
}
