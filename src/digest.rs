//! Artifact digest computation.
//!
//! The digest is the only thing that is ever signed: every scheme in
//! [`crate::scheme`] receives the 32-byte digest produced here, marked as
//! already hashed, and must not hash again. The digest value therefore
//! carries its hash algorithm tag so a scheme backend can check it was
//! handed the hash it expects.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// Length in bytes of an artifact digest.
pub const DIGEST_LEN: usize = 32;

/// Read buffer size for streaming digests. Artifacts can be arbitrarily
/// large; memory use stays bounded by this.
const READ_BUF_LEN: usize = 8192;

/// Hash algorithm used to digest an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "SHA-256"),
        }
    }
}

/// A fixed-size digest of an artifact's full byte stream, tagged with the
/// algorithm that produced it.
///
/// Computed fresh per invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDigest {
    algorithm: HashAlgorithm,
    bytes: [u8; DIGEST_LEN],
}

impl ArtifactDigest {
    /// The algorithm that produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.bytes
    }

    /// Hex rendering for status lines and diagnostics.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// Compute the SHA-256 digest of everything `reader` yields.
///
/// Streams through a fixed buffer; the input is never held in memory whole.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<ArtifactDigest> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; READ_BUF_LEN];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(ArtifactDigest {
        algorithm: HashAlgorithm::Sha256,
        bytes: hasher.finalize().into(),
    })
}

/// Compute the SHA-256 digest of the file at `path`.
///
/// The file handle is scoped to this call and released on every exit path.
pub fn digest_file(path: &Path) -> io::Result<ArtifactDigest> {
    digest_reader(File::open(path)?)
}
