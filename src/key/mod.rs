//! Key model: a closed set of key families loaded from PEM.
//!
//! Keys are tagged with their algorithm family at load time by inspecting
//! the decoded key structure itself (the PKCS#8 / SPKI algorithm OID), never
//! a filename or a caller-supplied flag. Everything downstream dispatches on
//! that tag.

mod load;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// How a key is used: private keys sign, public keys verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Signing,
    Verification,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing => write!(f, "signing"),
            Self::Verification => write!(f, "verification"),
        }
    }
}

/// Supported key families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Ed25519,
    Rsa,
    EcdsaP256,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "Ed25519"),
            Self::Rsa => write!(f, "RSA-PSS"),
            Self::EcdsaP256 => write!(f, "ECDSA-P256"),
        }
    }
}

/// A private (signing) key of one of the supported families.
pub enum PrivateKey {
    Ed25519(ed25519_dalek::SigningKey),
    Rsa(rsa::RsaPrivateKey),
    Ecdsa(p256::ecdsa::SigningKey),
}

/// A public (verification) key of one of the supported families.
pub enum PublicKey {
    Ed25519(ed25519_dalek::VerifyingKey),
    Rsa(rsa::RsaPublicKey),
    Ecdsa(p256::ecdsa::VerifyingKey),
}

impl PrivateKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Rsa(_) => KeyAlgorithm::Rsa,
            Self::Ecdsa(_) => KeyAlgorithm::EcdsaP256,
        }
    }
}

impl PublicKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Rsa(_) => KeyAlgorithm::Rsa,
            Self::Ecdsa(_) => KeyAlgorithm::EcdsaP256,
        }
    }
}

/// A loaded key, tagged with the role it was loaded under.
///
/// The role tag lets the dispatcher reject a verification key handed to
/// `sign` (and vice versa) with [`crate::Error::RoleMismatch`] instead of a silent
/// no-op.
pub enum Key {
    Signing(PrivateKey),
    Verification(PublicKey),
}

impl Key {
    /// Load a key from PEM bytes.
    ///
    /// Accepted encodings: PKCS#8 (`PRIVATE KEY`), encrypted PKCS#8
    /// (`ENCRYPTED PRIVATE KEY`, requires `passphrase`), PKCS#1
    /// (`RSA PRIVATE KEY` / `RSA PUBLIC KEY`), SEC1 (`EC PRIVATE KEY`) and
    /// SPKI (`PUBLIC KEY`). The algorithm family is read from the decoded
    /// structure.
    ///
    /// Loading a public PEM under [`KeyRole::Signing`] (or a private PEM
    /// under [`KeyRole::Verification`]) fails with [`crate::Error::RoleMismatch`].
    /// A passphrase supplied for an unencrypted key is ignored.
    pub fn load_pem(pem: &[u8], role: KeyRole, passphrase: Option<&[u8]>) -> Result<Self> {
        load::load_pem(pem, role, passphrase)
    }

    /// Read PEM bytes from `path` and load them via [`Key::load_pem`].
    pub fn from_pem_file(path: &Path, role: KeyRole, passphrase: Option<&[u8]>) -> Result<Self> {
        let pem = fs::read(path)?;
        Self::load_pem(&pem, role, passphrase)
    }

    /// The role this key was loaded under.
    pub fn role(&self) -> KeyRole {
        match self {
            Self::Signing(_) => KeyRole::Signing,
            Self::Verification(_) => KeyRole::Verification,
        }
    }

    /// The key's algorithm family.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Signing(private) => private.algorithm(),
            Self::Verification(public) => public.algorithm(),
        }
    }
}

// Debug output names the family only; key material stays out of logs.

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey::{:?}", self.algorithm())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey::{:?}", self.algorithm())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing(private) => write!(f, "Key::Signing({:?})", private),
            Self::Verification(public) => write!(f, "Key::Verification({:?})", public),
        }
    }
}
