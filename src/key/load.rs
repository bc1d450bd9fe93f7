//! PEM key loading with algorithm detection.
//!
//! The PEM label selects the document encoding; the algorithm OID inside
//! the document selects the key family. Both are read from the bytes, so a
//! caller never pre-declares the algorithm.

use pkcs8::{
    DecodePrivateKey, EncryptedPrivateKeyInfo, ObjectIdentifier, PrivateKeyInfo, SecretDocument,
};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use spki::{DecodePublicKey, SubjectPublicKeyInfoRef};

use crate::error::{Error, Result};
use crate::key::{Key, KeyRole, PrivateKey, PublicKey};

const OID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const OID_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const OID_EC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const OID_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

const LABEL_PKCS8: &str = "PRIVATE KEY";
const LABEL_PKCS8_ENCRYPTED: &str = "ENCRYPTED PRIVATE KEY";
const LABEL_PKCS1_PRIVATE: &str = "RSA PRIVATE KEY";
const LABEL_PKCS1_PUBLIC: &str = "RSA PUBLIC KEY";
const LABEL_SEC1: &str = "EC PRIVATE KEY";
const LABEL_SPKI: &str = "PUBLIC KEY";

pub(crate) fn load_pem(pem: &[u8], role: KeyRole, passphrase: Option<&[u8]>) -> Result<Key> {
    let text = std::str::from_utf8(pem)
        .map_err(|_| Error::KeyFormat("key file is not valid UTF-8 PEM".to_string()))?;
    let (label, doc) = SecretDocument::from_pem(text)
        .map_err(|e| Error::KeyFormat(format!("invalid PEM: {}", e)))?;

    match role {
        KeyRole::Signing => match label {
            LABEL_PKCS8 => Ok(Key::Signing(private_from_pkcs8_der(doc.as_bytes())?)),
            LABEL_PKCS8_ENCRYPTED => {
                let plain = decrypt_pkcs8(doc.as_bytes(), passphrase)?;
                Ok(Key::Signing(private_from_pkcs8_der(plain.as_bytes())?))
            }
            LABEL_PKCS1_PRIVATE => {
                let key = rsa::RsaPrivateKey::from_pkcs1_der(doc.as_bytes())
                    .map_err(|e| Error::KeyFormat(format!("invalid PKCS#1 private key: {}", e)))?;
                Ok(Key::Signing(PrivateKey::Rsa(key)))
            }
            LABEL_SEC1 => {
                let secret = p256::SecretKey::from_sec1_der(doc.as_bytes()).map_err(|e| {
                    Error::KeyFormat(format!(
                        "invalid SEC1 private key (only P-256 is supported): {}",
                        e
                    ))
                })?;
                Ok(Key::Signing(PrivateKey::Ecdsa(secret.into())))
            }
            LABEL_SPKI | LABEL_PKCS1_PUBLIC => Err(Error::RoleMismatch {
                expected: KeyRole::Signing,
                actual: KeyRole::Verification,
            }),
            other => Err(Error::KeyFormat(format!(
                "unsupported PEM label `{}`",
                other
            ))),
        },
        KeyRole::Verification => match label {
            LABEL_SPKI => Ok(Key::Verification(public_from_spki_der(doc.as_bytes())?)),
            LABEL_PKCS1_PUBLIC => {
                let key = rsa::RsaPublicKey::from_pkcs1_der(doc.as_bytes())
                    .map_err(|e| Error::KeyFormat(format!("invalid PKCS#1 public key: {}", e)))?;
                Ok(Key::Verification(PublicKey::Rsa(key)))
            }
            LABEL_PKCS8 | LABEL_PKCS8_ENCRYPTED | LABEL_PKCS1_PRIVATE | LABEL_SEC1 => {
                Err(Error::RoleMismatch {
                    expected: KeyRole::Verification,
                    actual: KeyRole::Signing,
                })
            }
            other => Err(Error::KeyFormat(format!(
                "unsupported PEM label `{}`",
                other
            ))),
        },
    }
}

fn decrypt_pkcs8(der: &[u8], passphrase: Option<&[u8]>) -> Result<SecretDocument> {
    let passphrase = passphrase.ok_or_else(|| {
        Error::KeyFormat("private key is encrypted; a passphrase is required".to_string())
    })?;
    let encrypted = EncryptedPrivateKeyInfo::try_from(der)
        .map_err(|e| Error::KeyFormat(format!("invalid encrypted PKCS#8 structure: {}", e)))?;
    encrypted
        .decrypt(passphrase)
        .map_err(|e| Error::KeyFormat(format!("failed to decrypt private key: {}", e)))
}

/// Decode a PKCS#8 private key, dispatching on the algorithm OID.
fn private_from_pkcs8_der(der: &[u8]) -> Result<PrivateKey> {
    let info = PrivateKeyInfo::try_from(der)
        .map_err(|e| Error::KeyFormat(format!("invalid PKCS#8 structure: {}", e)))?;
    let oid = info.algorithm.oid;

    if oid == OID_ED25519 {
        let key = ed25519_dalek::SigningKey::from_pkcs8_der(der)
            .map_err(|e| Error::KeyFormat(format!("invalid Ed25519 private key: {}", e)))?;
        Ok(PrivateKey::Ed25519(key))
    } else if oid == OID_RSA {
        let key = rsa::RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| Error::KeyFormat(format!("invalid RSA private key: {}", e)))?;
        Ok(PrivateKey::Rsa(key))
    } else if oid == OID_EC {
        let curve = info
            .algorithm
            .parameters_oid()
            .map_err(|e| Error::KeyFormat(format!("missing EC curve parameters: {}", e)))?;
        if curve != OID_P256 {
            return Err(Error::UnsupportedKeyType(format!(
                "EC curve {} (only P-256 is supported)",
                curve
            )));
        }
        let key = p256::ecdsa::SigningKey::from_pkcs8_der(der)
            .map_err(|e| Error::KeyFormat(format!("invalid P-256 private key: {}", e)))?;
        Ok(PrivateKey::Ecdsa(key))
    } else {
        Err(Error::UnsupportedKeyType(format!(
            "algorithm {} (supported: Ed25519, RSA, EC P-256)",
            oid
        )))
    }
}

/// Decode an SPKI public key, dispatching on the algorithm OID.
fn public_from_spki_der(der: &[u8]) -> Result<PublicKey> {
    let info = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| Error::KeyFormat(format!("invalid SubjectPublicKeyInfo: {}", e)))?;
    let oid = info.algorithm.oid;

    if oid == OID_ED25519 {
        let key = ed25519_dalek::VerifyingKey::from_public_key_der(der)
            .map_err(|e| Error::KeyFormat(format!("invalid Ed25519 public key: {}", e)))?;
        Ok(PublicKey::Ed25519(key))
    } else if oid == OID_RSA {
        let key = rsa::RsaPublicKey::from_public_key_der(der)
            .map_err(|e| Error::KeyFormat(format!("invalid RSA public key: {}", e)))?;
        Ok(PublicKey::Rsa(key))
    } else if oid == OID_EC {
        let curve = info
            .algorithm
            .parameters_oid()
            .map_err(|e| Error::KeyFormat(format!("missing EC curve parameters: {}", e)))?;
        if curve != OID_P256 {
            return Err(Error::UnsupportedKeyType(format!(
                "EC curve {} (only P-256 is supported)",
                curve
            )));
        }
        let key = p256::ecdsa::VerifyingKey::from_public_key_der(der)
            .map_err(|e| Error::KeyFormat(format!("invalid P-256 public key: {}", e)))?;
        Ok(PublicKey::Ecdsa(key))
    } else {
        Err(Error::UnsupportedKeyType(format!(
            "algorithm {} (supported: Ed25519, RSA, EC P-256)",
            oid
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyAlgorithm;
    use pkcs8::der::asn1::AnyRef;
    use pkcs8::{AlgorithmIdentifierRef, EncodePrivateKey, LineEnding};
    use rand::rngs::OsRng;
    use spki::EncodePublicKey;

    #[test]
    fn test_load_ed25519_round_trip() {
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let private_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
        let public_pem = key.verifying_key().to_public_key_pem(LineEnding::LF).unwrap();

        let private = Key::load_pem(private_pem.as_bytes(), KeyRole::Signing, None).unwrap();
        assert_eq!(private.algorithm(), KeyAlgorithm::Ed25519);
        assert_eq!(private.role(), KeyRole::Signing);

        let public = Key::load_pem(public_pem.as_bytes(), KeyRole::Verification, None).unwrap();
        assert_eq!(public.algorithm(), KeyAlgorithm::Ed25519);
        assert_eq!(public.role(), KeyRole::Verification);
    }

    #[test]
    fn test_load_p256_round_trip() {
        let key = p256::ecdsa::SigningKey::random(&mut OsRng);
        let private_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
        let public_pem = key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();

        let private = Key::load_pem(private_pem.as_bytes(), KeyRole::Signing, None).unwrap();
        assert_eq!(private.algorithm(), KeyAlgorithm::EcdsaP256);

        let public = Key::load_pem(public_pem.as_bytes(), KeyRole::Verification, None).unwrap();
        assert_eq!(public.algorithm(), KeyAlgorithm::EcdsaP256);
    }

    #[test]
    fn test_role_mismatch_public_as_signing() {
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let public_pem = key.verifying_key().to_public_key_pem(LineEnding::LF).unwrap();

        let err = Key::load_pem(public_pem.as_bytes(), KeyRole::Signing, None).unwrap_err();
        assert!(matches!(
            err,
            Error::RoleMismatch {
                expected: KeyRole::Signing,
                actual: KeyRole::Verification,
            }
        ));
    }

    #[test]
    fn test_role_mismatch_private_as_verification() {
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let private_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let err = Key::load_pem(private_pem.as_bytes(), KeyRole::Verification, None).unwrap_err();
        assert!(matches!(
            err,
            Error::RoleMismatch {
                expected: KeyRole::Verification,
                actual: KeyRole::Signing,
            }
        ));
    }

    #[test]
    fn test_garbage_is_key_format_error() {
        let err = Key::load_pem(b"not a pem at all", KeyRole::Signing, None).unwrap_err();
        assert!(matches!(err, Error::KeyFormat(_)));

        let err = Key::load_pem(&[0xff, 0xfe, 0x00], KeyRole::Verification, None).unwrap_err();
        assert!(matches!(err, Error::KeyFormat(_)));
    }

    /// Build a syntactically valid PKCS#8 document carrying an arbitrary
    /// algorithm identifier; the key bytes are never reached.
    fn pkcs8_pem_with_algorithm(
        oid: ObjectIdentifier,
        curve: Option<&ObjectIdentifier>,
    ) -> String {
        let algorithm = AlgorithmIdentifierRef {
            oid,
            parameters: curve.map(AnyRef::from),
        };
        let info = PrivateKeyInfo::new(algorithm, &[0u8; 8]);
        let doc = SecretDocument::try_from(info).unwrap();
        doc.to_pem(LABEL_PKCS8, LineEnding::LF).unwrap().to_string()
    }

    #[test]
    fn test_unknown_algorithm_is_unsupported() {
        // X25519: recognized structure, not a signature key family we take.
        let x25519 = ObjectIdentifier::new_unwrap("1.3.101.110");
        let pem = pkcs8_pem_with_algorithm(x25519, None);

        let err = Key::load_pem(pem.as_bytes(), KeyRole::Signing, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKeyType(_)));
    }

    #[test]
    fn test_non_p256_curve_is_unsupported() {
        let secp384r1 = ObjectIdentifier::new_unwrap("1.3.132.0.34");
        let pem = pkcs8_pem_with_algorithm(OID_EC, Some(&secp384r1));

        let err = Key::load_pem(pem.as_bytes(), KeyRole::Signing, None).unwrap_err();
        match err {
            Error::UnsupportedKeyType(detail) => assert!(detail.contains("1.3.132.0.34")),
            other => panic!("expected UnsupportedKeyType, got {:?}", other),
        }
    }

    fn encrypted_ed25519_pem(passphrase: &[u8]) -> String {
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let plain = key.to_pkcs8_der().unwrap();
        let info = PrivateKeyInfo::try_from(plain.as_bytes()).unwrap();
        let encrypted = info.encrypt(OsRng, passphrase).unwrap();
        encrypted
            .to_pem(LABEL_PKCS8_ENCRYPTED, LineEnding::LF)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_encrypted_key_round_trip() {
        let pem = encrypted_ed25519_pem(b"correct horse");

        let key = Key::load_pem(pem.as_bytes(), KeyRole::Signing, Some(b"correct horse")).unwrap();
        assert_eq!(key.algorithm(), KeyAlgorithm::Ed25519);
    }

    #[test]
    fn test_encrypted_key_requires_passphrase() {
        let pem = encrypted_ed25519_pem(b"correct horse");

        let err = Key::load_pem(pem.as_bytes(), KeyRole::Signing, None).unwrap_err();
        match err {
            Error::KeyFormat(detail) => assert!(detail.contains("passphrase")),
            other => panic!("expected KeyFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_encrypted_key_wrong_passphrase() {
        let pem = encrypted_ed25519_pem(b"correct horse");

        let err =
            Key::load_pem(pem.as_bytes(), KeyRole::Signing, Some(b"battery staple")).unwrap_err();
        assert!(matches!(err, Error::KeyFormat(_)));
    }

    #[test]
    fn test_passphrase_ignored_for_plain_key() {
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let loaded =
            Key::load_pem(pem.as_bytes(), KeyRole::Signing, Some(b"unneeded")).unwrap();
        assert_eq!(loaded.algorithm(), KeyAlgorithm::Ed25519);
    }

    #[test]
    fn test_missing_key_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Key::from_pem_file(&dir.path().join("absent.pem"), KeyRole::Signing, None)
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
