//! Private key loading and transaction signing.
//!
//! # Security
//! - Keys are never logged or serialized
//! - `Debug` output names the algorithm only

use p256::ecdsa::signature::Signer as _;
use p384::ecdsa::signature::hazmat::PrehashSigner as _;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::signature::{SignatureEncoding as _, Signer as _};
use rustls_pemfile::Item;
use sha2::{Digest, Sha256};

use crate::error::{ClientError, ClientResult};

/// Signer backed by a locally held private key.
#[derive(Clone)]
pub enum PrivateKeySigner {
    /// ECDSA over P-256 with SHA-256; DER signatures, low-S.
    Ecdsa(p256::ecdsa::SigningKey),
    /// ECDSA over P-384 of a SHA-256 digest; DER signatures, low-S.
    EcdsaP384(p384::ecdsa::SigningKey),
    /// RSA PKCS#1 v1.5 with SHA-256.
    Rsa(rsa::pkcs1v15::SigningKey<Sha256>),
}

impl PrivateKeySigner {
    /// Load the first private key block of a PEM document.
    ///
    /// The block label is not trusted: the DER content goes through the same
    /// ordered decoding as [`PrivateKeySigner::from_der`].
    pub fn from_pem(pem: &[u8]) -> ClientResult<Self> {
        let mut reader = pem;
        loop {
            match rustls_pemfile::read_one(&mut reader) {
                Ok(Some(Item::Pkcs8Key(key))) => return Self::from_der(key.secret_pkcs8_der()),
                Ok(Some(Item::Sec1Key(key))) => return Self::from_der(key.secret_sec1_der()),
                Ok(Some(Item::Pkcs1Key(key))) => return Self::from_der(key.secret_pkcs1_der()),
                Ok(Some(_)) => continue,
                Ok(None) => {
                    return Err(ClientError::parse("private key", "no private key PEM block found"))
                }
                Err(e) => return Err(ClientError::parse("private key", e)),
            }
        }
    }

    /// Decode a DER private key, trying PKCS#8, then SEC1, then PKCS#1.
    pub fn from_der(der: &[u8]) -> ClientResult<Self> {
        if let Ok(key) = <p256::SecretKey as p256::pkcs8::DecodePrivateKey>::from_pkcs8_der(der) {
            return Ok(Self::Ecdsa(p256::ecdsa::SigningKey::from(key)));
        }
        if let Ok(key) = <p384::SecretKey as p384::pkcs8::DecodePrivateKey>::from_pkcs8_der(der) {
            return Ok(Self::EcdsaP384(p384::ecdsa::SigningKey::from(key)));
        }
        if let Ok(key) = <rsa::RsaPrivateKey as rsa::pkcs8::DecodePrivateKey>::from_pkcs8_der(der) {
            return Ok(Self::Rsa(rsa::pkcs1v15::SigningKey::new(key)));
        }
        if let Ok(key) = p256::SecretKey::from_sec1_der(der) {
            return Ok(Self::Ecdsa(p256::ecdsa::SigningKey::from(key)));
        }
        if let Ok(key) = p384::SecretKey::from_sec1_der(der) {
            return Ok(Self::EcdsaP384(p384::ecdsa::SigningKey::from(key)));
        }
        if let Ok(key) = rsa::RsaPrivateKey::from_pkcs1_der(der) {
            return Ok(Self::Rsa(rsa::pkcs1v15::SigningKey::new(key)));
        }

        Err(ClientError::parse("private key", "private key format unsupported"))
    }

    /// Algorithm name, safe to log.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ecdsa(_) => "ECDSA-P256-SHA256",
            Self::EcdsaP384(_) => "ECDSA-P384-SHA256",
            Self::Rsa(_) => "RSA-PKCS1v15-SHA256",
        }
    }

    /// Sign a message; the digest is computed internally.
    pub fn sign(&self, message: &[u8]) -> ClientResult<Vec<u8>> {
        // The platform rejects high-S ECDSA signatures.
        match self {
            Self::Ecdsa(key) => {
                let signature: p256::ecdsa::Signature = key.sign(message);
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
            Self::EcdsaP384(key) => {
                let digest = Sha256::digest(message);
                let signature: p384::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| ClientError::parse("signature", e))?;
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
            Self::Rsa(key) => Ok(key.sign(message).to_vec()),
        }
    }
}

impl std::fmt::Debug for PrivateKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeySigner")
            .field("algorithm", &self.algorithm())
            .finish()
    }
}
