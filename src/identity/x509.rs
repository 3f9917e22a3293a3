//! X.509 identity bound to an MSP.

use p256::ecdsa::signature::Verifier as _;
use p256::pkcs8::DecodePublicKey as _;
use p384::ecdsa::signature::hazmat::PrehashVerifier as _;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::signature::Verifier as _;
use sha2::{Digest, Sha256};
use x509_cert::der::{Decode, Encode};
use x509_cert::Certificate;

use crate::error::{ClientError, ClientResult};

/// A certificate plus the MSP it is enrolled with.
#[derive(Debug, Clone)]
pub struct X509Identity {
    msp_id: String,
    /// Original PEM text; this is what the platform expects as identity bytes.
    certificate_pem: Vec<u8>,
    certificate: Certificate,
}

impl X509Identity {
    /// Parse the first certificate in a PEM document.
    pub fn from_pem(msp_id: impl Into<String>, pem: &[u8]) -> ClientResult<Self> {
        let mut reader = pem;
        let der = rustls_pemfile::certs(&mut reader)
            .next()
            .ok_or_else(|| ClientError::parse("certificate", "no CERTIFICATE block found"))?
            .map_err(|e| ClientError::parse("certificate", e))?;

        let certificate = Certificate::from_der(der.as_ref())
            .map_err(|e| ClientError::parse("certificate", e))?;

        Ok(Self {
            msp_id: msp_id.into(),
            certificate_pem: pem.to_vec(),
            certificate,
        })
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub fn certificate_pem(&self) -> &[u8] {
        &self.certificate_pem
    }

    /// Subject distinguished name, for logging.
    pub fn subject(&self) -> String {
        self.certificate.tbs_certificate.subject.to_string()
    }

    /// Check `signature` over `message` against the certificate's public key.
    ///
    /// Returns `Ok(false)` for a well-formed key that does not verify, and an
    /// error if the certificate carries a key type this client cannot use.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> ClientResult<bool> {
        let spki = self
            .certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| ClientError::parse("certificate public key", e))?;

        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_der(&spki) {
            let Ok(sig) = p256::ecdsa::Signature::from_der(signature) else {
                return Ok(false);
            };
            return Ok(key.verify(message, &sig).is_ok());
        }

        if let Ok(key) = p384::ecdsa::VerifyingKey::from_public_key_der(&spki) {
            let Ok(sig) = p384::ecdsa::Signature::from_der(signature) else {
                return Ok(false);
            };
            return Ok(key.verify_prehash(&Sha256::digest(message), &sig).is_ok());
        }

        if let Ok(key) = rsa::RsaPublicKey::from_public_key_der(&spki) {
            let key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key);
            let Ok(sig) = rsa::pkcs1v15::Signature::try_from(signature) else {
                return Ok(false);
            };
            return Ok(key.verify(message, &sig).is_ok());
        }

        Err(ClientError::parse(
            "certificate public key",
            "unsupported public key algorithm",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EC_CERT: &str = include_str!("../../tests/fixtures/ec_cert.pem");

    #[test]
    fn test_parse_certificate() {
        let identity = X509Identity::from_pem("Org1MSP", EC_CERT.as_bytes()).unwrap();
        assert_eq!(identity.msp_id(), "Org1MSP");
        assert!(identity.subject().contains("User1@org1.example.com"));
        assert_eq!(identity.certificate_pem(), EC_CERT.as_bytes());
    }

    #[test]
    fn test_reject_non_certificate_pem() {
        let key = include_str!("../../tests/fixtures/ec_pkcs8_key.pem");
        let err = X509Identity::from_pem("Org1MSP", key.as_bytes()).unwrap_err();
        assert!(matches!(err, ClientError::Parse { .. }));
    }

    #[test]
    fn test_reject_corrupt_der() {
        let pem = "-----BEGIN CERTIFICATE-----\nAAECAwQF\n-----END CERTIFICATE-----\n";
        let err = X509Identity::from_pem("Org1MSP", pem.as_bytes()).unwrap_err();
        assert!(matches!(err, ClientError::Parse { .. }));
    }

    #[test]
    fn test_parse_p384_certificate() {
        let pem = include_str!("../../tests/fixtures/p384_cert.pem");
        let identity = X509Identity::from_pem("Org1MSP", pem.as_bytes()).unwrap();
        assert!(identity.subject().contains("User3@org1.example.com"));
        assert!(!identity.verify(b"payload", b"not a signature").unwrap());
    }

    #[test]
    fn test_garbage_signature_does_not_verify() {
        let identity = X509Identity::from_pem("Org1MSP", EC_CERT.as_bytes()).unwrap();
        assert!(!identity.verify(b"payload", b"not a signature").unwrap());
    }
}
