//! Credential loading from the MSP directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GatewayConfig;
use crate::error::{ClientError, ClientResult};
use crate::identity::signer::PrivateKeySigner;
use crate::identity::x509::X509Identity;

/// An X.509 identity together with the key that signs for it.
#[derive(Debug, Clone)]
pub struct SigningIdentity {
    identity: X509Identity,
    signer: PrivateKeySigner,
}

impl SigningIdentity {
    pub fn new(identity: X509Identity, signer: PrivateKeySigner) -> Self {
        Self { identity, signer }
    }

    pub fn identity(&self) -> &X509Identity {
        &self.identity
    }

    pub fn msp_id(&self) -> &str {
        self.identity.msp_id()
    }

    /// Sign a message with the private key.
    pub fn sign(&self, message: &[u8]) -> ClientResult<Vec<u8>> {
        self.signer.sign(message)
    }
}

/// First non-directory entry of `dir`, by file name.
pub fn first_file_in(dir: &Path) -> ClientResult<PathBuf> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ClientError::configuration(dir, format!("failed to read directory: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| ClientError::configuration(dir, format!("failed to read entry: {}", e)))?;
        let path = entry.path();
        if !path.is_dir() {
            files.push(path);
        }
    }
    files.sort();

    files
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::configuration(dir, "no files in directory"))
}

fn read_file(path: &Path) -> ClientResult<Vec<u8>> {
    fs::read(path)
        .map_err(|e| ClientError::configuration(path, format!("failed to read file: {}", e)))
}

/// Load the enrollment certificate from the first file of `cert_dir`.
pub fn load_identity(msp_id: &str, cert_dir: &Path) -> ClientResult<X509Identity> {
    let path = first_file_in(cert_dir)?;
    let pem = read_file(&path)?;
    X509Identity::from_pem(msp_id, &pem).map_err(|e| with_path(e, &path))
}

/// Load the private key from the first file of `key_dir`.
pub fn load_signer(key_dir: &Path) -> ClientResult<PrivateKeySigner> {
    let path = first_file_in(key_dir)?;
    let pem = read_file(&path)?;
    PrivateKeySigner::from_pem(&pem).map_err(|e| with_path(e, &path))
}

/// Build the signing identity described by the configuration.
pub fn load_signing_identity(config: &GatewayConfig) -> ClientResult<SigningIdentity> {
    let identity = load_identity(&config.msp_id, &config.cert_directory())?;
    let signer = load_signer(&config.key_directory())?;

    tracing::info!(
        msp_id = %identity.msp_id(),
        subject = %identity.subject(),
        algorithm = signer.algorithm(),
        "Signing identity loaded"
    );

    Ok(SigningIdentity::new(identity, signer))
}

fn with_path(err: ClientError, path: &Path) -> ClientError {
    match err {
        ClientError::Parse { context, message } => ClientError::Parse {
            context: format!("{} {}", context, path.display()),
            message,
        },
        other => other,
    }
}
