//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::response::Response;
use qr_ledger::chaincode::QrAsset;
use qr_ledger::config::GatewayConfig;
use tempfile::TempDir;

pub const PEER_ALIAS: &str = "peer0.org1.example.com";

/// Path to a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// A crypto-material tree laid out like the test network's org1 directory.
///
/// The peer TLS root is written as `ca.crt` under the peer alias; the
/// certificate doubles as a trust anchor since only PEM validity is checked
/// before dialling.
pub struct CryptoTree {
    pub dir: TempDir,
}

impl CryptoTree {
    pub fn new(cert: &str, key: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let msp = dir.path().join("users").join("User1@org1.example.com").join("msp");

        let signcerts = msp.join("signcerts");
        let keystore = msp.join("keystore");
        let tls = dir.path().join("peers").join(PEER_ALIAS).join("tls");
        for d in [&signcerts, &keystore, &tls] {
            fs::create_dir_all(d).unwrap();
        }

        fs::copy(fixture(cert), signcerts.join("cert.pem")).unwrap();
        fs::copy(fixture(key), keystore.join("priv_sk")).unwrap();
        fs::copy(fixture("ec_cert.pem"), tls.join("ca.crt")).unwrap();

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration rooted at this tree with all paths derived.
    pub fn config(&self) -> GatewayConfig {
        GatewayConfig {
            crypto_path: self.path().to_path_buf(),
            ..GatewayConfig::default()
        }
    }
}

/// JSON argument for `CreateAsset`.
pub fn asset_arg(product_id: &str) -> String {
    String::from_utf8(QrAsset::sample(product_id).to_json().unwrap()).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
