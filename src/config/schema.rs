//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files. Every
//! field has a default matching the platform's sample test network.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CHANNEL_NAME: &str = "CHANNEL_NAME";
pub const ENV_CHAINCODE_NAME: &str = "CHAINCODE_NAME";
pub const ENV_MSP_ID: &str = "MSP_ID";
pub const ENV_CRYPTO_PATH: &str = "CRYPTO_PATH";
pub const ENV_KEY_DIRECTORY_PATH: &str = "KEY_DIRECTORY_PATH";
pub const ENV_CERT_DIRECTORY_PATH: &str = "CERT_DIRECTORY_PATH";
pub const ENV_TLS_CERT_PATH: &str = "TLS_CERT_PATH";
pub const ENV_PEER_ENDPOINT: &str = "PEER_ENDPOINT";
pub const ENV_PEER_HOST_ALIAS: &str = "PEER_HOST_ALIAS";

/// User whose enrollment material is used when no explicit paths are given.
const DEFAULT_USER: &str = "User1@org1.example.com";

/// Root configuration for the gateway client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Channel the contract is deployed on.
    pub channel_name: String,

    /// Deployed chaincode (contract) name.
    pub chaincode_name: String,

    /// Membership service provider the signing identity belongs to.
    pub msp_id: String,

    /// Root of the organization's crypto material.
    pub crypto_path: PathBuf,

    /// Directory holding the private key. Derived from `crypto_path` when unset.
    pub key_directory_path: Option<PathBuf>,

    /// Directory holding the signing certificate. Derived from `crypto_path` when unset.
    pub cert_directory_path: Option<PathBuf>,

    /// Peer TLS root certificate. Derived from `crypto_path` when unset.
    pub tls_cert_path: Option<PathBuf>,

    /// Peer gRPC endpoint (`host:port`).
    pub peer_endpoint: String,

    /// TLS server name the peer certificate was issued for.
    pub peer_host_alias: String,

    /// Per-call deadlines.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            channel_name: "mychannel".to_string(),
            chaincode_name: "livestock".to_string(),
            msp_id: "Org1MSP".to_string(),
            crypto_path: [
                "..",
                "..",
                "test-network",
                "organizations",
                "peerOrganizations",
                "org1.example.com",
            ]
            .iter()
            .collect(),
            key_directory_path: None,
            cert_directory_path: None,
            tls_cert_path: None,
            peer_endpoint: "localhost:7051".to_string(),
            peer_host_alias: "peer0.org1.example.com".to_string(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Overlay values from an environment lookup. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_CHANNEL_NAME) {
            self.channel_name = v;
        }
        if let Some(v) = get(ENV_CHAINCODE_NAME) {
            self.chaincode_name = v;
        }
        if let Some(v) = get(ENV_MSP_ID) {
            self.msp_id = v;
        }
        if let Some(v) = get(ENV_CRYPTO_PATH) {
            self.crypto_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_KEY_DIRECTORY_PATH) {
            self.key_directory_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_CERT_DIRECTORY_PATH) {
            self.cert_directory_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_TLS_CERT_PATH) {
            self.tls_cert_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_PEER_ENDPOINT) {
            self.peer_endpoint = v;
        }
        if let Some(v) = get(ENV_PEER_HOST_ALIAS) {
            self.peer_host_alias = v;
        }
    }

    /// Directory the private key is loaded from.
    pub fn key_directory(&self) -> PathBuf {
        self.key_directory_path
            .clone()
            .unwrap_or_else(|| self.user_msp_dir().join("keystore"))
    }

    /// Directory the signing certificate is loaded from.
    pub fn cert_directory(&self) -> PathBuf {
        self.cert_directory_path
            .clone()
            .unwrap_or_else(|| self.user_msp_dir().join("signcerts"))
    }

    /// Configured location of the peer TLS root certificate.
    pub fn tls_cert_path(&self) -> PathBuf {
        self.tls_cert_path.clone().unwrap_or_else(|| {
            self.crypto_path
                .join("peers")
                .join(&self.peer_host_alias)
                .join("tls")
                .join("ca.crt")
        })
    }

    /// Base directory searched when the TLS certificate is not at its configured path.
    pub fn crypto_path(&self) -> &Path {
        &self.crypto_path
    }

    fn user_msp_dir(&self) -> PathBuf {
        self.crypto_path.join("users").join(DEFAULT_USER).join("msp")
    }
}

/// Timeout configuration for gateway calls, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TLS dial deadline at startup.
    pub connect_secs: u64,

    /// Read-only evaluation against a single peer.
    pub evaluate_secs: u64,

    /// Endorsement collection.
    pub endorse_secs: u64,

    /// Hand-off of the signed transaction to ordering.
    pub submit_secs: u64,

    /// Waiting for the commit status.
    pub commit_status_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            evaluate_secs: 5,
            endorse_secs: 15,
            submit_secs: 5,
            commit_status_secs: 60,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn evaluate(&self) -> Duration {
        Duration::from_secs(self.evaluate_secs)
    }

    pub fn endorse(&self) -> Duration {
        Duration::from_secs(self.endorse_secs)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_secs(self.submit_secs)
    }

    pub fn commit_status(&self) -> Duration {
        Duration::from_secs(self.commit_status_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) when RUST_LOG is unset.
    pub log_level: String,

    /// Enable the Prometheus metrics listener.
    pub metrics_enabled: bool,

    /// Metrics listener bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
