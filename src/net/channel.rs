//! TLS-secured gRPC channel to the peer.

use std::time::Duration;

use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};

use crate::config::GatewayConfig;
use crate::error::{ClientError, ClientResult};
use crate::net::tls::{load_trust_anchor, resolve_tls_cert_path};

/// Install `ring` as the process-wide rustls provider unless one is already set.
///
/// rustls refuses to pick a default when more than one provider is compiled in.
pub fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}

/// Dial `endpoint` over TLS, trusting only `ca`.
///
/// Blocks until the handshake completes or `deadline` elapses.
pub async fn connect(
    endpoint: &str,
    host_alias: &str,
    ca: Certificate,
    deadline: Duration,
) -> ClientResult<Channel> {
    install_crypto_provider();
    let tls = ClientTlsConfig::new().ca_certificate(ca).domain_name(host_alias);

    let endpoint_config = Endpoint::from_shared(format!("https://{}", endpoint))
        .map_err(|e| ClientError::Connectivity {
            endpoint: endpoint.to_string(),
            message: format!("invalid endpoint: {}", e),
        })?
        .tls_config(tls)
        .map_err(|e| ClientError::Connectivity {
            endpoint: endpoint.to_string(),
            message: format!("invalid TLS configuration: {}", e),
        })?
        .connect_timeout(deadline);

    match tokio::time::timeout(deadline, endpoint_config.connect()).await {
        Ok(Ok(channel)) => {
            tracing::info!(
                endpoint = %endpoint,
                host_alias = %host_alias,
                "gRPC connection established"
            );
            Ok(channel)
        }
        Ok(Err(e)) => Err(ClientError::Connectivity {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(ClientError::Connectivity {
            endpoint: endpoint.to_string(),
            message: format!("handshake did not complete within {:?}", deadline),
        }),
    }
}

/// Resolve the trust anchor and dial the configured peer.
pub async fn connect_from_config(config: &GatewayConfig) -> ClientResult<Channel> {
    let configured = config.tls_cert_path();
    let path = resolve_tls_cert_path(&configured, config.crypto_path(), &config.peer_host_alias)
        .ok_or_else(|| {
            ClientError::configuration(
                &configured,
                format!(
                    "tls cert not found; searched under crypto path {}",
                    config.crypto_path().display()
                ),
            )
        })?;
    if path != configured {
        tracing::info!(path = %path.display(), "Using discovered TLS cert");
    }

    let ca = load_trust_anchor(&path)?;
    connect(
        &config.peer_endpoint,
        &config.peer_host_alias,
        ca,
        config.timeouts.connect(),
    )
    .await
}
