//! QR asset gateway client.
//!
//! Connects to a peer's gateway service, seeds the ledger, creates one
//! product record and reads it back.
//!
//! # Architecture Overview
//!
//! ```text
//!   config ──▶ net (TLS gRPC channel) ──┐
//!         └──▶ identity (cert + key) ───┼──▶ gateway session ──▶ contract
//!                                       │                          │
//!                                       │    lifecycle::startup ◀──┘
//!                                       │      InitLedger → CreateAsset → ReadAsset
//! ```

use qr_ledger::config::load_effective_config;
use qr_ledger::gateway::Gateway;
use qr_ledger::identity::load_signing_identity;
use qr_ledger::lifecycle::startup;
use qr_ledger::net::connect_from_config;
use qr_ledger::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_effective_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    logging::init(&config.observability.log_level);

    tracing::info!("qr-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    startup::log_parameters(&config);

    let channel = connect_from_config(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to create gRPC connection");
        e
    })?;

    let signing = load_signing_identity(&config).map_err(|e| {
        tracing::error!(error = %e, "Failed to create identity");
        e
    })?;

    let gateway = Gateway::connect(signing, channel, config.timeouts.clone());
    let contract = gateway
        .network(&config.channel_name)
        .contract(&config.chaincode_name);

    let report = startup::run(&contract).await.map_err(|e| {
        tracing::error!(error = %e, "Startup sequence failed");
        e
    })?;

    tracing::info!(product_id = %report.product_id, "Startup sequence complete");
    Ok(())
}
