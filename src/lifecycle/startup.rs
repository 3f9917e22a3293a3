//! Startup sequence run by the `qr-gateway` binary.
//!
//! Seeds the ledger, creates one fresh asset, and reads it back.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::chaincode::QrAsset;
use crate::config::GatewayConfig;
use crate::error::{ClientError, ClientResult};
use crate::gateway::ContractApi;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// Whether InitLedger committed.
    pub ledger_initialized: bool,
    /// Product id of the asset created by this run.
    pub product_id: String,
    /// Record returned by ReadAsset.
    pub record: Vec<u8>,
}

/// Log the effective settings before anything is dialled.
pub fn log_parameters(config: &GatewayConfig) {
    tracing::info!(
        channel_name = %config.channel_name,
        chaincode_name = %config.chaincode_name,
        msp_id = %config.msp_id,
        crypto_path = %config.crypto_path().display(),
        key_directory_path = %config.key_directory().display(),
        cert_directory_path = %config.cert_directory().display(),
        tls_cert_path = %config.tls_cert_path().display(),
        peer_endpoint = %config.peer_endpoint,
        peer_host_alias = %config.peer_host_alias,
        "Input parameters"
    );
}

/// Product id derived from the current wall clock in milliseconds.
pub fn generate_product_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    millis.to_string()
}

/// Submit InitLedger. Failure is logged and reported, never returned.
pub async fn init_ledger(contract: &dyn ContractApi) -> bool {
    tracing::info!("Submit Transaction: InitLedger");
    match contract.submit_transaction("InitLedger", &[]).await {
        Ok(_) => {
            tracing::info!("InitLedger transaction committed successfully");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "InitLedger failed, continuing");
            false
        }
    }
}

/// Submit CreateAsset with the sample record for `product_id`.
pub async fn create_asset(contract: &dyn ContractApi, product_id: &str) -> ClientResult<()> {
    let payload = QrAsset::sample(product_id).to_json()?;
    let payload = String::from_utf8(payload).map_err(|e| ClientError::Protocol(e.to_string()))?;

    tracing::info!(product_id, "Submit Transaction: CreateAsset");
    if let Err(e) = contract.submit_transaction("CreateAsset", &[payload]).await {
        log_failure(&e);
        return Err(e);
    }

    tracing::info!(product_id, "CreateAsset transaction committed successfully");
    Ok(())
}

/// Evaluate ReadAsset for `product_id`.
pub async fn read_asset(contract: &dyn ContractApi, product_id: &str) -> ClientResult<Vec<u8>> {
    tracing::info!(product_id, "Evaluate Transaction: ReadAsset");
    let record = contract
        .evaluate_transaction("ReadAsset", &[product_id.to_string()])
        .await?;

    tracing::info!(
        product_id,
        result = %String::from_utf8_lossy(&record),
        "ReadAsset result"
    );
    Ok(record)
}

/// Run the full sequence with a fresh product id.
pub async fn run(contract: &dyn ContractApi) -> ClientResult<StartupReport> {
    run_with_id(contract, generate_product_id()).await
}

/// Run the full sequence with the given product id.
pub async fn run_with_id(
    contract: &dyn ContractApi,
    product_id: String,
) -> ClientResult<StartupReport> {
    let ledger_initialized = init_ledger(contract).await;
    create_asset(contract, &product_id).await?;
    let record = read_asset(contract, &product_id).await?;

    Ok(StartupReport {
        ledger_initialized,
        product_id,
        record,
    })
}

fn log_failure(error: &ClientError) {
    match error {
        ClientError::Gateway { code, message, details, .. } => {
            tracing::error!(code = ?code, message = %message, "SubmitTransaction failed");
            for (i, detail) in details.iter().enumerate() {
                tracing::error!(
                    index = i,
                    address = %detail.address,
                    msp_id = %detail.msp_id,
                    message = %detail.message,
                    "Error detail"
                );
            }
        }
        other => tracing::error!(error = %other, "SubmitTransaction failed"),
    }
}
