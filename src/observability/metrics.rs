//! Transaction metrics and Prometheus exposition.
//!
//! # Metrics
//! - `qr_transactions_total` (counter): calls by kind, transaction, outcome
//! - `qr_transaction_duration_seconds` (histogram): latency by kind, transaction

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const TRANSACTIONS_TOTAL: &str = "qr_transactions_total";
pub const TRANSACTION_DURATION: &str = "qr_transaction_duration_seconds";

/// Install the Prometheus recorder and start its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics listener started");
    Ok(())
}

/// Record one submit or evaluate call.
pub fn record_transaction(kind: &'static str, transaction: &str, ok: bool, start: Instant) {
    let outcome = if ok { "success" } else { "failure" };
    let transaction = transaction.to_string();

    counter!(
        TRANSACTIONS_TOTAL,
        "kind" => kind,
        "transaction" => transaction.clone(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        TRANSACTION_DURATION,
        "kind" => kind,
        "transaction" => transaction
    )
    .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder() {
        record_transaction("evaluate", "ReadAsset", true, Instant::now());
        record_transaction("submit", "CreateAsset", false, Instant::now());
    }
}
