//! REST facade for the QR asset ledger.
//!
//! Serves `POST /invoke` and `GET /query` on top of one gateway session, or
//! over an in-process ledger with `--local`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use qr_ledger::chaincode::LocalLedger;
use qr_ledger::config::load_effective_config;
use qr_ledger::gateway::{ContractProvider, Gateway};
use qr_ledger::identity::load_signing_identity;
use qr_ledger::net::connect_from_config;
use qr_ledger::observability::{logging, metrics};
use qr_ledger::rest::RestServer;

#[derive(Parser, Debug)]
#[command(name = "qr-rest")]
#[command(about = "HTTP facade for submitting and evaluating QR asset transactions", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Per-request deadline in seconds
    #[arg(long, default_value_t = 90)]
    request_timeout_secs: u64,

    /// Run the contract in-process instead of dialling a peer
    #[arg(long)]
    local: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_effective_config()?;
    logging::init(&config.observability.log_level);

    let metrics_address = match cli.metrics_address {
        Some(addr) => Some(addr),
        None if config.observability.metrics_enabled => {
            Some(config.observability.metrics_address.parse::<SocketAddr>()?)
        }
        None => None,
    };
    if let Some(addr) = metrics_address {
        metrics::init_metrics(addr)?;
    }

    let provider: Arc<dyn ContractProvider> = if cli.local {
        tracing::info!("Serving in-process ledger");
        Arc::new(LocalLedger::new())
    } else {
        let channel = connect_from_config(&config).await?;
        let signing = load_signing_identity(&config)?;
        Arc::new(Gateway::connect(signing, channel, config.timeouts.clone()))
    };

    let listener = TcpListener::bind(cli.bind).await?;
    RestServer::new(provider, Duration::from_secs(cli.request_timeout_secs))
        .run(listener)
        .await?;

    Ok(())
}
