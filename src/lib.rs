//! QR asset ledger: gateway client, contract logic and REST facade.

// Client side
pub mod config;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod net;

// Contract side
pub mod chaincode;

// Surfaces and cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod rest;

pub use config::GatewayConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{Contract, ContractApi, ContractProvider, Gateway, Network};
pub use rest::RestServer;
