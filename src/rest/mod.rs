//! HTTP REST facade over the transaction API.
//!
//! # Data Flow
//! ```text
//! POST /invoke (form)  ─┐
//!                       ├→ handlers.rs (extract channelid/chaincodeid/function/args)
//! GET  /query (query)  ─┘      → ContractProvider::contract(channel, chaincode)
//!                              → submit_transaction / evaluate_transaction
//!                              → "Response: <payload>"
//! ```
//!
//! # Design Decisions
//! - One request maps to exactly one submit or evaluate call
//! - Missing routing parameters are a client error (400)
//! - Transaction failures surface as 500 with the error text

pub mod handlers;
pub mod server;

pub use handlers::TransactionParams;
pub use server::{RandomRequestId, RestServer};
