//! Gateway client subsystem.
//!
//! # Data Flow
//! ```text
//! submit(name, args)
//!     → proposal.rs (tx id, proposal, signature)
//!     → Endorse ──▶ prepared transaction (unsigned envelope)
//!     → proposal.rs (sign envelope, extract result)
//!     → Submit ──▶ ordering
//!     → CommitStatus ──▶ validation code
//!
//! evaluate(name, args)
//!     → proposal.rs → Evaluate ──▶ response payload
//! ```
//!
//! # Design Decisions
//! - Wire messages are declared by hand in protos.rs; no build-time codegen
//! - Every phase runs under its own deadline; nothing is retried
//! - gRPC failures keep their code, message and per-endorser details

pub mod api;
pub mod client;
pub mod proposal;
pub mod protos;
pub mod status;
#[cfg(test)]
pub(crate) mod testing;

pub use api::{ContractApi, ContractProvider};
pub use client::{Contract, Gateway, Network};
