//! Contract logic for QR-coded product assets.
//!
//! # Data Flow
//! ```text
//! ContractApi call (name, args)
//!     → ledger.rs (LocalLedger: pick partition, open transaction)
//!     → contract.rs (AssetContract::invoke: dispatch, validate, read/write)
//!     → stub.rs (TransactionStub: committed reads, buffered writes + event)
//!     → commit on successful submit, discard otherwise
//! ```
//!
//! # Design Decisions
//! - Records are stored as JSON under `QR:<productId>`
//! - `docType` is always stamped by the contract, never trusted from input
//! - Any error aborts the whole transaction

pub mod asset;
pub mod contract;
pub mod ledger;
pub mod stub;
pub mod types;

pub use asset::{asset_key, QrAsset, DOC_TYPE, KEY_PREFIX};
pub use contract::{AssetContract, CREATED_EVENT};
pub use ledger::{LocalContract, LocalLedger};
pub use stub::{ChaincodeStub, TransactionEffects, TransactionStub, WorldState};
pub use types::{ChaincodeEvent, ContractError, ContractResult};
