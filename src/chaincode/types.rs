//! Contract-side error and event types.

use thiserror::Error;

/// Errors raised by contract execution. Any error aborts the transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// A record already exists under the key.
    #[error("the asset {0} already exists")]
    AlreadyExists(String),

    /// No record exists under the key.
    #[error("the asset {0} does not exist")]
    NotFound(String),

    /// Input could not be parsed into the asset schema.
    #[error("invalid asset: {0}")]
    Validation(String),

    /// A stored value is not a valid asset record.
    #[error("failed to decode stored value at {key}: {message}")]
    Decode { key: String, message: String },

    /// Wrong number of transaction arguments.
    #[error("{function} expects {expected} argument(s), got {got}")]
    Arguments {
        function: String,
        expected: usize,
        got: usize,
    },

    /// No such transaction on this contract.
    #[error("unknown transaction function: {0}")]
    UnknownFunction(String),

    /// The world state rejected a read or write.
    #[error("world state error: {0}")]
    State(String),
}

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// Notification emitted by a transaction, published when it commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeEvent {
    pub name: String,
    pub payload: Vec<u8>,
}
