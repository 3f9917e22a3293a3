//! Client-side error taxonomy.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::chaincode::ContractError;

/// Per-endorser failure reported alongside a gateway error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Peer address that produced the failure.
    pub address: String,
    /// MSP of that peer.
    pub msp_id: String,
    /// Failure message from that peer.
    pub message: String,
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.address, self.msp_id, self.message)
    }
}

/// Errors that can occur while building or using a gateway session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or unreadable file or directory, or an unusable setting.
    #[error("Configuration error ({context}): {message}")]
    Configuration { context: String, message: String },

    /// Malformed PEM, certificate or key.
    #[error("Parse error ({context}): {message}")]
    Parse { context: String, message: String },

    /// Dial or TLS handshake failure.
    #[error("Failed to connect to {endpoint}: {message}")]
    Connectivity { endpoint: String, message: String },

    /// A gateway call exceeded its deadline.
    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },

    /// The gateway rejected a call.
    #[error("{operation} failed: code={code:?} message={message}")]
    Gateway {
        operation: &'static str,
        code: tonic::Code,
        message: String,
        details: Vec<ErrorDetail>,
    },

    /// The transaction was ordered but invalidated at commit.
    #[error("Transaction {transaction_id} failed to commit with status {status} in block {block_number}")]
    Commit {
        transaction_id: String,
        status: String,
        block_number: u64,
    },

    /// The platform returned something that does not decode.
    #[error("Malformed response: {0}")]
    Protocol(String),

    /// The in-process contract rejected the transaction.
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl ClientError {
    pub fn configuration(context: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Configuration {
            context: context.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Per-endorser detail, if the gateway attached any.
    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            Self::Gateway { details, .. } => details,
            _ => &[],
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::configuration("/etc/keys", "directory is empty");
        assert_eq!(err.to_string(), "Configuration error (/etc/keys): directory is empty");

        let err = ClientError::Timeout {
            operation: "Evaluate",
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "Evaluate timed out after 5s");
    }

    #[test]
    fn test_details_only_on_gateway_errors() {
        let detail = ErrorDetail {
            address: "peer0:7051".to_string(),
            msp_id: "Org1MSP".to_string(),
            message: "chaincode response 500".to_string(),
        };
        let err = ClientError::Gateway {
            operation: "Endorse",
            code: tonic::Code::Aborted,
            message: "failed to endorse transaction".to_string(),
            details: vec![detail.clone()],
        };
        assert_eq!(err.details(), &[detail]);
        assert!(ClientError::Protocol("x".into()).details().is_empty());
    }
}
