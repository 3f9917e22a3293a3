//! Transaction API shared by the remote gateway and the in-process ledger.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ClientResult;

/// One deployed contract on one channel.
#[async_trait]
pub trait ContractApi: Send + Sync {
    /// Run a state-changing transaction through endorsement, ordering and commit.
    async fn submit_transaction(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>>;

    /// Run a read-only transaction; nothing is ordered or committed.
    async fn evaluate_transaction(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>>;
}

/// Resolves channel and chaincode names to contract handles.
pub trait ContractProvider: Send + Sync {
    fn contract(&self, channel: &str, chaincode: &str) -> Arc<dyn ContractApi>;
}
