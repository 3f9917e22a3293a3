//! In-process ledger that runs [`AssetContract`] over an in-memory world state.
//!
//! Each `(channel, chaincode)` pair gets its own world state. Submitted
//! transactions commit their writes only on success; evaluated transactions
//! never commit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;

use crate::chaincode::contract::AssetContract;
use crate::chaincode::stub::WorldState;
use crate::chaincode::types::ChaincodeEvent;
use crate::error::{ClientError, ClientResult};
use crate::gateway::{ContractApi, ContractProvider};
use crate::observability::metrics;

type PartitionKey = (String, String);

#[derive(Debug, Default)]
struct Partition {
    world: WorldState,
    last_event: Option<ChaincodeEvent>,
    events_published: u64,
}

/// Shared in-memory ledger. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct LocalLedger {
    partitions: Arc<Mutex<HashMap<PartitionKey, Partition>>>,
}

impl LocalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed world state for one contract.
    pub fn snapshot(&self, channel: &str, chaincode: &str) -> WorldState {
        self.lock()
            .get(&key(channel, chaincode))
            .map(|p| p.world.clone())
            .unwrap_or_default()
    }

    /// Event emitted by the most recently committed transaction, if it emitted one.
    pub fn last_event(&self, channel: &str, chaincode: &str) -> Option<ChaincodeEvent> {
        self.lock()
            .get(&key(channel, chaincode))
            .and_then(|p| p.last_event.clone())
    }

    /// Number of events published since the partition was created.
    pub fn events_published(&self, channel: &str, chaincode: &str) -> u64 {
        self.lock()
            .get(&key(channel, chaincode))
            .map(|p| p.events_published)
            .unwrap_or_default()
    }

    /// Handle bound to one contract.
    pub fn local_contract(&self, channel: &str, chaincode: &str) -> LocalContract {
        LocalContract {
            ledger: self.clone(),
            partition: key(channel, chaincode),
            contract: AssetContract::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PartitionKey, Partition>> {
        // Writes are buffered until commit, so a poisoned map is still consistent.
        self.partitions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ContractProvider for LocalLedger {
    fn contract(&self, channel: &str, chaincode: &str) -> Arc<dyn ContractApi> {
        Arc::new(self.local_contract(channel, chaincode))
    }
}

/// One contract on a [`LocalLedger`].
#[derive(Debug, Clone)]
pub struct LocalContract {
    ledger: LocalLedger,
    partition: PartitionKey,
    contract: AssetContract,
}

impl LocalContract {
    fn execute(&self, name: &str, args: &[String], commit: bool) -> ClientResult<Vec<u8>> {
        let mut partitions = self.ledger.lock();
        let partition = partitions.entry(self.partition.clone()).or_default();

        let mut tx = partition.world.begin();
        let payload = self.contract.invoke(&mut tx, name, args).map_err(|e| {
            tracing::debug!(transaction = name, error = %e, "Contract rejected transaction");
            ClientError::from(e)
        })?;
        let effects = tx.into_effects();

        if commit {
            let event = partition.world.commit(effects);
            if let Some(event) = &event {
                tracing::debug!(transaction = name, event = %event.name, "Event published");
                partition.events_published += 1;
            }
            partition.last_event = event;
        }

        Ok(payload)
    }
}

#[async_trait]
impl ContractApi for LocalContract {
    async fn submit_transaction(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.execute(name, args, true);
        metrics::record_transaction("submit", name, result.is_ok(), start);
        result
    }

    async fn evaluate_transaction(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.execute(name, args, false);
        metrics::record_transaction("evaluate", name, result.is_ok(), start);
        result
    }
}

fn key(channel: &str, chaincode: &str) -> PartitionKey {
    (channel.to_string(), chaincode.to_string())
}
