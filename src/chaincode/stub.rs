//! World-state access for contract code.
//!
//! Reads observe committed state only. Writes and the event are buffered in
//! the transaction and reach the world state only through [`WorldState::commit`].

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::chaincode::types::{ChaincodeEvent, ContractResult};

/// What a contract may do to the ledger during one transaction.
pub trait ChaincodeStub {
    /// Committed value under `key`, if any.
    fn get_state(&self, key: &str) -> ContractResult<Option<Vec<u8>>>;

    /// Record a write for commit.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> ContractResult<()>;

    /// Committed entries in `[start, end)` in key order; empty bounds are open.
    fn get_state_by_range(&self, start: &str, end: &str) -> ContractResult<Vec<(String, Vec<u8>)>>;

    /// Set the transaction's event. A later call replaces an earlier one.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> ContractResult<()>;
}

/// Current key-value snapshot of one contract's ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldState {
    entries: BTreeMap<String, Vec<u8>>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write directly, bypassing contract logic.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.entries.insert(key.into(), value);
    }

    /// Start a transaction against this snapshot.
    pub fn begin(&self) -> TransactionStub<'_> {
        TransactionStub {
            committed: self,
            writes: BTreeMap::new(),
            event: None,
        }
    }

    /// Apply a finished transaction's writes.
    pub fn commit(&mut self, effects: TransactionEffects) -> Option<ChaincodeEvent> {
        self.entries.extend(effects.writes);
        effects.event
    }
}

/// Buffered outcome of a transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionEffects {
    pub writes: BTreeMap<String, Vec<u8>>,
    pub event: Option<ChaincodeEvent>,
}

/// Stub for one in-flight transaction.
#[derive(Debug)]
pub struct TransactionStub<'a> {
    committed: &'a WorldState,
    writes: BTreeMap<String, Vec<u8>>,
    event: Option<ChaincodeEvent>,
}

impl TransactionStub<'_> {
    pub fn into_effects(self) -> TransactionEffects {
        TransactionEffects {
            writes: self.writes,
            event: self.event,
        }
    }
}

impl ChaincodeStub for TransactionStub<'_> {
    fn get_state(&self, key: &str) -> ContractResult<Option<Vec<u8>>> {
        Ok(self.committed.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> ContractResult<()> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> ContractResult<Vec<(String, Vec<u8>)>> {
        let lower = if start.is_empty() { Bound::Unbounded } else { Bound::Included(start) };
        let upper = if end.is_empty() { Bound::Unbounded } else { Bound::Excluded(end) };

        Ok(self
            .committed
            .entries
            .range::<str, _>((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> ContractResult<()> {
        self.event = Some(ChaincodeEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WorldState {
        let mut state = WorldState::new();
        for key in ["QR:1", "QR:2", "QR:3", "other"] {
            state.insert_raw(key, key.as_bytes().to_vec());
        }
        state
    }

    #[test]
    fn test_writes_are_invisible_until_commit() {
        let mut state = state();
        let mut tx = state.begin();
        tx.put_state("QR:9", b"new".to_vec()).unwrap();
        assert_eq!(tx.get_state("QR:9").unwrap(), None);

        let effects = tx.into_effects();
        assert_eq!(state.get("QR:9"), None);
        state.commit(effects);
        assert_eq!(state.get("QR:9"), Some(&b"new"[..]));
    }

    #[test]
    fn test_range_bounds() {
        let state = state();
        let tx = state.begin();

        let all = tx.get_state_by_range("", "").unwrap();
        assert_eq!(all.len(), 4);

        let keys: Vec<_> = tx
            .get_state_by_range("QR:2", "QR:3")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["QR:2"]);
    }

    #[test]
    fn test_last_event_wins() {
        let state = WorldState::new();
        let mut tx = state.begin();
        tx.set_event("first", vec![1]).unwrap();
        tx.set_event("second", vec![2]).unwrap();

        let event = tx.into_effects().event.unwrap();
        assert_eq!(event.name, "second");
    }
}
