//! The startup sequence and contract semantics over the in-process ledger.

use qr_ledger::chaincode::{LocalLedger, QrAsset, CREATED_EVENT};
use qr_ledger::error::ClientError;
use qr_ledger::gateway::ContractProvider;
use qr_ledger::lifecycle::startup;

mod common;
use common::asset_arg;

const CHANNEL: &str = "mychannel";
const CHAINCODE: &str = "livestock";

#[tokio::test]
async fn test_startup_sequence_round_trip() {
    let ledger = LocalLedger::new();
    let contract = ledger.contract(CHANNEL, CHAINCODE);

    let report = startup::run(contract.as_ref()).await.unwrap();

    assert!(report.ledger_initialized);
    let stored = ledger.snapshot(CHANNEL, CHAINCODE);
    let key = format!("QR:{}", report.product_id);
    assert_eq!(stored.get(&key), Some(report.record.as_slice()));
    assert!(stored.get("QR:0").is_some());
}

#[tokio::test]
async fn test_second_run_reseeds_and_creates_new_record() {
    let ledger = LocalLedger::new();
    let contract = ledger.contract(CHANNEL, CHAINCODE);

    startup::run_with_id(contract.as_ref(), "1".to_string()).await.unwrap();
    let report = startup::run_with_id(contract.as_ref(), "2".to_string()).await.unwrap();

    assert!(report.ledger_initialized);
    assert_eq!(ledger.snapshot(CHANNEL, CHAINCODE).len(), 3);
}

#[tokio::test]
async fn test_get_all_assets_returns_every_record_once() {
    let ledger = LocalLedger::new();
    let contract = ledger.contract(CHANNEL, CHAINCODE);
    contract.submit_transaction("InitLedger", &[]).await.unwrap();
    for id in ["a", "b", "c"] {
        contract.submit_transaction("CreateAsset", &[asset_arg(id)]).await.unwrap();
    }

    let payload = contract.evaluate_transaction("GetAllAssets", &[]).await.unwrap();
    let assets: Vec<QrAsset> = serde_json::from_slice(&payload).unwrap();

    let mut ids: Vec<_> = assets.into_iter().map(|a| a.product_id).collect();
    ids.sort();
    assert_eq!(ids, vec!["0", "a", "b", "c"]);
}

#[tokio::test]
async fn test_create_emits_one_event_per_commit() {
    let ledger = LocalLedger::new();
    let contract = ledger.contract(CHANNEL, CHAINCODE);

    contract.submit_transaction("CreateAsset", &[asset_arg("9")]).await.unwrap();
    let _ = contract.submit_transaction("CreateAsset", &[asset_arg("9")]).await;

    assert_eq!(ledger.events_published(CHANNEL, CHAINCODE), 1);
    let event = ledger.last_event(CHANNEL, CHAINCODE).unwrap();
    assert_eq!(event.name, CREATED_EVENT);
    assert_eq!(event.payload, br#"{"productId":"9"}"#);
}

#[tokio::test]
async fn test_read_missing_surfaces_contract_error() {
    let ledger = LocalLedger::new();
    let contract = ledger.contract(CHANNEL, CHAINCODE);

    let err = contract
        .evaluate_transaction("ReadAsset", &["absent".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Contract(_)));
    assert_eq!(err.to_string(), "the asset absent does not exist");
}
