//! Asset contract: existence-checked creation, reads, and full scans.

use serde_json::json;

use crate::chaincode::asset::{asset_key, QrAsset, DOC_TYPE};
use crate::chaincode::stub::ChaincodeStub;
use crate::chaincode::types::{ContractError, ContractResult};

/// Event emitted when an asset is created.
pub const CREATED_EVENT: &str = "QRCreated";

/// Product id of the record written by `InitLedger`.
pub const SEED_PRODUCT_ID: &str = "0";

/// The QR asset contract. Stateless; all state lives behind the stub.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetContract;

impl AssetContract {
    pub fn new() -> Self {
        Self
    }

    /// Write the seed record at `QR:0`, overwriting whatever is there.
    pub fn init_ledger(&self, stub: &mut dyn ChaincodeStub) -> ContractResult<()> {
        let mut seed = QrAsset::sample(SEED_PRODUCT_ID);
        seed.doc_type = DOC_TYPE.to_string();
        stub.put_state(&seed.key(), seed.to_json()?)
    }

    /// Whether a record is stored for `product_id`.
    pub fn asset_exists(&self, stub: &dyn ChaincodeStub, product_id: &str) -> ContractResult<bool> {
        Ok(stub.get_state(&asset_key(product_id))?.is_some())
    }

    /// Store a new record; fails if the product id is taken.
    pub fn create_asset(
        &self,
        stub: &mut dyn ChaincodeStub,
        asset_json: &str,
    ) -> ContractResult<()> {
        let mut asset = QrAsset::from_json(asset_json)?;

        if self.asset_exists(stub, &asset.product_id)? {
            return Err(ContractError::AlreadyExists(asset.product_id));
        }

        asset.doc_type = DOC_TYPE.to_string();
        stub.put_state(&asset.key(), asset.to_json()?)?;

        let event = json!({ "productId": asset.product_id });
        stub.set_event(CREATED_EVENT, event.to_string().into_bytes())
    }

    /// Stored record for `product_id`.
    pub fn read_asset(
        &self,
        stub: &dyn ChaincodeStub,
        product_id: &str,
    ) -> ContractResult<QrAsset> {
        let key = asset_key(product_id);
        let bytes = stub
            .get_state(&key)?
            .ok_or_else(|| ContractError::NotFound(product_id.to_string()))?;
        decode(&key, &bytes)
    }

    /// Every record in the world state, in key order.
    ///
    /// Fails on the first value that is not a valid record.
    pub fn get_all_assets(&self, stub: &dyn ChaincodeStub) -> ContractResult<Vec<QrAsset>> {
        stub.get_state_by_range("", "")?
            .into_iter()
            .map(|(key, value)| decode(&key, &value))
            .collect()
    }

    /// Dispatch a named transaction; returns its serialized result.
    pub fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        function: &str,
        args: &[String],
    ) -> ContractResult<Vec<u8>> {
        match function {
            "InitLedger" => {
                expect_args(function, args, 0)?;
                self.init_ledger(stub)?;
                Ok(Vec::new())
            }
            "CreateAsset" => {
                expect_args(function, args, 1)?;
                self.create_asset(stub, &args[0])?;
                Ok(Vec::new())
            }
            "ReadAsset" => {
                expect_args(function, args, 1)?;
                self.read_asset(stub, &args[0])?.to_json()
            }
            "AssetExists" => {
                expect_args(function, args, 1)?;
                let exists = self.asset_exists(stub, &args[0])?;
                Ok(exists.to_string().into_bytes())
            }
            "GetAllAssets" => {
                expect_args(function, args, 0)?;
                let assets = self.get_all_assets(stub)?;
                serde_json::to_vec(&assets).map_err(|e| ContractError::Validation(e.to_string()))
            }
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }
}

fn expect_args(function: &str, args: &[String], expected: usize) -> ContractResult<()> {
    if args.len() != expected {
        return Err(ContractError::Arguments {
            function: function.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn decode(key: &str, bytes: &[u8]) -> ContractResult<QrAsset> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::Decode {
        key: key.to_string(),
        message: e.to_string(),
    })
}
