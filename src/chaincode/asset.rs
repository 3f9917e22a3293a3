//! The QR asset record: the only entity the contract persists.

use serde::{Deserialize, Serialize};

use crate::chaincode::types::{ContractError, ContractResult};

/// Discriminator stamped on every stored record.
pub const DOC_TYPE: &str = "asset";

/// Namespace prefix of every asset key.
pub const KEY_PREFIX: &str = "QR";

/// World-state key for a product id.
pub fn asset_key(product_id: &str) -> String {
    format!("{}:{}", KEY_PREFIX, product_id)
}

/// Traceability record for one packaged product.
///
/// Scalars are required on input; list fields default to empty. `docType`
/// is assigned by the contract and ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrAsset {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub product_name_en: String,
    pub product_name_bn: String,
    pub species_en: String,
    pub species_bn: String,
    pub date_of_harvesting: String,
    pub date_of_packaging: String,
    pub expired_date: String,
    pub mrp: f64,
    pub has_blast_freezer: bool,
    pub has_iqf: bool,
    pub has_vacuum_package: bool,
    pub has_food_grade_package_ldpe_4: bool,
    pub storage_en: String,
    pub storage_bn: String,
    #[serde(default)]
    pub water_source_en: Vec<String>,
    #[serde(default)]
    pub water_source_bn: Vec<String>,
    pub has_freezer_van_transportation: bool,
    pub batch_number: String,
    pub secondary_batch: String,
    pub lot_number: String,
    pub net_weight: f64,
    #[serde(default)]
    pub certification_en: Vec<String>,
    #[serde(default)]
    pub certification_bn: Vec<String>,
    #[serde(default)]
    pub certification_link: Vec<String>,
    pub production_latitude: f64,
    pub production_longitude: f64,
    pub producer_organization_en: String,
    pub producer_organization_bn: String,
    pub livestock_collection_center_latitude: f64,
    pub livestock_collection_center_longitude: f64,
    pub collector_organization_en: String,
    pub collector_organization_bn: String,
    pub livestock_processing_unit_latitude: f64,
    pub livestock_processing_unit_longitude: f64,
    pub processor_organization_en: String,
    pub processor_organization_bn: String,
    #[serde(rename = "docType", default)]
    pub doc_type: String,
}

impl QrAsset {
    /// Parse client input into the schema.
    pub fn from_json(input: &str) -> ContractResult<Self> {
        let asset: Self = serde_json::from_str(input)
            .map_err(|e| ContractError::Validation(format!("failed to unmarshal asset: {}", e)))?;
        if asset.product_id.is_empty() {
            return Err(ContractError::Validation("productId must not be empty".to_string()));
        }
        Ok(asset)
    }

    pub fn key(&self) -> String {
        asset_key(&self.product_id)
    }

    /// Serialized form, as stored and as sent to the contract.
    pub fn to_json(&self) -> ContractResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ContractError::Validation(e.to_string()))
    }

    /// The demonstration record: a batch of frozen hilsa.
    pub fn sample(product_id: impl Into<String>) -> Self {
        let both = |s: &str| (s.to_string(), s.to_string());
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let (product_name_en, product_name_bn) = both("Frozen Hilsa Fish");
        let (species_en, species_bn) = both("Hilsa");
        let (storage_en, storage_bn) = both("Cold Storage Dhaka");
        let (producer_organization_en, producer_organization_bn) = both("Padma Fisheries Ltd");
        let (collector_organization_en, collector_organization_bn) = both("Dhaka Fish Collectors");
        let (processor_organization_en, processor_organization_bn) =
            both("Bangladesh Fish Processing Ltd");

        Self {
            product_id: product_id.into(),
            product_name_en,
            product_name_bn,
            species_en,
            species_bn,
            date_of_harvesting: "2025-09-01".to_string(),
            date_of_packaging: "2025-09-03".to_string(),
            expired_date: "2026-03-01".to_string(),
            mrp: 1200.5,
            has_blast_freezer: true,
            has_iqf: false,
            has_vacuum_package: true,
            has_food_grade_package_ldpe_4: true,
            storage_en,
            storage_bn,
            water_source_en: list(&["Filtered water", "Arsenic"]),
            water_source_bn: list(&["Filtered water", "Arsenic"]),
            has_freezer_van_transportation: true,
            batch_number: "BATCH-001".to_string(),
            secondary_batch: "SBATCH-001".to_string(),
            lot_number: "LOT-001".to_string(),
            net_weight: 2.5,
            certification_en: list(&["ISO22000", "HACCP"]),
            certification_bn: list(&["ISO22000", "HACCP"]),
            certification_link: list(&["https://iso.org/22000", "https://haccp.org"]),
            production_latitude: 23.8103,
            production_longitude: 90.4125,
            producer_organization_en,
            producer_organization_bn,
            livestock_collection_center_latitude: 23.90,
            livestock_collection_center_longitude: 90.44,
            collector_organization_en,
            collector_organization_bn,
            livestock_processing_unit_latitude: 23.75,
            livestock_processing_unit_longitude: 90.39,
            processor_organization_en,
            processor_organization_bn,
            doc_type: String::new(),
        }
    }
}
