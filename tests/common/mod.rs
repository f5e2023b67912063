//! Shared fixtures for integration tests
#![allow(dead_code)]

use asset_owner_predictor::{
    ingest::DatasetReader,
    ml::{OwnerService, OwnerTrainer, TrainingParams},
    models::AssetRecord,
};

pub const HEADER: &str = "hostname,ip,location,operating_system,system_owner,application_owner";

/// Ten labeled rows: location decides the system owner, operating system the
/// application owner, and the application owner split is 5/5.
pub const TEN_ROW_DATASET: &str = "\
hostname,ip,location,operating_system,system_owner,application_owner
web-nyc-01,10.1.0.11,NYC,Linux,Infrastructure,Storefront
web-nyc-02,10.1.0.12,NYC,Linux,Infrastructure,Storefront
web-nyc-03,10.1.0.13,NYC,Linux,Infrastructure,Storefront
app-nyc-01,10.1.0.21,NYC,Windows,Infrastructure,Ledger
app-nyc-02,10.1.0.22,NYC,Windows,Infrastructure,Ledger
db-lon-01,10.2.0.21,London,Windows,Database Team,Ledger
db-lon-02,10.2.0.22,London,Windows,Database Team,Ledger
db-lon-03,10.2.0.23,London,Windows,Database Team,Ledger
web-lon-01,10.2.0.11,London,Linux,Database Team,Storefront
web-lon-02,10.2.0.12,London,Linux,Database Team,Storefront
";

pub fn training_rows() -> Vec<AssetRecord> {
    DatasetReader::default()
        .read_bytes(TEN_ROW_DATASET.as_bytes())
        .expect("fixture dataset parses")
}

pub fn trained_service() -> OwnerService {
    let trainer = OwnerTrainer::new(TrainingParams::default()).expect("default params are valid");
    let bundle = trainer
        .train(&training_rows(), "fixture.csv")
        .expect("fixture dataset trains");
    OwnerService::new(DatasetReader::default(), trainer, bundle)
}
