/// Integration tests for the owner prediction pipeline
///
/// These tests verify:
/// - Dataset decoding and parsing from disk
/// - Feature extraction and schema freezing
/// - Training both owner models
/// - Prediction against the frozen bundle
/// - Retraining through the service

mod common;

use asset_owner_predictor::{
    error::AppError,
    ingest::{DatasetReader, EncodingCandidates},
    ml::{
        ip_to_features, predict, service::train_from_path, FeatureExtractor, OwnerTrainer, Target,
        TrainingParams, UNSEEN_CODE,
    },
    models::AssetRecord,
};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_end_to_end_predicts_training_row_labels() {
    let rows = common::training_rows();
    let trainer = OwnerTrainer::new(TrainingParams::default()).unwrap();
    let bundle = trainer.train(&rows, "fixture.csv").unwrap();

    let row = &rows[6];
    let query = AssetRecord::new(
        row.hostname.clone(),
        row.ip.clone(),
        row.location.clone(),
        row.operating_system.clone(),
    );
    let prediction = predict(&query, &bundle).unwrap();

    assert_eq!(prediction.system_owner, "Database Team");
    assert_eq!(prediction.application_owner, "Ledger");
}

#[test]
fn test_schema_is_frozen_at_training_time() {
    let rows = common::training_rows();
    let bundle = OwnerTrainer::new(TrainingParams::default())
        .unwrap()
        .train(&rows, "fixture.csv")
        .unwrap();
    let (frame, _, _) = FeatureExtractor::default().fit(&rows).unwrap();

    assert_eq!(&bundle.schema, frame.schema());
    assert_eq!(bundle.metadata.n_features, frame.schema().len());
}

#[test]
fn test_unseen_categories_map_to_sentinel() {
    let (_, _, fitted) = FeatureExtractor::default().fit(&common::training_rows()).unwrap();
    let frame = fitted
        .transform(&[AssetRecord::new("edge-01", "10.9.9.9", "Singapore", "FreeBSD")])
        .unwrap();

    assert_eq!(frame.value(0, "location"), Some(UNSEEN_CODE as f64));
    assert_eq!(frame.value(0, "operating_system"), Some(UNSEEN_CODE as f64));
}

#[test]
fn test_prediction_with_unknown_everything_succeeds() {
    let bundle = OwnerTrainer::new(TrainingParams::default())
        .unwrap()
        .train(&common::training_rows(), "fixture.csv")
        .unwrap();

    let prediction = predict(&AssetRecord::new("", "a.b.c.d", "Mars", "TempleOS"), &bundle).unwrap();
    let known = bundle.features.target_encoder(Target::SystemOwner).classes();
    assert!(known.contains(&prediction.system_owner));
}

#[test]
fn test_ip_features() {
    assert_eq!(ip_to_features("192.168.1.10"), [192, 168, 1, 10]);
    for malformed in ["", "1.2.3", "a.b.c.d"] {
        assert_eq!(ip_to_features(malformed), [0, 0, 0, 0], "ip {:?}", malformed);
    }
}

#[test]
fn test_label_round_trip_through_encoder() {
    let (_, targets, fitted) = FeatureExtractor::default().fit(&common::training_rows()).unwrap();
    let encoder = fitted.target_encoder(Target::SystemOwner);

    for (row, &code) in common::training_rows().iter().zip(&targets.system_owner) {
        assert_eq!(encoder.inverse_transform(code), row.system_owner.as_deref());
    }
}

#[test]
fn test_train_from_windows_1252_file() {
    let mut file = NamedTempFile::new().unwrap();
    let mut bytes = common::TEN_ROW_DATASET.as_bytes().to_vec();
    // "Zürich" encoded as windows-1252
    bytes.extend_from_slice(b"web-zrh-01,10.3.0.1,Z\xfcrich,Linux,Infrastructure,Storefront\n");
    file.write_all(&bytes).unwrap();

    let reader = DatasetReader::default();
    let trainer = OwnerTrainer::new(TrainingParams::default()).unwrap();
    let bundle = train_from_path(&reader, &trainer, file.path()).unwrap();

    assert_eq!(bundle.metadata.n_rows, 11);
    assert!(bundle
        .features
        .encoders
        .location
        .classes()
        .contains(&"Zürich".to_string()));
}

#[test]
fn test_strict_encoding_list_rejects_non_utf8() {
    let candidates = EncodingCandidates::from_labels(&["utf-8".to_string()]).unwrap();
    let reader = DatasetReader::new(candidates);

    let mut bytes = format!("{}\nweb-01,10.0.0.1,Z", common::HEADER).into_bytes();
    bytes.push(0xfc);
    bytes.extend_from_slice(b"rich,Linux,Ops,Billing\n");

    let err = reader.read_bytes(&bytes).unwrap_err();
    assert!(matches!(err, AppError::UnsupportedEncoding { .. }));
}

#[test]
fn test_missing_column_is_dataset_error() {
    let reader = DatasetReader::default();
    let err = reader
        .read_bytes(b"hostname,ip,location\nweb-01,10.0.0.1,NYC\n")
        .unwrap_err();

    assert!(matches!(err, AppError::Dataset(_)));
    assert!(err.to_string().contains("operating_system"));
}

#[test]
fn test_missing_startup_file_fails() {
    let reader = DatasetReader::default();
    let trainer = OwnerTrainer::new(TrainingParams::default()).unwrap();

    let err = train_from_path(&reader, &trainer, std::path::Path::new("/nonexistent/data.csv"))
        .unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[tokio::test]
async fn test_service_retrain_replaces_labels() {
    let service = common::trained_service();

    let csv = format!(
        "{}\n\
         ci-01,10.5.0.1,Austin,Linux,Build Team,CI\n\
         ci-02,10.5.0.2,Austin,Linux,Build Team,CI\n\
         mail-01,10.6.0.1,Dublin,Windows,Messaging,Exchange\n\
         mail-02,10.6.0.2,Dublin,Windows,Messaging,Exchange\n",
        common::HEADER
    );
    service
        .retrain_from_bytes(csv.into_bytes(), "replacement.csv".to_string())
        .await
        .unwrap();

    let summary = service.summary();
    assert_eq!(summary.generation, 2);
    assert_eq!(summary.training.source, "replacement.csv");
    assert_eq!(
        summary.classes[&Target::SystemOwner],
        vec!["Build Team".to_string(), "Messaging".to_string()]
    );
}
