use crate::config::Config;
use crate::error::Result;
use crate::ingest::{DatasetReader, EncodingCandidates};
use crate::metrics::{
    PREDICTIONS_TOTAL, TRAINING_DURATION_SECONDS, TRAINING_ROWS, TRAINING_RUNS_TOTAL,
};
use crate::ml::bundle::ModelBundle;
use crate::ml::models::{ModelSummary, TrainingMetadata};
use crate::ml::predictor;
use crate::ml::trainer::{OwnerTrainer, TrainingParams};
use crate::models::{AssetRecord, OwnerPrediction};
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The published bundle together with its generation number
struct LiveModel {
    generation: u64,
    bundle: Arc<ModelBundle>,
}

/// Owns the live model bundle and swaps it atomically on retrain
///
/// Predictions take a snapshot of the current bundle, so a concurrent retrain
/// is observed either entirely or not at all.
pub struct OwnerService {
    live: ArcSwap<LiveModel>,
    reader: DatasetReader,
    trainer: OwnerTrainer,
}

impl OwnerService {
    /// Create a service around an already trained bundle
    pub fn new(reader: DatasetReader, trainer: OwnerTrainer, initial: ModelBundle) -> Self {
        Self {
            live: ArcSwap::from_pointee(LiveModel {
                generation: 1,
                bundle: Arc::new(initial),
            }),
            reader,
            trainer,
        }
    }

    /// Train on the configured startup dataset
    ///
    /// Fails if the dataset file is missing or unreadable; the server must not
    /// start without a model.
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let reader = DatasetReader::new(EncodingCandidates::from_labels(&config.dataset.encodings)?);
        let trainer = OwnerTrainer::new(TrainingParams::from(&config.model))?;

        let bundle = train_from_path(&reader, &trainer, &config.dataset.startup_path)?;
        Ok(Self::new(reader, trainer, bundle))
    }

    /// Snapshot of the live bundle
    pub fn current(&self) -> Arc<ModelBundle> {
        Arc::clone(&self.live.load().bundle)
    }

    pub fn generation(&self) -> u64 {
        self.live.load().generation
    }

    pub fn summary(&self) -> ModelSummary {
        let live = self.live.load();
        live.bundle.summary(live.generation)
    }

    /// Predict both owners with the live bundle
    pub fn predict(&self, record: &AssetRecord) -> Result<OwnerPrediction> {
        let live = self.live.load();
        let result = predictor::predict(record, &live.bundle);

        let outcome = if result.is_ok() { "success" } else { "failure" };
        PREDICTIONS_TOTAL.with_label_values(&[outcome]).inc();

        result
    }

    /// Decode, parse and train on uploaded bytes, then publish the new bundle
    ///
    /// Training runs on the blocking pool. On failure the live bundle is left
    /// untouched.
    pub async fn retrain_from_bytes(&self, bytes: Vec<u8>, source: String) -> Result<TrainingMetadata> {
        let reader = self.reader.clone();
        let trainer = self.trainer.clone();

        let bundle = tokio::task::spawn_blocking(move || {
            let rows = reader.read_bytes(&bytes)?;
            train_with_metrics(&trainer, &rows, &source)
        })
        .await??;

        let metadata = bundle.metadata.clone();
        self.publish(bundle);
        Ok(metadata)
    }

    fn publish(&self, bundle: ModelBundle) {
        let bundle = Arc::new(bundle);
        let previous = self.live.rcu(|live| LiveModel {
            generation: live.generation + 1,
            bundle: Arc::clone(&bundle),
        });
        let generation = previous.generation + 1;
        info!(generation, "Published new model bundle");
    }
}

/// Read and train on a dataset file
pub fn train_from_path(
    reader: &DatasetReader,
    trainer: &OwnerTrainer,
    path: &Path,
) -> Result<ModelBundle> {
    let rows = reader.read_path(path)?;
    train_with_metrics(trainer, &rows, &path.display().to_string())
}

fn train_with_metrics(
    trainer: &OwnerTrainer,
    rows: &[AssetRecord],
    source: &str,
) -> Result<ModelBundle> {
    let start = Instant::now();
    let result = trainer.train(rows, source);
    TRAINING_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());

    match &result {
        Ok(bundle) => {
            TRAINING_RUNS_TOTAL.with_label_values(&["success"]).inc();
            TRAINING_ROWS.set(rows.len() as i64);
            info!(
                source = source,
                rows = rows.len(),
                features = bundle.metadata.n_features,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Model training completed"
            );
        }
        Err(e) => {
            TRAINING_RUNS_TOTAL.with_label_values(&["failure"]).inc();
            error!(source = source, error = %e, "Model training failed");
        }
    }

    result
}
