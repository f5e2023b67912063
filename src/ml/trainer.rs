//! Training of the two owner classifiers
//!
//! Beyond fitting, each run scores the held-out partition and records the
//! accuracy in [`ModelMetadata`]. The score is informational only; a bundle is
//! published regardless of it.

use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::ml::bundle::ModelBundle;
use crate::ml::classifier::{accuracy, Classifier, RandomForestOwnerClassifier};
use crate::ml::features::FeatureExtractor;
use crate::ml::models::{ModelMetadata, Target, TrainingMetadata};
use crate::models::AssetRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Hyperparameters for a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    pub n_trees: u16,
    pub seed: u64,
    pub test_size: f64,
    pub ngram_range: (usize, usize),
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            test_size: 0.2,
            ngram_range: (2, 4),
        }
    }
}

impl From<&ModelConfig> for TrainingParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            seed: config.seed,
            test_size: config.test_size,
            ngram_range: (config.ngram_min, config.ngram_max),
        }
    }
}

/// Row indices of the train and held-out partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle row indices with a seeded RNG and hold out `ceil(test_size * n)`
    ///
    /// At least one row always stays in the training partition.
    pub fn new(n_rows: usize, test_size: f64, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..n_rows).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = ((test_size * n_rows as f64).ceil() as usize).min(n_rows.saturating_sub(1));
        let train = indices.split_off(n_test);

        Self {
            train,
            test: indices,
        }
    }
}

/// Trains the system-owner and application-owner forests
#[derive(Debug, Clone)]
pub struct OwnerTrainer {
    params: TrainingParams,
}

impl OwnerTrainer {
    pub fn new(params: TrainingParams) -> Result<Self> {
        if !(0.0..1.0).contains(&params.test_size) {
            return Err(AppError::Configuration(format!(
                "test_size must be in [0, 1), got {}",
                params.test_size
            )));
        }
        if params.n_trees == 0 {
            return Err(AppError::Configuration("n_trees must be positive".to_string()));
        }
        FeatureExtractor::new(params.ngram_range)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    /// Fit features and both classifiers on a labeled dataset
    ///
    /// One train/test split is shared by both targets.
    pub fn train(&self, rows: &[AssetRecord], source: &str) -> Result<ModelBundle> {
        if rows.is_empty() {
            return Err(AppError::Dataset("dataset contains no rows".to_string()));
        }

        let extractor = FeatureExtractor::new(self.params.ngram_range)?;
        let (frame, targets, features) = extractor.fit(rows)?;
        let split = TrainTestSplit::new(rows.len(), self.params.test_size, self.params.seed);

        let x_train = frame.select_rows(&split.train);
        let x_test = frame.select_rows(&split.test);

        let fit_target = |target: Target| -> Result<(Box<dyn Classifier>, ModelMetadata)> {
            let codes = targets.get(target);
            let y_train: Vec<i64> = split.train.iter().map(|&i| codes[i]).collect();
            let y_test: Vec<i64> = split.test.iter().map(|&i| codes[i]).collect();

            let mut model = RandomForestOwnerClassifier::new(self.params.n_trees, self.params.seed);
            model.fit(&x_train, &y_train)?;

            let holdout_accuracy = if y_test.is_empty() {
                None
            } else {
                accuracy(&y_test, &model.predict(&x_test)?)
            };

            let metadata = ModelMetadata {
                target,
                model_type: model.model_type(),
                n_trees: self.params.n_trees,
                seed: self.params.seed,
                n_training_samples: y_train.len(),
                n_classes: features.target_encoder(target).len(),
                holdout_accuracy,
            };

            info!(
                target = %target,
                classes = metadata.n_classes,
                holdout_accuracy = ?holdout_accuracy,
                "Trained owner classifier"
            );

            let model: Box<dyn Classifier> = Box::new(model);
            Ok((model, metadata))
        };

        let (system_owner_model, system_owner) = fit_target(Target::SystemOwner)?;
        let (application_owner_model, application_owner) = fit_target(Target::ApplicationOwner)?;

        let schema = frame.schema().clone();
        let metadata = TrainingMetadata {
            source: source.to_string(),
            trained_at: chrono::Utc::now(),
            n_rows: rows.len(),
            n_train: split.train.len(),
            n_test: split.test.len(),
            n_features: schema.len(),
            vocab_size: features.vectorizer.vocab_size(),
            system_owner,
            application_owner,
        };

        Ok(ModelBundle {
            system_owner_model,
            application_owner_model,
            features,
            schema,
            metadata,
        })
    }
}
