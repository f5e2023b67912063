use crate::error::{AppError, Result};
use crate::ml::models::ModelType;
use ndarray::Array2;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::BTreeSet;

/// Trait for owner classifiers
pub trait Classifier: Send + Sync {
    /// Fit on a feature matrix and one label code per row
    fn fit(&mut self, features: &Array2<f64>, labels: &[i64]) -> Result<()>;

    /// Predict one label code per row
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>>;

    /// Get model type
    fn model_type(&self) -> ModelType;

    /// Check if model is trained
    fn is_trained(&self) -> bool;
}

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

enum FittedForest {
    Forest(Forest),
    /// Only one label was present in the training partition
    Constant(i64),
}

/// Random forest over the owner feature matrix
pub struct RandomForestOwnerClassifier {
    n_trees: u16,
    seed: u64,
    n_features: usize,
    fitted: Option<FittedForest>,
}

impl RandomForestOwnerClassifier {
    pub fn new(n_trees: u16, seed: u64) -> Self {
        Self {
            n_trees,
            seed,
            n_features: 0,
            fitted: None,
        }
    }

    pub fn n_trees(&self) -> u16 {
        self.n_trees
    }

    fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
        let shape = arr.shape();
        let data: Vec<f64> = arr.iter().copied().collect();
        DenseMatrix::new(shape[0], shape[1], data, false)
    }

    fn to_smartcore_labels(labels: &[i64]) -> Result<Vec<i32>> {
        labels
            .iter()
            .map(|&code| {
                i32::try_from(code)
                    .map_err(|_| AppError::Training(format!("label code {} out of range", code)))
            })
            .collect()
    }
}

impl Classifier for RandomForestOwnerClassifier {
    fn fit(&mut self, features: &Array2<f64>, labels: &[i64]) -> Result<()> {
        if features.nrows() == 0 {
            return Err(AppError::Training("no training rows".to_string()));
        }
        if features.nrows() != labels.len() {
            return Err(AppError::Training(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }

        let distinct: BTreeSet<i64> = labels.iter().copied().collect();
        let fitted = if distinct.len() == 1 {
            FittedForest::Constant(labels[0])
        } else {
            let x = Self::ndarray_to_densematrix(features);
            let y = Self::to_smartcore_labels(labels)?;
            let params = RandomForestClassifierParameters::default()
                .with_n_trees(self.n_trees)
                .with_seed(self.seed);

            let forest = RandomForestClassifier::fit(&x, &y, params).map_err(|e| {
                AppError::Training(format!("Failed to train random forest: {}", e))
            })?;
            FittedForest::Forest(forest)
        };

        self.n_features = features.ncols();
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| AppError::NotTrained("classifier has not been fitted".to_string()))?;

        if features.ncols() != self.n_features {
            return Err(AppError::Internal(format!(
                "expected {} features, got {}",
                self.n_features,
                features.ncols()
            )));
        }

        match fitted {
            FittedForest::Constant(code) => Ok(vec![*code; features.nrows()]),
            FittedForest::Forest(forest) => {
                let x = Self::ndarray_to_densematrix(features);
                let predictions = forest
                    .predict(&x)
                    .map_err(|e| AppError::Internal(format!("Prediction failed: {}", e)))?;
                Ok(predictions.into_iter().map(i64::from).collect())
            }
        }
    }

    fn model_type(&self) -> ModelType {
        ModelType::RandomForest
    }

    fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }
}

/// Fraction of positions where prediction and truth agree
pub fn accuracy(y_true: &[i64], y_pred: &[i64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Some(correct as f64 / y_true.len() as f64)
}
