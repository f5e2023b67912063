use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label column a classifier is trained to predict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    SystemOwner,
    ApplicationOwner,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::SystemOwner, Target::ApplicationOwner];

    /// Dataset column holding this target's labels
    pub fn column(&self) -> &'static str {
        match self {
            Target::SystemOwner => "system_owner",
            Target::ApplicationOwner => "application_owner",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Model type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    RandomForest,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::RandomForest => write!(f, "Random Forest"),
        }
    }
}

/// Per-target model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub target: Target,

    pub model_type: ModelType,

    /// Trees in the forest
    pub n_trees: u16,

    pub seed: u64,

    /// Rows the model was fitted on
    pub n_training_samples: usize,

    /// Distinct labels known to the target encoder
    pub n_classes: usize,

    /// Accuracy on the held-out partition; `None` when nothing was held out
    pub holdout_accuracy: Option<f64>,
}

/// Metadata recorded for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Where the dataset came from (a path or an uploaded file name)
    pub source: String,

    pub trained_at: chrono::DateTime<chrono::Utc>,

    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,

    /// Width of the frozen feature schema
    pub n_features: usize,

    /// Hostname n-gram vocabulary size
    pub vocab_size: usize,

    pub system_owner: ModelMetadata,
    pub application_owner: ModelMetadata,
}

impl TrainingMetadata {
    pub fn model(&self, target: Target) -> &ModelMetadata {
        match target {
            Target::SystemOwner => &self.system_owner,
            Target::ApplicationOwner => &self.application_owner,
        }
    }
}

/// Serializable view of the live model bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Increments every time a new bundle is published
    pub generation: u64,

    pub training: TrainingMetadata,

    /// Known labels per target, in code order
    pub classes: BTreeMap<Target, Vec<String>>,

    /// Known values of the categorical feature columns
    pub locations: Vec<String>,
    pub operating_systems: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns() {
        assert_eq!(Target::SystemOwner.column(), "system_owner");
        assert_eq!(Target::ApplicationOwner.to_string(), "application_owner");
        assert_eq!(Target::ALL.len(), 2);
    }

    #[test]
    fn test_target_serializes_snake_case() {
        let json = serde_json::to_string(&Target::ApplicationOwner).unwrap();
        assert_eq!(json, "\"application_owner\"");
    }

    #[test]
    fn test_model_type_display() {
        assert_eq!(ModelType::RandomForest.to_string(), "Random Forest");
    }
}
