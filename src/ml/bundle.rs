use crate::ml::classifier::Classifier;
use crate::ml::features::{FeatureSchema, FittedFeatures};
use crate::ml::models::{ModelSummary, Target, TrainingMetadata};
use std::collections::BTreeMap;

/// Everything inference needs from one training run
///
/// A bundle is immutable once built; retraining produces a new bundle that
/// replaces the old one as a whole.
pub struct ModelBundle {
    pub system_owner_model: Box<dyn Classifier>,
    pub application_owner_model: Box<dyn Classifier>,
    pub features: FittedFeatures,
    pub schema: FeatureSchema,
    pub metadata: TrainingMetadata,
}

impl ModelBundle {
    pub fn model(&self, target: Target) -> &dyn Classifier {
        match target {
            Target::SystemOwner => self.system_owner_model.as_ref(),
            Target::ApplicationOwner => self.application_owner_model.as_ref(),
        }
    }

    pub fn summary(&self, generation: u64) -> ModelSummary {
        let classes: BTreeMap<Target, Vec<String>> = Target::ALL
            .iter()
            .map(|&target| {
                (
                    target,
                    self.features.target_encoder(target).classes().to_vec(),
                )
            })
            .collect();

        ModelSummary {
            generation,
            training: self.metadata.clone(),
            classes,
            locations: self.features.encoders.location.classes().to_vec(),
            operating_systems: self.features.encoders.operating_system.classes().to_vec(),
        }
    }
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("n_features", &self.schema.len())
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
