/// Owner prediction models
///
/// Feature extraction turns asset records into a numeric matrix (categorical
/// codes, hostname character n-gram counts and IP octets). Two random forests
/// are trained on it, one per owner column, and bundled with the fitted
/// encoders so inference reproduces the training-time transformation exactly.

pub mod bundle;
pub mod classifier;
pub mod encoder;
pub mod features;
pub mod models;
pub mod predictor;
pub mod service;
pub mod trainer;
pub mod vectorizer;

pub use bundle::ModelBundle;
pub use classifier::{Classifier, RandomForestOwnerClassifier};
pub use encoder::{CategoricalEncoders, LabelEncoder, UNSEEN_CODE};
pub use features::{
    ip_to_features, FeatureExtractor, FeatureFrame, FeatureSchema, FittedFeatures, TargetCodes,
};
pub use models::{ModelMetadata, ModelSummary, ModelType, Target, TrainingMetadata};
pub use predictor::predict;
pub use service::OwnerService;
pub use trainer::{OwnerTrainer, TrainTestSplit, TrainingParams};
pub use vectorizer::NgramVectorizer;
